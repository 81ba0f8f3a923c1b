// src/chat/mod.rs — Conversation layer

pub mod backend;
pub mod controller;

pub use backend::{ChatBackend, ChatPayload, ChatReply, HttpChatBackend, WireMessage};
pub use controller::{ConversationController, TurnOutcome, TurnState, ERROR_BANNER, FALLBACK_REPLY};
