// src/lib.rs — Library root for Miles

pub mod chat;
pub mod cli;
pub mod content;
pub mod context;
pub mod dashboard;
pub mod infra;
pub mod session;
pub mod transcript;
pub mod trigger;
pub mod tui;
