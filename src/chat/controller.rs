// src/chat/controller.rs — Conversation controller
//
// Drives one full turn: optimistic user append, the outbound request with
// the whole transcript, then the assistant reply or the fixed fallback.
// The turn state machine is Idle → Composing → Idle; the suspend point
// between `begin_turn` and `finish_turn` is the only await in a turn, and
// submission is rejected while a turn is in flight, so at most one request
// is ever outstanding.

use std::sync::Arc;
use tracing::{debug, warn};

use super::backend::{ChatBackend, ChatPayload, ChatReply, WireMessage};
use crate::context::ClientContext;
use crate::dashboard::DashboardData;
use crate::infra::errors::MilesError;
use crate::session::SessionId;
use crate::transcript::{ChatTurn, Transcript};
use crate::trigger::{extract_route, should_trigger, TriggerVocabulary};

/// Fixed assistant turn appended on any transport failure.
pub const FALLBACK_REPLY: &str = "Sorry, there was an error reaching the server.";

/// Dismissible inline banner text shown alongside the fallback turn.
pub const ERROR_BANNER: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Composing,
}

/// What one settled turn produced, for the rendering layer.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: ChatTurn,
    pub dashboard_raised: bool,
    pub failed: bool,
}

pub struct ConversationController {
    backend: Arc<dyn ChatBackend>,
    context: Option<ClientContext>,
    session_id: SessionId,
    vocabulary: TriggerVocabulary,

    transcript: Transcript,
    state: TurnState,
    pending_text: Option<String>,
    dashboard: Option<DashboardData>,
    last_error: Option<String>,
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        context: Option<ClientContext>,
        session_id: SessionId,
        vocabulary: TriggerVocabulary,
    ) -> Self {
        Self {
            backend,
            context,
            session_id,
            vocabulary,
            transcript: Transcript::new(),
            state: TurnState::Idle,
            pending_text: None,
            dashboard: None,
            last_error: None,
        }
    }

    /// Append a turn outside the request cycle (the welcome message).
    pub fn seed(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
    }

    /// Run one full turn. Returns None when the submission was rejected
    /// (blank input, or a turn already in flight).
    pub async fn submit(&mut self, text: &str) -> Option<TurnOutcome> {
        let payload = self.begin_turn(text)?;
        let result = self.backend.clone().send(payload).await;
        Some(self.finish_turn(result))
    }

    /// Idle → Composing. Validates the input, appends the user turn
    /// optimistically, clears any prior error, and builds the request
    /// payload. Returns None without side effects when rejected.
    pub fn begin_turn(&mut self, text: &str) -> Option<ChatPayload> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.state == TurnState::Composing {
            debug!("submission dropped: a turn is already in flight");
            return None;
        }

        self.state = TurnState::Composing;
        self.last_error = None;
        self.pending_text = Some(trimmed.to_string());
        self.transcript.push(ChatTurn::user(trimmed));

        Some(ChatPayload {
            messages: self
                .transcript
                .turns()
                .iter()
                .map(WireMessage::from_turn)
                .collect(),
            context: self.context.clone(),
            session_id: Some(self.session_id.as_str().to_string()),
        })
    }

    /// Composing → Idle. Appends the assistant turn (reply or fallback),
    /// records the error flag on failure, and evaluates the dashboard
    /// trigger against the user's original text on success.
    pub fn finish_turn(&mut self, result: Result<ChatReply, MilesError>) -> TurnOutcome {
        let user_text = self.pending_text.take().unwrap_or_default();

        let outcome = match result {
            Ok(reply) => {
                let turn = ChatTurn::assistant(reply.reply.clone());
                self.transcript.push(turn.clone());

                let dashboard_raised = if should_trigger(&user_text, self.vocabulary) {
                    let route = extract_route(&user_text);
                    let data = if reply.data_fetched {
                        match reply.amadeus_data.as_ref() {
                            Some(value) => DashboardData::from_backend(value, &route),
                            None => DashboardData::placeholder(&route),
                        }
                    } else {
                        DashboardData::placeholder(&route)
                    };
                    self.dashboard = Some(data);
                    true
                } else {
                    false
                };

                TurnOutcome {
                    reply: turn,
                    dashboard_raised,
                    failed: false,
                }
            }
            Err(e) => {
                warn!("chat request failed: {e}");
                self.last_error = Some(ERROR_BANNER.to_string());
                let turn = ChatTurn::assistant(FALLBACK_REPLY);
                self.transcript.push(turn.clone());
                TurnOutcome {
                    reply: turn,
                    dashboard_raised: false,
                    failed: true,
                }
            }
        };

        self.state = TurnState::Idle;
        outcome
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn dashboard(&self) -> Option<&DashboardData> {
        self.dashboard.as_ref()
    }

    /// Clear the dashboard wholesale (user dismissed the panel).
    pub fn dismiss_dashboard(&mut self) {
        self.dashboard = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}
