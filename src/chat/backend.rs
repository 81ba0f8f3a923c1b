// src/chat/backend.rs — Chat backend boundary
//
// One request per user turn: the full transcript plus the frozen client
// context and session id. The response shape is duck-typed on the wire;
// here it is an explicit optional-field type with defined defaults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::context::ClientContext;
use crate::infra::errors::MilesError;
use crate::transcript::{ChatTurn, Role};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub messages: Vec<WireMessage>,

    /// Omitted entirely when context resolution produced nothing; absent
    /// location fields inside are stripped by the context types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ClientContext>,

    /// String-or-null on the wire.
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn from_turn(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Response body, every field optional. A missing `reply` is an empty
/// string, never an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,

    /// Set when the backend fetched live travel data for this turn.
    #[serde(default)]
    pub data_fetched: bool,

    /// Dashboard-shaped payload from the backend's travel-data provider.
    #[serde(default)]
    pub amadeus_data: Option<serde_json::Value>,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, payload: ChatPayload) -> Result<ChatReply, MilesError>;
}

pub struct HttpChatBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Probe `GET /api/health`. Used by `miles doctor`.
    pub async fn health(&self) -> Result<(), MilesError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| MilesError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MilesError::Backend {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, payload: ChatPayload) -> Result<ChatReply, MilesError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| MilesError::Transport(e.to_string()))?;

        // Network errors and non-2xx are one failure class at this boundary.
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MilesError::Backend { status, message });
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| MilesError::Transport(format!("malformed chat response: {e}")))
    }
}
