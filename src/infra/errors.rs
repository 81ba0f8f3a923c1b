// src/infra/errors.rs — Error types for Miles

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MilesError {
    // Transport errors: the chat request never produced a usable response.
    #[error("Chat request failed: {0}")]
    Transport(String),

    #[error("Chat backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MilesError {
    /// Whether this error counts as a transport failure at the conversation
    /// boundary (network error or non-2xx status are treated uniformly).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MilesError::Transport(_) | MilesError::Backend { .. }
        )
    }
}
