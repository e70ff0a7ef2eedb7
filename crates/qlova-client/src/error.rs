//! Error types for the conversation client.

use qlova_core::error::QlovaError;
use qlova_intent::IntentError;

/// Failures of a single HTTP exchange. Always fatal for the conversation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err.to_string())
    }
}

/// Errors from the conversation client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] QlovaError),
    #[error("intent error: {0}")]
    Intent(#[from] IntentError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ClientError {
    /// Whether the conversation cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Config(_))
    }
}
