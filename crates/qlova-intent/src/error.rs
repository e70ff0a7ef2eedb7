//! Error types for intent registration and matching.

/// Errors from intent registration and matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    #[error("Invalid pattern for intent {intent}: {reason}")]
    InvalidPattern { intent: String, reason: String },
    #[error("Intent {intent} has no capture group {group} for its slots")]
    MissingCaptureGroup { intent: String, group: usize },
}
