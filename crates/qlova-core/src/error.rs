use thiserror::Error;

/// Top-level error type for the Qlova simulator.
///
/// Subsystem crates define their own error types and convert into or from
/// `QlovaError` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QlovaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for QlovaError {
    fn from(err: toml::de::Error) -> Self {
        QlovaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for QlovaError {
    fn from(err: serde_json::Error) -> Self {
        QlovaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Qlova operations.
pub type Result<T> = std::result::Result<T, QlovaError>;
