//! Error types for the flashcard engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the flashcard engine
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize a component (HTTP client, font store, ...)
    #[error("Initialization failed: {0}")]
    InitializationError(String),

    /// The backend returned a non-success HTTP status
    #[error("Backend returned HTTP {status}: {message}")]
    BackendStatus { status: u16, message: String },

    /// Network-level failure talking to the backend
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The backend response could not be decoded
    #[error("Invalid backend response: {0}")]
    ResponseError(String),

    /// No usable font could be loaded for compositing
    #[error("Font error: {0}")]
    FontError(String),

    /// Failed to encode a composite image
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Invalid configuration or user input
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::ResponseError(err.to_string())
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}
