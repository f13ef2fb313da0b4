//! Error types for the stage serialization bridge

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Boxed error produced by a foreign serialization backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the stage parameter codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// The save root was not configured before encoding a present stage.
    /// Not retryable until the caller sets a save path.
    #[error("path must be set before stage '{0}' can be saved")]
    PreconditionFailure(String),

    /// A backend reported failure while persisting a stage.
    #[error("failed to write stage '{uid}' in serialization context '{context}'")]
    WriteFailure {
        uid: String,
        context: String,
        #[source]
        source: BackendError,
    },

    /// A backend reported failure while reconstructing a stage.
    #[error("failed to load stage archive at '{path}'")]
    LoadFailure {
        path: String,
        #[source]
        source: BackendError,
    },

    /// The legacy class-based loader could not resolve a class name to a
    /// registered reader.
    #[error("class resolution failed: {0}")]
    ClassResolutionFailure(String),

    /// A descriptor or configuration document did not match the shape the
    /// attempted operation requires.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::MalformedInput(err.to_string())
    }
}
