//! Error types for the Easy21 crate

use thiserror::Error;

/// Main error type for the Easy21 crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid algorithm '{input}'. Expected one of: {expected}")]
    ParseAlgorithm { input: String, expected: String },

    #[error("invalid value transform '{input}'. Expected one of: {expected}")]
    ParseTransform { input: String, expected: String },

    #[error("n-step update for a non-terminal transition requires the next action")]
    MissingNextAction,

    #[error("trajectory has no transitions to learn from")]
    EmptyTrajectory,

    #[error("trajectory index {index} out of bounds (length {len})")]
    TrajectoryIndex { index: usize, len: usize },

    #[error("unsupported saved agent version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
