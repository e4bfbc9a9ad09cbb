//! Error types shared across crates

use thiserror::Error;

/// Crate-wide error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Empty or whitespace-only input. The only error a caller of the
    /// correction entry point ever sees.
    #[error("Input text is required")]
    InputRequired,

    /// Input longer than the configured character limit
    #[error("Input text exceeds {max} characters")]
    InputTooLong { max: usize },

    #[error("Provider {provider} is not configured")]
    ProviderUnconfigured { provider: String },

    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error may be shown to an end user as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::InputRequired | Error::InputTooLong { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
