//! Domain errors for the prospector simulation core.

use thiserror::Error;

/// Domain-level errors that can occur while simulating a lead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Generation timed out after {seconds}s")]
    GenerationTimeout { seconds: u64 },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Backend not configured: {0}")]
    ConfigurationMissing(String),

    #[error("Simulation cancelled")]
    Cancelled,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Everything coming back from a backend counts as a failure worth
    /// retrying; only caller cancellation and a missing backend stop the loop.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::ConfigurationMissing(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::GenerationTimeout { .. })
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
