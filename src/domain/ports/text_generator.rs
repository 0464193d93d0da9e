//! Text generator port - interface for LLM backends.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::GenerationRequest;

/// Trait for text generation backends.
///
/// One call produces one utterance for one persona. Implementations report
/// request timeouts as [`DomainError::GenerationTimeout`] and every other
/// backend problem as [`DomainError::GenerationFailed`].
///
/// [`DomainError::GenerationTimeout`]: crate::domain::errors::DomainError::GenerationTimeout
/// [`DomainError::GenerationFailed`]: crate::domain::errors::DomainError::GenerationFailed
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Check if the backend is available and properly configured.
    async fn is_available(&self) -> DomainResult<bool>;

    /// Generate the next utterance for the request's persona.
    async fn generate(&self, request: GenerationRequest) -> DomainResult<String>;
}
