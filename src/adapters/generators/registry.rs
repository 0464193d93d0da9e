//! Generator registry and factory.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BackendConfig, BackendKind};
use crate::domain::ports::TextGenerator;

use super::mock::MockGenerator;
use super::openai::{OpenAiConfig, OpenAiGenerator};

/// Builds text generators from backend configuration.
pub struct GeneratorRegistry {
    openai_config: OpenAiConfig,
}

impl GeneratorRegistry {
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            openai_config: OpenAiConfig::from(backend),
        }
    }

    pub fn with_openai_config(mut self, config: OpenAiConfig) -> Self {
        self.openai_config = config;
        self
    }

    /// Create a generator by kind.
    pub fn create_by_type(&self, kind: BackendKind) -> DomainResult<Arc<dyn TextGenerator>> {
        match kind {
            BackendKind::Openai => Ok(Arc::new(OpenAiGenerator::new(
                self.openai_config.clone(),
            )?)),
            BackendKind::Mock => Ok(Arc::new(MockGenerator::new())),
        }
    }

    /// Create a generator by name, `None` for unknown names.
    pub fn create(&self, name: &str) -> Option<DomainResult<Arc<dyn TextGenerator>>> {
        BackendKind::from_str(name).map(|kind| self.create_by_type(kind))
    }

    pub fn available_types(&self) -> Vec<&'static str> {
        vec![BackendKind::Openai.as_str(), BackendKind::Mock.as_str()]
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new(&BackendConfig::default())
    }
}
