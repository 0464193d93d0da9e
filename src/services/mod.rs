//! Application services: strategy, conversation, retry, and analysis.

pub mod assessment_extractor;
pub mod conversation_orchestrator;
pub mod fallback_scorer;
pub mod prompts;
pub mod retry;
pub mod routing;
pub mod simulation_service;
pub mod strategy_selector;
pub mod transcript_analyzer;

pub use assessment_extractor::{extract_assessment, ManagerAssessment};
pub use conversation_orchestrator::{ConversationOrchestrator, OrchestratorSettings};
pub use fallback_scorer::fallback_results;
pub use retry::{Retried, RetryExhausted, RetryPolicy};
pub use simulation_service::{SimulationService, SimulationSettings};
pub use strategy_selector::{apply_overrides, select_strategy};
pub use transcript_analyzer::TranscriptAnalyzer;
