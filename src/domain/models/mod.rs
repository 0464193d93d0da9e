pub mod config;
pub mod generation;
pub mod lead;
pub mod report;
pub mod request;
pub mod results;
pub mod strategy;
pub mod transcript;

pub use config::{
    AnalyzerConfig, BackendConfig, BackendKind, Config, LoggingConfig, PersonaConfig,
    PersonaSettings, QualityThresholds, RetryConfig, RoleSettings, SimulationConfig,
};
pub use generation::{ChatMessage, ChatRole, GenerationRequest};
pub use lead::LeadRecord;
pub use report::{SimulationReport, SimulationStatus};
pub use request::{
    OrchestrationPattern, SimulationMode, SimulationRequest, MAX_TURNS_RANGE, TEMPERATURE_RANGE,
};
pub use results::{
    BuyingStage, CompetitiveIntelligence, ConversationMetrics, ConversationQuality,
    EngagementScoring, NextStepRecommendations, ObjectionAnalysis, ObjectionCategory, RiskLevel,
    SimulationResults, TechnicalRequirements, UrgencyLevel, ValidationReport,
    DEFAULT_OBJECTION_RESPONSE, DEFAULT_SUMMARY, TO_BE_DETERMINED,
};
pub use strategy::{
    AgentPersona, ConversationStyle, EngagementApproach, SimulationStrategy, TechnicalDepth,
};
pub use transcript::{ConversationTranscript, Turn};
