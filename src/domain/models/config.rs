use serde::{Deserialize, Serialize};

use super::request::OrchestrationPattern;
use super::strategy::AgentPersona;

/// Main configuration structure for Prospector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Conversation timeouts and pattern defaults
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Text generation backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Per-persona sampling configuration
    #[serde(default)]
    pub personas: PersonaConfig,

    /// Transcript analysis tuning
    #[serde(default)]
    pub analysis: AnalyzerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Wall-clock limit for a basic conversation, in seconds
    #[serde(default = "default_basic_timeout")]
    pub basic_timeout_secs: u64,

    /// Wall-clock limit for an advanced conversation, in seconds
    #[serde(default = "default_advanced_timeout")]
    pub advanced_timeout_secs: u64,

    /// Pattern used by advanced mode when the request names none
    #[serde(default = "default_advanced_pattern")]
    pub default_advanced_pattern: OrchestrationPattern,
}

const fn default_basic_timeout() -> u64 {
    300
}

const fn default_advanced_timeout() -> u64 {
    600
}

const fn default_advanced_pattern() -> OrchestrationPattern {
    OrchestrationPattern::Handoff
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            basic_timeout_secs: default_basic_timeout(),
            advanced_timeout_secs: default_advanced_timeout(),
            default_advanced_pattern: default_advanced_pattern(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Kind of text generation backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions API
    #[default]
    Openai,
    /// Scripted in-process backend
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Mock => "mock",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" | "api" => Some(Self::Openai),
            "mock" | "test" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// Text generation backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Backend to use
    #[serde(default)]
    pub kind: BackendKind,

    /// API key (can also be set via `OPENAI_API_KEY` env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

const fn default_request_timeout() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Persona sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PersonaConfig {
    /// Base temperature every persona's temperature is derived from
    #[serde(default = "default_base_temperature")]
    pub base_temperature: f32,
}

const fn default_base_temperature() -> f32 {
    0.7
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            base_temperature: default_base_temperature(),
        }
    }
}

/// Sampling settings for one persona.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonaSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the backend for a JSON object
    pub json_output: bool,
}

/// Sampling settings for every persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSettings {
    pub enterprise_rep: PersonaSettings,
    pub smb_rep: PersonaSettings,
    pub technical_rep: PersonaSettings,
    pub prospect: PersonaSettings,
    pub manager: PersonaSettings,
    pub coordinator: PersonaSettings,
}

impl RoleSettings {
    /// Derive the table from a base temperature.
    ///
    /// The enterprise rep and the manager run cooler and answer in JSON;
    /// the SMB rep and the prospect run warmer.
    pub fn from_base_temperature(base: f32) -> Self {
        let settings = |temperature: f32, max_tokens: u32, json_output: bool| PersonaSettings {
            temperature,
            max_tokens,
            json_output,
        };

        Self {
            enterprise_rep: settings((base - 0.2).max(0.3), 3000, true),
            smb_rep: settings((base + 0.2).min(0.9), 2500, false),
            technical_rep: settings(base, 4000, false),
            prospect: settings((base + 0.1).min(0.8), 2000, false),
            manager: settings((base - 0.3).max(0.2), 3000, true),
            coordinator: settings((base - 0.3).max(0.2), 1500, false),
        }
    }

    pub fn get(&self, persona: AgentPersona) -> &PersonaSettings {
        match persona {
            AgentPersona::EnterpriseRep => &self.enterprise_rep,
            AgentPersona::SmbRep => &self.smb_rep,
            AgentPersona::TechnicalRep => &self.technical_rep,
            AgentPersona::Prospect => &self.prospect,
            AgentPersona::Manager => &self.manager,
            AgentPersona::Coordinator => &self.coordinator,
        }
    }
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self::from_base_temperature(default_base_temperature())
    }
}

impl From<&PersonaConfig> for RoleSettings {
    fn from(config: &PersonaConfig) -> Self {
        Self::from_base_temperature(config.base_temperature)
    }
}

/// Conversation quality tier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QualityThresholds {
    pub excellent_turns: u32,
    pub excellent_engagement: f64,
    pub good_turns: u32,
    pub good_engagement: f64,
    pub fair_turns: u32,
    pub fair_engagement: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent_turns: 8,
            excellent_engagement: 0.7,
            good_turns: 6,
            good_engagement: 0.5,
            fair_turns: 3,
            fair_engagement: 0.4,
        }
    }
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

/// Keyword lists and weights for the heuristic transcript analyzer.
///
/// Every list is matched as a case-insensitive substring and counted once
/// per distinct term present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalyzerConfig {
    pub base_probability: f64,
    pub positive_phrases: Vec<String>,
    pub positive_weight: f64,
    pub negative_phrases: Vec<String>,
    pub negative_weight: f64,
    pub technical_terms: Vec<String>,
    pub technical_threshold: usize,
    pub technical_bonus: f64,
    pub implementation_terms: Vec<String>,
    pub urgency_terms: Vec<String>,
    pub urgency_threshold: usize,
    pub urgency_bonus: f64,
    pub price_terms: Vec<String>,
    pub budget_terms: Vec<String>,
    pub budget_threshold: usize,
    pub cost_negative_phrases: Vec<String>,
    pub demo_terms: Vec<String>,
    pub competitor_terms: Vec<String>,
    pub decision_terms: Vec<String>,
    pub decision_threshold: usize,
    pub engagement_terms: Vec<String>,
    pub engagement_base: f64,
    pub engagement_step: f64,
    pub quality: QualityThresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.3,
            positive_phrases: terms(&[
                "interested",
                "sounds good",
                "exactly",
                "perfect",
                "impressed",
                "excited",
            ]),
            positive_weight: 0.1,
            negative_phrases: terms(&[
                "not interested",
                "already have",
                "too expensive",
                "not now",
                "complicated",
            ]),
            negative_weight: 0.15,
            technical_terms: terms(&[
                "integration",
                "api",
                "security",
                "scalability",
                "implementation",
                "architecture",
            ]),
            technical_threshold: 2,
            technical_bonus: 0.1,
            implementation_terms: terms(&["implementation"]),
            urgency_terms: terms(&["urgent", "asap", "quickly", "soon", "deadline", "timeline"]),
            urgency_threshold: 1,
            urgency_bonus: 0.15,
            price_terms: terms(&["price", "cost"]),
            budget_terms: terms(&["budget", "cost", "price", "investment", "roi", "value"]),
            budget_threshold: 2,
            cost_negative_phrases: terms(&["expensive", "too much", "costly"]),
            demo_terms: terms(&["demo", "demonstration"]),
            competitor_terms: terms(&["competitor", "alternative", "currently using", "comparing"]),
            decision_terms: terms(&["decision", "approval", "stakeholder", "team", "board", "committee"]),
            decision_threshold: 2,
            engagement_terms: terms(&[
                "interested",
                "tell me more",
                "how does",
                "what about",
                "sounds good",
                "question",
                "demo",
                "pricing",
            ]),
            engagement_base: 0.3,
            engagement_step: 0.1,
            quality: QualityThresholds::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Number of days to retain logs
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            retention_days: default_retention_days(),
        }
    }
}
