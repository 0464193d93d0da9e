//! Simulation report returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::{OrchestrationPattern, SimulationMode};
use super::results::{SimulationResults, ValidationReport};
use super::strategy::SimulationStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// Results came from an analyzed transcript
    Completed,
    /// Results came from the deterministic fallback scorer
    Fallback,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Fallback => "fallback",
        }
    }
}

/// Everything produced by one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub simulation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: SimulationStatus,
    pub mode: SimulationMode,
    /// Pattern actually used; `None` when no conversation was attempted
    pub pattern: Option<OrchestrationPattern>,
    pub strategy: SimulationStrategy,
    pub results: SimulationResults,
    pub validation: ValidationReport,
    pub retry_count: u32,
    pub execution_time_secs: f64,
    /// Why the fallback path was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SimulationReport {
    pub fn is_fallback(&self) -> bool {
        self.status == SimulationStatus::Fallback
    }
}
