//! Simulation request model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lead::LeadRecord;
use crate::domain::errors::{DomainError, DomainResult};

/// Allowed range for an explicit `max_turns` override.
pub const MAX_TURNS_RANGE: std::ops::RangeInclusive<u32> = 4..=20;

/// Allowed range for an explicit temperature override.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Simulation flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Fixed round-robin conversation
    #[default]
    Basic,
    /// Hand-off or coordinated conversation
    Advanced,
}

impl SimulationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the next speaker is chosen during a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationPattern {
    /// Primary rep, prospect, manager, repeated
    RoundRobin,
    /// Speakers pass control through the routing table
    Handoff,
    /// A coordinator persona assigns every turn
    Coordinated,
}

impl OrchestrationPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::Handoff => "handoff",
            Self::Coordinated => "coordinated",
        }
    }

    /// Label used in summaries and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::Handoff => "hand-off",
            Self::Coordinated => "coordinated",
        }
    }
}

impl fmt::Display for OrchestrationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead plus the knobs for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(flatten)]
    pub lead: LeadRecord,
    #[serde(default)]
    pub mode: SimulationMode,
    #[serde(default)]
    pub pattern: Option<OrchestrationPattern>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    pub fn new(lead: LeadRecord) -> Self {
        Self {
            lead,
            mode: SimulationMode::Basic,
            pattern: None,
            max_turns: None,
            temperature: None,
            seed: None,
        }
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pattern(mut self, pattern: OrchestrationPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.lead.validate()?;

        if let Some(turns) = self.max_turns {
            if !MAX_TURNS_RANGE.contains(&turns) {
                return Err(DomainError::ValidationFailed(format!(
                    "max_turns must be between {} and {}, got {turns}",
                    MAX_TURNS_RANGE.start(),
                    MAX_TURNS_RANGE.end()
                )));
            }
        }

        if let Some(temperature) = self.temperature {
            if !TEMPERATURE_RANGE.contains(&temperature) {
                return Err(DomainError::ValidationFailed(format!(
                    "temperature must be between 0.0 and 2.0, got {temperature}"
                )));
            }
        }

        Ok(())
    }
}
