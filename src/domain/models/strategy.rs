//! Persona and strategy models.
//!
//! A [`SimulationStrategy`] is derived from a lead at the start of one
//! simulation and thrown away once that simulation returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPersona {
    /// Rep for large, multi-stakeholder accounts
    EnterpriseRep,
    /// Rep for small and mid-market companies
    SmbRep,
    /// Technical sales specialist
    TechnicalRep,
    /// The simulated customer contact
    Prospect,
    /// Sales manager observing and assessing the call
    Manager,
    /// Coordinator assigning turns in coordinated mode
    Coordinator,
}

impl AgentPersona {
    pub const ALL: [Self; 6] = [
        Self::EnterpriseRep,
        Self::SmbRep,
        Self::TechnicalRep,
        Self::Prospect,
        Self::Manager,
        Self::Coordinator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnterpriseRep => "enterprise_rep",
            Self::SmbRep => "smb_rep",
            Self::TechnicalRep => "technical_rep",
            Self::Prospect => "prospect",
            Self::Manager => "manager",
            Self::Coordinator => "coordinator",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "enterprise_rep" | "enterprise" => Some(Self::EnterpriseRep),
            "smb_rep" | "smb" => Some(Self::SmbRep),
            "technical_rep" | "technical" => Some(Self::TechnicalRep),
            "prospect" => Some(Self::Prospect),
            "manager" | "sales_manager" => Some(Self::Manager),
            "coordinator" | "orchestrator" => Some(Self::Coordinator),
            _ => None,
        }
    }

    /// Human-readable title, e.g. "Enterprise Rep".
    pub fn title(&self) -> &'static str {
        match self {
            Self::EnterpriseRep => "Enterprise Rep",
            Self::SmbRep => "SMB Rep",
            Self::TechnicalRep => "Technical Rep",
            Self::Prospect => "Prospect",
            Self::Manager => "Sales Manager",
            Self::Coordinator => "Coordinator",
        }
    }

    /// Whether this persona sells (as opposed to buying or observing).
    pub fn is_rep(&self) -> bool {
        matches!(self, Self::EnterpriseRep | Self::SmbRep | Self::TechnicalRep)
    }
}

impl fmt::Display for AgentPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    Aggressive,
    Nurturing,
    Technical,
    Consultative,
}

impl ConversationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Nurturing => "nurturing",
            Self::Technical => "technical",
            Self::Consultative => "consultative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementApproach {
    Nurturing,
    Structured,
    Aggressive,
}

impl EngagementApproach {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nurturing => "nurturing",
            Self::Structured => "structured",
            Self::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalDepth {
    Standard,
    Moderate,
    Deep,
}

impl TechnicalDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Moderate => "moderate",
            Self::Deep => "deep",
        }
    }
}

/// How a simulated conversation should be run for one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStrategy {
    /// Rep persona leading the call
    pub primary_persona: AgentPersona,
    /// Overall conversation tone
    pub conversation_style: ConversationStyle,
    /// Whether the lead warrants coordinated orchestration
    pub use_orchestrator: bool,
    /// Hard cap on conversation turns
    pub max_turns: u32,
    /// Engagement approach passed to rep prompts
    pub engagement_approach: EngagementApproach,
    /// How deep technical discussion should go
    pub technical_depth: TechnicalDepth,
}

impl Default for SimulationStrategy {
    fn default() -> Self {
        Self {
            primary_persona: AgentPersona::SmbRep,
            conversation_style: ConversationStyle::Consultative,
            use_orchestrator: false,
            max_turns: 8,
            engagement_approach: EngagementApproach::Nurturing,
            technical_depth: TechnicalDepth::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_names_roundtrip() {
        for persona in AgentPersona::ALL {
            assert_eq!(AgentPersona::from_str(persona.as_str()), Some(persona));
        }
        assert_eq!(AgentPersona::from_str("Technical-Rep"), Some(AgentPersona::TechnicalRep));
        assert_eq!(AgentPersona::from_str("sales manager"), Some(AgentPersona::Manager));
        assert_eq!(AgentPersona::from_str("cfo"), None);
    }

    #[test]
    fn test_persona_serializes_snake_case() {
        let json = serde_json::to_string(&AgentPersona::EnterpriseRep).unwrap();
        assert_eq!(json, "\"enterprise_rep\"");
    }

    #[test]
    fn test_is_rep() {
        assert!(AgentPersona::SmbRep.is_rep());
        assert!(!AgentPersona::Prospect.is_rep());
        assert!(!AgentPersona::Manager.is_rep());
    }
}
