//! Strategy selection.
//!
//! Maps a lead onto the persona, tone, and conversation length used for its
//! simulation. Pure and deterministic: the same lead always yields the same
//! strategy.

use crate::domain::models::{
    AgentPersona, ConversationStyle, EngagementApproach, LeadRecord, SimulationRequest,
    SimulationStrategy, TechnicalDepth,
};

/// Industry substrings that route a lead to the technical rep.
pub const TECHNICAL_INDUSTRY_MARKERS: [&str; 5] = ["software", "tech", "saas", "ai", "data"];

const ENTERPRISE_SIZE: u32 = 1000;
const MID_MARKET_SIZE: u32 = 500;
const HIGH_ENGAGEMENT: f64 = 0.7;
const LOW_ENGAGEMENT: f64 = 0.3;
const MAX_DERIVED_TURNS: u32 = 15;

/// Derive the simulation strategy for a lead.
pub fn select_strategy(lead: &LeadRecord) -> SimulationStrategy {
    let mut strategy = SimulationStrategy::default();
    let size = lead.effective_size();

    if size >= ENTERPRISE_SIZE {
        strategy.primary_persona = AgentPersona::EnterpriseRep;
        strategy.conversation_style = ConversationStyle::Consultative;
        strategy.use_orchestrator = true;
        strategy.max_turns = 12;
        strategy.engagement_approach = EngagementApproach::Structured;
        strategy.technical_depth = TechnicalDepth::Deep;
    } else if size >= MID_MARKET_SIZE {
        strategy.primary_persona = AgentPersona::SmbRep;
        strategy.max_turns = 10;
        strategy.technical_depth = TechnicalDepth::Moderate;
    }

    // An unset industry never triggers the technical override
    if lead.industry.as_deref().is_some_and(is_technical_industry) {
        strategy.primary_persona = AgentPersona::TechnicalRep;
        strategy.conversation_style = ConversationStyle::Technical;
        strategy.technical_depth = TechnicalDepth::Deep;
    }

    if lead.engagement_level > HIGH_ENGAGEMENT {
        strategy.engagement_approach = EngagementApproach::Aggressive;
        strategy.max_turns = (strategy.max_turns + 2).min(MAX_DERIVED_TURNS);
    } else if lead.engagement_level < LOW_ENGAGEMENT {
        strategy.engagement_approach = EngagementApproach::Nurturing;
        strategy.conversation_style = ConversationStyle::Nurturing;
    }

    strategy
}

/// Apply explicit request overrides on top of a derived strategy.
pub fn apply_overrides(
    mut strategy: SimulationStrategy,
    request: &SimulationRequest,
) -> SimulationStrategy {
    if let Some(turns) = request.max_turns {
        strategy.max_turns = turns;
    }
    strategy
}

fn is_technical_industry(industry: &str) -> bool {
    let industry = industry.to_lowercase();
    TECHNICAL_INDUSTRY_MARKERS
        .iter()
        .any(|marker| industry.contains(marker))
}
