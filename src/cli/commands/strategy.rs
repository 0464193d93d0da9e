//! Strategy CLI command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::display::{output, CommandOutput, DetailView};
use crate::cli::types::LeadArgs;
use crate::domain::models::SimulationStrategy;
use crate::services::{select_strategy, ConversationOrchestrator};

#[derive(Debug, Serialize)]
pub struct StrategyOutput {
    pub company: String,
    pub strategy: SimulationStrategy,
    pub roster: Vec<String>,
}

impl CommandOutput for StrategyOutput {
    fn to_human(&self) -> String {
        let s = &self.strategy;
        DetailView::new(&format!("Strategy for {}", self.company))
            .field("Persona", s.primary_persona.title())
            .field("Style", s.conversation_style.as_str())
            .field("Approach", s.engagement_approach.as_str())
            .field("Technical depth", s.technical_depth.as_str())
            .field("Max turns", s.max_turns)
            .field("Coordinator", if s.use_orchestrator { "yes" } else { "no" })
            .section("Participants")
            .items(&self.roster)
            .render()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: &LeadArgs, json_mode: bool) -> Result<()> {
    let lead = args.to_lead()?;
    let strategy = select_strategy(&lead);
    let roster = ConversationOrchestrator::roster(&strategy)
        .into_iter()
        .map(|persona| persona.as_str().to_string())
        .collect();

    let out = StrategyOutput {
        company: lead.company_name,
        strategy,
        roster,
    };
    output(&out, json_mode);
    Ok(())
}
