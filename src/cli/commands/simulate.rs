//! Simulate CLI command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::generators::GeneratorRegistry;
use crate::cli::display::{
    colorize_probability, colorize_quality, colorize_risk, colorize_status, list_table, output,
    render_list, truncate, CommandOutput, DetailView,
};
use crate::cli::output::progress::{create_spinner, hidden_spinner};
use crate::cli::types::{BackendArg, LeadArgs, ModeArg, PatternArg};
use crate::domain::models::{BackendKind, Config, SimulationReport, SimulationRequest};
use crate::services::{SimulationService, SimulationSettings};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub lead: LeadArgs,

    /// Simulation mode
    #[arg(long, value_enum, default_value = "basic")]
    pub mode: ModeArg,

    /// Orchestration pattern (advanced mode only)
    #[arg(long, value_enum)]
    pub pattern: Option<PatternArg>,

    /// Text generation backend (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Model name (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum conversation turns (4-20)
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Base sampling temperature (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Sampling seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SimulateArgs {
    /// Build the simulation request from the arguments.
    pub fn to_request(&self) -> Result<SimulationRequest> {
        let mut request = SimulationRequest::new(self.lead.to_lead()?).with_mode(self.mode.into());
        request.pattern = self.pattern.map(Into::into);
        request.max_turns = self.max_turns;
        request.temperature = self.temperature;
        request.seed = self.seed;
        request.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
pub struct SimulateOutput {
    pub company: String,
    #[serde(flatten)]
    pub report: SimulationReport,
}

impl CommandOutput for SimulateOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let results = &report.results;
        let metrics = &results.conversation_metrics;

        let pattern = report.pattern.map_or("none", |p| p.as_str());
        let mut view = DetailView::new(&format!("Simulation for {}", self.company))
            .field("Status", colorize_status(report.status.as_str()))
            .field("Mode", format!("{} ({pattern})", report.mode.as_str()))
            .field("Persona", report.strategy.primary_persona.title())
            .field("Conversion", colorize_probability(results.conversion_probability))
            .field("Confidence", format!("{:.2}", results.confidence_score))
            .field("Approach", &results.recommended_approach)
            .field("Turns", metrics.total_turns)
            .field("Quality", colorize_quality(metrics.conversation_quality.as_str()))
            .field("Engagement", format!("{:.2}", metrics.prospect_engagement_score))
            .field("Stage", results.engagement_scoring.buying_stage.as_str())
            .field("Retries", report.retry_count)
            .field("Elapsed", format!("{:.1}s", report.execution_time_secs))
            .field_opt("Error", report.error_message.as_deref())
            .section("Summary")
            .item(&results.conversation_summary)
            .section("Next steps")
            .field("Action", &results.next_steps.primary_action)
            .field("Timeline", &results.next_steps.timeline)
            .field("Urgency", results.next_steps.urgency.as_str())
            .section("Key insights")
            .items(&results.key_insights)
            .section("Risk factors")
            .items(&results.risk_factors);

        if !report.validation.is_valid {
            view = view.section("Validation errors").items(&report.validation.errors);
        }

        let mut table = list_table(&["Objection", "Category", "Severity", "Response"]);
        for objection in &results.objection_analysis {
            table.add_row(vec![
                truncate(&objection.objection_text, 40),
                objection.category.as_str().to_string(),
                colorize_risk(objection.severity.as_str()).to_string(),
                truncate(
                    objection
                        .potential_responses
                        .first()
                        .map_or("", String::as_str),
                    50,
                ),
            ]);
        }

        format!(
            "{}\n\n{}",
            view.render(),
            render_list("objection", &table, results.objection_analysis.len())
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.report).unwrap_or_default()
    }
}

pub async fn execute(
    args: SimulateArgs,
    config: &Config,
    cancel: &CancellationToken,
    json_mode: bool,
) -> Result<()> {
    let request = args.to_request()?;

    let mut backend = config.backend.clone();
    if let Some(kind) = args.backend {
        backend.kind = BackendKind::from(kind);
    }
    let generator = GeneratorRegistry::new(&backend)
        .create_by_type(backend.kind)
        .context("Failed to create text generator")?;

    let settings = SimulationSettings::from_config(config).with_model(args.model.clone());
    let service = SimulationService::new(generator, settings);

    let spinner = if json_mode {
        hidden_spinner()
    } else {
        create_spinner(format!(
            "Simulating {} call with {}",
            request.mode.as_str(),
            request.lead.company_name
        ))
    };

    let outcome = service.simulate(&request, cancel).await;
    spinner.finish_and_clear();
    let report = outcome?;

    info!(
        simulation_id = %report.simulation_id,
        status = report.status.as_str(),
        probability = report.results.conversion_probability,
        "simulation finished"
    );

    let out = SimulateOutput {
        company: request.lead.company_name,
        report,
    };
    output(&out, json_mode);
    Ok(())
}
