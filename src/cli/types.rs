//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::config::ConfigArgs;
use crate::cli::commands::simulate::SimulateArgs;
use crate::domain::models::{BackendKind, LeadRecord, OrchestrationPattern, SimulationMode};

#[derive(Parser, Debug)]
#[command(name = "prospector")]
#[command(about = "Prospector - sales conversation simulator and lead scorer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .prospector/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate a discovery call with a lead and score it
    Simulate(SimulateArgs),

    /// Show the conversation strategy derived for a lead
    Strategy(LeadArgs),

    /// Normalize and validate a results JSON file
    Validate {
        /// Path to a SimulationResults JSON document
        file: PathBuf,
    },

    /// Configuration commands
    Config(ConfigArgs),
}

/// Lead description, from flags or a JSON/YAML file.
///
/// Flags given alongside `--lead-file` override the file's values.
#[derive(Args, Debug, Clone, Default)]
pub struct LeadArgs {
    /// Company name
    #[arg(long, required_unless_present = "lead_file")]
    pub company: Option<String>,

    /// Industry (defaults to Technology)
    #[arg(long)]
    pub industry: Option<String>,

    /// Number of employees
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: Option<u32>,

    /// Contact name
    #[arg(long)]
    pub contact: Option<String>,

    /// Pain point (repeatable)
    #[arg(long = "pain-point")]
    pub pain_points: Vec<String>,

    /// Technology in use (repeatable or comma-separated)
    #[arg(long = "tech", value_delimiter = ',')]
    pub tech_stack: Vec<String>,

    /// Prior engagement level between 0.0 and 1.0
    #[arg(long)]
    pub engagement: Option<f64>,

    /// Outreach attempts made so far
    #[arg(long)]
    pub outreach_attempts: Option<u32>,

    /// Account research has been completed
    #[arg(long)]
    pub research_completed: bool,

    /// Read the lead from a JSON or YAML file
    #[arg(long, value_name = "FILE")]
    pub lead_file: Option<PathBuf>,
}

impl LeadArgs {
    /// Build and validate the lead record.
    pub fn to_lead(&self) -> Result<LeadRecord> {
        let mut lead = match &self.lead_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read lead file {}", path.display()))?;
                // serde_yaml also accepts JSON documents
                serde_yaml::from_str::<LeadRecord>(&content)
                    .with_context(|| format!("Failed to parse lead file {}", path.display()))?
            }
            None => LeadRecord::new(self.company.clone().unwrap_or_default()),
        };

        if let Some(company) = &self.company {
            lead.company_name.clone_from(company);
        }
        if self.industry.is_some() {
            lead.industry.clone_from(&self.industry);
        }
        if self.size.is_some() {
            lead.company_size = self.size;
        }
        if self.contact.is_some() {
            lead.contact_name.clone_from(&self.contact);
        }
        lead.pain_points.extend(self.pain_points.iter().cloned());
        lead.tech_stack.extend(self.tech_stack.iter().cloned());
        if let Some(engagement) = self.engagement {
            lead.engagement_level = engagement;
        }
        if let Some(attempts) = self.outreach_attempts {
            lead.outreach_attempts = attempts;
        }
        lead.research_completed |= self.research_completed;

        lead.validate()?;
        Ok(lead)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Basic,
    Advanced,
}

impl From<ModeArg> for SimulationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Basic => Self::Basic,
            ModeArg::Advanced => Self::Advanced,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternArg {
    #[value(name = "round-robin", alias = "round_robin")]
    RoundRobin,
    #[value(alias = "hand-off")]
    Handoff,
    Coordinated,
}

impl From<PatternArg> for OrchestrationPattern {
    fn from(pattern: PatternArg) -> Self {
        match pattern {
            PatternArg::RoundRobin => Self::RoundRobin,
            PatternArg::Handoff => Self::Handoff,
            PatternArg::Coordinated => Self::Coordinated,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Openai,
    Mock,
}

impl From<BackendArg> for BackendKind {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Openai => Self::Openai,
            BackendArg::Mock => Self::Mock,
        }
    }
}
