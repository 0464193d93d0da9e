//! Validate CLI command.
//!
//! Loads a results document, fills defaults and clamps ranges the same way
//! the simulator does, then reports anything still out of shape.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::display::{action_failure, action_success, output, CommandOutput};
use crate::domain::models::{SimulationResults, ValidationReport};

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    pub file: String,
    #[serde(flatten)]
    pub report: ValidationReport,
    pub results: SimulationResults,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.report.is_valid {
            lines.push(action_success(&format!("{} is valid", self.file)));
        } else {
            lines.push(action_failure(&format!("{} is invalid", self.file)));
        }
        lines.extend(self.report.errors.iter().map(|e| format!("  error: {e}")));
        lines.extend(self.report.warnings.iter().map(|w| format!("  warning: {w}")));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(file: &Path, json_mode: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let results = SimulationResults::from_json(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let report = results.validate();
    let is_valid = report.is_valid;

    let out = ValidateOutput {
        file: file.display().to_string(),
        report,
        results,
    };
    output(&out, json_mode);

    if !is_valid {
        bail!("{} failed validation", file.display());
    }
    Ok(())
}
