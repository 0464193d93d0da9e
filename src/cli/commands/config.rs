//! Config CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::display::{output, CommandOutput};
use crate::domain::models::Config;

const REDACTED: &str = "********";

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration after all layers are merged
    Show,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    #[serde(flatten)]
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap_or_default()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}

/// Copy of `config` safe to print.
pub fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.backend.api_key.is_some() {
        config.backend.api_key = Some(REDACTED.to_string());
    }
    config
}

pub fn execute(args: &ConfigArgs, config: &Config, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let out = ConfigOutput {
                config: redacted(config),
            };
            output(&out, json_mode);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_redacted() {
        let mut config = Config::default();
        config.backend.api_key = Some("sk-live-secret".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.backend.api_key.as_deref(), Some(REDACTED));
        assert!(!ConfigOutput { config: shown }.to_human().contains("sk-live-secret"));
    }

    #[test]
    fn test_absent_key_stays_absent() {
        assert!(redacted(&Config::default()).backend.api_key.is_none());
    }
}
