use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::request::TEMPERATURE_RANGE;

/// Directory holding project configuration, relative to the working directory.
pub const CONFIG_DIR: &str = ".prospector";

/// Prefix for environment overrides; nested keys are split on `__`.
pub const ENV_PREFIX: &str = "PROSPECTOR_";

const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {0}: must be greater than 0 seconds")]
    InvalidTimeout(&'static str),

    #[error("Invalid max_retries: {0}. Must be at most {MAX_RETRIES_LIMIT}")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid base_temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Backend model name cannot be empty")]
    EmptyModel,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .prospector/config.yaml (project config)
    /// 3. .prospector/local.yaml (project local overrides, optional)
    /// 4. Environment variables (PROSPECTOR_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_in(Path::new("."))
    }

    /// Load configuration rooted at `root` instead of the working directory.
    pub fn load_in(root: &Path) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment overrides still apply on top of the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.simulation.basic_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("simulation.basic_timeout_secs"));
        }
        if config.simulation.advanced_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("simulation.advanced_timeout_secs"));
        }
        if config.backend.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("backend.request_timeout_secs"));
        }

        if config.retry.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }
        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        let temperature = config.personas.base_temperature;
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        if config.backend.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if config.backend.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "backend.base_url cannot be empty".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if !(0.0..=1.0).contains(&config.analysis.base_probability) {
            return Err(ConfigError::ValidationFailed(format!(
                "analysis.base_probability must be between 0.0 and 1.0, got {}",
                config.analysis.base_probability
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BackendKind, OrchestrationPattern};
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const OVERRIDE_VARS: [&str; 3] = [
        "PROSPECTOR_LOGGING__LEVEL",
        "PROSPECTOR_BACKEND__KIND",
        "PROSPECTOR_SIMULATION__BASIC_TIMEOUT_SECS",
    ];

    fn write_project_config(dir: &TempDir, name: &str, yaml: &str) {
        let config_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(name), yaml).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.basic_timeout_secs, 300);
        assert_eq!(config.simulation.advanced_timeout_secs, 600);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.backend.model, "gpt-4o");
        assert_eq!(config.logging.level, "warn");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
simulation:
  basic_timeout_secs: 120
  default_advanced_pattern: coordinated
retry:
  max_retries: 5
backend:
  kind: mock
  model: gpt-4o-mini
personas:
  base_temperature: 0.5
analysis:
  positive_weight: 0.2
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.simulation.basic_timeout_secs, 120);
        assert_eq!(config.simulation.advanced_timeout_secs, 600);
        assert_eq!(
            config.simulation.default_advanced_pattern,
            OrchestrationPattern::Coordinated
        );
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_backoff_ms, 1000);
        assert_eq!(config.backend.kind, BackendKind::Mock);
        assert!((config.analysis.positive_weight - 0.2).abs() < f64::EPSILON);
        assert!((config.analysis.negative_weight - 0.15).abs() < f64::EPSILON);
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.simulation.advanced_timeout_secs = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout("simulation.advanced_timeout_secs")
        ));
    }

    #[test]
    fn test_validate_too_many_retries() {
        let mut config = Config::default();
        config.retry.max_retries = 11;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxRetries(11)
        ));

        config.retry.max_retries = 0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 30000;
        config.retry.max_backoff_ms = 10000;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidBackoff(30000, 10000)
        ));
    }

    #[test]
    fn test_validate_temperature() {
        let mut config = Config::default();
        config.personas.base_temperature = 2.5;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTemperature(_)
        ));
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.backend.model = "  ".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyModel
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = TempDir::new().unwrap();
        write_project_config(
            &dir,
            "config.yaml",
            "retry:\n  max_retries: 2\nlogging:\n  level: info\n  format: json\n",
        );
        write_project_config(&dir, "local.yaml", "logging:\n  level: debug\n");

        let config = temp_env::with_vars_unset(OVERRIDE_VARS, || {
            ConfigLoader::load_in(dir.path()).unwrap()
        });

        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.logging.level, "debug", "Local override should win");
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        write_project_config(&dir, "config.yaml", "logging:\n  level: info\n");

        let config = temp_env::with_vars(
            [
                ("PROSPECTOR_LOGGING__LEVEL", Some("error")),
                ("PROSPECTOR_BACKEND__KIND", Some("mock")),
                ("PROSPECTOR_SIMULATION__BASIC_TIMEOUT_SECS", Some("45")),
            ],
            || ConfigLoader::load_in(dir.path()).unwrap(),
        );

        assert_eq!(config.logging.level, "error");
        assert_eq!(config.backend.kind, BackendKind::Mock);
        assert_eq!(config.simulation.basic_timeout_secs, 45);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            temp_env::with_vars_unset(OVERRIDE_VARS, || ConfigLoader::load_in(dir.path()).unwrap());
        assert_eq!(config.simulation, Config::default().simulation);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  format: xml").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ConfigLoader::load_from_file("/nonexistent/prospector.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
