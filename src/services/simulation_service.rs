//! Simulation service.
//!
//! Drives one simulation request through strategy selection, the
//! conversation under retry, and analysis. A failed or timed-out
//! conversation degrades to the fallback scorer; cancellation does not.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AnalyzerConfig, Config, OrchestrationPattern, RoleSettings, SimulationMode, SimulationReport,
    SimulationRequest, SimulationResults, SimulationStatus, SimulationStrategy, ValidationReport,
};
use crate::domain::ports::TextGenerator;
use crate::services::assessment_extractor::extract_assessment;
use crate::services::conversation_orchestrator::{ConversationOrchestrator, OrchestratorSettings};
use crate::services::fallback_scorer::fallback_results;
use crate::services::retry::{Retried, RetryExhausted, RetryPolicy};
use crate::services::strategy_selector::{apply_overrides, select_strategy};
use crate::services::transcript_analyzer::TranscriptAnalyzer;

/// Everything the service needs besides the generator.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub retry: RetryPolicy,
    pub roles: RoleSettings,
    pub analyzer: AnalyzerConfig,
    pub basic_timeout: Duration,
    pub advanced_timeout: Duration,
    pub default_advanced_pattern: OrchestrationPattern,
    /// Model override for every generation call
    pub model: Option<String>,
}

impl SimulationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from(&config.retry),
            roles: RoleSettings::from(&config.personas),
            analyzer: config.analysis.clone(),
            basic_timeout: Duration::from_secs(config.simulation.basic_timeout_secs),
            advanced_timeout: Duration::from_secs(config.simulation.advanced_timeout_secs),
            default_advanced_pattern: config.simulation.default_advanced_pattern,
            model: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn log_validation(validation: &ValidationReport) {
    for error in &validation.errors {
        warn!(error = %error, "results failed validation");
    }
    for warning in &validation.warnings {
        warn!(warning = %warning, "results validation warning");
    }
}

pub struct SimulationService {
    generator: Arc<dyn TextGenerator>,
    analyzer: TranscriptAnalyzer,
    settings: SimulationSettings,
}

impl SimulationService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: SimulationSettings) -> Self {
        Self {
            generator,
            analyzer: TranscriptAnalyzer::new(settings.analyzer.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Pattern and wall-clock limit for a request.
    ///
    /// Basic mode always runs round-robin. Advanced mode runs the requested
    /// pattern, or the configured default, and only coordinates when the
    /// strategy enables the coordinator.
    pub fn resolve_pattern(
        &self,
        request: &SimulationRequest,
        strategy: &SimulationStrategy,
    ) -> (OrchestrationPattern, Duration) {
        match request.mode {
            SimulationMode::Basic => {
                if let Some(pattern) = request.pattern {
                    debug!(requested = pattern.as_str(), "basic mode ignores the requested pattern");
                }
                (OrchestrationPattern::RoundRobin, self.settings.basic_timeout)
            }
            SimulationMode::Advanced => {
                let requested = request
                    .pattern
                    .unwrap_or(self.settings.default_advanced_pattern);
                let pattern = if requested == OrchestrationPattern::Coordinated
                    && !strategy.use_orchestrator
                {
                    OrchestrationPattern::Handoff
                } else {
                    requested
                };
                (pattern, self.settings.advanced_timeout)
            }
        }
    }

    fn roles_for(&self, request: &SimulationRequest) -> RoleSettings {
        request
            .temperature
            .map_or_else(|| self.settings.roles.clone(), RoleSettings::from_base_temperature)
    }

    /// Run one simulation.
    ///
    /// Returns a report for every outcome except invalid input
    /// ([`DomainError::ValidationFailed`]) and cancellation
    /// ([`DomainError::Cancelled`]).
    #[instrument(skip_all, fields(company = %request.lead.company_name, mode = request.mode.as_str()))]
    pub async fn simulate(
        &self,
        request: &SimulationRequest,
        cancel: &CancellationToken,
    ) -> DomainResult<SimulationReport> {
        request.validate()?;
        let started = Instant::now();

        let strategy = apply_overrides(select_strategy(&request.lead), request);
        debug!(
            persona = strategy.primary_persona.as_str(),
            max_turns = strategy.max_turns,
            use_orchestrator = strategy.use_orchestrator,
            "strategy selected"
        );

        if cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        let unavailable = match self.generator.is_available().await {
            Ok(true) => None,
            Ok(false) => Some(DomainError::ConfigurationMissing(format!(
                "text generator '{}' is not configured",
                self.generator.name()
            ))),
            Err(e) => Some(e),
        };
        if let Some(error) = unavailable {
            warn!(error = %error, "generator unavailable, using fallback scoring");
            return Ok(self.fallback_report(request, strategy, None, &error, 0, started));
        }

        let (pattern, timeout) = self.resolve_pattern(request, &strategy);
        let orchestrator = ConversationOrchestrator::new(
            Arc::clone(&self.generator),
            self.roles_for(request),
            OrchestratorSettings {
                timeout,
                model: self.settings.model.clone(),
                seed: request.seed,
            },
        );

        let attempts = self.settings.retry.execute(|attempt| {
            if attempt > 0 {
                info!(attempt, pattern = pattern.as_str(), "retrying conversation");
            }
            orchestrator.run(&request.lead, &strategy, pattern, cancel)
        });
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DomainError::Cancelled),
            outcome = attempts => outcome,
        };

        match outcome {
            Ok(Retried {
                value: transcript,
                retry_count,
                ..
            }) => {
                let assessment = extract_assessment(&transcript);
                let results = self.analyzer.analyze(
                    &transcript,
                    &request.lead,
                    &strategy,
                    pattern.label(),
                    assessment.as_ref(),
                );
                let validation = results.validate();
                log_validation(&validation);

                info!(
                    pattern = pattern.as_str(),
                    turns = transcript.len(),
                    retry_count,
                    conversion_probability = results.conversion_probability,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "simulation completed"
                );

                Ok(SimulationReport {
                    simulation_id: Uuid::new_v4(),
                    timestamp: Utc::now(),
                    status: SimulationStatus::Completed,
                    mode: request.mode,
                    pattern: Some(pattern),
                    strategy,
                    results,
                    validation,
                    retry_count,
                    execution_time_secs: started.elapsed().as_secs_f64(),
                    error_message: None,
                })
            }
            Err(RetryExhausted {
                error: DomainError::Cancelled,
                ..
            }) => Err(DomainError::Cancelled),
            Err(RetryExhausted {
                error, retry_count, ..
            }) => {
                warn!(
                    pattern = pattern.as_str(),
                    retry_count,
                    error = %error,
                    "conversation failed, using fallback scoring"
                );
                Ok(self.fallback_report(
                    request,
                    strategy,
                    Some(pattern),
                    &error,
                    retry_count,
                    started,
                ))
            }
        }
    }

    fn fallback_report(
        &self,
        request: &SimulationRequest,
        strategy: SimulationStrategy,
        pattern: Option<OrchestrationPattern>,
        error: &DomainError,
        retry_count: u32,
        started: Instant,
    ) -> SimulationReport {
        let reason = if error.is_timeout() {
            "conversation timed out".to_string()
        } else {
            error.to_string()
        };
        let mut results: SimulationResults = fallback_results(&request.lead, &reason);
        results
            .simulation_metadata
            .insert("generator".to_string(), self.generator.name().into());
        let validation = results.validate();
        log_validation(&validation);

        SimulationReport {
            simulation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: SimulationStatus::Fallback,
            mode: request.mode,
            pattern,
            strategy,
            results,
            validation,
            retry_count,
            execution_time_secs: started.elapsed().as_secs_f64(),
            error_message: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generators::{MockGenerator, MockResponse};
    use crate::domain::models::LeadRecord;

    fn fast_settings() -> SimulationSettings {
        SimulationSettings::default().with_retry(RetryPolicy::new(
            2,
            Duration::from_millis(1),
            Duration::from_millis(2),
        ))
    }

    fn service(generator: MockGenerator) -> SimulationService {
        SimulationService::new(Arc::new(generator), fast_settings())
    }

    fn request() -> SimulationRequest {
        SimulationRequest::new(LeadRecord::new("Contoso").with_industry("Construction"))
    }

    #[test]
    fn test_resolve_pattern() {
        let service = service(MockGenerator::new());
        let strategy = SimulationStrategy::default();

        let basic = request().with_pattern(OrchestrationPattern::Coordinated);
        assert_eq!(
            service.resolve_pattern(&basic, &strategy),
            (OrchestrationPattern::RoundRobin, Duration::from_secs(300))
        );

        let advanced = request().with_mode(SimulationMode::Advanced);
        assert_eq!(
            service.resolve_pattern(&advanced, &strategy),
            (OrchestrationPattern::Handoff, Duration::from_secs(600))
        );

        let coordinated = advanced.with_pattern(OrchestrationPattern::Coordinated);
        assert_eq!(
            service.resolve_pattern(&coordinated, &strategy).0,
            OrchestrationPattern::Handoff
        );

        let enterprise = SimulationStrategy {
            use_orchestrator: true,
            ..Default::default()
        };
        assert_eq!(
            service.resolve_pattern(&coordinated, &enterprise).0,
            OrchestrationPattern::Coordinated
        );
    }

    #[tokio::test]
    async fn test_basic_simulation_completes() {
        let generator = MockGenerator::new();
        let report = service(generator.clone())
            .simulate(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, SimulationStatus::Completed);
        assert_eq!(report.pattern, Some(OrchestrationPattern::RoundRobin));
        assert_eq!(report.retry_count, 0);
        assert_eq!(generator.call_count(), report.strategy.max_turns);
        assert!(report.validation.is_valid);
        assert_eq!(
            report.results.simulation_metadata["assessment_extracted"],
            serde_json::Value::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let err = service(MockGenerator::new())
            .simulate(&request().with_max_turns(50), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_unavailable_generator_falls_back_without_calls() {
        let generator = MockGenerator::new().unavailable();
        let report = service(generator.clone())
            .simulate(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_fallback());
        assert_eq!(report.pattern, None);
        assert_eq!(generator.call_count(), 0);
        assert!(report.error_message.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_persistent_failure_falls_back_after_retries() {
        let generator = MockGenerator::new().with_failure("backend down");
        let report = service(generator.clone())
            .simulate(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_fallback());
        assert_eq!(report.retry_count, 2);
        assert_eq!(generator.call_count(), 3);
        assert!(report.results.conversation_summary.contains("backend down"));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let generator = MockGenerator::new().with_script([MockResponse::failure("flaky")]);
        let report = service(generator)
            .simulate(&request(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.status, SimulationStatus::Completed);
        assert_eq!(report.retry_count, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let generator = MockGenerator::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service(generator.clone())
            .simulate(&request(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Cancelled));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_temperature_override_reaches_requests() {
        let generator = MockGenerator::new();
        service(generator.clone())
            .simulate(&request().with_temperature(1.0), &CancellationToken::new())
            .await
            .unwrap();

        let prospect = generator
            .requests()
            .into_iter()
            .find(|r| r.persona == crate::domain::models::AgentPersona::Prospect)
            .unwrap();
        assert!((prospect.temperature - 0.8).abs() < f32::EPSILON);
    }
}
