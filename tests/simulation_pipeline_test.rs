//! End-to-end simulation scenarios over the mock generator.

mod common;

use std::time::Duration;

use prospector::adapters::generators::{MockGenerator, MockResponse};
use prospector::domain::errors::DomainError;
use prospector::domain::models::{
    AgentPersona, OrchestrationPattern, SimulationMode, SimulationRequest, SimulationStatus,
};
use prospector::services::{RetryPolicy, SimulationSettings};
use tokio_util::sync::CancellationToken;

use common::{acme_lead, fast_settings, service_with, small_lead};

#[tokio::test]
async fn test_acme_coordinated_simulation() {
    common::setup_test_logging();
    let generator = MockGenerator::new();
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(acme_lead())
        .with_mode(SimulationMode::Advanced)
        .with_pattern(OrchestrationPattern::Coordinated);

    let report = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.status, SimulationStatus::Completed);
    assert_eq!(report.pattern, Some(OrchestrationPattern::Coordinated));
    assert_eq!(report.strategy.primary_persona, AgentPersona::TechnicalRep);
    assert_eq!(report.strategy.max_turns, 14);
    assert_eq!(report.retry_count, 0);
    assert!(report.validation.is_valid, "{:?}", report.validation.errors);

    let metadata = &report.results.simulation_metadata;
    assert_eq!(metadata["pattern"], "coordinated");
    assert_eq!(metadata["assessment_extracted"], true);
    assert!(metadata["total_turns"].as_u64().unwrap() <= 14);

    let personas: Vec<AgentPersona> = generator.requests().iter().map(|r| r.persona).collect();
    assert!(personas.contains(&AgentPersona::Coordinator));
    assert_eq!(personas.last(), Some(&AgentPersona::Manager));
}

#[tokio::test]
async fn test_advanced_mode_defaults_to_handoff() {
    let generator = MockGenerator::new();
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(small_lead()).with_mode(SimulationMode::Advanced);

    let report = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pattern, Some(OrchestrationPattern::Handoff));
    assert_eq!(report.results.simulation_metadata["pattern"], "hand-off");
    assert!(generator
        .requests()
        .iter()
        .all(|r| r.persona != AgentPersona::Coordinator));
}

#[tokio::test]
async fn test_coordinated_downgrades_without_orchestrator() {
    let generator = MockGenerator::new();
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(small_lead())
        .with_mode(SimulationMode::Advanced)
        .with_pattern(OrchestrationPattern::Coordinated);

    let report = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pattern, Some(OrchestrationPattern::Handoff));
}

#[tokio::test]
async fn test_negative_prospect_scores_low() {
    let generator = MockGenerator::new()
        .with_persona_response(
            AgentPersona::Prospect,
            "Honestly we're not interested and there is no budget this year.",
        )
        .with_persona_response(AgentPersona::Manager, "The prospect declined.");
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(small_lead()).with_max_turns(6);

    let report = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.status, SimulationStatus::Completed);
    assert!(report.results.conversion_probability < 0.4);
    assert_eq!(report.results.simulation_metadata["assessment_extracted"], false);
    assert!(report.results.conversation_summary.starts_with("Challenging"));
    assert!(report.validation.is_valid);
}

#[tokio::test]
async fn test_persistent_failure_degrades_to_fallback() {
    let generator = MockGenerator::new().with_failure("upstream unavailable");
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(acme_lead());

    let report = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.is_fallback());
    assert_eq!(report.pattern, Some(OrchestrationPattern::RoundRobin));
    assert_eq!(report.retry_count, 2);
    assert!((report.results.confidence_score - 0.3).abs() < f64::EPSILON);
    assert!(report
        .error_message
        .as_deref()
        .unwrap()
        .contains("upstream unavailable"));
    assert_eq!(report.results.simulation_metadata["fallback"], true);
    assert_eq!(report.results.simulation_metadata["generator"], "mock");
    assert!(report.validation.is_valid);
}

#[tokio::test(start_paused = true)]
async fn test_conversation_timeout_degrades_to_fallback() {
    let generator = MockGenerator::new().with_delay(Duration::from_secs(30));
    let mut settings = SimulationSettings::default().with_retry(RetryPolicy::no_retry());
    settings.basic_timeout = Duration::from_secs(2);
    let service = service_with(&generator, settings);

    let report = service
        .simulate(&SimulationRequest::new(small_lead()), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.is_fallback());
    assert_eq!(
        report.error_message.as_deref(),
        Some("Generation timed out after 2s")
    );
    assert!(report
        .results
        .conversation_summary
        .contains("conversation timed out"));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let generator = MockGenerator::new().with_script([MockResponse::Timeout(5)]);
    let service = service_with(&generator, fast_settings());

    let report = service
        .simulate(&SimulationRequest::new(small_lead()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.status, SimulationStatus::Completed);
    assert_eq!(report.retry_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_conversation() {
    let generator = MockGenerator::new().with_delay(Duration::from_secs(10));
    let service = service_with(&generator, fast_settings());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(15)).await;
        trigger.cancel();
    });

    let err = service
        .simulate(&SimulationRequest::new(small_lead()), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Cancelled));
    assert!(generator.call_count() >= 1);
}

#[tokio::test]
async fn test_invalid_lead_rejected_before_any_call() {
    let generator = MockGenerator::new();
    let service = service_with(&generator, fast_settings());
    let request = SimulationRequest::new(small_lead().with_engagement(1.5));

    let err = service
        .simulate(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ValidationFailed(_)));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_report_json_shape() {
    let generator = MockGenerator::new();
    let service = service_with(&generator, fast_settings());
    let report = service
        .simulate(&SimulationRequest::new(acme_lead()), &CancellationToken::new())
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    for key in [
        "simulation_id",
        "timestamp",
        "status",
        "mode",
        "pattern",
        "strategy",
        "results",
        "validation",
        "retry_count",
        "execution_time_secs",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json.get("error_message").is_none());
    assert_eq!(json["status"], "completed");
    assert_eq!(json["mode"], "basic");
    assert_eq!(json["strategy"]["primary_persona"], "technical_rep");
}
