//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use prospector::adapters::generators::MockGenerator;
use prospector::domain::models::LeadRecord;
use prospector::services::{RetryPolicy, SimulationService, SimulationSettings};

/// The enterprise software lead used across scenarios.
pub fn acme_lead() -> LeadRecord {
    LeadRecord::new("Acme Corp")
        .with_industry("Enterprise Software")
        .with_company_size(2000)
        .with_contact("Jordan Lee")
        .with_pain_point("Manual reporting")
        .with_tech("Kubernetes")
        .with_engagement(0.8)
        .with_research_completed(true)
}

/// A small, cold lead outside the technical industries.
pub fn small_lead() -> LeadRecord {
    LeadRecord::new("Corner Bakery")
        .with_industry("Retail")
        .with_company_size(40)
        .with_engagement(0.2)
}

/// Settings with short backoff so retry scenarios finish quickly.
pub fn fast_settings() -> SimulationSettings {
    SimulationSettings::default().with_retry(RetryPolicy::new(
        2,
        Duration::from_millis(1),
        Duration::from_millis(5),
    ))
}

/// Build a service over `generator`, keeping the generator handle usable.
pub fn service_with(generator: &MockGenerator, settings: SimulationSettings) -> SimulationService {
    SimulationService::new(Arc::new(generator.clone()), settings)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
