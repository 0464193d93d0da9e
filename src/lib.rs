//! Prospector - sales conversation simulator and lead scorer
//!
//! Prospector runs a simulated discovery call between AI personas (sales
//! reps, the prospect, a sales manager) for a lead and turns the transcript
//! into a structured, schema-valid assessment of conversion likelihood.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Lead, strategy, transcript and results models plus the generator port
//! - **Service Layer** (`services`): Strategy selection, orchestration, analysis and fallback scoring
//! - **Adapter Layer** (`adapters`): Text generator backends
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use prospector::{LeadRecord, MockGenerator, SimulationRequest, SimulationService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = SimulationService::new(Arc::new(MockGenerator::new()), Default::default());
//!     let request = SimulationRequest::new(LeadRecord::new("Acme Corp"));
//!     let report = service.simulate(&request, &Default::default()).await?;
//!     println!("{:.2}", report.results.conversion_probability);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::generators::{GeneratorRegistry, MockGenerator, OpenAiGenerator};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Config, LeadRecord, OrchestrationPattern, SimulationMode, SimulationReport, SimulationRequest,
    SimulationResults, SimulationStrategy,
};
pub use domain::ports::TextGenerator;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{SimulationService, SimulationSettings};
