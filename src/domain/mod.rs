//! Domain layer for the Prospector simulation core
//!
//! This module contains the data model, errors, and the port the
//! conversation engine talks to text generation backends through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
