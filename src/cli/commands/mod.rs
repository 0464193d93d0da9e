//! CLI command implementations.

pub mod config;
pub mod simulate;
pub mod strategy;
pub mod validate;
