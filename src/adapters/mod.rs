//! Adapters for external systems.

pub mod generators;
