//! CLI terminal feedback while long operations run.

pub mod progress;

pub use progress::create_spinner;
