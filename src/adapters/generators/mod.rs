//! Text generator adapter implementations.

pub mod mock;
pub mod openai;
pub mod registry;

pub use mock::{MockGenerator, MockResponse};
pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use registry::GeneratorRegistry;
