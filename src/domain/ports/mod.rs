//! Port trait definitions (Hexagonal Architecture)
//!
//! - TextGenerator: produces one persona utterance per call
//!
//! The conversation engine depends only on this trait, so backends can be
//! swapped without touching orchestration or scoring.

pub mod text_generator;

pub use text_generator::TextGenerator;
