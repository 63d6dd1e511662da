//! Analysis orchestration: entry point, builder, and engine.

mod builder;
mod engine;

pub use builder::{Bakelens, BakelensBuilder};
pub use engine::AnalysisEngine;
