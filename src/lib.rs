//! Bakelens - recipe analysis core for AI baking assistants
//!
//! This crate is the security, caching, and orchestration core behind a
//! photograph-your-bake app: it validates prompts before they reach a
//! generative vision model, rate-limits requests, classifies model output
//! for safety, extracts structured recipes from free-form text, and caches
//! results keyed by image content with crash-safe, checksum-verified
//! persistence. UI concerns (camera capture, rendering, sharing) live in
//! the consuming application.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bakelens::{Bakelens, OllamaVision};
//!
//! #[tokio::main]
//! async fn main() -> bakelens::Result<()> {
//!     let engine = Bakelens::builder()
//!         .model(Arc::new(OllamaVision::new("http://localhost:11434")))
//!         .build()?;
//!
//!     let photo = std::fs::read("croissant.jpg")?;
//!     let result = engine.analyze(&photo, "What is this and how do I bake it?").await;
//!
//!     if let Some(recipe) = result.recipe {
//!         println!("{} ({} ingredients)", recipe.title, recipe.ingredients.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod parser;
pub mod providers;
pub mod security;
pub mod storage;
pub mod telemetry;
pub mod traits;
pub mod types;

// Re-export main types at crate root
pub use analyzer::{AnalysisEngine, Bakelens, BakelensBuilder};
pub use cache::{CacheStatistics, CachedRecipe, RecipeCache};
pub use error::{BakelensError, Result};
pub use parser::RecipeParser;
pub use providers::OllamaVision;
pub use security::{
    InputValidation, InputValidator, RateLimitDecision, RateLimiter, RateLimits,
    ResponseValidation, ResponseValidator, SecurityManager,
};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use traits::VisionModel;
pub use types::{AnalysisRequest, AnalysisResult, Difficulty, Recipe, RecipeSource};
