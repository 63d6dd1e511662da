//! Core data types for recipe analysis.

pub mod analysis;
pub mod recipe;
pub mod request;

pub use analysis::AnalysisResult;
pub use recipe::{Difficulty, Recipe, RecipeSource};
pub use request::AnalysisRequest;
