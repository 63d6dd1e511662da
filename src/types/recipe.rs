//! Recipe value types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inferred skill level for a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    Unknown,
}

/// Where a recipe came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    #[default]
    AiGenerated,
    UserProvided,
    /// Served from the recipe cache rather than a fresh model call.
    Cached,
}

/// An immutable parsed recipe.
///
/// Produced by [`RecipeParser`](crate::parser::RecipeParser) from free-form
/// model output, or loaded from the persisted cache. Field extraction is
/// best-effort; `confidence` reflects how much structure was recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Generated unique id (UUID v4).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub source: RecipeSource,
    /// Extraction quality score in `[0.0, 1.0]`.
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
}

impl Recipe {
    /// Copy of this recipe marked as served from the cache.
    pub fn as_cached(&self) -> Recipe {
        Recipe {
            source: RecipeSource::Cached,
            ..self.clone()
        }
    }
}
