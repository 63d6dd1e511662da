//! Analysis outcome type

use serde::{Deserialize, Serialize};

use super::recipe::Recipe;

/// Terminal outcome of one `analyze` call.
///
/// The engine never returns a raw error across its public boundary: every
/// outcome, including rejections and model failures, is folded into this
/// struct with a human-readable `error_message` and a `retryable` flag the
/// consuming UI can use to decide whether to offer a retry action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    #[serde(default)]
    pub raw_response: String,
    pub processing_time_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Whether resubmitting the same request may succeed.
    pub retryable: bool,
}

impl AnalysisResult {
    /// Successful analysis carrying a recipe.
    pub fn success(recipe: Recipe, raw_response: String, warnings: Vec<String>) -> Self {
        Self {
            recipe: Some(recipe),
            raw_response,
            processing_time_ms: 0,
            success: true,
            error_message: None,
            warnings,
            retryable: false,
        }
    }

    /// Request rejected before reaching the model (validation, rate limit,
    /// unsafe response).
    pub fn rejected(reason: impl Into<String>, retryable: bool) -> Self {
        Self {
            recipe: None,
            raw_response: String::new(),
            processing_time_ms: 0,
            success: false,
            error_message: Some(reason.into()),
            warnings: Vec::new(),
            retryable,
        }
    }

    /// Model invocation or processing failure.
    pub fn failed(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            recipe: None,
            raw_response: String::new(),
            processing_time_ms: 0,
            success: false,
            error_message: Some(message.into()),
            warnings: Vec::new(),
            retryable,
        }
    }

    /// Set the elapsed processing time.
    pub(crate) fn timed(mut self, elapsed_ms: u64) -> Self {
        self.processing_time_ms = elapsed_ms;
        self
    }
}
