//! The analysis engine: validate → rate-limit → cache → model → classify →
//! parse → cache.
//!
//! Per-request state machine:
//!
//! ```text
//! Start → InputValidated → RateLimitChecked → CacheChecked
//!                                                  │
//!                          ┌── hit ────────────────┤
//!                          ▼                       ▼ miss
//!                        Done        ModelInvoked → ResponseValidated
//!                                                  → Parsed → Cached → Done
//! ```
//!
//! Any validation or rate-limit failure short-circuits to a rejected
//! result before the model is called or the cache written; a model failure
//! becomes a retryable failed result. A recipe is cached only after the
//! full response validated and parsed, so partial cache writes cannot
//! occur — a cancelled request either never reaches the cache or leaves a
//! complete entry.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use futures_util::Stream;
use tracing::{debug, instrument, warn};

use crate::cache::RecipeCache;
use crate::parser::RecipeParser;
use crate::security::{
    InputValidation, RateLimitDecision, ResponseValidation, SecurityManager,
};
use crate::telemetry;
use crate::traits::VisionModel;
use crate::types::{AnalysisRequest, AnalysisResult};

// Status label for the request counter, assigned at the branch that
// produces the terminal outcome. A rate-limit block is a rejection even
// though it is retryable, so the label cannot be inferred from the
// `retryable` flag.
#[derive(Clone, Copy)]
enum Outcome {
    Ok,
    Rejected,
    Failed,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Rejected => "rejected",
            Outcome::Failed => "failed",
        }
    }
}

/// Orchestrates one photo-to-recipe analysis at a time.
///
/// Construct via [`Bakelens::builder()`](crate::Bakelens::builder). All
/// methods are safe to call from any task; the cache and rate limiter
/// serialize internally.
pub struct AnalysisEngine {
    model: Arc<dyn VisionModel>,
    security: SecurityManager,
    cache: RecipeCache,
    parser: RecipeParser,
    identifier: String,
}

impl AnalysisEngine {
    pub(crate) fn new(
        model: Arc<dyn VisionModel>,
        security: SecurityManager,
        cache: RecipeCache,
        identifier: String,
    ) -> Self {
        Self {
            model,
            security,
            cache,
            parser: RecipeParser::new(),
            identifier,
        }
    }

    /// Analyze a photo of a baked good.
    ///
    /// Never returns an error: every terminal state folds into
    /// [`AnalysisResult`] with a reason string and retryability flag.
    #[instrument(skip_all, fields(model = %self.model.name()))]
    pub async fn analyze(&self, image: &[u8], prompt: &str) -> AnalysisResult {
        let started = Instant::now();
        let (result, outcome) = self.analyze_inner(image, prompt).await;

        let elapsed = started.elapsed();
        metrics::counter!(telemetry::REQUESTS_TOTAL, "status" => outcome.label()).increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS).record(elapsed.as_secs_f64());

        result.timed(elapsed.as_millis() as u64)
    }

    /// Streaming variant of [`analyze`](Self::analyze).
    ///
    /// Emits exactly one result today; modeled as a stream so incremental
    /// results can be added without breaking the consumer contract.
    pub fn analyze_stream(
        self: &Arc<Self>,
        image: Vec<u8>,
        prompt: String,
    ) -> Pin<Box<dyn Stream<Item = AnalysisResult> + Send>> {
        let engine = Arc::clone(self);
        Box::pin(futures_util::stream::once(async move {
            engine.analyze(&image, &prompt).await
        }))
    }

    /// Read access to the recipe cache (history views, statistics,
    /// retention sweeps).
    pub fn cache(&self) -> &RecipeCache {
        &self.cache
    }

    async fn analyze_inner(&self, image: &[u8], prompt: &str) -> (AnalysisResult, Outcome) {
        // InputValidated
        let sanitized = match self.security.validate_input(prompt) {
            InputValidation::Valid { sanitized } => sanitized,
            InputValidation::Invalid { reason } => {
                debug!(%reason, "prompt rejected");
                return (AnalysisResult::rejected(reason, false), Outcome::Rejected);
            }
        };

        // RateLimitChecked
        match self.security.check_rate_limit(&self.identifier).await {
            RateLimitDecision::Allowed { .. } => {}
            RateLimitDecision::Blocked {
                reason,
                retry_after_secs,
            } => {
                let mut result = AnalysisResult::rejected(
                    format!("{reason} (retry in {retry_after_secs}s)"),
                    true,
                );
                result.warnings.push(format!("retry after {retry_after_secs} seconds"));
                return (result, Outcome::Rejected);
            }
        }

        // CacheChecked
        let request = AnalysisRequest::from_image(image, sanitized.clone());
        if let Some(recipe) = self.cache.get_cached(&request).await {
            debug!(key = %request.cache_key(), "serving recipe from cache");
            let warnings = recipe.warnings.clone();
            return (
                AnalysisResult::success(recipe, String::new(), warnings),
                Outcome::Ok,
            );
        }

        // ModelInvoked
        let raw = match self.model.generate_content(image, &sanitized).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "model invocation failed");
                return (
                    AnalysisResult::failed(
                        format!("recipe generation failed: {e}"),
                        e.is_retryable(),
                    ),
                    Outcome::Failed,
                );
            }
        };

        // ResponseValidated
        let (validated, mut warnings) = match self.security.validate_response(&raw) {
            ResponseValidation::Valid { response } => (response, Vec::new()),
            ResponseValidation::RequiresWarning { response, warning } => {
                (response, vec![warning])
            }
            ResponseValidation::Suspicious { reason, warning } => {
                debug!(%reason, "response flagged as suspicious");
                (raw.clone(), vec![warning])
            }
            ResponseValidation::Unsafe { reason, warning } => {
                warn!(%reason, "unsafe response discarded");
                return (AnalysisResult::rejected(warning, false), Outcome::Rejected);
            }
            ResponseValidation::Invalid { reason, message } => {
                debug!(%reason, "response rejected");
                return (AnalysisResult::rejected(message, false), Outcome::Rejected);
            }
        };

        // Parsed
        let mut recipe = self.parser.parse(&validated, &request.image_hash);
        recipe.warnings = warnings.clone();
        if recipe.confidence < 0.5 {
            warnings.push("low confidence extraction; recipe details may be incomplete".into());
        }

        // Cached — always before returning, so an identical request hits.
        self.cache.cache_recipe(&request, recipe.clone()).await;

        (AnalysisResult::success(recipe, raw, warnings), Outcome::Ok)
    }
}
