//! Security subsystem.
//!
//! Three mutually independent components, bundled behind [`SecurityManager`]:
//!
//! - [`RateLimiter`] — durable sliding-window request accounting per
//!   identifier (minute/hour/day thresholds from one timestamp list).
//! - [`InputValidator`] — pattern-based prompt rejection and sanitization
//!   before anything reaches the model.
//! - [`ResponseValidator`] — layered severity classification of model
//!   output (valid / warning / suspicious / unsafe / invalid).
//!
//! The manager is an injectable service instance, constructed once by the
//! builder and passed by reference; it holds no global state.

pub mod input;
pub mod rate_limit;
pub mod response;

pub use input::{InputValidation, InputValidator, MAX_PROMPT_LEN};
pub use rate_limit::{RateLimitDecision, RateLimiter, RateLimits};
pub use response::{
    FOOD_SAFETY_NOTICE, MAX_RESPONSE_LEN, ResponseValidation, ResponseValidator,
};

use std::sync::Arc;

use crate::storage::Storage;

/// Bundles the rate limiter and both validators.
pub struct SecurityManager {
    rate_limiter: RateLimiter,
    input: InputValidator,
    response: ResponseValidator,
}

impl SecurityManager {
    pub fn new(storage: Arc<dyn Storage>, limits: RateLimits) -> Self {
        Self {
            rate_limiter: RateLimiter::new(storage, limits),
            input: InputValidator::new(),
            response: ResponseValidator::new(),
        }
    }

    /// Check and record a request for `identifier`.
    pub async fn check_rate_limit(&self, identifier: &str) -> RateLimitDecision {
        self.rate_limiter.check(identifier).await
    }

    /// Validate and sanitize a user prompt.
    pub fn validate_input(&self, input: &str) -> InputValidation {
        self.input.validate(input)
    }

    /// Classify a model response.
    pub fn validate_response(&self, response: &str) -> ResponseValidation {
        self.response.validate(response)
    }
}
