//! Sliding-window rate limiter with durable timestamp sets.
//!
//! One timestamp list per identifier, pruned past 24 hours; the minute,
//! hour, and day counts are all derived from that single list, so the
//! three windows can never drift apart. The whole check-and-record
//! sequence runs under one process-wide mutex: checks for different
//! identifiers serialize, which is acceptable at human-paced request
//! volume and keeps the accounting exact.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::storage::Storage;
use crate::telemetry;

/// Window thresholds. Defaults match the production limits: 10/minute,
/// 50/hour, 200/day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimits {
    pub per_minute: u32,
    pub per_hour: u32,
    pub per_day: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            per_minute: 10,
            per_hour: 50,
            per_day: 200,
        }
    }
}

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 3_600;
const DAY_SECS: i64 = 86_400;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed {
        /// Requests left in the current minute window, after this one.
        requests_remaining: u32,
        /// Seconds until the minute window resets.
        reset_secs: u64,
    },
    Blocked {
        reason: String,
        retry_after_secs: u64,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }

    /// Requests remaining in the tightest window; always 0 when blocked.
    pub fn requests_remaining(&self) -> u32 {
        match self {
            RateLimitDecision::Allowed {
                requests_remaining, ..
            } => *requests_remaining,
            RateLimitDecision::Blocked { .. } => 0,
        }
    }
}

/// Sliding-window rate limiter.
///
/// Timestamp sets are mirrored to durable storage per identifier
/// (`ratelimit/<identifier>`, trimmed to the trailing 24 h) and hydrated
/// lazily on the first check after startup. Persistence failures are
/// logged and swallowed; the in-memory window stays authoritative.
pub struct RateLimiter {
    storage: Arc<dyn Storage>,
    limits: RateLimits,
    // identifier -> epoch-second timestamps of accepted requests.
    // None until hydrated from storage.
    windows: Mutex<HashMap<String, Vec<i64>>>,
}

impl RateLimiter {
    pub fn new(storage: Arc<dyn Storage>, limits: RateLimits) -> Self {
        Self {
            storage,
            limits,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `identifier` may make a request now, recording it if so.
    ///
    /// Windows are evaluated minute-first, so a request over every threshold
    /// reports the tightest (minute) block.
    pub async fn check(&self, identifier: &str) -> RateLimitDecision {
        let now = Utc::now().timestamp();
        let mut windows = self.windows.lock().await;

        let timestamps = match windows.entry(identifier.to_string()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(v) => v.insert(self.load(identifier).await),
        };

        timestamps.retain(|&t| now - t < DAY_SECS);

        let minute_count = timestamps.iter().filter(|&&t| now - t < MINUTE_SECS).count() as u32;
        let hour_count = timestamps.iter().filter(|&&t| now - t < HOUR_SECS).count() as u32;
        let day_count = timestamps.len() as u32;

        let blocked = if minute_count >= self.limits.per_minute {
            Some(("minute", self.limits.per_minute, MINUTE_SECS))
        } else if hour_count >= self.limits.per_hour {
            Some(("hour", self.limits.per_hour, HOUR_SECS))
        } else if day_count >= self.limits.per_day {
            Some(("day", self.limits.per_day, DAY_SECS))
        } else {
            None
        };

        if let Some((window, limit, retry_secs)) = blocked {
            metrics::counter!(telemetry::RATE_LIMITED_TOTAL, "window" => window).increment(1);
            return RateLimitDecision::Blocked {
                reason: format!("rate limit exceeded: {limit} requests per {window}"),
                retry_after_secs: retry_secs as u64,
            };
        }

        timestamps.push(now);
        self.persist(identifier, timestamps).await;

        RateLimitDecision::Allowed {
            requests_remaining: self.limits.per_minute - minute_count - 1,
            reset_secs: MINUTE_SECS as u64,
        }
    }

    async fn load(&self, identifier: &str) -> Vec<i64> {
        match self.storage.read(&storage_key(identifier)).await {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(identifier, error = %e, "discarding unreadable rate-limit window");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(identifier, error = %e, "rate-limit window load failed, starting empty");
                Vec::new()
            }
        }
    }

    async fn persist(&self, identifier: &str, timestamps: &[i64]) {
        let bytes = match serde_json::to_vec(timestamps) {
            Ok(b) => b,
            Err(e) => {
                warn!(identifier, error = %e, "rate-limit window serialization failed");
                return;
            }
        };
        if let Err(e) = self.storage.write(&storage_key(identifier), &bytes).await {
            warn!(identifier, error = %e, "rate-limit window persistence failed");
        }
    }
}

fn storage_key(identifier: &str) -> String {
    format!("ratelimit/{identifier}")
}
