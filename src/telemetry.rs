//! Telemetry metric name constants.
//!
//! Centralised metric names for bakelens operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bakelens_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status` — outcome: "ok" | "rejected" | "failed"
//! - `reason` — rejection cause (e.g. "rate_limit", "unsafe_input")

/// Total analysis requests processed by the engine.
///
/// Labels: `status` ("ok" | "rejected" | "failed").
pub const REQUESTS_TOTAL: &str = "bakelens_requests_total";

/// Analysis duration in seconds, cache hits included.
pub const REQUEST_DURATION_SECONDS: &str = "bakelens_request_duration_seconds";

/// Total recipe cache hits.
pub const CACHE_HITS_TOTAL: &str = "bakelens_cache_hits_total";

/// Total recipe cache misses.
pub const CACHE_MISSES_TOTAL: &str = "bakelens_cache_misses_total";

/// Total entries evicted from the recipe cache (LRU or retention sweep).
pub const CACHE_EVICTIONS_TOTAL: &str = "bakelens_cache_evictions_total";

/// Total requests blocked by the rate limiter.
///
/// Labels: `window` ("minute" | "hour" | "day").
pub const RATE_LIMITED_TOTAL: &str = "bakelens_rate_limited_total";

/// Total prompts rejected by input validation.
///
/// Labels: `reason`.
pub const INPUT_REJECTIONS_TOTAL: &str = "bakelens_input_rejections_total";
