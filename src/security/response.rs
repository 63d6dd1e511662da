//! Model response classification.
//!
//! Layered classifier with escalating severity: length, dangerous cooking
//! instructions, inappropriate content, hallucination markers, food-safety
//! triggers. Higher-severity checks short-circuit lower ones, so an unsafe
//! response is never merely "suspicious".

use std::sync::LazyLock;

use regex::RegexSet;

/// Maximum accepted response length in characters.
pub const MAX_RESPONSE_LEN: usize = 5_000;

/// Fixed notice appended when a response trips a food-safety trigger.
pub const FOOD_SAFETY_NOTICE: &str = "Food safety: follow safe handling and storage guidance \
     for raw ingredients, and verify cooking temperatures with a food thermometer.";

static DANGEROUS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bpoison(ous)?\b",
        r"(?i)\btoxic\b",
        r"(?i)\binedible\b",
        r"(?i)\beat\b.{0,40}\braw\b.{0,40}\b(chicken|pork|meat|egg)",
        r"(?i)\b(serve|consume)\b.{0,40}\bundercooked\b",
        r"(?i)\bbleach\b",
        r"(?i)\bdetergent\b",
    ])
    .expect("dangerous pattern set compiles")
});

static INAPPROPRIATE: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bnsfw\b",
        r"(?i)\bexplicit\b",
        r"(?i)\bporn(ographic)?\b",
        r"(?i)\bgore\b",
        r"(?i)\bgraphic violence\b",
    ])
    .expect("inappropriate pattern set compiles")
});

/// Self-referential AI disclaimers and fabrication language. Two or more
/// distinct matches mark the response as suspicious.
static HALLUCINATION: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bas an ai\b",
        r"(?i)\bi (cannot|can't|am unable to)\b",
        r"(?i)\bi apologi[sz]e\b",
        r"(?i)\bi don't actually\b",
        r"(?i)\b(this is|purely)\s+(fictional|imaginary)\b",
        r"(?i)\bmade[- ]up\b",
        r"(?i)\bi'm just a\b",
    ])
    .expect("hallucination pattern set compiles")
});

static FOOD_SAFETY: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\braw (meat|chicken|pork|fish|egg)",
        r"(?i)\broom temperature\b.{0,60}\b(overnight|hours|days)\b",
        r"(?i)\bleave\b.{0,40}\bout\b.{0,40}\bovernight\b",
        r"(?i)\bunpasteuri[sz]ed\b",
        r"(?i)\bspoil(ed|age)?\b",
        r"(?i)\bmold(y)?\b",
    ])
    .expect("food-safety pattern set compiles")
});

/// Classification of a model response, ordered by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseValidation {
    /// Response is usable as-is.
    Valid { response: String },
    /// Usable, but the UI should show a food-safety warning.
    RequiresWarning { response: String, warning: String },
    /// Possibly hallucinated; surfaced as a warning, not an error.
    Suspicious { reason: String, warning: String },
    /// Dangerous cooking guidance; never shown to the user.
    Unsafe { reason: String, warning: String },
    /// Structurally unusable (too long, inappropriate).
    Invalid { reason: String, message: String },
}

/// Pattern-based response classifier. Stateless; patterns compile once.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, response: &str) -> ResponseValidation {
        if response.chars().count() > MAX_RESPONSE_LEN {
            return ResponseValidation::Invalid {
                reason: "too_long".into(),
                message: format!("response too long (max {MAX_RESPONSE_LEN} characters)"),
            };
        }

        if DANGEROUS.is_match(response) {
            return ResponseValidation::Unsafe {
                reason: "dangerous_instructions".into(),
                warning: "The generated recipe contained potentially dangerous cooking \
                          instructions and was discarded."
                    .into(),
            };
        }

        if INAPPROPRIATE.is_match(response) {
            return ResponseValidation::Invalid {
                reason: "inappropriate_content".into(),
                message: "response contains inappropriate content".into(),
            };
        }

        let hallucination_hits = HALLUCINATION.matches(response).iter().count();
        if hallucination_hits >= 2 {
            return ResponseValidation::Suspicious {
                reason: format!("{hallucination_hits} hallucination markers"),
                warning: "This recipe may be inaccurate; the model expressed uncertainty."
                    .into(),
            };
        }

        if FOOD_SAFETY.is_match(response) {
            return ResponseValidation::RequiresWarning {
                response: response.to_string(),
                warning: FOOD_SAFETY_NOTICE.to_string(),
            };
        }

        ResponseValidation::Valid {
            response: response.to_string(),
        }
    }
}
