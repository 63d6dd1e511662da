//! Prompt validation and sanitization.
//!
//! Heuristic, pattern-based filtering applied before a prompt is sent to
//! the model. This is not cryptographic input control: false positives and
//! negatives are expected and acceptable. Rules run in a fixed order and
//! the first match wins, so a prompt that is both over-long and suspicious
//! is always reported as too long.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::telemetry;

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_LEN: usize = 1_000;

/// Security- and injection-flavoured keywords that have no business in a
/// baking prompt.
static SUSPICIOUS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bpassword\b",
        r"(?i)\bapi[ _-]?key\b",
        r"(?i)\bsecret\b",
        r"(?i)\btoken\b",
        r"(?i)\bcredit\s?card\b",
        r"(?i)\bssn\b",
        r"(?i)\bdrop\s+table\b",
        r"(?i)\bselect\s+.+\s+from\b",
        r"(?i)<\s*script\b",
        r"(?i)\bjavascript:",
        r"(?i)\beval\s*\(",
        r"(?i)\bexec\s*\(",
        r"(?i)\bignore\s+(all\s+)?previous\s+instructions\b",
    ])
    .expect("suspicious pattern set compiles")
});

static INAPPROPRIATE: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)\bnsfw\b",
        r"(?i)\bexplicit\b",
        r"(?i)\bporn(ographic)?\b",
        r"(?i)\bgore\b",
        r"(?i)\bviolence\b",
        r"(?i)\bweapon\b",
        r"(?i)\bdrugs?\b",
    ])
    .expect("inappropriate pattern set compiles")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex compiles"));

/// Outcome of prompt validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValidation {
    Valid { sanitized: String },
    Invalid { reason: String },
}

/// Pattern-based prompt validator. Stateless; patterns compile once.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate and sanitize a prompt. Rules in order, first match wins.
    pub fn validate(&self, input: &str) -> InputValidation {
        if input.chars().count() > MAX_PROMPT_LEN {
            return self.reject("too_long", format!("prompt too long (max {MAX_PROMPT_LEN} characters)"));
        }
        if SUSPICIOUS.is_match(input) {
            return self.reject("unsafe_input", "prompt contains unsafe content".to_string());
        }
        if INAPPROPRIATE.is_match(input) {
            return self.reject(
                "inappropriate_input",
                "prompt contains inappropriate content".to_string(),
            );
        }

        InputValidation::Valid {
            sanitized: sanitize(input),
        }
    }

    fn reject(&self, label: &'static str, reason: String) -> InputValidation {
        metrics::counter!(telemetry::INPUT_REJECTIONS_TOTAL, "reason" => label).increment(1);
        InputValidation::Invalid { reason }
    }
}

/// Trim, strip `<>"'&`, and collapse whitespace runs to single spaces.
fn sanitize(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .collect();
    WHITESPACE_RUN
        .replace_all(stripped.trim(), " ")
        .into_owned()
}
