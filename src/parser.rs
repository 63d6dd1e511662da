//! Heuristic recipe extraction from free-form model text.
//!
//! Line-oriented, best-effort structure recovery: there is no guarantee
//! the model emitted a well-formed recipe, so every field is extracted
//! independently and the result carries a confidence score derived from
//! how much structure was actually found. The output exists to make
//! responses cacheable and searchable, not to be authoritative.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::types::{Difficulty, Recipe, RecipeSource};

/// Title used when no plausible title line is found.
pub const FALLBACK_TITLE: &str = "Recipe Analysis";

const BAKED_GOODS: &[&str] = &[
    "cake", "bread", "cookie", "muffin", "pie", "pastry", "brownie", "croissant", "tart",
    "scone", "cupcake", "donut", "doughnut", "bagel", "biscuit", "loaf", "roll",
];

const UNIT_WORDS: &[&str] = &[
    "cup", "cups", "tablespoon", "tablespoons", "tbsp", "teaspoon", "teaspoons", "tsp",
    "gram", "grams", "g", "ounce", "ounces", "oz", "pound", "lb", "ml", "liter", "litre",
];

const ACTION_WORDS: &[&str] = &[
    "step", "mix", "stir", "whisk", "bake", "preheat", "fold", "combine", "knead", "pour",
    "beat", "cream", "cool", "frost",
];

const TAG_VOCAB: &[&str] = &[
    "sweet", "savory", "chocolate", "vanilla", "fruit", "nuts", "gluten-free", "vegan",
    "vegetarian",
];

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(minutes?|mins?|hours?|hrs?)").expect("time regex compiles"));

static SERVINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(servings?|portions?|people)").expect("servings regex compiles"));

/// Heuristic recipe parser. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeParser;

impl RecipeParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract a [`Recipe`] from raw model text.
    ///
    /// Never fails: missing structure just lowers the confidence score.
    pub fn parse(&self, raw_text: &str, image_hash: &str) -> Recipe {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let lower = raw_text.to_lowercase();

        let title = extract_title(&lines);
        let ingredients = extract_ingredients(&lines);
        let instructions = extract_instructions(&lines);
        let (prep_time, cook_time) = extract_times(&lines);
        let servings = SERVINGS_RE
            .captures(raw_text)
            .map(|c| c[0].trim().to_string());
        let difficulty = infer_difficulty(&lower);
        let tags: Vec<String> = TAG_VOCAB
            .iter()
            .filter(|t| lower.contains(*t))
            .map(|t| t.to_string())
            .collect();

        let confidence = score_confidence(&title, &ingredients, &instructions);

        Recipe {
            id: Uuid::new_v4().to_string(),
            title,
            description: lines.first().map(|l| l.to_string()).unwrap_or_default(),
            ingredients,
            instructions,
            prep_time,
            cook_time,
            servings,
            difficulty,
            tags,
            warnings: Vec::new(),
            source: RecipeSource::AiGenerated,
            confidence,
            created_at: Utc::now(),
            image_hash: Some(image_hash.to_string()),
        }
    }
}

/// First line naming a baked good, else the first line shorter than 50
/// characters, else the fallback title.
fn extract_title(lines: &[&str]) -> String {
    lines
        .iter()
        .find(|l| {
            let lower = l.to_lowercase();
            BAKED_GOODS.iter().any(|k| lower.contains(k))
        })
        .or_else(|| lines.iter().find(|l| l.chars().count() < 50))
        .map(|l| l.trim_start_matches(['#', '*', ' ']).to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Lines that look like ingredient entries: bullet/number prefixed or
/// mentioning a measurement unit, and not reading like a step.
fn extract_ingredients(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| {
            let starts_listy = l.starts_with(|c: char| c.is_ascii_digit())
                || l.starts_with('-')
                || l.starts_with('*')
                || l.starts_with('•');
            let has_unit = contains_word(l, UNIT_WORDS);
            (starts_listy || has_unit) && !contains_word(l, ACTION_WORDS)
        })
        .map(|l| clean_list_marker(l))
        .collect()
}

/// Lines containing an action/step word.
fn extract_instructions(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| contains_word(l, ACTION_WORDS))
        .map(|l| clean_list_marker(l))
        .collect()
}

fn contains_word(line: &str, vocab: &[&str]) -> bool {
    line.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| vocab.contains(&w))
}

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s*").expect("step marker regex compiles"));

/// Strip bullet prefixes and "1." / "2)" step markers; leave bare
/// quantities ("2 cups flour") intact.
fn clean_list_marker(line: &str) -> String {
    let s = line.trim_start_matches(['-', '*', '•']).trim_start();
    STEP_MARKER.replace(s, "").trim().to_string()
}

/// Prep time from lines mentioning "prep", cook time from lines mentioning
/// "cook" or "bake".
fn extract_times(lines: &[&str]) -> (Option<String>, Option<String>) {
    let mut prep = None;
    let mut cook = None;
    for line in lines {
        let lower = line.to_lowercase();
        if let Some(m) = TIME_RE.captures(line) {
            let value = m[0].trim().to_string();
            if prep.is_none() && lower.contains("prep") {
                prep = Some(value);
            } else if cook.is_none() && (lower.contains("cook") || lower.contains("bake")) {
                cook = Some(value);
            }
        }
    }
    (prep, cook)
}

fn infer_difficulty(lower: &str) -> Difficulty {
    if ["easy", "simple", "beginner", "basic"].iter().any(|k| lower.contains(k)) {
        Difficulty::Beginner
    } else if ["intermediate", "moderate", "medium difficulty"].iter().any(|k| lower.contains(k)) {
        Difficulty::Intermediate
    } else if ["advanced", "difficult", "challenging", "expert"].iter().any(|k| lower.contains(k)) {
        Difficulty::Advanced
    } else {
        Difficulty::Unknown
    }
}

/// Deterministic extraction-richness score, clamped to `[0, 1]`:
/// non-empty ingredients +0.3, non-empty instructions +0.3, real title
/// +0.2, ≥3 ingredients +0.1, ≥2 instructions +0.1.
fn score_confidence(title: &str, ingredients: &[String], instructions: &[String]) -> f32 {
    let mut score: f32 = 0.0;
    if !ingredients.is_empty() {
        score += 0.3;
    }
    if !instructions.is_empty() {
        score += 0.3;
    }
    if title != FALLBACK_TITLE {
        score += 0.2;
    }
    if ingredients.len() >= 3 {
        score += 0.1;
    }
    if instructions.len() >= 2 {
        score += 0.1;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_empty_text() {
        let recipe = RecipeParser::new().parse("", "hash");
        assert_eq!(recipe.title, FALLBACK_TITLE);
        assert_eq!(recipe.confidence, 0.0);
    }

    #[test]
    fn confidence_always_in_bounds() {
        let texts = [
            "",
            "Chocolate Cake\n2 cups flour\n1 cup sugar\n3 eggs\nMix well.\nBake for 30 minutes.",
            "just some words with no structure at all",
        ];
        for text in texts {
            let recipe = RecipeParser::new().parse(text, "h");
            assert!((0.0..=1.0).contains(&recipe.confidence), "text: {text:?}");
        }
    }

    #[test]
    fn clean_list_marker_variants() {
        assert_eq!(clean_list_marker("- 2 cups flour"), "2 cups flour");
        assert_eq!(clean_list_marker("1. Mix the batter"), "Mix the batter");
        assert_eq!(clean_list_marker("* 1 tsp vanilla"), "1 tsp vanilla");
    }
}
