//! Tests for the heuristic [`RecipeParser`].

use bakelens::{Difficulty, RecipeParser, RecipeSource};

const FULL_RECIPE: &str = "\
Classic Chocolate Chip Cookies

An easy crowd-pleaser.

Ingredients:
- 2 cups flour
- 1 cup sugar
- 150 grams butter
- 1 tsp vanilla extract

Instructions:
1. Preheat the oven to 180C.
2. Mix the butter and sugar until fluffy.
3. Fold in the flour and bake for 12 minutes.

Prep time: 15 minutes
Cook time: 12 minutes
Serves 4 people";

// =========================================================================
// Structured extraction
// =========================================================================

#[test]
fn extracts_title_with_baked_goods_keyword() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert_eq!(recipe.title, "Classic Chocolate Chip Cookies");
}

#[test]
fn extracts_ingredients_by_units_and_bullets() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert_eq!(recipe.ingredients.len(), 4);
    assert!(recipe.ingredients.contains(&"2 cups flour".to_string()));
    assert!(recipe.ingredients.contains(&"1 tsp vanilla extract".to_string()));
}

#[test]
fn extracts_instructions_by_action_words() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert!(recipe.instructions.len() >= 3);
    assert!(recipe.instructions.iter().any(|i| i.contains("Preheat")));
    assert!(recipe.instructions.iter().any(|i| i.contains("Fold in")));
}

#[test]
fn extracts_prep_and_cook_times() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert_eq!(recipe.prep_time.as_deref(), Some("15 minutes"));
    assert_eq!(recipe.cook_time.as_deref(), Some("12 minutes"));
}

#[test]
fn extracts_servings() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert_eq!(recipe.servings.as_deref(), Some("4 people"));
}

#[test]
fn infers_difficulty_from_keywords() {
    let parser = RecipeParser::new();
    assert_eq!(
        parser.parse(FULL_RECIPE, "h").difficulty,
        Difficulty::Beginner
    );
    assert_eq!(
        parser
            .parse("A challenging croissant lamination project", "h")
            .difficulty,
        Difficulty::Advanced
    );
    assert_eq!(
        parser.parse("some cake text", "h").difficulty,
        Difficulty::Unknown
    );
}

#[test]
fn assigns_tags_from_fixed_vocabulary() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert!(recipe.tags.contains(&"chocolate".to_string()));
    assert!(recipe.tags.contains(&"vanilla".to_string()));
    assert!(!recipe.tags.contains(&"vegan".to_string()));
}

// =========================================================================
// Metadata and fallbacks
// =========================================================================

#[test]
fn carries_image_hash_and_source() {
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "abc123");
    assert_eq!(recipe.image_hash.as_deref(), Some("abc123"));
    assert_eq!(recipe.source, RecipeSource::AiGenerated);
    assert!(!recipe.id.is_empty());
}

#[test]
fn generated_ids_are_unique() {
    let parser = RecipeParser::new();
    let a = parser.parse(FULL_RECIPE, "h");
    let b = parser.parse(FULL_RECIPE, "h");
    assert_ne!(a.id, b.id);
}

#[test]
fn unstructured_text_gets_fallback_title() {
    let recipe = RecipeParser::new().parse(
        "a very long rambling paragraph about nothing in particular that goes on and on \
         without ever naming a dish or listing anything that resembles structure at all",
        "h",
    );
    assert_eq!(recipe.title, "Recipe Analysis");
}

// =========================================================================
// Confidence scoring
// =========================================================================

#[test]
fn rich_extraction_scores_full_confidence() {
    // Title + 4 ingredients + 3 instructions: 0.3+0.3+0.2+0.1+0.1 = 1.0
    let recipe = RecipeParser::new().parse(FULL_RECIPE, "h1");
    assert!(recipe.confidence > 0.99, "scored {}", recipe.confidence);
}

#[test]
fn sparse_extraction_scores_low_confidence() {
    let recipe = RecipeParser::new().parse("It appears to be a muffin.", "h");
    // Title only.
    assert!((recipe.confidence - 0.2).abs() < f32::EPSILON);
}

#[test]
fn confidence_stays_in_bounds() {
    for text in ["", FULL_RECIPE, "2 cups flour", "mix mix mix"] {
        let c = RecipeParser::new().parse(text, "h").confidence;
        assert!((0.0..=1.0).contains(&c), "text {text:?} scored {c}");
    }
}
