use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::clean::{clean_nonempty, clean_value, parse_float, parse_int};
use crate::model::{Ingredient, Instruction, NutritionalInfo, Quantity, Recipe};

lazy_static! {
    // Log lines announcing one extracted recipe field. (?s) lets the value
    // run across embedded newlines to the end of the entry.
    static ref KEY_ITEM: Regex = Regex::new(
        r"(?s)^__standard__: Key item '([^']+)' extracted successfully: (.+)$"
    )
    .unwrap();
}

/// Scan the run log into a key/value map. Values are trimmed and
/// placeholder-blanked; when a key appears on several lines the last one wins.
pub fn extract_key_values(log: &[String]) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for entry in log {
        if let Some(captures) = KEY_ITEM.captures(entry) {
            values.insert(captures[1].to_string(), clean_value(&captures[2]));
        }
    }
    values
}

/// Assemble a recipe record from the extracted key/value map.
///
/// Every field is independent: a value that is missing, blank, or fails its
/// coercion is left out of the record rather than failing the whole recipe.
pub fn build_recipe(values: &HashMap<String, String>) -> Recipe {
    Recipe {
        name: string_field(values, "name"),
        description: string_field(values, "description"),
        image_url: string_field(values, "imageUrl"),
        source_url: string_field(values, "sourceUrl"),
        source_type: string_field(values, "sourceType"),
        prep_time: int_field(values, "prepTime"),
        cook_time: int_field(values, "cookTime"),
        servings: int_field(values, "servings"),
        difficulty: string_field(values, "difficulty"),
        cuisine: string_field(values, "cuisine"),
        tags: tags_field(values),
        ingredients: ingredients_field(values),
        instructions: instructions_field(values),
        nutritional_info: nutritional_field(values),
    }
}

fn string_field(values: &HashMap<String, String>, key: &str) -> Option<String> {
    values.get(key).filter(|value| !value.is_empty()).cloned()
}

fn int_field(values: &HashMap<String, String>, key: &str) -> Option<i64> {
    values
        .get(key)
        .filter(|value| !value.is_empty())
        .and_then(|value| parse_int(value))
}

/// Tag list: each element cleaned, empties dropped, whole field omitted when
/// nothing survives.
fn tags_field(values: &HashMap<String, String>) -> Option<Vec<String>> {
    let raw = values.get("tags").filter(|value| !value.is_empty())?;
    let tags: Vec<String> = serde_json::from_str(raw).ok()?;
    let cleaned: Vec<String> = tags
        .iter()
        .filter_map(|tag| clean_nonempty(tag))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn ingredients_field(values: &HashMap<String, String>) -> Option<Vec<Ingredient>> {
    let raw = values.get("ingredients").filter(|value| !value.is_empty())?;
    let ingredients: Vec<Ingredient> = serde_json::from_str(raw).ok()?;
    Some(ingredients.into_iter().map(clean_ingredient).collect())
}

fn clean_ingredient(mut ingredient: Ingredient) -> Ingredient {
    ingredient.item_id = ingredient.item_id.map(|value| clean_value(&value));
    ingredient.unit = ingredient.unit.map(|value| clean_value(&value));
    ingredient.notes = ingredient.notes.map(|value| clean_value(&value));
    ingredient.quantity = coerce_quantity(ingredient.quantity);
    ingredient
}

/// Quantity strings become numbers when they parse and the empty string when
/// they do not. Values already numeric, already empty, or absent pass through.
fn coerce_quantity(quantity: Option<Quantity>) -> Option<Quantity> {
    match quantity {
        Some(Quantity::Text(raw)) if !raw.is_empty() => {
            let cleaned = clean_value(&raw);
            if cleaned.is_empty() {
                return Some(Quantity::Text(String::new()));
            }
            Some(match cleaned.parse::<f64>() {
                Ok(number) => Quantity::Number(number),
                Err(_) => Quantity::Text(String::new()),
            })
        }
        other => other,
    }
}

fn instructions_field(values: &HashMap<String, String>) -> Option<Vec<Instruction>> {
    let raw = values
        .get("instructions")
        .filter(|value| !value.is_empty())?;
    let instructions: Vec<Instruction> = serde_json::from_str(raw).ok()?;
    Some(
        instructions
            .into_iter()
            .map(|mut step| {
                step.instruction = step.instruction.map(|value| clean_value(&value));
                step.image_url = step.image_url.map(|value| clean_value(&value));
                step
            })
            .collect(),
    )
}

/// Nutrition facts: each of the eight known fields is kept only when it
/// parses as a number strictly greater than zero; the sub-object is omitted
/// when none qualifies.
fn nutritional_field(values: &HashMap<String, String>) -> Option<NutritionalInfo> {
    let field = |key: &str| {
        values
            .get(key)
            .and_then(|value| parse_float(value))
            .filter(|number| *number > 0.0)
    };

    let info = NutritionalInfo {
        total_calories: field("totalCalories"),
        calories_per_serving: field("caloriesPerServing"),
        protein: field("protein"),
        carbs: field("carbs"),
        fat: field("fat"),
        fiber: field("fiber"),
        sugar: field("sugar"),
        sodium: field("sodium"),
    };

    (!info.is_empty()).then_some(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_item(key: &str, value: &str) -> String {
        format!("__standard__: Key item '{key}' extracted successfully: {value}")
    }

    fn recipe_from(lines: &[String]) -> Recipe {
        build_recipe(&extract_key_values(lines))
    }

    #[test]
    fn test_last_write_wins() {
        let log = vec![key_item("servings", "4"), key_item("servings", "6")];
        assert_eq!(recipe_from(&log).servings, Some(6));
    }

    #[test]
    fn test_value_spans_multiple_lines() {
        let log = vec![key_item(
            "description",
            "A rich stew.\nBest served the next day.",
        )];
        assert_eq!(
            recipe_from(&log).description.as_deref(),
            Some("A rich stew.\nBest served the next day.")
        );
    }

    #[test]
    fn test_non_matching_lines_are_ignored() {
        let log = vec![
            "__standard__: pipeline started".to_string(),
            "Key item 'name' extracted successfully: no prefix".to_string(),
        ];
        assert_eq!(recipe_from(&log), Recipe::default());
    }

    #[test]
    fn test_placeholder_values_are_omitted() {
        let log = vec![key_item("name", "Unknown"), key_item("cuisine", "N/A")];
        let recipe = recipe_from(&log);
        assert!(recipe.name.is_none());
        assert!(recipe.cuisine.is_none());
    }

    #[test]
    fn test_integer_coercion_failure_skips_field() {
        let log = vec![
            key_item("prepTime", "about an hour"),
            key_item("cookTime", "45"),
        ];
        let recipe = recipe_from(&log);
        assert!(recipe.prep_time.is_none());
        assert_eq!(recipe.cook_time, Some(45));
    }

    #[test]
    fn test_tags_cleaned_and_empties_dropped() {
        let log = vec![key_item("tags", r#"["Unknown", "spicy", ""]"#)];
        assert_eq!(recipe_from(&log).tags, Some(vec!["spicy".to_string()]));
    }

    #[test]
    fn test_tags_all_placeholders_omits_field() {
        let log = vec![key_item("tags", r#"["Unknown", "N/A"]"#)];
        assert!(recipe_from(&log).tags.is_none());
    }

    #[test]
    fn test_tags_malformed_json_omits_field() {
        let log = vec![key_item("tags", r#"["spicy""#)];
        assert!(recipe_from(&log).tags.is_none());
    }

    #[test]
    fn test_ingredient_cleaning() {
        let log = vec![key_item(
            "ingredients",
            r#"[{"itemId": " flour ", "quantity": "two", "unit": "Unknown", "notes": "sifted"}]"#,
        )];

        let ingredients = recipe_from(&log).ingredients.unwrap();
        let ingredient = &ingredients[0];

        assert_eq!(ingredient.item_id.as_deref(), Some("flour"));
        assert_eq!(ingredient.quantity, Some(Quantity::Text(String::new())));
        assert_eq!(ingredient.unit.as_deref(), Some(""));
        assert_eq!(ingredient.notes.as_deref(), Some("sifted"));
    }

    #[test]
    fn test_ingredient_quantity_parses_to_number() {
        let log = vec![key_item(
            "ingredients",
            r#"[{"itemId": "milk", "quantity": " 2.5 "}, {"itemId": "eggs", "quantity": 3}]"#,
        )];

        let ingredients = recipe_from(&log).ingredients.unwrap();
        assert_eq!(ingredients[0].quantity, Some(Quantity::Number(2.5)));
        assert_eq!(ingredients[1].quantity, Some(Quantity::Number(3.0)));
    }

    #[test]
    fn test_ingredient_empty_quantity_passes_through() {
        let log = vec![key_item(
            "ingredients",
            r#"[{"itemId": "salt", "quantity": ""}]"#,
        )];

        let ingredients = recipe_from(&log).ingredients.unwrap();
        assert_eq!(ingredients[0].quantity, Some(Quantity::Text(String::new())));
    }

    #[test]
    fn test_empty_ingredient_list_is_kept() {
        // An empty array parsed successfully still records the field.
        let log = vec![key_item("ingredients", "[]")];
        assert_eq!(recipe_from(&log).ingredients, Some(Vec::new()));
    }

    #[test]
    fn test_instruction_cleaning() {
        let log = vec![key_item(
            "instructions",
            r#"[{"instruction": " Preheat the oven. ", "imageUrl": "N/A"}]"#,
        )];

        let instructions = recipe_from(&log).instructions.unwrap();
        assert_eq!(
            instructions[0].instruction.as_deref(),
            Some("Preheat the oven.")
        );
        assert_eq!(instructions[0].image_url.as_deref(), Some(""));
    }

    #[test]
    fn test_nutritional_zero_values_are_dropped() {
        let log = vec![
            key_item("protein", "0"),
            key_item("carbs", "32.5"),
            key_item("fat", "not a number"),
        ];

        let info = recipe_from(&log).nutritional_info.unwrap();
        assert!(info.protein.is_none());
        assert_eq!(info.carbs, Some(32.5));
        assert!(info.fat.is_none());
    }

    #[test]
    fn test_nutritional_info_omitted_when_no_field_qualifies() {
        let log = vec![key_item("protein", "0"), key_item("sugar", "-1")];
        assert!(recipe_from(&log).nutritional_info.is_none());
    }

    #[test]
    fn test_full_recipe_assembly() {
        let log = vec![
            key_item("name", "Chicken Teriyaki"),
            key_item("sourceType", "youtube"),
            key_item("prepTime", "15"),
            key_item("servings", "4"),
            key_item("tags", r#"["japanese", "weeknight"]"#),
            key_item(
                "ingredients",
                r#"[{"itemId": "chicken thigh", "quantity": "500", "unit": "g"}]"#,
            ),
            key_item(
                "instructions",
                r#"[{"instruction": "Sear the chicken."}, {"instruction": "Add the sauce."}]"#,
            ),
            key_item("totalCalories", "640"),
        ];

        let recipe = recipe_from(&log);

        assert_eq!(recipe.name.as_deref(), Some("Chicken Teriyaki"));
        assert_eq!(recipe.source_type.as_deref(), Some("youtube"));
        assert_eq!(recipe.prep_time, Some(15));
        assert_eq!(recipe.servings, Some(4));
        assert_eq!(recipe.tags.as_ref().unwrap().len(), 2);
        assert_eq!(
            recipe.ingredients.as_ref().unwrap()[0].quantity,
            Some(Quantity::Number(500.0))
        );
        assert_eq!(recipe.instructions.as_ref().unwrap().len(), 2);
        assert_eq!(
            recipe.nutritional_info.as_ref().unwrap().total_calories,
            Some(640.0)
        );
    }
}
