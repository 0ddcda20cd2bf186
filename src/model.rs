use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document derived from a receipt run: one store plus the items bought there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedDocument {
    pub store: Value,
    pub items: Vec<Value>,
}

/// Ingredient quantity after coercion: a number when the upstream value
/// parsed, the empty string when it did not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

/// One recipe ingredient. Keys the pipeline emits beyond the known ones are
/// kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "itemId", default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One preparation step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Nutrition facts for a recipe. Only strictly positive values are recorded;
/// zero means the pipeline had no real figure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionalInfo {
    #[serde(rename = "totalCalories", default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
    #[serde(
        rename = "caloriesPerServing",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub calories_per_serving: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}

impl NutritionalInfo {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.total_calories.is_none()
            && self.calories_per_serving.is_none()
            && self.protein.is_none()
            && self.carbs.is_none()
            && self.fat.is_none()
            && self.fiber.is_none()
            && self.sugar.is_none()
            && self.sodium.is_none()
    }
}

/// Recipe assembled from a run log. Every field is optional: absence means
/// the pipeline produced no usable value for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "sourceUrl", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(rename = "sourceType", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(rename = "prepTime", default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<i64>,
    #[serde(rename = "cookTime", default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<Instruction>>,
    #[serde(
        rename = "nutritionalInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nutritional_info: Option<NutritionalInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recipe_serializes_to_empty_object() {
        let recipe = Recipe::default();
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_quantity_deserializes_numbers_and_strings() {
        let number: Quantity = serde_json::from_value(serde_json::json!(2)).unwrap();
        assert_eq!(number, Quantity::Number(2.0));

        let text: Quantity = serde_json::from_value(serde_json::json!("two")).unwrap();
        assert_eq!(text, Quantity::Text("two".to_string()));
    }

    #[test]
    fn test_ingredient_preserves_unknown_keys() {
        let ingredient: Ingredient = serde_json::from_str(
            r#"{"itemId": "flour", "quantity": 2, "aisle": "baking"}"#,
        )
        .unwrap();

        assert_eq!(ingredient.item_id.as_deref(), Some("flour"));
        assert_eq!(ingredient.extra.get("aisle").unwrap(), "baking");

        let round_trip = serde_json::to_value(&ingredient).unwrap();
        assert_eq!(round_trip.get("aisle").unwrap(), "baking");
    }

    #[test]
    fn test_nutritional_info_is_empty() {
        assert!(NutritionalInfo::default().is_empty());
        let info = NutritionalInfo {
            protein: Some(12.0),
            ..Default::default()
        };
        assert!(!info.is_empty());
    }
}
