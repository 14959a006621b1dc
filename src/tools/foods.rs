//! Food Catalog MCP Tools
//!
//! Read-only views of the nutrient catalog and compatibility graph.

use serde::Serialize;

use crate::catalog::{Catalog, CompatibilityEntry};
use crate::models::{Food, MacroCategory};

/// Summary of a food for list results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub name: String,
    /// Dominant macro, if one strictly exceeds the others
    pub category: Option<MacroCategory>,
    pub protein_per_gram: f64,
    pub carbs_per_gram: f64,
    pub fat_per_gram: f64,
    pub calories_per_gram: f64,
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            name: food.name.clone(),
            category: food.dominant_category(),
            protein_per_gram: food.protein_per_gram,
            carbs_per_gram: food.carbs_per_gram,
            fat_per_gram: food.fat_per_gram,
            calories_per_gram: food.calories_per_gram,
        }
    }
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// Full food detail with its compatibility entry
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    #[serde(flatten)]
    pub food: FoodSummary,
    /// Macros in 100 g
    pub per_100g: crate::models::Macros,
    /// Present when the food anchors a compatibility entry
    pub compatibility: Option<CompatibilityEntry>,
}

/// List catalog foods, optionally only those dominated by one macro
pub fn list_foods(catalog: &Catalog, category: Option<&str>) -> Result<ListFoodsResponse, String> {
    let foods: Vec<FoodSummary> = match category {
        Some(raw) => {
            let category = MacroCategory::parse(raw).ok_or_else(|| {
                format!("Invalid category: {}. Use protein, carbohydrate or fat", raw)
            })?;
            catalog
                .nutrients
                .filter_by_dominant_macro(category)
                .into_iter()
                .map(FoodSummary::from)
                .collect()
        }
        None => catalog.nutrients.foods().iter().map(FoodSummary::from).collect(),
    };

    let total = foods.len();
    Ok(ListFoodsResponse { foods, total })
}

/// Look up one food by name (case-insensitive)
pub fn get_food(catalog: &Catalog, name: &str) -> Result<FoodDetail, String> {
    let food = catalog
        .nutrients
        .lookup(name)
        .ok_or_else(|| format!("Food not found: {}", name))?;

    Ok(FoodDetail {
        food: FoodSummary::from(food),
        per_100g: food.macros_for(100.0).rounded(),
        compatibility: catalog.compatibility.entry(&food.name).cloned(),
    })
}
