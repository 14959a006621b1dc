//! Meal Generation MCP Tools
//!
//! Thin wrappers that validate caller input and run the generator.

use serde::Serialize;

use crate::engine::{DailyMenu, MenuGenerator};
use crate::models::{GenerationResult, Overrides, Target, TargetInput};

/// Most meals one generate_meals call may ask for
pub const MAX_MEALS_PER_REQUEST: usize = 20;

/// Response for generate_meal
#[derive(Debug, Serialize)]
pub struct GenerateMealResponse {
    pub target: Target,
    #[serde(flatten)]
    pub meal: GenerationResult,
}

/// Response for generate_meals
#[derive(Debug, Serialize)]
pub struct GenerateMealsResponse {
    pub target: Target,
    pub meals: Vec<GenerationResult>,
    pub fallbacks: usize,
}

/// Generate one meal for a target, honoring overrides
pub fn generate_meal(
    generator: &MenuGenerator,
    target: TargetInput,
    overrides: Option<Overrides>,
) -> Result<GenerateMealResponse, String> {
    let target = Target::try_from(target).map_err(|e| e.to_string())?;
    let overrides = overrides.unwrap_or_default();

    let meal = generator
        .generate_one(&target, &overrides)
        .map_err(|e| e.to_string())?;

    Ok(GenerateMealResponse { target, meal })
}

/// Generate several independent meals for the same target
pub fn generate_meals(
    generator: &MenuGenerator,
    count: usize,
    target: TargetInput,
    overrides: Option<Overrides>,
) -> Result<GenerateMealsResponse, String> {
    if count == 0 || count > MAX_MEALS_PER_REQUEST {
        return Err(format!(
            "count must be between 1 and {}, got {}",
            MAX_MEALS_PER_REQUEST, count
        ));
    }

    let target = Target::try_from(target).map_err(|e| e.to_string())?;
    let overrides = overrides.unwrap_or_default();

    let meals = generator
        .generate_many(count, &target, &overrides)
        .map_err(|e| e.to_string())?;
    let fallbacks = meals.iter().filter(|m| m.fallback).count();

    Ok(GenerateMealsResponse {
        target,
        meals,
        fallbacks,
    })
}

/// Split a daily target across meals and generate each one
pub fn generate_daily_menu(
    generator: &MenuGenerator,
    daily: TargetInput,
    meals: Option<usize>,
) -> Result<DailyMenu, String> {
    let daily = Target::try_from(daily).map_err(|e| e.to_string())?;
    generator.generate_daily(&daily, meals).map_err(|e| e.to_string())
}
