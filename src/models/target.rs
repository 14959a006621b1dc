//! Macro target model
//!
//! What the caller asks one meal to contain.

use serde::{Deserialize, Serialize};

use super::macros::atwater_calories;
use super::MacroCategory;
use crate::engine::GenerationError;

/// Unvalidated target as received from callers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetInput {
    pub protein: Option<f64>,
    pub carbohydrate: Option<f64>,
    pub fat: Option<f64>,
    /// Ignored for generation; calories are always derived from the macros
    #[serde(default)]
    pub calories: Option<f64>,
}

/// A validated macro target; calories always equal 4P + 4C + 9G
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub protein: f64,
    pub carbohydrate: f64,
    pub fat: f64,
    pub calories: f64,
}

impl Target {
    pub fn new(protein: f64, carbohydrate: f64, fat: f64) -> Result<Self, GenerationError> {
        check_macro("protein", protein)?;
        check_macro("carbohydrate", carbohydrate)?;
        check_macro("fat", fat)?;
        Ok(Self {
            protein,
            carbohydrate,
            fat,
            calories: atwater_calories(protein, carbohydrate, fat),
        })
    }

    /// Grams wanted for a category's macro
    pub fn grams(&self, category: MacroCategory) -> f64 {
        match category {
            MacroCategory::Protein => self.protein,
            MacroCategory::Carbohydrate => self.carbohydrate,
            MacroCategory::Fat => self.fat,
        }
    }
}

impl TryFrom<TargetInput> for Target {
    type Error = GenerationError;

    fn try_from(input: TargetInput) -> Result<Self, Self::Error> {
        let protein = input.protein.ok_or_else(|| missing("protein"))?;
        let carbohydrate = input.carbohydrate.ok_or_else(|| missing("carbohydrate"))?;
        let fat = input.fat.ok_or_else(|| missing("fat"))?;
        let target = Target::new(protein, carbohydrate, fat)?;

        if let Some(given) = input.calories {
            if (given - target.calories).abs() > 1.0 {
                tracing::debug!(
                    given,
                    derived = target.calories,
                    "caller calories differ from derived calories, using derived"
                );
            }
        }
        Ok(target)
    }
}

fn missing(field: &str) -> GenerationError {
    GenerationError::InvalidTarget(format!("{} is required", field))
}

fn check_macro(field: &str, value: f64) -> Result<(), GenerationError> {
    if !value.is_finite() {
        return Err(GenerationError::InvalidTarget(format!("{} must be a finite number", field)));
    }
    if value <= 0.0 {
        return Err(GenerationError::InvalidTarget(format!(
            "{} must be greater than 0, got {}",
            field, value
        )));
    }
    Ok(())
}
