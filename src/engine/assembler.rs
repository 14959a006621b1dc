//! Menu assembler
//!
//! Entry point of the engine: validates the request, retries whole attempts
//! and falls back to a fixed safe meal when they are exhausted.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::models::{
    names_match, round2, GenerationResult, MacroCategory, Macros, NamedQuantity, Overrides, Target,
};

use super::config::EngineConfig;
use super::controller::run_attempt;
use super::GenerationError;

/// Most overrides accepted for a single category
pub const MAX_OVERRIDES_PER_CATEGORY: usize = 4;

/// Generates meals against a shared read-only catalog
///
/// Cheap to clone and safe to share between threads; every call keeps its
/// working state on its own stack.
#[derive(Debug, Clone)]
pub struct MenuGenerator {
    catalog: Arc<Catalog>,
    config: EngineConfig,
}

impl MenuGenerator {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Built-in catalog with default tuning
    pub fn builtin() -> Self {
        Self::new(Arc::new(Catalog::builtin()), EngineConfig::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate one meal using the thread-local random generator
    pub fn generate_one(&self, target: &Target, overrides: &Overrides) -> Result<GenerationResult, GenerationError> {
        self.generate_one_with(target, overrides, &mut rand::thread_rng())
    }

    /// Generate one meal, retrying whole attempts up to the configured ceiling
    pub fn generate_one_with<R: Rng + ?Sized>(
        &self,
        target: &Target,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<GenerationResult, GenerationError> {
        self.validate_overrides(overrides)?;

        for attempt in 1..=self.config.max_attempts {
            match run_attempt(&self.catalog, &self.config, target, overrides, rng) {
                Ok(result) => {
                    tracing::debug!(attempt, totals = ?result.totals, "meal generated");
                    return Ok(result);
                }
                Err(failure) => {
                    tracing::debug!(attempt, %failure, "attempt failed");
                }
            }
        }

        tracing::warn!(
            attempts = self.config.max_attempts,
            protein = target.protein,
            carbohydrate = target.carbohydrate,
            fat = target.fat,
            "attempts exhausted, returning fallback meal"
        );
        Ok(self.fallback_meal())
    }

    /// Generate `count` independent meals for the same target
    pub fn generate_many(
        &self,
        count: usize,
        target: &Target,
        overrides: &Overrides,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        self.generate_many_with(count, target, overrides, &mut rand::thread_rng())
    }

    pub fn generate_many_with<R: Rng + ?Sized>(
        &self,
        count: usize,
        target: &Target,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<Vec<GenerationResult>, GenerationError> {
        (0..count)
            .map(|_| self.generate_one_with(target, overrides, rng))
            .collect()
    }

    /// The fixed safe meal, flagged as a fallback
    pub fn fallback_meal(&self) -> GenerationResult {
        let mut result = GenerationResult {
            proteins: Vec::new(),
            carbohydrates: Vec::new(),
            fats: Vec::new(),
            totals: Macros::zero(),
            fallback: true,
        };

        let mut totals = Macros::zero();
        for (food, category, grams) in self.config.fallback.lines() {
            let named = NamedQuantity {
                name: food.name.clone(),
                quantity: round2(grams),
            };
            totals = totals + food.macros_for(named.quantity);
            match category {
                MacroCategory::Protein => result.proteins.push(named),
                MacroCategory::Carbohydrate => result.carbohydrates.push(named),
                MacroCategory::Fat => result.fats.push(named),
            }
        }

        result.totals = totals.rounded();
        result
    }

    /// Reject overrides the engine cannot honor
    pub fn validate_overrides(&self, overrides: &Overrides) -> Result<(), GenerationError> {
        for category in MacroCategory::ALL {
            let items = overrides.for_category(category);
            if items.len() > MAX_OVERRIDES_PER_CATEGORY {
                return Err(GenerationError::InvalidOverride(format!(
                    "at most {} {} overrides are allowed, got {}",
                    MAX_OVERRIDES_PER_CATEGORY,
                    category,
                    items.len()
                )));
            }

            for (i, item) in items.iter().enumerate() {
                let food = self.catalog.nutrients.lookup(&item.name).ok_or_else(|| {
                    GenerationError::InvalidOverride(format!("food not in catalog: {}", item.name))
                })?;

                if food.coefficient(category) <= 0.0 {
                    return Err(GenerationError::InvalidOverride(format!(
                        "{} has no {} and cannot be used as a {} source",
                        food.name, category, category
                    )));
                }

                if let Some(quantity) = item.quantity {
                    if !quantity.is_finite() || quantity < 0.0 {
                        return Err(GenerationError::InvalidOverride(format!(
                            "quantity for {} must be a non-negative number",
                            item.name
                        )));
                    }
                }

                if items[..i].iter().any(|other| names_match(&other.name, &item.name)) {
                    return Err(GenerationError::InvalidOverride(format!(
                        "{} is listed twice under {}",
                        item.name, category
                    )));
                }
            }
        }
        Ok(())
    }
}
