//! Daily planner
//!
//! Splits a day's macro totals into per-meal targets and generates a meal
//! for each of them.

use rand::Rng;
use serde::Serialize;

use crate::models::{GenerationResult, Overrides, Target};

use super::{GenerationError, MenuGenerator};

/// Meals a day may be split into
pub const MIN_MEALS: usize = 1;
pub const MAX_MEALS: usize = 8;

/// One planned meal: its share of the day and the generated foods
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMeal {
    pub target: Target,
    pub meal: GenerationResult,
}

/// A day of generated meals
#[derive(Debug, Clone, Serialize)]
pub struct DailyMenu {
    pub daily: Target,
    pub meals: Vec<PlannedMeal>,
}

/// Split a daily target into `meals` random shares
///
/// Each meal gets the same random proportion of all three macros, rounded to
/// whole grams (at least 1 g each); calories follow from the grams. When
/// `meals` is `None` a count of 3 to 5 is drawn.
pub fn split_daily_target<R: Rng + ?Sized>(
    daily: &Target,
    meals: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Target>, GenerationError> {
    let count = match meals {
        Some(n) if (MIN_MEALS..=MAX_MEALS).contains(&n) => n,
        Some(n) => {
            return Err(GenerationError::InvalidTarget(format!(
                "meals must be between {} and {}, got {}",
                MIN_MEALS, MAX_MEALS, n
            )))
        }
        None => rng.gen_range(3..=5),
    };

    // Keep weights away from zero so every meal gets a real share
    let weights: Vec<f64> = (0..count).map(|_| rng.gen_range(0.05..1.0)).collect();
    let sum: f64 = weights.iter().sum();

    weights
        .iter()
        .map(|w| {
            let share = w / sum;
            let grams = |total: f64| (total * share).round().max(1.0);
            Target::new(grams(daily.protein), grams(daily.carbohydrate), grams(daily.fat))
        })
        .collect()
}

impl MenuGenerator {
    /// Split a daily target and generate one meal per share
    pub fn generate_daily(&self, daily: &Target, meals: Option<usize>) -> Result<DailyMenu, GenerationError> {
        self.generate_daily_with(daily, meals, &mut rand::thread_rng())
    }

    pub fn generate_daily_with<R: Rng + ?Sized>(
        &self,
        daily: &Target,
        meals: Option<usize>,
        rng: &mut R,
    ) -> Result<DailyMenu, GenerationError> {
        let targets = split_daily_target(daily, meals, rng)?;
        let mut planned = Vec::with_capacity(targets.len());

        for target in targets {
            let meal = self.generate_one_with(&target, &Overrides::none(), rng)?;
            planned.push(PlannedMeal { target, meal });
        }

        let fallbacks = planned.iter().filter(|p| p.meal.fallback).count();
        tracing::debug!(meals = planned.len(), fallbacks, "daily menu generated");

        Ok(DailyMenu {
            daily: *daily,
            meals: planned,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_split_roughly_preserves_totals() {
        let daily = Target::new(160.0, 250.0, 70.0).unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        for meals in MIN_MEALS..=MAX_MEALS {
            let targets = split_daily_target(&daily, Some(meals), &mut rng).unwrap();
            assert_eq!(targets.len(), meals);

            let protein: f64 = targets.iter().map(|t| t.protein).sum();
            // Each meal rounds by at most half a gram (or is lifted to 1 g)
            assert!((protein - 160.0).abs() <= meals as f64);
            for t in &targets {
                assert!(t.protein >= 1.0 && t.carbohydrate >= 1.0 && t.fat >= 1.0);
                assert_eq!(t.protein, t.protein.round());
                assert_eq!(t.calories, 4.0 * t.protein + 4.0 * t.carbohydrate + 9.0 * t.fat);
            }
        }
    }

    #[test]
    fn test_default_meal_count() {
        let daily = Target::new(120.0, 200.0, 60.0).unwrap();
        let mut rng = StdRng::seed_from_u64(22);
        for _ in 0..30 {
            let n = split_daily_target(&daily, None, &mut rng).unwrap().len();
            assert!((3..=5).contains(&n));
        }
    }

    #[test]
    fn test_meal_count_bounds() {
        let daily = Target::new(120.0, 200.0, 60.0).unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        assert!(split_daily_target(&daily, Some(0), &mut rng).is_err());
        assert!(split_daily_target(&daily, Some(9), &mut rng).is_err());
    }

    #[test]
    fn test_tiny_daily_target_still_valid() {
        let daily = Target::new(2.0, 2.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(24);
        let targets = split_daily_target(&daily, Some(4), &mut rng).unwrap();
        assert!(targets.iter().all(|t| t.fat >= 1.0));
    }

    #[test]
    fn test_generate_daily() {
        let generator = MenuGenerator::builtin();
        let daily = Target::new(140.0, 220.0, 60.0).unwrap();
        let mut rng = StdRng::seed_from_u64(25);

        let menu = generator.generate_daily_with(&daily, Some(4), &mut rng).unwrap();
        assert_eq!(menu.meals.len(), 4);
        assert!(menu.meals.iter().all(|p| p.meal.is_complete()));
    }
}
