//! Engine configuration
//!
//! Tolerances, attempt ceilings and the safe fallback meal.

use crate::models::{Food, MacroCategory, Macros};

/// Outer attempt ceiling override
pub const MAX_ATTEMPTS_ENV: &str = "MACROMENU_MAX_ATTEMPTS";

/// Allowed absolute deviation of the final totals from the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub protein: f64,
    pub carbohydrate: f64,
    pub fat: f64,
    pub calories: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            protein: 3.0,
            carbohydrate: 1.5,
            fat: 1.5,
            calories: 6.0,
        }
    }
}

impl Tolerances {
    pub fn for_category(&self, category: MacroCategory) -> f64 {
        match category {
            MacroCategory::Protein => self.protein,
            MacroCategory::Carbohydrate => self.carbohydrate,
            MacroCategory::Fat => self.fat,
        }
    }
}

/// The meal returned when every attempt fails
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackMeal {
    pub protein: Food,
    pub carbohydrate: Food,
    pub fat: Food,
    /// Grams of protein, carbohydrate and fat the meal is sized for
    pub sized_for: Macros,
}

impl Default for FallbackMeal {
    fn default() -> Self {
        Self {
            protein: Food::new("Pechuga de pollo", 0.31, 0.0, 0.036, 1.56),
            carbohydrate: Food::new("Arroz", 0.027, 0.282, 0.003, 1.26),
            fat: Food::new("Aceite de Oliva", 0.0, 0.0, 1.0, 9.0),
            sized_for: Macros::from_grams(30.0, 40.0, 10.0),
        }
    }
}

impl FallbackMeal {
    /// (food, category, grams) for each line of the meal
    pub fn lines(&self) -> [(&Food, MacroCategory, f64); 3] {
        let [protein, carbohydrate, fat] = self.grams();
        [
            (&self.protein, MacroCategory::Protein, protein),
            (&self.carbohydrate, MacroCategory::Carbohydrate, carbohydrate),
            (&self.fat, MacroCategory::Fat, fat),
        ]
    }

    /// Grams of each food so the combined totals equal `sized_for`
    ///
    /// Every food counts toward all three macros, so the quantities come from
    /// solving the 3x3 system. When it has no non-negative solution each food
    /// is sized for its own macro alone.
    fn grams(&self) -> [f64; 3] {
        let foods = [&self.protein, &self.carbohydrate, &self.fat];
        let column = |food: &Food| MacroCategory::ALL.map(|category| food.coefficient(category));
        let matrix = foods.map(column);
        let wanted = MacroCategory::ALL.map(|category| category.of(&self.sized_for));

        let det = determinant(matrix);
        if det.abs() > 1e-9 {
            let solved: [f64; 3] = std::array::from_fn(|i| {
                let mut replaced = matrix;
                replaced[i] = wanted;
                determinant(replaced) / det
            });
            if solved.iter().all(|grams| grams.is_finite() && *grams >= 0.0) {
                return solved;
            }
        }

        std::array::from_fn(|i| {
            let category = MacroCategory::ALL[i];
            let coefficient = foods[i].coefficient(category);
            if coefficient > 0.0 {
                wanted[i] / coefficient
            } else {
                0.0
            }
        })
    }
}

/// Determinant of three columns
fn determinant(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2]) - m[1][0] * (m[0][1] * m[2][2] - m[2][1] * m[0][2])
        + m[2][0] * (m[0][1] * m[1][2] - m[1][1] * m[0][2])
}

/// Generator tuning
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub tolerances: Tolerances,
    /// Full pipeline runs before the fallback meal is used
    pub max_attempts: u32,
    pub protein_ceiling: u32,
    /// Protein ceiling when three proteins were chosen
    pub protein_ceiling_three: u32,
    pub carb_ceiling: u32,
    /// Carbohydrate ceiling when three or four carbohydrates were chosen
    pub carb_ceiling_many: u32,
    /// A phase only runs with more than this many grams left to allocate
    pub min_phase_budget: f64,
    pub correction_sweeps: u32,
    /// Residual (grams) at which the correction stops early
    pub correction_epsilon: f64,
    pub fallback: FallbackMeal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_attempts: 8,
            protein_ceiling: 5,
            protein_ceiling_three: 10,
            carb_ceiling: 5,
            carb_ceiling_many: 6,
            min_phase_budget: 0.5,
            correction_sweeps: 12,
            correction_epsilon: 0.05,
            fallback: FallbackMeal::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults with `MACROMENU_MAX_ATTEMPTS` applied when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_ATTEMPTS_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(n) => config.max_attempts = n,
                Err(_) => tracing::warn!(
                    value = %raw,
                    default = config.max_attempts,
                    "ignoring invalid {}",
                    MAX_ATTEMPTS_ENV
                ),
            }
        }
        config
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// How many tries a phase gets, given how many foods the last try chose
    pub fn phase_ceiling(&self, category: MacroCategory, chosen: usize) -> u32 {
        match category {
            MacroCategory::Protein if chosen >= 3 => self.protein_ceiling_three,
            MacroCategory::Protein => self.protein_ceiling,
            MacroCategory::Carbohydrate if chosen >= 3 => self.carb_ceiling_many,
            MacroCategory::Carbohydrate => self.carb_ceiling,
            MacroCategory::Fat => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_lines_hit_sizing() {
        let fallback = FallbackMeal::default();
        let lines = fallback.lines();
        assert!((lines[0].2 - 84.420).abs() < 0.001);
        assert!((lines[1].2 - 141.844).abs() < 0.001);
        assert!((lines[2].2 - 6.535).abs() < 0.001);

        let totals = lines
            .iter()
            .fold(Macros::zero(), |acc, (food, _, grams)| acc + food.macros_for(*grams));
        assert!((totals.protein - 30.0).abs() < 1e-9);
        assert!((totals.carbs - 40.0).abs() < 1e-9);
        assert!((totals.fat - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_without_solution_sizes_each_food_alone() {
        let same = Food::new("Pechuga de pollo", 0.31, 0.0, 0.036, 1.56);
        let fallback = FallbackMeal {
            protein: same.clone(),
            carbohydrate: same.clone(),
            fat: same,
            sized_for: Macros::from_grams(31.0, 40.0, 3.6),
        };
        let lines = fallback.lines();
        assert!((lines[0].2 - 100.0).abs() < 1e-9);
        assert_eq!(lines[1].2, 0.0);
        assert!((lines[2].2 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_ceilings() {
        let config = EngineConfig::default();
        assert_eq!(config.phase_ceiling(MacroCategory::Protein, 2), 5);
        assert_eq!(config.phase_ceiling(MacroCategory::Protein, 3), 10);
        assert_eq!(config.phase_ceiling(MacroCategory::Carbohydrate, 1), 5);
        assert_eq!(config.phase_ceiling(MacroCategory::Carbohydrate, 4), 6);
        assert_eq!(config.phase_ceiling(MacroCategory::Fat, 2), 1);
    }

    #[test]
    fn test_with_max_attempts() {
        let config = EngineConfig::default().with_max_attempts(0);
        assert_eq!(config.max_attempts, 0);
        assert_eq!(config.tolerances.fat, 1.5);
    }
}
