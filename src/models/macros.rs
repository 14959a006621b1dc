//! Shared macro-nutrient data structure
//!
//! Used for per-gram coefficients, selected item contributions and running
//! totals.

use serde::{Deserialize, Serialize};

/// Calories per gram of protein
pub const KCAL_PER_PROTEIN: f64 = 4.0;
/// Calories per gram of carbohydrate
pub const KCAL_PER_CARB: f64 = 4.0;
/// Calories per gram of fat
pub const KCAL_PER_FAT: f64 = 9.0;

/// Protein, carbohydrate, fat (grams) and calories (kcal)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl Macros {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build macros whose calories follow the 4/4/9 rule
    pub fn from_grams(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
            calories: atwater_calories(protein, carbs, fat),
        }
    }

    /// Scale every value by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            calories: self.calories * multiplier,
        }
    }

    pub fn add(&self, other: &Macros) -> Self {
        Self {
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            calories: self.calories + other.calories,
        }
    }

    pub fn sub(&self, other: &Macros) -> Self {
        Self {
            protein: self.protein - other.protein,
            carbs: self.carbs - other.carbs,
            fat: self.fat - other.fat,
            calories: self.calories - other.calories,
        }
    }

    /// Round every value to two decimals for presentation
    pub fn rounded(&self) -> Self {
        Self {
            protein: round2(self.protein),
            carbs: round2(self.carbs),
            fat: round2(self.fat),
            calories: round2(self.calories),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Sub for Macros {
    type Output = Macros;

    fn sub(self, other: Macros) -> Macros {
        Macros::sub(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

/// Calories implied by macro grams (4 / 4 / 9 kcal per gram)
pub fn atwater_calories(protein: f64, carbs: f64, fat: f64) -> f64 {
    protein * KCAL_PER_PROTEIN + carbs * KCAL_PER_CARB + fat * KCAL_PER_FAT
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grams_derives_calories() {
        let m = Macros::from_grams(40.0, 70.0, 20.0);
        assert_eq!(m.calories, 620.0);
    }

    #[test]
    fn test_sum_and_scale() {
        let a = Macros::from_grams(1.0, 2.0, 3.0);
        let b = Macros::from_grams(4.0, 5.0, 6.0);
        let total: Macros = vec![a, b].into_iter().sum();
        assert_eq!(total.protein, 5.0);
        assert_eq!(total.fat, 9.0);

        let doubled = a * 2.0;
        assert_eq!(doubled.carbs, 4.0);
        assert_eq!((b - a).protein, 3.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(96.774193), 96.77);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(141.8439), 141.84);
    }
}
