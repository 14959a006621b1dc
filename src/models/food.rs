//! Food model
//!
//! A catalog entry with per-gram macro coefficients.

use serde::{Deserialize, Serialize};

use super::Macros;

/// Macro category a food is selected for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroCategory {
    Protein,
    Carbohydrate,
    Fat,
}

impl MacroCategory {
    pub const ALL: [MacroCategory; 3] = [
        MacroCategory::Protein,
        MacroCategory::Carbohydrate,
        MacroCategory::Fat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroCategory::Protein => "protein",
            MacroCategory::Carbohydrate => "carbohydrate",
            MacroCategory::Fat => "fat",
        }
    }

    /// Parse a category name, accepting the common short forms
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "protein" | "proteins" => Some(MacroCategory::Protein),
            "carbohydrate" | "carbohydrates" | "carb" | "carbs" => Some(MacroCategory::Carbohydrate),
            "fat" | "fats" => Some(MacroCategory::Fat),
            _ => None,
        }
    }

    /// Read this category's macro out of a macro tuple
    pub fn of(&self, macros: &Macros) -> f64 {
        match self {
            MacroCategory::Protein => macros.protein,
            MacroCategory::Carbohydrate => macros.carbs,
            MacroCategory::Fat => macros.fat,
        }
    }
}

impl std::fmt::Display for MacroCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A food with macro coefficients per gram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub name: String,
    pub protein_per_gram: f64,
    pub carbs_per_gram: f64,
    pub fat_per_gram: f64,
    /// Empirical, not necessarily 4P+4C+9G
    pub calories_per_gram: f64,
}

impl Food {
    pub fn new(name: &str, protein: f64, carbs: f64, fat: f64, calories: f64) -> Self {
        Self {
            name: name.to_string(),
            protein_per_gram: protein,
            carbs_per_gram: carbs,
            fat_per_gram: fat,
            calories_per_gram: calories,
        }
    }

    /// Per-gram coefficient for a category's macro
    pub fn coefficient(&self, category: MacroCategory) -> f64 {
        match category {
            MacroCategory::Protein => self.protein_per_gram,
            MacroCategory::Carbohydrate => self.carbs_per_gram,
            MacroCategory::Fat => self.fat_per_gram,
        }
    }

    /// The category whose coefficient strictly exceeds the other two
    pub fn dominant_category(&self) -> Option<MacroCategory> {
        let (p, c, f) = (self.protein_per_gram, self.carbs_per_gram, self.fat_per_gram);
        if p > c && p > f {
            Some(MacroCategory::Protein)
        } else if c > p && c > f {
            Some(MacroCategory::Carbohydrate)
        } else if f > p && f > c {
            Some(MacroCategory::Fat)
        } else {
            None
        }
    }

    /// Per-gram coefficients as a macro tuple
    pub fn per_gram(&self) -> Macros {
        Macros {
            protein: self.protein_per_gram,
            carbs: self.carbs_per_gram,
            fat: self.fat_per_gram,
            calories: self.calories_per_gram,
        }
    }

    /// Absolute macros for a quantity in grams
    pub fn macros_for(&self, grams: f64) -> Macros {
        self.per_gram().scale(grams)
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// Case-insensitive, whitespace-trimmed name equality
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_category() {
        let chicken = Food::new("Pechuga de pollo", 0.31, 0.0, 0.036, 1.56);
        let rice = Food::new("Arroz", 0.027, 0.282, 0.003, 1.26);
        let oil = Food::new("Aceite de Oliva", 0.0, 0.0, 1.0, 9.0);
        let even = Food::new("Even", 0.1, 0.1, 0.05, 1.0);

        assert_eq!(chicken.dominant_category(), Some(MacroCategory::Protein));
        assert_eq!(rice.dominant_category(), Some(MacroCategory::Carbohydrate));
        assert_eq!(oil.dominant_category(), Some(MacroCategory::Fat));
        assert_eq!(even.dominant_category(), None);
    }

    #[test]
    fn test_macros_for_quantity() {
        let chicken = Food::new("Pechuga de pollo", 0.31, 0.0, 0.036, 1.56);
        let m = chicken.macros_for(150.0);
        assert!((m.protein - 46.5).abs() < 1e-9);
        assert!((m.calories - 234.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(MacroCategory::parse("Carbs"), Some(MacroCategory::Carbohydrate));
        assert_eq!(MacroCategory::parse(" fat "), Some(MacroCategory::Fat));
        assert_eq!(MacroCategory::parse("fiber"), None);
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Pechuga de Pollo", "pechuga de pollo"));
        assert!(!names_match("Pechuga de Pavo", "Pechuga de pollo"));
    }
}
