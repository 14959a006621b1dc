//! Nutrient catalog
//!
//! Immutable table of foods with per-gram macro coefficients.

use std::collections::{HashMap, HashSet};

use crate::models::{Food, MacroCategory};

use super::CatalogError;

/// Reference foods: (name, protein, carbs, fat, kcal) per gram
const BUILTIN_FOODS: &[(&str, f64, f64, f64, f64)] = &[
    ("Almendras", 0.212, 0.216, 0.499, 6.20),
    ("Nueces", 0.152, 0.137, 0.652, 7.02),
    ("Aceite de Oliva", 0.0, 0.0, 1.0, 9.0),
    ("Pechuga de pollo", 0.31, 0.0, 0.036, 1.56),
    ("Churrasco Magro", 0.27, 0.0, 0.15, 2.43),
    ("Banana", 0.013, 0.228, 0.003, 0.99),
    ("Manzana", 0.005, 0.25, 0.003, 1.05),
    ("Pan Blanco", 0.075, 0.49, 0.012, 2.37),
    ("Tomate", 0.009, 0.039, 0.002, 0.21),
    ("Palta", 0.02, 0.085, 0.15, 1.77),
    ("Pera", 0.004, 0.25, 0.001, 1.03),
    ("Arroz", 0.027, 0.282, 0.003, 1.26),
    ("Papas", 0.02, 0.175, 0.001, 0.79),
    ("Whey Protein", 0.8, 0.04, 0.06, 3.90),
    ("Jamon Cocido", 0.18, 0.01, 0.05, 1.21),
    ("Higado", 0.26, 0.039, 0.045, 1.60),
    ("Queso Cremoso", 0.125, 0.044, 0.32, 3.56),
    ("Pechuga de Pavo", 0.29, 0.0, 0.01, 1.25),
    ("Leche Descremada", 0.034, 0.05, 0.001, 0.35),
    ("Leche Entera", 0.032, 0.048, 0.032, 0.61),
    ("Pasas de Uva", 0.031, 0.79, 0.005, 3.33),
    ("Fideos", 0.12, 0.72, 0.015, 3.50),
    ("Sandía", 0.006, 0.08, 0.002, 0.36),
    ("Higo", 0.008, 0.19, 0.003, 0.82),
    ("Dulce de Leche", 0.05, 0.55, 0.08, 3.12),
    ("Galletitas", 0.07, 0.65, 0.2, 4.68),
    ("Mermelada", 0.004, 0.6, 0.001, 2.43),
];

/// Read-only food table with case-insensitive lookup
#[derive(Debug, Clone)]
pub struct NutrientCatalog {
    foods: Vec<Food>,
    by_name: HashMap<String, usize>,
    by_category: HashMap<MacroCategory, Vec<usize>>,
}

impl NutrientCatalog {
    /// The reference catalog shipped with the engine
    pub fn builtin() -> Self {
        let foods = BUILTIN_FOODS
            .iter()
            .map(|&(name, p, c, f, kcal)| Food::new(name, p, c, f, kcal))
            .collect();
        // Built-in data is known to be valid
        Self::index(foods)
    }

    /// Build a catalog from foods, rejecting bad entries
    pub fn from_foods(foods: Vec<Food>) -> Result<Self, CatalogError> {
        if foods.is_empty() {
            return Err(CatalogError::Invalid("catalog has no foods".to_string()));
        }

        let mut seen = HashSet::new();
        for food in &foods {
            let key = normalize(&food.name);
            if key.is_empty() {
                return Err(CatalogError::Invalid("food name cannot be empty".to_string()));
            }
            let coefficients = [
                ("protein", food.protein_per_gram),
                ("carbs", food.carbs_per_gram),
                ("fat", food.fat_per_gram),
                ("calories", food.calories_per_gram),
            ];
            for (field, value) in coefficients {
                if !value.is_finite() || value < 0.0 {
                    return Err(CatalogError::Invalid(format!(
                        "{}: {} per gram must be a non-negative number",
                        food.name, field
                    )));
                }
            }
            if !seen.insert(key) {
                return Err(CatalogError::Invalid(format!("duplicate food name: {}", food.name)));
            }
        }

        Ok(Self::index(foods))
    }

    fn index(foods: Vec<Food>) -> Self {
        let mut by_name = HashMap::with_capacity(foods.len());
        let mut by_category: HashMap<MacroCategory, Vec<usize>> = HashMap::new();

        for (i, food) in foods.iter().enumerate() {
            by_name.insert(normalize(&food.name), i);
            if let Some(category) = food.dominant_category() {
                by_category.entry(category).or_default().push(i);
            }
        }

        Self {
            foods,
            by_name,
            by_category,
        }
    }

    /// Find a food by name, ignoring case
    pub fn lookup(&self, name: &str) -> Option<&Food> {
        self.by_name.get(&normalize(name)).map(|&i| &self.foods[i])
    }

    /// Foods whose coefficient for `category` strictly exceeds the other two
    pub fn filter_by_dominant_macro(&self, category: MacroCategory) -> Vec<&Food> {
        self.by_category
            .get(&category)
            .map(|indexes| indexes.iter().map(|&i| &self.foods[i]).collect())
            .unwrap_or_default()
    }

    /// Resolve names against the catalog, skipping unknown ones
    pub fn resolve<'a, S: AsRef<str>>(&'a self, names: &[S]) -> Vec<&'a Food> {
        names.iter().filter_map(|n| self.lookup(n.as_ref())).collect()
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = NutrientCatalog::builtin();
        assert_eq!(catalog.len(), 27);
        // Every reference food passes validation
        assert!(NutrientCatalog::from_foods(catalog.foods().to_vec()).is_ok());
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let catalog = NutrientCatalog::builtin();
        let chicken = catalog.lookup("PECHUGA DE POLLO").unwrap();
        assert_eq!(chicken.name, "Pechuga de pollo");
        assert!(catalog.lookup(" sandía ").is_some());
        assert!(catalog.lookup("Tofu").is_none());
    }

    #[test]
    fn test_filter_by_dominant_macro() {
        let catalog = NutrientCatalog::builtin();

        let proteins: Vec<&str> = catalog
            .filter_by_dominant_macro(MacroCategory::Protein)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(proteins.len(), 6);
        assert!(proteins.contains(&"Whey Protein"));
        assert!(!proteins.contains(&"Queso Cremoso"));

        let fats = catalog.filter_by_dominant_macro(MacroCategory::Fat);
        assert_eq!(fats.len(), 5);
        assert!(fats.iter().all(|f| f.fat_per_gram > f.protein_per_gram));

        let carbs = catalog.filter_by_dominant_macro(MacroCategory::Carbohydrate);
        assert_eq!(carbs.len(), 16);
    }

    #[test]
    fn test_from_foods_rejects_invalid() {
        let dup = vec![
            Food::new("Arroz", 0.027, 0.282, 0.003, 1.26),
            Food::new("arroz", 0.027, 0.282, 0.003, 1.26),
        ];
        assert!(NutrientCatalog::from_foods(dup).is_err());

        let negative = vec![Food::new("Raro", -0.1, 0.2, 0.0, 1.0)];
        assert!(NutrientCatalog::from_foods(negative).is_err());

        let unnamed = vec![Food::new("  ", 0.1, 0.2, 0.0, 1.0)];
        assert!(NutrientCatalog::from_foods(unnamed).is_err());

        assert!(NutrientCatalog::from_foods(Vec::new()).is_err());
    }

    #[test]
    fn test_resolve_skips_unknown() {
        let catalog = NutrientCatalog::builtin();
        let found = catalog.resolve(&["Arroz", "Quinoa", "papas"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].name, "Papas");
    }
}
