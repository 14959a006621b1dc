//! Generated meal models
//!
//! Working items used during one attempt and the result handed to callers.

use serde::{Deserialize, Serialize};

use super::macros::round2;
use super::{Food, MacroCategory, Macros};

/// A food chosen for one attempt with its current quantity
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem {
    pub name: String,
    pub category: MacroCategory,
    pub per_gram: Macros,
    pub quantity: f64,
    /// quantity * per_gram, kept in sync by `set_quantity`
    pub contribution: Macros,
    pub adjustable: bool,
}

impl SelectedItem {
    pub fn new(food: &Food, category: MacroCategory, quantity: f64, adjustable: bool) -> Self {
        let quantity = quantity.max(0.0);
        let per_gram = food.per_gram();
        Self {
            name: food.name.clone(),
            category,
            per_gram,
            quantity,
            contribution: per_gram.scale(quantity),
            adjustable,
        }
    }

    /// Change the quantity (clamped at 0), returning the change in macros
    pub fn set_quantity(&mut self, quantity: f64) -> Macros {
        let quantity = quantity.max(0.0);
        let next = self.per_gram.scale(quantity);
        let delta = next - self.contribution;
        self.quantity = quantity;
        self.contribution = next;
        delta
    }

    pub fn to_named(&self) -> NamedQuantity {
        NamedQuantity {
            name: self.name.clone(),
            quantity: round2(self.quantity),
        }
    }
}

/// Food name with grams, rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedQuantity {
    pub name: String,
    pub quantity: f64,
}

/// One generated meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub proteins: Vec<NamedQuantity>,
    pub carbohydrates: Vec<NamedQuantity>,
    pub fats: Vec<NamedQuantity>,
    /// Macros of the emitted items
    pub totals: Macros,
    /// True when the fixed safe meal was returned
    #[serde(default)]
    pub fallback: bool,
}

impl GenerationResult {
    pub fn is_complete(&self) -> bool {
        !self.proteins.is_empty() && !self.carbohydrates.is_empty() && !self.fats.is_empty()
    }

    pub fn category(&self, category: MacroCategory) -> &[NamedQuantity] {
        match category {
            MacroCategory::Protein => &self.proteins,
            MacroCategory::Carbohydrate => &self.carbohydrates,
            MacroCategory::Fat => &self.fats,
        }
    }

    /// Every emitted item, proteins first
    pub fn items(&self) -> impl Iterator<Item = &NamedQuantity> {
        self.proteins
            .iter()
            .chain(self.carbohydrates.iter())
            .chain(self.fats.iter())
    }
}
