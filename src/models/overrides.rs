//! Caller overrides ("foods to square")
//!
//! Foods the caller insists on including, per category.

use serde::{Deserialize, Serialize};

use super::MacroCategory;

/// A food the caller wants in the meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideItem {
    pub name: String,
    /// Grams; `None` or 0 lets the engine pick the quantity
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Whether the final correction may change a pinned quantity
    #[serde(default)]
    pub modifiable: bool,
}

impl OverrideItem {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: None,
            modifiable: false,
        }
    }

    pub fn with_quantity(name: &str, quantity: f64) -> Self {
        Self {
            name: name.to_string(),
            quantity: Some(quantity),
            modifiable: false,
        }
    }

    pub fn modifiable(mut self) -> Self {
        self.modifiable = true;
        self
    }

    /// Caller-fixed grams, if any
    pub fn pinned_quantity(&self) -> Option<f64> {
        self.quantity.filter(|q| *q > 0.0)
    }

    /// Whether the engine may adjust this item's quantity
    pub fn is_adjustable(&self) -> bool {
        self.pinned_quantity().is_none() || self.modifiable
    }
}

/// Overrides for all three categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub proteins: Vec<OverrideItem>,
    #[serde(default)]
    pub carbs: Vec<OverrideItem>,
    #[serde(default)]
    pub fats: Vec<OverrideItem>,
}

impl Overrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_category(&self, category: MacroCategory) -> &[OverrideItem] {
        match category {
            MacroCategory::Protein => &self.proteins,
            MacroCategory::Carbohydrate => &self.carbs,
            MacroCategory::Fat => &self.fats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty() && self.carbs.is_empty() && self.fats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_quantity() {
        assert_eq!(OverrideItem::named("Arroz").pinned_quantity(), None);
        assert_eq!(OverrideItem::with_quantity("Arroz", 0.0).pinned_quantity(), None);
        assert_eq!(OverrideItem::with_quantity("Papas", 20.0).pinned_quantity(), Some(20.0));
    }

    #[test]
    fn test_adjustable() {
        assert!(OverrideItem::named("Arroz").is_adjustable());
        assert!(!OverrideItem::with_quantity("Papas", 20.0).is_adjustable());
        assert!(OverrideItem::with_quantity("Papas", 20.0).modifiable().is_adjustable());
    }

    #[test]
    fn test_deserialize_defaults() {
        let o: Overrides =
            serde_json::from_str(r#"{"carbs": [{"name": "Arroz"}, {"name": "Papas", "quantity": 20}]}"#)
                .unwrap();
        assert!(o.proteins.is_empty());
        assert_eq!(o.carbs.len(), 2);
        assert!(!o.carbs[1].modifiable);
        assert_eq!(o.for_category(MacroCategory::Carbohydrate)[1].quantity, Some(20.0));
    }
}
