//! Compatibility graph
//!
//! Which companion proteins, carbohydrates and fats go with an anchor food.

use serde::{Deserialize, Serialize};

use crate::models::names_match;

/// Carbohydrate tier of an anchor's companions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarbTier {
    /// Preferred for the main carbohydrate
    Primary,
    /// Side carbohydrates
    Secondary,
}

/// Companions for one anchor food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub anchor: String,
    #[serde(default)]
    pub proteins: Vec<String>,
    #[serde(default)]
    pub carbs_primary: Vec<String>,
    #[serde(default)]
    pub carbs_secondary: Vec<String>,
    #[serde(default)]
    pub fats: Vec<String>,
}

/// Static anchor -> companion associations
#[derive(Debug, Clone, Default)]
pub struct CompatibilityGraph {
    entries: Vec<CompatibilityEntry>,
}

const MEAT_CARBS_PRIMARY: &[&str] = &["Arroz", "Tomate", "Fideos", "Pan Blanco", "Papas"];
const MEAT_CARBS_SECONDARY: &[&str] = &["Banana", "Pera", "Higo", "Sandía", "Papas", "Manzana", "Tomate"];
const MEAT_FATS: &[&str] = &["Aceite de Oliva", "Palta", "Almendras", "Nueces", "Queso Cremoso"];

fn entry(
    anchor: &str,
    proteins: &[&str],
    carbs_primary: &[&str],
    carbs_secondary: &[&str],
    fats: &[&str],
) -> CompatibilityEntry {
    let owned = |names: &[&str]| -> Vec<String> { names.iter().map(|n| n.to_string()).collect() };
    CompatibilityEntry {
        anchor: anchor.to_string(),
        proteins: owned(proteins),
        carbs_primary: owned(carbs_primary),
        carbs_secondary: owned(carbs_secondary),
        fats: owned(fats),
    }
}

impl CompatibilityGraph {
    /// The reference associations shipped with the engine
    pub fn builtin() -> Self {
        let entries = vec![
            entry(
                "Churrasco Magro",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Higado", "Jamon Cocido"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                MEAT_FATS,
            ),
            entry(
                "Higado",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Jamon Cocido"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                MEAT_FATS,
            ),
            entry(
                "Jamon Cocido",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Higado"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                MEAT_FATS,
            ),
            entry(
                "Pechuga de Pavo",
                &["Pechuga de Pollo", "Higado", "Jamon Cocido"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                MEAT_FATS,
            ),
            entry(
                "Whey Protein",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Higado", "Jamon Cocido"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                MEAT_FATS,
            ),
            entry(
                "Pechuga de pollo",
                &["Pechuga de Pavo", "Higado", "Jamon Cocido", "Whey Protein"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                &["Palta", "Aceite de Oliva", "Almendras", "Nueces"],
            ),
            entry(
                "Banana",
                &["Whey Protein", "Leche Descremada", "Queso Cremoso"],
                MEAT_CARBS_PRIMARY,
                MEAT_CARBS_SECONDARY,
                &["Almendras", "Palta", "Nueces"],
            ),
            entry(
                "Pan Blanco",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Jamon Cocido"],
                &["Banana", "Manzana", "Mermelada"],
                &["Tomate", "Papas", "Arroz"],
                &["Palta", "Queso Cremoso", "Aceite de Oliva"],
            ),
            entry(
                "Queso Cremoso",
                &["Pechuga de Pollo", "Higado", "Whey Protein"],
                &["Tomate", "Papas", "Pan Blanco"],
                &["Banana", "Manzana", "Arroz"],
                &["Nueces", "Almendras", "Palta"],
            ),
            entry(
                "Fideos",
                &["Pechuga de Pollo", "Pechuga de Pavo", "Higado"],
                &["Banana", "Tomate", "Pan Blanco"],
                &["Papas", "Manzana", "Arroz"],
                &["Queso Cremoso", "Aceite de Oliva", "Palta"],
            ),
        ];
        Self { entries }
    }

    pub fn from_entries(entries: Vec<CompatibilityEntry>) -> Self {
        Self { entries }
    }

    /// The entry for an anchor, matched case-insensitively
    pub fn entry(&self, anchor: &str) -> Option<&CompatibilityEntry> {
        self.entries.iter().find(|e| names_match(&e.anchor, anchor))
    }

    /// Substitutable proteins; empty when the anchor has no entry
    pub fn companion_proteins(&self, anchor: &str) -> &[String] {
        self.entry(anchor).map(|e| e.proteins.as_slice()).unwrap_or(&[])
    }

    pub fn carb_tier(&self, anchor: &str, tier: CarbTier) -> &[String] {
        match (self.entry(anchor), tier) {
            (Some(e), CarbTier::Primary) => e.carbs_primary.as_slice(),
            (Some(e), CarbTier::Secondary) => e.carbs_secondary.as_slice(),
            (None, _) => &[],
        }
    }

    pub fn fat_sources(&self, anchor: &str) -> &[String] {
        self.entry(anchor).map(|e| e.fats.as_slice()).unwrap_or(&[])
    }

    pub fn entries(&self) -> &[CompatibilityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
