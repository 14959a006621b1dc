//! Food catalog
//!
//! The nutrient table and the compatibility graph the generator draws from.
//! Both are read-only once loaded and shared between generations.

mod compatibility;
mod nutrients;

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::Food;

pub use compatibility::{CarbTier, CompatibilityEntry, CompatibilityGraph};
pub use nutrients::NutrientCatalog;

/// Catalog loading error types
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    foods: Vec<Food>,
    #[serde(default)]
    compatibility: Vec<CompatibilityEntry>,
}

/// Foods plus their compatibility associations
#[derive(Debug, Clone)]
pub struct Catalog {
    pub nutrients: NutrientCatalog,
    pub compatibility: CompatibilityGraph,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            nutrients: NutrientCatalog::builtin(),
            compatibility: CompatibilityGraph::builtin(),
        }
    }

    /// Parse a JSON catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let nutrients = NutrientCatalog::from_foods(file.foods)?;

        for entry in &file.compatibility {
            if nutrients.lookup(&entry.anchor).is_none() {
                return Err(CatalogError::Invalid(format!(
                    "compatibility anchor not in catalog: {}",
                    entry.anchor
                )));
            }
        }

        Ok(Self {
            nutrients,
            compatibility: CompatibilityGraph::from_entries(file.compatibility),
        })
    }

    /// Load a catalog file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` when given, otherwise use the built-in catalog
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let catalog = Self::load(path)?;
                tracing::info!(
                    path = %path.display(),
                    foods = catalog.nutrients.len(),
                    anchors = catalog.compatibility.len(),
                    "loaded catalog file"
                );
                Ok(catalog)
            }
            None => Ok(Self::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SMALL_CATALOG: &str = r#"{
        "foods": [
            {"name": "Pollo", "protein_per_gram": 0.31, "carbs_per_gram": 0.0, "fat_per_gram": 0.036, "calories_per_gram": 1.56},
            {"name": "Arroz", "protein_per_gram": 0.027, "carbs_per_gram": 0.282, "fat_per_gram": 0.003, "calories_per_gram": 1.26},
            {"name": "Aceite", "protein_per_gram": 0.0, "carbs_per_gram": 0.0, "fat_per_gram": 1.0, "calories_per_gram": 9.0}
        ],
        "compatibility": [
            {"anchor": "Pollo", "carbs_primary": ["Arroz"], "fats": ["Aceite"]}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(SMALL_CATALOG).unwrap();
        assert_eq!(catalog.nutrients.len(), 3);
        assert_eq!(catalog.compatibility.fat_sources("pollo"), ["Aceite".to_string()]);
        assert!(catalog.compatibility.companion_proteins("Pollo").is_empty());
    }

    #[test]
    fn test_unknown_anchor_rejected() {
        let json = r#"{
            "foods": [{"name": "Arroz", "protein_per_gram": 0.027, "carbs_per_gram": 0.282, "fat_per_gram": 0.003, "calories_per_gram": 1.26}],
            "compatibility": [{"anchor": "Tofu"}]
        }"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Catalog::from_json("{\"foods\": 3}"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL_CATALOG.as_bytes()).unwrap();

        let catalog = Catalog::load_or_builtin(Some(file.path())).unwrap();
        assert!(catalog.nutrients.lookup("ARROZ").is_some());

        let builtin = Catalog::load_or_builtin(None).unwrap();
        assert_eq!(builtin.nutrients.len(), 27);
    }
}
