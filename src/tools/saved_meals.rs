//! Saved Meal MCP Tools
//!
//! Tools for keeping meals the user liked.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::db::{Database, DbError};
use crate::models::{Macros, SavedMeal, SavedMealCreate, SavedMealItem, SavedMealUpdate};

/// Item count limits for a saved meal
pub const MIN_ITEMS: usize = 2;
pub const MAX_ITEMS: usize = 8;

/// Saved meal tool errors
#[derive(Debug, Error)]
pub enum SavedMealError {
    #[error("{0}")]
    Invalid(String),

    #[error("Saved meal not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl SavedMealError {
    /// Whether the caller's input caused the error
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, SavedMealError::Database(_))
    }
}

/// Summary of a saved meal for list results
#[derive(Debug, Serialize)]
pub struct SavedMealSummary {
    pub id: i64,
    pub name: Option<String>,
    pub item_count: usize,
    pub totals: Macros,
    pub created_at: String,
}

impl From<&SavedMeal> for SavedMealSummary {
    fn from(meal: &SavedMeal) -> Self {
        Self {
            id: meal.id,
            name: meal.name.clone(),
            item_count: meal.items.len(),
            totals: meal.cached_totals,
            created_at: meal.created_at.clone(),
        }
    }
}

/// Response for list_saved_meals
#[derive(Debug, Serialize)]
pub struct ListSavedMealsResponse {
    pub meals: Vec<SavedMealSummary>,
    pub total: i64,
}

/// Response for delete_saved_meal
#[derive(Debug, Serialize)]
pub struct DeleteSavedMealResponse {
    pub success: bool,
    pub message: String,
}

/// Check items against the catalog, canonicalize names and compute totals
fn validate_items(
    catalog: &Catalog,
    items: Vec<SavedMealItem>,
) -> Result<(Vec<SavedMealItem>, Macros), SavedMealError> {
    if items.len() < MIN_ITEMS || items.len() > MAX_ITEMS {
        return Err(SavedMealError::Invalid(format!(
            "A saved meal needs between {} and {} items, got {}",
            MIN_ITEMS,
            MAX_ITEMS,
            items.len()
        )));
    }

    let mut totals = Macros::zero();
    let mut canonical = Vec::with_capacity(items.len());
    for item in items {
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(SavedMealError::Invalid(format!(
                "Quantity for {} must be greater than 0",
                item.food_name
            )));
        }
        let food = catalog
            .nutrients
            .lookup(&item.food_name)
            .ok_or_else(|| SavedMealError::Invalid(format!("Food not found: {}", item.food_name)))?;

        totals = totals + food.macros_for(item.quantity);
        canonical.push(SavedMealItem {
            food_name: food.name.clone(),
            quantity: item.quantity,
        });
    }

    Ok((canonical, totals.rounded()))
}

/// Save a new meal
pub fn save_meal(
    db: &Database,
    catalog: &Catalog,
    name: Option<String>,
    items: Vec<SavedMealItem>,
) -> Result<SavedMeal, SavedMealError> {
    let (items, totals) = validate_items(catalog, items)?;
    let data = SavedMealCreate { name, items, totals };

    Ok(db.with_conn(|conn| SavedMeal::create(conn, &data))?)
}

/// Get a saved meal with its items
pub fn get_saved_meal(db: &Database, id: i64) -> Result<SavedMeal, SavedMealError> {
    db.with_conn(|conn| SavedMeal::get_by_id(conn, id))?
        .ok_or(SavedMealError::NotFound(id))
}

/// List saved meals, newest first
pub fn list_saved_meals(db: &Database, limit: i64, offset: i64) -> Result<ListSavedMealsResponse, SavedMealError> {
    if limit < 0 || offset < 0 {
        return Err(SavedMealError::Invalid(
            "limit and offset must not be negative".to_string(),
        ));
    }

    let (meals, total) = db.with_conn(|conn| {
        let meals = SavedMeal::list(conn, limit, offset)?;
        let total = SavedMeal::count(conn)?;
        Ok((meals, total))
    })?;

    Ok(ListSavedMealsResponse {
        meals: meals.iter().map(SavedMealSummary::from).collect(),
        total,
    })
}

/// Rename a saved meal and/or replace its items
pub fn update_saved_meal(
    db: &Database,
    catalog: &Catalog,
    id: i64,
    name: Option<String>,
    items: Option<Vec<SavedMealItem>>,
) -> Result<SavedMeal, SavedMealError> {
    if name.is_none() && items.is_none() {
        return Err(SavedMealError::Invalid(
            "Nothing to update: provide a name and/or items".to_string(),
        ));
    }

    let items = items.map(|items| validate_items(catalog, items)).transpose()?;
    let data = SavedMealUpdate { name, items };

    db.with_conn(|conn| SavedMeal::update(conn, id, &data))?
        .ok_or(SavedMealError::NotFound(id))
}

/// Delete a saved meal
pub fn delete_saved_meal(db: &Database, id: i64) -> Result<DeleteSavedMealResponse, SavedMealError> {
    if db.with_conn(|conn| SavedMeal::delete(conn, id))? {
        Ok(DeleteSavedMealResponse {
            success: true,
            message: format!("Saved meal {} deleted", id),
        })
    } else {
        Err(SavedMealError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("macromenu.db")).unwrap();
        (dir, db)
    }

    fn item(name: &str, quantity: f64) -> SavedMealItem {
        SavedMealItem {
            food_name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_save_and_get() {
        let (_dir, db) = test_db();
        let catalog = Catalog::builtin();

        let meal = save_meal(
            &db,
            &catalog,
            Some("Cena".to_string()),
            vec![item("pechuga de pollo", 100.0), item("Arroz", 100.0)],
        )
        .unwrap();
        assert_eq!(meal.items[0].food_name, "Pechuga de pollo");
        assert_eq!(meal.cached_totals.protein, 33.7);
        assert_eq!(meal.cached_totals.carbs, 28.2);

        let fetched = get_saved_meal(&db, meal.id).unwrap();
        assert_eq!(fetched.name.as_deref(), Some("Cena"));
        assert!(matches!(get_saved_meal(&db, meal.id + 1), Err(SavedMealError::NotFound(_))));
    }

    #[test]
    fn test_save_validation() {
        let (_dir, db) = test_db();
        let catalog = Catalog::builtin();

        let single = save_meal(&db, &catalog, None, vec![item("Arroz", 100.0)]).unwrap_err();
        assert!(single.to_string().contains("between 2 and 8"));
        assert!(single.is_caller_error());

        let unknown = save_meal(&db, &catalog, None, vec![item("Arroz", 100.0), item("Tofu", 50.0)]).unwrap_err();
        assert!(unknown.to_string().contains("Tofu"));
        assert!(matches!(unknown, SavedMealError::Invalid(_)));

        let zero = save_meal(&db, &catalog, None, vec![item("Arroz", 100.0), item("Papas", 0.0)]).unwrap_err();
        assert!(matches!(zero, SavedMealError::Invalid(_)));

        let nine = (0..9).map(|_| item("Arroz", 10.0)).collect();
        assert!(matches!(save_meal(&db, &catalog, None, nine), Err(SavedMealError::Invalid(_))));
    }

    #[test]
    fn test_update_list_delete() {
        let (_dir, db) = test_db();
        let catalog = Catalog::builtin();
        let meal = save_meal(&db, &catalog, None, vec![item("Whey Protein", 30.0), item("Banana", 120.0)]).unwrap();

        let empty = update_saved_meal(&db, &catalog, meal.id, None, None).unwrap_err();
        assert!(matches!(empty, SavedMealError::Invalid(_)));

        let bad_items = update_saved_meal(&db, &catalog, meal.id, None, Some(vec![item("Banana", 120.0)]));
        assert!(matches!(bad_items, Err(SavedMealError::Invalid(_))));

        let renamed = update_saved_meal(&db, &catalog, meal.id, Some("Desayuno".to_string()), None).unwrap();
        assert_eq!(renamed.name.as_deref(), Some("Desayuno"));
        assert_eq!(renamed.items.len(), 2);

        let replaced = update_saved_meal(
            &db,
            &catalog,
            meal.id,
            None,
            Some(vec![item("Whey Protein", 30.0), item("Banana", 120.0), item("Almendras", 15.0)]),
        )
        .unwrap();
        assert_eq!(replaced.items.len(), 3);
        assert!(replaced.cached_totals.fat > meal.cached_totals.fat);

        let listed = list_saved_meals(&db, 10, 0).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.meals[0].item_count, 3);
        assert!(matches!(list_saved_meals(&db, -1, 0), Err(SavedMealError::Invalid(_))));

        assert!(delete_saved_meal(&db, meal.id).unwrap().success);
        assert!(matches!(delete_saved_meal(&db, meal.id), Err(SavedMealError::NotFound(_))));
        let gone = update_saved_meal(&db, &catalog, meal.id, Some("x".to_string()), None).unwrap_err();
        assert!(matches!(gone, SavedMealError::NotFound(id) if id == meal.id));
        assert!(gone.is_caller_error());
    }
}
