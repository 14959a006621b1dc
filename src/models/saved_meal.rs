//! Saved meal model
//!
//! A user-kept collection of foods with quantities and cached totals.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::Macros;

/// One food line of a saved meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMealItem {
    pub food_name: String,
    pub quantity: f64, // grams
}

/// A saved meal with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMeal {
    pub id: i64,
    pub name: Option<String>,
    pub items: Vec<SavedMealItem>,
    pub cached_totals: Macros,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a saved meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMealCreate {
    pub name: Option<String>,
    pub items: Vec<SavedMealItem>,
    pub totals: Macros,
}

/// Data for updating a saved meal; items and totals change together
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedMealUpdate {
    pub name: Option<String>,
    pub items: Option<(Vec<SavedMealItem>, Macros)>,
}

impl SavedMeal {
    /// Create from a database row, without items
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            items: Vec::new(),
            cached_totals: Macros {
                protein: row.get("cached_protein")?,
                carbs: row.get("cached_carbs")?,
                fat: row.get("cached_fat")?,
                calories: row.get("cached_calories")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn load_items(conn: &Connection, meal_id: i64) -> DbResult<Vec<SavedMealItem>> {
        let mut stmt = conn.prepare(
            "SELECT food_name, quantity FROM saved_meal_items WHERE meal_id = ?1 ORDER BY position ASC",
        )?;

        let items = stmt
            .query_map([meal_id], |row| {
                Ok(SavedMealItem {
                    food_name: row.get(0)?,
                    quantity: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn insert_items(conn: &Connection, meal_id: i64, items: &[SavedMealItem]) -> DbResult<()> {
        let mut stmt = conn.prepare(
            "INSERT INTO saved_meal_items (meal_id, position, food_name, quantity) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (position, item) in items.iter().enumerate() {
            stmt.execute(params![meal_id, position as i64, item.food_name, item.quantity])?;
        }
        Ok(())
    }

    /// Insert a new saved meal and its items
    pub fn create(conn: &Connection, data: &SavedMealCreate) -> DbResult<Self> {
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO saved_meals (name, cached_protein, cached_carbs, cached_fat, cached_calories)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.totals.protein,
                data.totals.carbs,
                data.totals.fat,
                data.totals.calories,
            ],
        )?;
        let id = tx.last_insert_rowid();
        Self::insert_items(&tx, id, &data.items)?;
        tx.commit()?;

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a saved meal by ID, with items
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM saved_meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(mut meal) => {
                meal.items = Self::load_items(conn, id)?;
                Ok(Some(meal))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List saved meals, newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM saved_meals ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let mut meals = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for meal in &mut meals {
            meal.items = Self::load_items(conn, meal.id)?;
        }

        Ok(meals)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM saved_meals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update name and/or items
    pub fn update(conn: &Connection, id: i64, data: &SavedMealUpdate) -> DbResult<Option<Self>> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(None);
        }

        let tx = conn.unchecked_transaction()?;

        if let Some(ref name) = data.name {
            tx.execute(
                "UPDATE saved_meals SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![name, id],
            )?;
        }

        if let Some((ref items, totals)) = data.items {
            tx.execute("DELETE FROM saved_meal_items WHERE meal_id = ?1", [id])?;
            Self::insert_items(&tx, id, items)?;
            tx.execute(
                r#"
                UPDATE saved_meals
                SET cached_protein = ?1, cached_carbs = ?2, cached_fat = ?3, cached_calories = ?4,
                    updated_at = datetime('now')
                WHERE id = ?5
                "#,
                params![totals.protein, totals.carbs, totals.fat, totals.calories, id],
            )?;
        }

        tx.commit()?;
        Self::get_by_id(conn, id)
    }

    /// Delete a saved meal; items go with it
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM saved_meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
