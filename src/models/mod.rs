//! Data models
//!
//! Foods, targets, overrides, generated meals and saved meals.

mod food;
pub mod macros;
mod meal;
mod overrides;
mod saved_meal;
mod target;

pub use food::{names_match, Food, MacroCategory};
pub use macros::{atwater_calories, round2, Macros};
pub use meal::{GenerationResult, NamedQuantity, SelectedItem};
pub use overrides::{OverrideItem, Overrides};
pub use saved_meal::{SavedMeal, SavedMealCreate, SavedMealItem, SavedMealUpdate};
pub use target::{Target, TargetInput};
