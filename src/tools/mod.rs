//! MacroMenu Tools module
//!
//! MCP tool implementations for MacroMenu.

pub mod foods;
pub mod meals;
pub mod saved_meals;
pub mod status;
