//! Database module
//!
//! Handles SQLite connection and migrations for saved meals.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
