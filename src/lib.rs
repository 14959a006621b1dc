//! MacroMenu Library
//!
//! Generates meals from a fixed food catalog that match macro-nutrient
//! targets, and keeps meals the user wants to reuse.

pub mod build_info;
pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod mcp;
pub mod models;
pub mod tools;
