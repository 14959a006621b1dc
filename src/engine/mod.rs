//! Meal generation engine
//!
//! Randomized trial-and-error search for a small set of foods and quantities
//! whose macros land within tolerance of a target. The engine is synchronous,
//! does no I/O, and takes its randomness from the caller.

mod accumulator;
mod allocator;
mod assembler;
mod config;
mod controller;
mod error;
mod planner;
mod selector;

pub use accumulator::{MacroAccumulator, Snapshot};
pub use allocator::{allocate, proportions};
pub use assembler::{MenuGenerator, MAX_OVERRIDES_PER_CATEGORY};
pub use config::{EngineConfig, FallbackMeal, Tolerances, MAX_ATTEMPTS_ENV};
pub use controller::{check_tolerances, run_attempt};
pub use error::{AttemptFailure, GenerationError};
pub use planner::{split_daily_target, DailyMenu, PlannedMeal, MAX_MEALS, MIN_MEALS};
pub use selector::{choose_count, select, Slot};
