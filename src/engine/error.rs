//! Engine error types

use thiserror::Error;

use crate::models::MacroCategory;

/// Errors that reach callers of the generator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),
}

/// Why a single attempt (or phase try) failed; always recovered by retrying
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptFailure {
    #[error("not enough distinct {category} candidates")]
    InsufficientCandidates { category: MacroCategory },

    #[error("{food} has no {category} to allocate")]
    ZeroCoefficient { food: String, category: MacroCategory },

    #[error("fixed {category} quantities exceed the remaining budget")]
    ExceedsBudget { category: MacroCategory },

    #[error("no {category} budget left to allocate")]
    NoBudget { category: MacroCategory },

    #[error("{over} overshot its target after the {phase} phase")]
    GuardViolation {
        phase: MacroCategory,
        over: MacroCategory,
    },

    #[error("{category} phase exhausted after {attempts} tries")]
    PhaseExhausted { category: MacroCategory, attempts: u32 },

    #[error("correction left no {category} items")]
    EmptyCategory { category: MacroCategory },

    #[error("totals out of tolerance ({detail})")]
    OutOfTolerance { detail: String },

    #[error("food not in catalog: {0}")]
    UnknownFood(String),
}
