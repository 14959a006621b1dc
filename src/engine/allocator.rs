//! Proportional allocator
//!
//! Splits a category's remaining grams across the chosen foods with random
//! stick-breaking proportions and turns each share into a quantity.

use rand::Rng;

use crate::models::{MacroCategory, SelectedItem};

use super::selector::Slot;
use super::AttemptFailure;

/// Slack allowed when comparing pinned contributions to the budget
const BUDGET_EPSILON: f64 = 1e-9;

/// Random proportions summing to 1.0
///
/// The first share comes from a range that depends on how many shares are
/// needed; each later share takes 40-70% of what is left and the last one
/// takes the remainder.
pub fn proportions<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let mut shares = Vec::with_capacity(count);
    let mut left = 1.0;
    for i in 0..count - 1 {
        let fraction = if i == 0 {
            match count {
                2 => rng.gen_range(0.45..=0.85),
                3 => rng.gen_range(0.4..=0.7),
                _ => rng.gen_range(0.35..=0.6),
            }
        } else {
            rng.gen_range(0.4..=0.7)
        };
        let share = left * fraction;
        shares.push(share);
        left -= share;
    }
    shares.push(left);
    shares
}

/// Allocate `budget` grams of the category's macro across `slots`
///
/// Pinned slots keep the caller's quantity and use up `quantity * coefficient`
/// of the budget; the rest is split across the free slots.
pub fn allocate<R: Rng + ?Sized>(
    slots: &[Slot<'_>],
    category: MacroCategory,
    budget: f64,
    rng: &mut R,
) -> Result<Vec<SelectedItem>, AttemptFailure> {
    if let Some(slot) = slots.iter().find(|s| s.food.coefficient(category) <= 0.0) {
        return Err(AttemptFailure::ZeroCoefficient {
            food: slot.food.name.clone(),
            category,
        });
    }

    let pinned_total: f64 = slots
        .iter()
        .filter_map(|s| s.pinned.map(|q| q * s.food.coefficient(category)))
        .sum();
    let free = slots.iter().filter(|s| s.pinned.is_none()).count();

    if pinned_total > budget + BUDGET_EPSILON || (free > 0 && pinned_total >= budget) {
        return Err(AttemptFailure::ExceedsBudget { category });
    }

    let left = budget - pinned_total;
    let mut shares = proportions(free, rng).into_iter();

    let items = slots
        .iter()
        .map(|slot| {
            let quantity = match slot.pinned {
                Some(q) => q,
                None => {
                    let share = shares.next().unwrap_or(0.0);
                    left * share / slot.food.coefficient(category)
                }
            };
            SelectedItem::new(slot.food, category, quantity, slot.adjustable)
        })
        .collect();

    Ok(items)
}
