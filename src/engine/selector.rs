//! Category selector
//!
//! Picks the foods for one phase: the caller's overrides when given,
//! otherwise distinct random draws from the anchor's compatible foods.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, CarbTier};
use crate::models::{names_match, Food, MacroCategory, OverrideItem};

use super::AttemptFailure;

/// Draws allowed per slot before giving up on finding an unused food
const MAX_DRAWS_PER_SLOT: usize = 10;

/// A food chosen for a phase, with the caller's quantity if pinned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<'a> {
    pub food: &'a Food,
    pub pinned: Option<f64>,
    pub adjustable: bool,
}

impl<'a> Slot<'a> {
    pub fn free(food: &'a Food) -> Self {
        Self {
            food,
            pinned: None,
            adjustable: true,
        }
    }
}

/// How many foods to use for a category, biased by the grams still needed
pub fn choose_count<R: Rng + ?Sized>(category: MacroCategory, remaining: f64, rng: &mut R) -> usize {
    let roll: f64 = rng.gen();
    match category {
        MacroCategory::Protein => {
            if remaining > 60.0 {
                if roll < 0.2 {
                    1
                } else if roll < 0.7 {
                    2
                } else {
                    3
                }
            } else if remaining > 35.0 {
                if roll < 0.4 { 1 } else { 2 }
            } else if roll < 0.7 {
                1
            } else {
                2
            }
        }
        MacroCategory::Carbohydrate => {
            if remaining > 120.0 {
                if roll < 0.2 { 3 } else { 2 }
            } else if remaining > 70.0 {
                if roll < 0.7 { 2 } else { 1 }
            } else if remaining >= 40.0 {
                if roll < 0.9 { 2 } else { 1 }
            } else if remaining >= 20.0 {
                if roll < 0.7 { 1 } else { 2 }
            } else {
                1
            }
        }
        MacroCategory::Fat => {
            if remaining > 25.0 { 2 } else { 1 }
        }
    }
}

/// Choose the foods for one phase
///
/// `anchor` is the first protein of the attempt; it keys the compatibility
/// lookups and is `None` only while the protein phase picks it.
pub fn select<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    category: MacroCategory,
    anchor: Option<&Food>,
    overrides: &[OverrideItem],
    remaining: f64,
    rng: &mut R,
) -> Result<Vec<Slot<'a>>, AttemptFailure> {
    if !overrides.is_empty() {
        return resolve_overrides(catalog, overrides);
    }

    let count = choose_count(category, remaining, rng);
    let anchor_name = anchor.map(|f| f.name.as_str());
    let mut chosen: Vec<&'a Food> = Vec::with_capacity(count);

    for slot in 0..count {
        let pool = match (category, slot) {
            (MacroCategory::Protein, 0) if anchor.is_none() => {
                catalog.nutrients.filter_by_dominant_macro(MacroCategory::Protein)
            }
            (MacroCategory::Protein, _) => {
                // A protein anchor chosen from overrides or slot 0
                let anchor_name = anchor_name.or_else(|| chosen.first().map(|f| f.name.as_str()));
                let companions = anchor_name
                    .map(|a| catalog.compatibility.companion_proteins(a))
                    .unwrap_or(&[]);
                compatible_pool(catalog, companions, category)
            }
            (MacroCategory::Carbohydrate, 0) => {
                let names = anchor_name
                    .map(|a| catalog.compatibility.carb_tier(a, CarbTier::Primary))
                    .unwrap_or(&[]);
                compatible_pool(catalog, names, category)
            }
            (MacroCategory::Carbohydrate, _) => {
                let names = anchor_name
                    .map(|a| catalog.compatibility.carb_tier(a, CarbTier::Secondary))
                    .unwrap_or(&[]);
                compatible_pool(catalog, names, category)
            }
            (MacroCategory::Fat, _) => {
                let names = anchor_name
                    .map(|a| catalog.compatibility.fat_sources(a))
                    .unwrap_or(&[]);
                compatible_pool(catalog, names, category)
            }
        };

        let food = draw_distinct(&pool, &chosen, category, rng)?;
        chosen.push(food);
    }

    Ok(chosen.into_iter().map(Slot::free).collect())
}

/// Foods named by the graph that carry the category's macro, or the
/// catalog-wide dominant-macro filter when none do
fn compatible_pool<'a>(catalog: &'a Catalog, names: &[String], category: MacroCategory) -> Vec<&'a Food> {
    let pool: Vec<&'a Food> = catalog
        .nutrients
        .resolve(names)
        .into_iter()
        .filter(|f| f.coefficient(category) > 0.0)
        .collect();

    if pool.is_empty() {
        catalog.nutrients.filter_by_dominant_macro(category)
    } else {
        pool
    }
}

fn draw_distinct<'a, R: Rng + ?Sized>(
    pool: &[&'a Food],
    chosen: &[&'a Food],
    category: MacroCategory,
    rng: &mut R,
) -> Result<&'a Food, AttemptFailure> {
    for _ in 0..MAX_DRAWS_PER_SLOT {
        let food = match pool.choose(rng) {
            Some(food) => *food,
            None => break,
        };
        if !chosen.iter().any(|c| names_match(&c.name, &food.name)) {
            return Ok(food);
        }
    }
    Err(AttemptFailure::InsufficientCandidates { category })
}

fn resolve_overrides<'a>(
    catalog: &'a Catalog,
    overrides: &[OverrideItem],
) -> Result<Vec<Slot<'a>>, AttemptFailure> {
    overrides
        .iter()
        .map(|item| {
            let food = catalog
                .nutrients
                .lookup(&item.name)
                .ok_or_else(|| AttemptFailure::UnknownFood(item.name.clone()))?;
            Ok(Slot {
                food,
                pinned: item.pinned_quantity(),
                adjustable: item.is_adjustable(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_choose_count_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for remaining in [0.0, 10.0, 25.0, 39.9, 40.0, 55.0, 70.0, 90.0, 130.0, 300.0] {
            for category in MacroCategory::ALL {
                for _ in 0..50 {
                    let k = choose_count(category, remaining, &mut rng);
                    assert!((1..=3).contains(&k), "{} {} -> {}", category, remaining, k);
                }
            }
        }
    }

    #[test]
    fn test_small_budgets_use_one_food() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(choose_count(MacroCategory::Carbohydrate, 12.0, &mut rng), 1);
            assert_eq!(choose_count(MacroCategory::Fat, 10.0, &mut rng), 1);
            assert_eq!(choose_count(MacroCategory::Fat, 30.0, &mut rng), 2);
        }
    }

    #[test]
    fn test_select_draws_distinct_compatible_foods() {
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let proteins = select(&catalog, MacroCategory::Protein, None, &[], 80.0, &mut rng).unwrap();
            assert!(!proteins.is_empty());
            for (i, a) in proteins.iter().enumerate() {
                for b in &proteins[i + 1..] {
                    assert!(!names_match(&a.food.name, &b.food.name));
                }
            }

            let anchor = proteins[0].food;
            let carbs = select(&catalog, MacroCategory::Carbohydrate, Some(anchor), &[], 130.0, &mut rng);
            // Secondary tiers can run dry on repeats; that is a retriable failure
            if let Ok(carbs) = carbs {
                let primary = catalog.compatibility.carb_tier(&anchor.name, CarbTier::Primary);
                assert!(primary.iter().any(|n| names_match(n, &carbs[0].food.name)));
                assert!(carbs.iter().all(|s| s.food.carbs_per_gram > 0.0));
            }
        }
    }

    #[test]
    fn test_unknown_anchor_falls_back_to_catalog_filter() {
        let catalog = Catalog::builtin();
        let tofu = Food::new("Tofu", 0.08, 0.02, 0.05, 0.8);
        let mut rng = StdRng::seed_from_u64(3);

        let fats = select(&catalog, MacroCategory::Fat, Some(&tofu), &[], 10.0, &mut rng).unwrap();
        assert_eq!(fats.len(), 1);
        assert_eq!(fats[0].food.dominant_category(), Some(MacroCategory::Fat));
    }

    #[test]
    fn test_overrides_used_verbatim() {
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(9);
        let overrides = vec![
            OverrideItem::named("arroz"),
            OverrideItem::with_quantity("Papas", 20.0),
        ];

        let slots = select(&catalog, MacroCategory::Carbohydrate, None, &overrides, 70.0, &mut rng).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].food.name, "Arroz");
        assert!(slots[0].adjustable);
        assert_eq!(slots[1].pinned, Some(20.0));
        assert!(!slots[1].adjustable);
    }

    #[test]
    fn test_tiny_pool_reports_insufficient_candidates() {
        let only = Food::new("Aceite de Oliva", 0.0, 0.0, 1.0, 9.0);
        let pool = vec![&only];
        let chosen = vec![&only];
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            draw_distinct(&pool, &chosen, MacroCategory::Fat, &mut rng),
            Err(AttemptFailure::InsufficientCandidates { category: MacroCategory::Fat })
        );
    }
}
