//! Retry/backtrack controller
//!
//! Runs one attempt: protein, carbohydrate and fat phases with guards and
//! rollback, then a deterministic correction and the tolerance check.

use rand::Rng;

use crate::catalog::Catalog;
use crate::models::{round2, Food, GenerationResult, MacroCategory, Macros, Overrides, SelectedItem, Target};

use super::accumulator::MacroAccumulator;
use super::config::EngineConfig;
use super::{allocator, selector, AttemptFailure};

/// Phase order of an attempt
const PHASES: [MacroCategory; 3] = [
    MacroCategory::Protein,
    MacroCategory::Carbohydrate,
    MacroCategory::Fat,
];

/// All state of one attempt; nothing here outlives the call
struct Attempt<'a> {
    catalog: &'a Catalog,
    config: &'a EngineConfig,
    target: &'a Target,
    overrides: &'a Overrides,
    accumulator: MacroAccumulator,
    anchor: Option<&'a Food>,
    items: Vec<SelectedItem>,
}

/// Run one full attempt from a clean accumulator
pub fn run_attempt<R: Rng + ?Sized>(
    catalog: &Catalog,
    config: &EngineConfig,
    target: &Target,
    overrides: &Overrides,
    rng: &mut R,
) -> Result<GenerationResult, AttemptFailure> {
    let mut attempt = Attempt {
        catalog,
        config,
        target,
        overrides,
        accumulator: MacroAccumulator::new(),
        anchor: None,
        items: Vec::new(),
    };

    for category in PHASES {
        attempt.run_phase(category, rng)?;
    }

    attempt.correct();
    attempt.finish()
}

impl<'a> Attempt<'a> {
    /// Retry a phase until it commits or its ceiling is reached
    fn run_phase<R: Rng + ?Sized>(&mut self, category: MacroCategory, rng: &mut R) -> Result<(), AttemptFailure> {
        let mut tries = 0;
        loop {
            tries += 1;
            let snapshot = self.accumulator.snapshot();
            let mut chosen = 0;

            match self.try_phase(category, &mut chosen, rng) {
                Ok(items) => {
                    if category == MacroCategory::Protein {
                        let catalog = self.catalog;
                        self.anchor = items.first().and_then(|item| catalog.nutrients.lookup(&item.name));
                    }
                    self.items.extend(items);
                    return Ok(());
                }
                Err(failure) => {
                    self.accumulator.restore(snapshot);
                    tracing::debug!(phase = %category, tries, %failure, "phase try rolled back");
                }
            }

            if tries >= self.config.phase_ceiling(category, chosen) {
                return Err(AttemptFailure::PhaseExhausted {
                    category,
                    attempts: tries,
                });
            }
        }
    }

    /// Select, allocate and tentatively commit one phase
    fn try_phase<R: Rng + ?Sized>(
        &mut self,
        category: MacroCategory,
        chosen: &mut usize,
        rng: &mut R,
    ) -> Result<Vec<SelectedItem>, AttemptFailure> {
        let budget = self.accumulator.remaining(self.target, category);
        if budget <= self.config.min_phase_budget {
            return Err(AttemptFailure::NoBudget { category });
        }

        let slots = selector::select(
            self.catalog,
            category,
            self.anchor,
            self.overrides.for_category(category),
            budget,
            rng,
        )?;
        *chosen = slots.len();

        let items = allocator::allocate(&slots, category, budget, rng)?;
        for item in &items {
            self.accumulator.add(&item.contribution);
        }
        self.check_guard(category)?;

        Ok(items)
    }

    /// Later phases can only add macros, so anything already past its
    /// target plus tolerance fails the phase
    fn check_guard(&self, phase: MacroCategory) -> Result<(), AttemptFailure> {
        let later: &[MacroCategory] = match phase {
            MacroCategory::Protein => &[MacroCategory::Carbohydrate, MacroCategory::Fat],
            MacroCategory::Carbohydrate => &[MacroCategory::Fat],
            MacroCategory::Fat => &[],
        };

        let totals = self.accumulator.totals();
        for &over in later {
            let limit = self.target.grams(over) + self.config.tolerances.for_category(over);
            if over.of(&totals) > limit {
                return Err(AttemptFailure::GuardViolation { phase, over });
            }
        }
        Ok(())
    }

    /// Close the macro residuals by rescaling each category's adjustable
    /// items in turn, sweeping until every residual is negligible
    fn correct(&mut self) {
        for _ in 0..self.config.correction_sweeps {
            let mut settled = true;

            for category in PHASES {
                let residual = self.target.grams(category) - category.of(&self.accumulator.totals());
                if residual.abs() <= self.config.correction_epsilon {
                    continue;
                }
                settled = false;

                let supplied: f64 = self
                    .items
                    .iter()
                    .filter(|i| i.category == category && i.adjustable)
                    .map(|i| category.of(&i.contribution))
                    .sum();
                if supplied <= 0.0 {
                    continue;
                }

                let factor = ((supplied + residual) / supplied).max(0.0);
                for item in self
                    .items
                    .iter_mut()
                    .filter(|i| i.category == category && i.adjustable)
                {
                    let delta = item.set_quantity(item.quantity * factor);
                    self.accumulator.add(&delta);
                }
            }

            if settled {
                break;
            }
        }

        // Drop accumulated float drift
        let totals: Macros = self.items.iter().map(|i| i.contribution).sum();
        self.accumulator.set(totals);
    }

    /// Round, drop empty lines and check the final tolerances
    fn finish(self) -> Result<GenerationResult, AttemptFailure> {
        let mut result = GenerationResult {
            proteins: Vec::new(),
            carbohydrates: Vec::new(),
            fats: Vec::new(),
            totals: Macros::zero(),
            fallback: false,
        };

        let mut totals = Macros::zero();
        for item in &self.items {
            let named = item.to_named();
            if named.quantity <= 0.0 {
                continue;
            }
            totals = totals + item.per_gram.scale(named.quantity);
            match item.category {
                MacroCategory::Protein => result.proteins.push(named),
                MacroCategory::Carbohydrate => result.carbohydrates.push(named),
                MacroCategory::Fat => result.fats.push(named),
            }
        }

        for category in PHASES {
            if result.category(category).is_empty() {
                return Err(AttemptFailure::EmptyCategory { category });
            }
        }

        check_tolerances(self.target, &totals, self.config)?;
        result.totals = totals.rounded();
        Ok(result)
    }
}

/// Authoritative acceptance check on the emitted totals
pub fn check_tolerances(target: &Target, totals: &Macros, config: &EngineConfig) -> Result<(), AttemptFailure> {
    let tol = &config.tolerances;
    let misses = [
        ("protein", totals.protein - target.protein, tol.protein),
        ("carbohydrate", totals.carbs - target.carbohydrate, tol.carbohydrate),
        ("fat", totals.fat - target.fat, tol.fat),
        ("calories", totals.calories - target.calories, tol.calories),
    ];

    let detail: Vec<String> = misses
        .iter()
        .filter(|(_, diff, limit)| diff.abs() > *limit)
        .map(|(name, diff, _)| format!("{} off by {}", name, round2(*diff)))
        .collect();

    if detail.is_empty() {
        Ok(())
    } else {
        Err(AttemptFailure::OutOfTolerance {
            detail: detail.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::models::OverrideItem;

    fn assert_within(result: &GenerationResult, target: &Target) {
        let t = &result.totals;
        assert!((t.protein - target.protein).abs() <= 3.0 + 0.01, "protein {:?}", t);
        assert!((t.carbs - target.carbohydrate).abs() <= 1.5 + 0.01, "carbs {:?}", t);
        assert!((t.fat - target.fat).abs() <= 1.5 + 0.01, "fat {:?}", t);
        assert!((t.calories - target.calories).abs() <= 6.0 + 0.01, "calories {:?}", t);
    }

    #[test]
    fn test_successful_attempts_are_within_tolerance() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        let target = Target::new(40.0, 70.0, 20.0).unwrap();
        let mut successes = 0;

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Ok(result) = run_attempt(&catalog, &config, &target, &Overrides::none(), &mut rng) {
                successes += 1;
                assert!(result.is_complete());
                assert!(!result.fallback);
                assert!(result.items().all(|i| i.quantity > 0.0));
                assert_within(&result, &target);
            }
        }
        assert!(successes > 30, "only {} of 100 attempts succeeded", successes);
    }

    #[test]
    fn test_guard_rejects_overshoot() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        let target = Target::new(40.0, 70.0, 2.0).unwrap();
        let overrides = Overrides {
            proteins: vec![OverrideItem::named("Churrasco Magro")],
            ..Overrides::none()
        };
        let mut rng = StdRng::seed_from_u64(4);

        // 40 g of protein from lean beef brings about 22 g of fat
        let err = run_attempt(&catalog, &config, &target, &overrides, &mut rng).unwrap_err();
        assert_eq!(
            err,
            AttemptFailure::PhaseExhausted {
                category: MacroCategory::Protein,
                attempts: 5
            }
        );
    }

    #[test]
    fn test_pinned_override_over_budget_exhausts_protein_phase() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        let target = Target::new(40.0, 70.0, 20.0).unwrap();
        let overrides = Overrides {
            proteins: vec![OverrideItem::with_quantity("Pechuga de pollo", 150.0)],
            ..Overrides::none()
        };
        let mut rng = StdRng::seed_from_u64(8);

        let err = run_attempt(&catalog, &config, &target, &overrides, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            AttemptFailure::PhaseExhausted {
                category: MacroCategory::Protein,
                ..
            }
        ));
    }

    #[test]
    fn test_overrides_appear_in_result() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        let target = Target::new(35.0, 60.0, 15.0).unwrap();
        let overrides = Overrides {
            proteins: vec![OverrideItem::named("Pechuga de pollo")],
            carbs: vec![OverrideItem::named("Arroz")],
            fats: vec![OverrideItem::named("Aceite de Oliva")],
        };

        let mut found = false;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Ok(result) = run_attempt(&catalog, &config, &target, &overrides, &mut rng) {
                assert_eq!(result.proteins.len(), 1);
                assert_eq!(result.proteins[0].name, "Pechuga de pollo");
                assert_eq!(result.carbohydrates[0].name, "Arroz");
                assert_eq!(result.fats[0].name, "Aceite de Oliva");
                assert_within(&result, &target);
                found = true;
            }
        }
        assert!(found);
    }

    fn rice_override(item: OverrideItem) -> Overrides {
        Overrides {
            proteins: vec![OverrideItem::named("Pechuga de pollo")],
            carbs: vec![item],
            fats: vec![OverrideItem::named("Aceite de Oliva")],
        }
    }

    #[test]
    fn test_fixed_override_keeps_its_quantity() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        // 150 g of rice supplies 42.3 g of carbohydrate, within tolerance of 43
        let target = Target::new(35.0, 43.0, 12.0).unwrap();
        let overrides = rice_override(OverrideItem::with_quantity("Arroz", 150.0));

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = run_attempt(&catalog, &config, &target, &overrides, &mut rng).unwrap();
            assert_eq!(result.carbohydrates.len(), 1);
            assert_eq!(result.carbohydrates[0].name, "Arroz");
            assert_eq!(result.carbohydrates[0].quantity, 150.0);
            assert_within(&result, &target);
        }
    }

    #[test]
    fn test_modifiable_override_is_corrected() {
        let catalog = Catalog::builtin();
        let config = EngineConfig::default();
        let target = Target::new(35.0, 60.0, 12.0).unwrap();
        let overrides = rice_override(OverrideItem::with_quantity("Arroz", 150.0).modifiable());
        let mut rng = StdRng::seed_from_u64(3);

        let result = run_attempt(&catalog, &config, &target, &overrides, &mut rng).unwrap();
        let rice = &result.carbohydrates[0];
        assert_eq!(rice.name, "Arroz");
        assert!(rice.quantity > 200.0, "rice stayed at {}", rice.quantity);
        assert_within(&result, &target);

        // The same target cannot be reached when the rice is locked
        let locked = rice_override(OverrideItem::with_quantity("Arroz", 150.0));
        let err = run_attempt(&catalog, &config, &target, &locked, &mut rng).unwrap_err();
        assert!(matches!(err, AttemptFailure::OutOfTolerance { .. }), "{:?}", err);
    }

    #[test]
    fn test_check_tolerances_reports_misses() {
        let config = EngineConfig::default();
        let target = Target::new(40.0, 70.0, 20.0).unwrap();

        let close = Macros {
            protein: 42.5,
            carbs: 69.0,
            fat: 20.5,
            calories: 622.0,
        };
        assert!(check_tolerances(&target, &close, &config).is_ok());

        let off = Macros {
            protein: 40.0,
            carbs: 72.0,
            fat: 20.0,
            calories: 628.0,
        };
        match check_tolerances(&target, &off, &config) {
            Err(AttemptFailure::OutOfTolerance { detail }) => {
                assert!(detail.contains("carbohydrate"));
                assert!(detail.contains("calories"));
                assert!(!detail.contains("protein"));
            }
            other => panic!("expected out of tolerance, got {:?}", other),
        }
    }
}
