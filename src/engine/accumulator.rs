//! Running macro totals for one attempt

use crate::models::{MacroCategory, Macros, Target};

/// Totals of everything committed so far in an attempt
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroAccumulator {
    totals: Macros,
}

/// Saved accumulator state; restoring is a plain copy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot(Macros);

impl MacroAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, macros: &Macros) {
        self.totals = self.totals + *macros;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.totals)
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.totals = snapshot.0;
    }

    /// Replace the totals, e.g. after recomputing them from items
    pub fn set(&mut self, totals: Macros) {
        self.totals = totals;
    }

    pub fn totals(&self) -> Macros {
        self.totals
    }

    /// Grams of a category still missing from the target, never negative
    pub fn remaining(&self, target: &Target, category: MacroCategory) -> f64 {
        (target.grams(category) - category.of(&self.totals)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_restore() {
        let mut acc = MacroAccumulator::new();
        acc.add(&Macros::from_grams(10.0, 5.0, 1.0));
        let snap = acc.snapshot();

        acc.add(&Macros::from_grams(20.0, 20.0, 20.0));
        assert_eq!(acc.totals().protein, 30.0);

        acc.restore(snap);
        assert_eq!(acc.totals(), Macros::from_grams(10.0, 5.0, 1.0));
    }

    #[test]
    fn test_remaining_clamps() {
        let target = Target::new(20.0, 30.0, 5.0).unwrap();
        let mut acc = MacroAccumulator::new();
        acc.add(&Macros::from_grams(25.0, 10.0, 0.0));
        assert_eq!(acc.remaining(&target, MacroCategory::Protein), 0.0);
        assert_eq!(acc.remaining(&target, MacroCategory::Carbohydrate), 20.0);
        assert_eq!(acc.remaining(&target, MacroCategory::Fat), 5.0);
    }
}
