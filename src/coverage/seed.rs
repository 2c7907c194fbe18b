//! Seed selection for the next rule.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Coverage, CoverageError};

/// Picks seed instances uniformly at random.
///
/// Seeds that already failed to grow during the current pass can be
/// excluded so the pass does not keep retrying them.
#[derive(Debug, Clone, Default)]
pub struct SeedSelector {
    excluded: HashSet<usize>,
}

impl SeedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an instance as tried; returns false if it already was.
    pub fn exclude(&mut self, index: usize) -> bool {
        self.excluded.insert(index)
    }

    pub fn is_excluded(&self, index: usize) -> bool {
        self.excluded.contains(&index)
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Forgets every exclusion, e.g. at the start of a new pass.
    pub fn reset(&mut self) {
        self.excluded.clear();
    }

    /// Returns the index of the next seed instance.
    ///
    /// With no rules yet every instance is a candidate; afterwards only
    /// uncovered instances are. Excluded instances are skipped.
    pub fn try_find_seed<R: Rng + ?Sized>(
        &self,
        coverage: &Coverage,
        rule_count: usize,
        rng: &mut R,
    ) -> Result<usize, CoverageError> {
        let pool: Vec<usize> = if rule_count == 0 {
            (0..coverage.len()).collect()
        } else {
            coverage.uncovered_indices().to_vec()
        };
        if pool.is_empty() {
            return Err(CoverageError::NoUncoveredInstances);
        }

        let candidates: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|index| !self.excluded.contains(index))
            .collect();
        candidates
            .choose(rng)
            .copied()
            .ok_or(CoverageError::AllSeedsExcluded {
                uncovered: pool.len(),
            })
    }
}
