//! Which instances are already claimed by an accepted rule.
//!
//! Coverage is the OR, over accepted rule rectangles, of per-instance
//! containment. Each instance's flag is computed independently, so both the
//! full recomputation and the single-rectangle merge fan out over rayon with
//! every worker writing its own slot.

mod error;
mod seed;

pub use error::CoverageError;
pub use seed::SeedSelector;

use std::borrow::Borrow;

use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::geometry::{GeometryError, HyperRectangle};

/// Per-instance coverage flags plus the covered/uncovered index lists.
///
/// The two index lists are ascending and partition `0..len()` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    covered: Vec<bool>,
    covered_indices: Vec<usize>,
    uncovered_indices: Vec<usize>,
}

impl Coverage {
    /// Coverage of a dataset before any rule exists.
    pub fn empty(instance_count: usize) -> Self {
        Self::from_flags(vec![false; instance_count])
    }

    pub fn from_flags(covered: Vec<bool>) -> Self {
        let mut coverage = Self {
            covered,
            covered_indices: Vec::new(),
            uncovered_indices: Vec::new(),
        };
        coverage.rebuild_indices();
        coverage
    }

    /// Recomputes coverage of `dataset` from scratch.
    pub fn compute<E>(dataset: &dyn Dataset, rectangles: &[E]) -> Result<Self, CoverageError>
    where
        E: Borrow<HyperRectangle> + Sync,
    {
        let covered = (0..dataset.instance_count())
            .into_par_iter()
            .map(|index| -> Result<bool, GeometryError> {
                let point = dataset.instance(index);
                for rectangle in rectangles {
                    let rectangle: &HyperRectangle = rectangle.borrow();
                    if rectangle.contains(point)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            })
            .collect::<Result<Vec<bool>, _>>()?;
        Ok(Self::from_flags(covered))
    }

    /// OR-merges one newly accepted rectangle and returns how many
    /// instances it newly covered.
    pub fn include(
        &mut self,
        dataset: &dyn Dataset,
        rectangle: &HyperRectangle,
    ) -> Result<usize, CoverageError> {
        if dataset.instance_count() != self.covered.len() {
            return Err(CoverageError::LengthMismatch {
                expected: self.covered.len(),
                found: dataset.instance_count(),
            });
        }
        let before = self.covered_indices.len();
        self.covered
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(index, flag)| -> Result<(), GeometryError> {
                if !*flag && rectangle.contains(dataset.instance(index))? {
                    *flag = true;
                }
                Ok(())
            })?;
        self.rebuild_indices();
        Ok(self.covered_indices.len() - before)
    }

    fn rebuild_indices(&mut self) {
        let (covered, uncovered): (Vec<usize>, Vec<usize>) =
            (0..self.covered.len()).partition(|&index| self.covered[index]);
        self.covered_indices = covered;
        self.uncovered_indices = uncovered;
    }

    /// Number of tracked instances.
    pub fn len(&self) -> usize {
        self.covered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }

    pub fn is_covered(&self, index: usize) -> bool {
        self.covered.get(index).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &[bool] {
        &self.covered
    }

    pub fn covered_count(&self) -> usize {
        self.covered_indices.len()
    }

    pub fn uncovered_count(&self) -> usize {
        self.uncovered_indices.len()
    }

    pub fn covered_indices(&self) -> &[usize] {
        &self.covered_indices
    }

    pub fn uncovered_indices(&self) -> &[usize] {
        &self.uncovered_indices
    }

    /// True once every instance is covered.
    pub fn is_complete(&self) -> bool {
        self.uncovered_indices.is_empty()
    }

    /// Fraction of covered instances in `[0, 1]`; an empty dataset counts as
    /// fully covered.
    pub fn ratio(&self) -> f64 {
        if self.covered.is_empty() {
            return 1.0;
        }
        self.covered_indices.len() as f64 / self.covered.len() as f64
    }
}
