use thiserror::Error;

use crate::geometry::GeometryError;

/// Errors raised by coverage bookkeeping and seed selection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoverageError {
    /// Every instance is covered; the generation pass is complete.
    #[error("No uncovered instances remain")]
    NoUncoveredInstances,

    /// Uncovered instances remain but each of them was already tried.
    #[error("All {uncovered} uncovered instances were excluded as seeds")]
    AllSeedsExcluded { uncovered: usize },

    #[error("Coverage tracks {expected} instances, dataset has {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Coverage check failed: {0}")]
    Geometry(#[from] GeometryError),
}
