use thiserror::Error;

use crate::coverage::CoverageError;
use crate::geometry::GeometryError;
use crate::growth::GrowthError;
use crate::rules::RuleError;
use crate::Id;

/// Errors that abort a rule-generation pass.
///
/// Infeasible growth is handled inside the pass and never surfaces here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Expected {expected} labels, one per instance, found {found}")]
    LabelCount { expected: usize, found: usize },

    #[error("Growth failed: {0}")]
    Growth(#[from] GrowthError),

    #[error("Coverage update failed: {0}")]
    Coverage(#[from] CoverageError),

    #[error("Rule construction failed: {0}")]
    Rule(#[from] RuleError),

    #[error("Region check failed: {0}")]
    Geometry(#[from] GeometryError),

    /// The antecedent produced for a grown rectangle does not admit its seed.
    #[error("Rule {rule} does not cover the seed it was grown from")]
    SeedNotCovered { rule: Id },
}
