use thiserror::Error;

use crate::geometry::GeometryError;
use crate::Id;

/// Errors raised while building, resolving or checking rules.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("Invalid rule region: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Rule id {id} is already taken")]
    DuplicateId { id: Id },

    #[error("Antecedent tests feature {feature} more than once")]
    DuplicateTest { feature: usize },

    /// The candidate overlaps an accepted rule that predicts differently.
    #[error("Rule {candidate} conflicts with accepted rule {existing}")]
    Inconsistent { candidate: Id, existing: Id },
}
