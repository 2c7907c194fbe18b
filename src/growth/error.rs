use thiserror::Error;

use crate::geometry::GeometryError;

/// Errors returned by [`super::RectangleGrower`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrowthError {
    /// No disjoint region around the seed exists under the current rectangles.
    /// Callers retry with another seed or stop the pass.
    #[error("No disjoint region around the seed exists along feature {feature}")]
    ConstructionInfeasible { feature: usize },

    /// Malformed seed, dimension order or rectangle schema.
    #[error("Invalid growth input: {0}")]
    InvalidInput(#[from] GeometryError),

    /// The grown rectangle failed its post-construction check.
    #[error("Grown rectangle violates an invariant: {0}")]
    InvariantViolation(String),
}

impl GrowthError {
    /// Only infeasible construction is a data condition a caller may retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GrowthError::ConstructionInfeasible { .. })
    }
}
