use thiserror::Error;

/// Errors raised by interval, rectangle and builder operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid bounds for feature {feature}: [{lower}, {upper})")]
    InvalidBounds { feature: usize, lower: f64, upper: f64 },

    #[error("Categorical interval for feature {feature} has no values")]
    EmptyCategorySet { feature: usize },

    #[error("Categorical interval for feature {feature} contains non-finite value {value}")]
    NonFiniteCategory { feature: usize, value: f64 },

    #[error("Categorical values for feature {feature} are not sorted and unique")]
    UnsortedCategories { feature: usize },

    #[error("Feature {feature} has no observed values")]
    EmptyDomain { feature: usize },

    #[error("Interval at position {position} declares feature {feature}")]
    DimensionMismatch { position: usize, feature: usize },

    #[error("Expected {expected} dimensions, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Feature index {feature} is out of range for {count} features")]
    FeatureOutOfRange { feature: usize, count: usize },

    #[error("Feature {feature} appears more than once")]
    DuplicateDimension { feature: usize },

    #[error("Interval kinds differ on feature {feature}")]
    KindMismatch { feature: usize },

    #[error("Coordinate {value} on feature {feature} lies outside the dataset domain")]
    OutsideDomain { feature: usize, value: f64 },

    #[error("Update on feature {feature} would make start {start} >= end {end}")]
    InvariantViolation { feature: usize, start: f64, end: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bounds_display() {
        let e = GeometryError::InvalidBounds {
            feature: 1,
            lower: 5.0,
            upper: 2.0,
        };
        assert_eq!(e.to_string(), "Invalid bounds for feature 1: [5, 2)");
    }

    #[test]
    fn dimension_mismatch_display() {
        let e = GeometryError::DimensionMismatch {
            position: 0,
            feature: 3,
        };
        assert_eq!(e.to_string(), "Interval at position 0 declares feature 3");
    }

    #[test]
    fn error_equality() {
        assert_eq!(
            GeometryError::KindMismatch { feature: 2 },
            GeometryError::KindMismatch { feature: 2 }
        );
        assert_ne!(
            GeometryError::KindMismatch { feature: 2 },
            GeometryError::EmptyDomain { feature: 2 }
        );
    }
}
