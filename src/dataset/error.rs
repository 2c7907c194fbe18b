use thiserror::Error;

/// Errors raised while assembling an [`super::InMemoryDataset`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Dataset must declare at least one feature")]
    NoFeatures,

    #[error("Dataset must contain at least one instance")]
    NoInstances,

    #[error("Row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} holds a non-finite value for feature {feature}")]
    NonFiniteValue { row: usize, feature: usize },

    /// A continuous value with no finite successor cannot close the
    /// half-open domain `[min, max)` above it.
    #[error("Row {row} holds the largest finite value for continuous feature {feature}")]
    UnboundedValue { row: usize, feature: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_length_display() {
        let e = DatasetError::RowLength {
            row: 3,
            expected: 2,
            found: 1,
        };
        assert_eq!(e.to_string(), "Row 3 has 1 values, expected 2");
    }

    #[test]
    fn unbounded_value_display() {
        let e = DatasetError::UnboundedValue { row: 1, feature: 0 };
        assert_eq!(
            e.to_string(),
            "Row 1 holds the largest finite value for continuous feature 0"
        );
    }

    #[test]
    fn non_finite_display() {
        let e = DatasetError::NonFiniteValue { row: 0, feature: 4 };
        assert!(e.to_string().contains("feature 4"));
    }
}
