//! Owned, row-major dataset.

use super::{Dataset, DatasetError, FeatureType};
use crate::geometry::next_representable;

/// Dataset held entirely in memory.
///
/// Rows are validated on construction (equal length, finite values, no
/// continuous value at `f64::MAX`) and the sorted unique values per feature
/// are computed once up front.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    feature_types: Vec<FeatureType>,
    rows: Vec<Vec<f64>>,
    unique_values: Vec<Vec<f64>>,
}

impl InMemoryDataset {
    /// Creates a dataset from a feature schema and row-major instances.
    pub fn new(feature_types: Vec<FeatureType>, rows: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        if feature_types.is_empty() {
            return Err(DatasetError::NoFeatures);
        }
        if rows.is_empty() {
            return Err(DatasetError::NoInstances);
        }

        let expected = feature_types.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(DatasetError::RowLength {
                    row,
                    expected,
                    found: values.len(),
                });
            }
            if let Some(feature) = values.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFiniteValue { row, feature });
            }
            let unbounded = values.iter().zip(&feature_types).position(|(&v, kind)| {
                *kind == FeatureType::Continuous && !next_representable(v).is_finite()
            });
            if let Some(feature) = unbounded {
                return Err(DatasetError::UnboundedValue { row, feature });
            }
        }

        let unique_values = (0..expected)
            .map(|feature| {
                let mut column: Vec<f64> = rows.iter().map(|row| row[feature]).collect();
                column.sort_by(f64::total_cmp);
                column.dedup();
                column
            })
            .collect();

        Ok(Self {
            feature_types,
            rows,
            unique_values,
        })
    }

    /// Creates a dataset whose features are all continuous.
    pub fn continuous(rows: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        let width = rows.first().map(|row| row.len()).unwrap_or(0);
        Self::new(vec![FeatureType::Continuous; width], rows)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

impl Dataset for InMemoryDataset {
    fn feature_count(&self) -> usize {
        self.feature_types.len()
    }

    fn instance_count(&self) -> usize {
        self.rows.len()
    }

    fn feature_type(&self, feature: usize) -> FeatureType {
        self.feature_types[feature]
    }

    fn instance(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    fn sorted_unique_values(&self, feature: usize) -> &[f64] {
        &self.unique_values[feature]
    }
}
