//! Dataset contract consumed by the geometry core.
//!
//! The core only needs read access to a fixed feature schema and the raw
//! instance vectors. [`InMemoryDataset`] is a small owned implementation used
//! by tests, demos and callers that already hold their data in memory.

mod error;
mod memory;

pub use error::DatasetError;
pub use memory::InMemoryDataset;

use crate::geometry::{next_representable, DimensionInterval, GeometryError, HyperRectangle};

/// Kind of values a feature takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureType {
    /// Ordered real values; regions are half-open ranges.
    Continuous,
    /// Unordered codes; regions are value sets.
    Categorical,
}

/// Read-only view over the data a rule set is built for.
///
/// All methods taking a feature or instance index may panic when the index
/// is out of range; callers in this crate only pass indices below
/// [`Dataset::feature_count`] / [`Dataset::instance_count`].
pub trait Dataset: Sync {
    fn feature_count(&self) -> usize;

    fn instance_count(&self) -> usize;

    fn feature_type(&self, feature: usize) -> FeatureType;

    /// Feature vector of one instance, `feature_count()` long.
    fn instance(&self, index: usize) -> &[f64];

    /// Distinct observed values of a feature in ascending order.
    fn sorted_unique_values(&self, feature: usize) -> &[f64];

    /// Maximal interval of a feature over the dataset.
    ///
    /// Continuous features span `[min, next_representable(max))` so the
    /// largest observed value stays inside the half-open interval.
    /// Categorical features span every observed value.
    fn domain(&self, feature: usize) -> Result<DimensionInterval, GeometryError> {
        if feature >= self.feature_count() {
            return Err(GeometryError::FeatureOutOfRange {
                feature,
                count: self.feature_count(),
            });
        }
        let values = self.sorted_unique_values(feature);
        match self.feature_type(feature) {
            FeatureType::Continuous => match (values.first(), values.last()) {
                (Some(&min), Some(&max)) => {
                    DimensionInterval::continuous(feature, min, next_representable(max))
                }
                _ => Err(GeometryError::EmptyDomain { feature }),
            },
            FeatureType::Categorical => {
                if values.is_empty() {
                    return Err(GeometryError::EmptyDomain { feature });
                }
                DimensionInterval::categorical(feature, values.iter().copied())
            }
        }
    }

    /// The global bounding box: every dimension at its domain.
    fn bounding_box(&self) -> Result<HyperRectangle, GeometryError> {
        let dimensions = (0..self.feature_count())
            .map(|feature| self.domain(feature))
            .collect::<Result<Vec<_>, _>>()?;
        HyperRectangle::new(dimensions)
    }
}
