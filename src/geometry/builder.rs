//! Mutable rectangle under construction.

use super::{next_representable, DimensionInterval, GeometryError, HyperRectangle};
use crate::dataset::{Dataset, FeatureType};

/// Scratch rectangle owned by a single construction attempt.
///
/// The builder holds one pending interval per feature. Slots may be
/// temporarily invalid (an emptied category set); [`RectangleBuilder::try_build`]
/// reports the first invalid slot. The builder is consumed on build and is
/// never shared between threads.
#[derive(Debug, Clone)]
pub struct RectangleBuilder {
    slots: Vec<DimensionInterval>,
}

impl RectangleBuilder {
    /// Starts from the dataset's global bounding box.
    pub fn maximal(dataset: &dyn Dataset) -> Result<Self, GeometryError> {
        let slots = (0..dataset.feature_count())
            .map(|feature| dataset.domain(feature))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    /// Starts from the degenerate box holding only `seed`.
    ///
    /// A continuous slot becomes `[s, next_representable(s))`, the smallest
    /// half-open interval containing `s`; a categorical slot becomes `{s}`.
    pub fn around_seed(seed: &[f64], dataset: &dyn Dataset) -> Result<Self, GeometryError> {
        if seed.len() != dataset.feature_count() {
            return Err(GeometryError::ArityMismatch {
                expected: dataset.feature_count(),
                found: seed.len(),
            });
        }
        let slots = seed
            .iter()
            .enumerate()
            .map(|(feature, &value)| match dataset.feature_type(feature) {
                FeatureType::Continuous => {
                    DimensionInterval::continuous(feature, value, next_representable(value))
                }
                FeatureType::Categorical => DimensionInterval::categorical(feature, [value]),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    pub fn feature_count(&self) -> usize {
        self.slots.len()
    }

    /// Current pending intervals, usable with the intersection tests.
    pub fn dimensions(&self) -> &[DimensionInterval] {
        &self.slots
    }

    /// Moves the inclusive start of a continuous slot.
    pub fn update_start(&mut self, feature: usize, value: f64) -> Result<(), GeometryError> {
        let count = self.slots.len();
        match self.slots.get_mut(feature) {
            Some(DimensionInterval::Continuous { lower, upper, .. }) => {
                if value.is_nan() || value >= *upper {
                    return Err(GeometryError::InvariantViolation {
                        feature,
                        start: value,
                        end: *upper,
                    });
                }
                *lower = value;
                Ok(())
            }
            Some(DimensionInterval::Categorical { .. }) => {
                Err(GeometryError::KindMismatch { feature })
            }
            None => Err(GeometryError::FeatureOutOfRange { feature, count }),
        }
    }

    /// Moves the exclusive end of a continuous slot.
    pub fn update_end(&mut self, feature: usize, value: f64) -> Result<(), GeometryError> {
        let count = self.slots.len();
        match self.slots.get_mut(feature) {
            Some(DimensionInterval::Continuous { lower, upper, .. }) => {
                if value.is_nan() || value <= *lower {
                    return Err(GeometryError::InvariantViolation {
                        feature,
                        start: *lower,
                        end: value,
                    });
                }
                *upper = value;
                Ok(())
            }
            Some(DimensionInterval::Categorical { .. }) => {
                Err(GeometryError::KindMismatch { feature })
            }
            None => Err(GeometryError::FeatureOutOfRange { feature, count }),
        }
    }

    /// Replaces the value set of a categorical slot.
    ///
    /// An empty set is accepted here and rejected by `try_build`.
    pub fn set_values(&mut self, feature: usize, mut values: Vec<f64>) -> Result<(), GeometryError> {
        let count = self.slots.len();
        match self.slots.get_mut(feature) {
            Some(DimensionInterval::Categorical { values: slot, .. }) => {
                values.sort_by(f64::total_cmp);
                values.dedup();
                *slot = values;
                Ok(())
            }
            Some(DimensionInterval::Continuous { .. }) => {
                Err(GeometryError::KindMismatch { feature })
            }
            None => Err(GeometryError::FeatureOutOfRange { feature, count }),
        }
    }

    /// Finalizes every slot into a [`HyperRectangle`].
    ///
    /// Failure means no valid region exists under the applied updates; it is
    /// an expected outcome, not a defect.
    pub fn try_build(self) -> Result<HyperRectangle, GeometryError> {
        HyperRectangle::new(self.slots)
    }
}
