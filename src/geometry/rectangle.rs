//! Immutable axis-aligned region over the full feature space.

use std::fmt::Display;
use std::ops::Deref;

use super::{DimensionInterval, GeometryError};

/// One interval per feature, in feature order.
///
/// Construction guarantees that the interval at position `i` declares
/// feature `i` and that every interval is non-empty. Read access to the
/// intervals is transparent via `Deref<Target = [DimensionInterval]>`.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<DimensionInterval>", into = "Vec<DimensionInterval>")
)]
pub struct HyperRectangle {
    dimensions: Vec<DimensionInterval>,
}

impl HyperRectangle {
    /// Creates a rectangle from intervals listed in feature order.
    pub fn new(dimensions: Vec<DimensionInterval>) -> Result<Self, GeometryError> {
        for (position, interval) in dimensions.iter().enumerate() {
            if interval.feature() != position {
                return Err(GeometryError::DimensionMismatch {
                    position,
                    feature: interval.feature(),
                });
            }
            interval.validate()?;
        }
        Ok(Self { dimensions })
    }

    pub fn feature_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Interval of a single feature.
    pub fn dimension(&self, feature: usize) -> Option<&DimensionInterval> {
        self.dimensions.get(feature)
    }

    pub fn dimensions(&self) -> &[DimensionInterval] {
        &self.dimensions
    }

    /// Returns true if every coordinate of `point` lies in its dimension.
    pub fn contains(&self, point: &[f64]) -> Result<bool, GeometryError> {
        if point.len() != self.dimensions.len() {
            return Err(GeometryError::ArityMismatch {
                expected: self.dimensions.len(),
                found: point.len(),
            });
        }
        Ok(self
            .dimensions
            .iter()
            .zip(point)
            .all(|(interval, &value)| interval.contains(value)))
    }

    pub fn into_dimensions(self) -> Vec<DimensionInterval> {
        self.dimensions
    }
}

/// # Panics
///
/// Panics when the rectangles have different feature counts: every
/// rectangle of a run shares one dataset schema, so this is a programming
/// error rather than an inequality.
impl PartialEq for HyperRectangle {
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(
            self.dimensions.len(),
            other.dimensions.len(),
            "HyperRectangle equality across different feature counts"
        );
        self.dimensions == other.dimensions
    }
}

impl Deref for HyperRectangle {
    type Target = [DimensionInterval];

    fn deref(&self) -> &[DimensionInterval] {
        &self.dimensions
    }
}

impl AsRef<[DimensionInterval]> for HyperRectangle {
    fn as_ref(&self) -> &[DimensionInterval] {
        &self.dimensions
    }
}

impl TryFrom<Vec<DimensionInterval>> for HyperRectangle {
    type Error = GeometryError;

    fn try_from(dimensions: Vec<DimensionInterval>) -> Result<Self, Self::Error> {
        Self::new(dimensions)
    }
}

impl From<HyperRectangle> for Vec<DimensionInterval> {
    fn from(rectangle: HyperRectangle) -> Self {
        rectangle.dimensions
    }
}

impl Display for HyperRectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, interval) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{}", interval)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cont(feature: usize, lower: f64, upper: f64) -> DimensionInterval {
        DimensionInterval::continuous(feature, lower, upper).unwrap()
    }

    fn unit_square() -> HyperRectangle {
        HyperRectangle::new(vec![cont(0, 0.0, 1.0), cont(1, 0.0, 1.0)]).unwrap()
    }

    #[test]
    fn contains_requires_every_dimension() {
        let rect = unit_square();
        assert!(rect.contains(&[0.5, 0.5]).unwrap());
        assert!(rect.contains(&[0.0, 0.0]).unwrap());
        assert!(!rect.contains(&[1.0, 0.5]).unwrap());
        assert!(!rect.contains(&[0.5, -0.5]).unwrap());
    }

    #[test]
    fn contains_rejects_wrong_arity() {
        assert_eq!(
            unit_square().contains(&[0.5]),
            Err(GeometryError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn misplaced_feature_index_is_rejected() {
        let result = HyperRectangle::new(vec![cont(1, 0.0, 1.0), cont(0, 0.0, 1.0)]);
        assert_eq!(
            result.unwrap_err(),
            GeometryError::DimensionMismatch {
                position: 0,
                feature: 1
            }
        );
    }

    #[test]
    fn literal_invalid_interval_is_rejected() {
        let bad = DimensionInterval::Continuous {
            feature: 0,
            lower: 2.0,
            upper: 1.0,
        };
        assert!(matches!(
            HyperRectangle::new(vec![bad]),
            Err(GeometryError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn equality_is_pairwise() {
        assert_eq!(unit_square(), unit_square());
        let other = HyperRectangle::new(vec![cont(0, 0.0, 1.0), cont(1, 0.0, 2.0)]).unwrap();
        assert_ne!(unit_square(), other);
    }

    #[test]
    #[should_panic(expected = "different feature counts")]
    fn equality_across_schemas_panics() {
        let line = HyperRectangle::new(vec![cont(0, 0.0, 1.0)]).unwrap();
        let _ = line == unit_square();
    }

    #[test]
    fn deref_provides_slice_methods() {
        let rect = unit_square();
        assert_eq!(rect.len(), 2);
        assert_eq!(rect[1].feature(), 1);
        assert_eq!(rect.dimension(0).and_then(|d| d.bounds()), Some((0.0, 1.0)));
    }

    #[test]
    fn display_joins_dimensions() {
        let s = unit_square().to_string();
        assert!(s.contains(" ∧ "));
        assert!(s.starts_with("x0"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_revalidates() {
        let json = serde_json::to_string(&unit_square()).unwrap();
        let back: HyperRectangle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, unit_square());

        let swapped = serde_json::to_string(&vec![cont(1, 0.0, 1.0)]).unwrap();
        assert!(serde_json::from_str::<HyperRectangle>(&swapped).is_err());
    }
}
