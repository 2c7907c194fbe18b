//! Per-feature interval representation.

use std::cmp::Ordering;
use std::fmt::Display;

use super::GeometryError;

/// Returns the smallest `f64` strictly greater than `value`.
///
/// Used as the exclusive upper bound of a half-open interval that must still
/// contain `value`. NaN and `+inf` are returned unchanged.
pub fn next_representable(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        return value;
    }
    if value == 0.0 {
        return f64::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// The range or set of values one rule region admits on a single feature.
///
/// The set of kinds is closed: every algorithm matches both variants
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionInterval {
    /// Half-open range `[lower, upper)` with finite bounds and `lower < upper`.
    Continuous { feature: usize, lower: f64, upper: f64 },
    /// Non-empty, sorted, de-duplicated set of finite values.
    Categorical { feature: usize, values: Vec<f64> },
}

impl DimensionInterval {
    /// Creates the half-open interval `[lower, upper)`.
    pub fn continuous(feature: usize, lower: f64, upper: f64) -> Result<Self, GeometryError> {
        let interval = Self::Continuous {
            feature,
            lower,
            upper,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Creates a categorical interval, sorting and de-duplicating `values`.
    pub fn categorical(
        feature: usize,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Self, GeometryError> {
        let mut values: Vec<f64> = values.into_iter().collect();
        if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
            return Err(GeometryError::NonFiniteCategory { feature, value });
        }
        values.sort_by(f64::total_cmp);
        values.dedup();
        let interval = Self::Categorical { feature, values };
        interval.validate()?;
        Ok(interval)
    }

    /// Checks the variant invariants.
    ///
    /// Constructors already enforce these; rectangles re-check them because
    /// the variants can also be built literally.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Continuous {
                feature,
                lower,
                upper,
            } => {
                if !lower.is_finite() || !upper.is_finite() || lower >= upper {
                    return Err(GeometryError::InvalidBounds {
                        feature: *feature,
                        lower: *lower,
                        upper: *upper,
                    });
                }
                Ok(())
            }
            Self::Categorical { feature, values } => {
                if values.is_empty() {
                    return Err(GeometryError::EmptyCategorySet { feature: *feature });
                }
                if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
                    return Err(GeometryError::NonFiniteCategory {
                        feature: *feature,
                        value,
                    });
                }
                if values.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(GeometryError::UnsortedCategories { feature: *feature });
                }
                Ok(())
            }
        }
    }

    pub fn feature(&self) -> usize {
        match self {
            Self::Continuous { feature, .. } | Self::Categorical { feature, .. } => *feature,
        }
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous { .. })
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical { .. })
    }

    /// `(lower, upper)` of a continuous interval.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { lower, upper, .. } => Some((*lower, *upper)),
            Self::Categorical { .. } => None,
        }
    }

    /// Admitted values of a categorical interval.
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Self::Continuous { .. } => None,
            Self::Categorical { values, .. } => Some(values),
        }
    }

    /// Returns true if `value` lies in this interval.
    ///
    /// Continuous: `lower <= value < upper`. Categorical: binary search.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Self::Continuous { lower, upper, .. } => *lower <= value && value < *upper,
            Self::Categorical { values, .. } => values
                .binary_search_by(|held| held.partial_cmp(&value).unwrap_or(Ordering::Less))
                .is_ok(),
        }
    }

    /// Returns true if the two intervals share at least one value.
    ///
    /// Half-open ranges that only touch at a boundary do not overlap.
    /// Comparing a continuous with a categorical interval is a schema error.
    pub fn overlaps(&self, other: &DimensionInterval) -> Result<bool, GeometryError> {
        match (self, other) {
            (
                Self::Continuous {
                    lower: a_lower,
                    upper: a_upper,
                    ..
                },
                Self::Continuous {
                    lower: b_lower,
                    upper: b_upper,
                    ..
                },
            ) => Ok(a_lower < b_upper && b_lower < a_upper),
            (Self::Categorical { values: a, .. }, Self::Categorical { values: b, .. }) => {
                Ok(sorted_sets_share_value(a, b))
            }
            _ => Err(GeometryError::KindMismatch {
                feature: self.feature(),
            }),
        }
    }
}

/// Merge-walks two ascending slices looking for a common value.
fn sorted_sets_share_value(a: &[f64], b: &[f64]) -> bool {
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].partial_cmp(&b[j]) {
            Some(Ordering::Less) => i += 1,
            Some(Ordering::Greater) => j += 1,
            Some(Ordering::Equal) => return true,
            None => return false,
        }
    }
    false
}

impl Display for DimensionInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous {
                feature,
                lower,
                upper,
            } => write!(f, "x{} ∈ [{:.3}, {:.3})", feature, lower, upper),
            Self::Categorical { feature, values } => {
                write!(f, "x{} ∈ {{", feature)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
