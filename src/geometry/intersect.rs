//! Pairwise intersection tests between rectangles.
//!
//! Both functions accept plain interval slices so they work on finished
//! [`super::HyperRectangle`]s (through `Deref`) and on a
//! [`super::RectangleBuilder`]'s pending dimensions alike.

use super::{DimensionInterval, GeometryError};

fn check_arity(a: &[DimensionInterval], b: &[DimensionInterval]) -> Result<(), GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::ArityMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// Returns true if the two regions share at least one point, i.e. their
/// intervals overlap in every dimension.
pub fn intersects(a: &[DimensionInterval], b: &[DimensionInterval]) -> Result<bool, GeometryError> {
    check_arity(a, b)?;
    for (x, y) in a.iter().zip(b) {
        if !x.overlaps(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true if the regions overlap in every dimension except `skip`.
///
/// While dimension `skip` of `target` grows, only rectangles passing this
/// test can block it: any other rectangle is already separated from
/// `target` along some other axis.
pub fn intersects_except_dimension(
    target: &[DimensionInterval],
    other: &[DimensionInterval],
    skip: usize,
) -> Result<bool, GeometryError> {
    check_arity(target, other)?;
    if skip >= target.len() {
        return Err(GeometryError::FeatureOutOfRange {
            feature: skip,
            count: target.len(),
        });
    }
    for (feature, (x, y)) in target.iter().zip(other).enumerate() {
        if feature == skip {
            continue;
        }
        if !x.overlaps(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}
