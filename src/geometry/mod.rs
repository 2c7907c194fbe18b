//! Axis-aligned geometry: per-feature intervals, hyper-rectangles, the
//! mutable builder used while a rectangle grows, and intersection tests.
//!
//! Continuous dimensions follow the half-open `[lower, upper)` convention
//! everywhere, so two intervals that share a boundary never intersect.

mod builder;
mod error;
pub mod intersect;
mod interval;
mod rectangle;

pub use builder::RectangleBuilder;
pub use error::GeometryError;
pub use intersect::{intersects, intersects_except_dimension};
pub use interval::{next_representable, DimensionInterval};
pub use rectangle::HyperRectangle;
