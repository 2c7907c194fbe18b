//! Work counters returned alongside every grown rectangle.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Counters describing the work done by one or more growth calls.
///
/// Returned by value instead of accumulated in process-wide state, so
/// callers decide whether and how to aggregate them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthMetrics {
    /// Number of grow calls folded into these counters.
    pub attempts: usize,
    /// Dimensions processed across all calls.
    pub dimensions_processed: usize,
    /// Rectangle/dimension pairs examined by the relevance scan.
    pub rectangles_scanned: usize,
    /// Scans where the rectangle was relevant and could constrain growth.
    pub relevance_hits: usize,
    /// Dimensions whose committed interval is narrower than the domain.
    pub dimensions_constrained: usize,
}

impl Add for GrowthMetrics {
    type Output = GrowthMetrics;

    fn add(self, rhs: GrowthMetrics) -> GrowthMetrics {
        GrowthMetrics {
            attempts: self.attempts + rhs.attempts,
            dimensions_processed: self.dimensions_processed + rhs.dimensions_processed,
            rectangles_scanned: self.rectangles_scanned + rhs.rectangles_scanned,
            relevance_hits: self.relevance_hits + rhs.relevance_hits,
            dimensions_constrained: self.dimensions_constrained + rhs.dimensions_constrained,
        }
    }
}

impl AddAssign for GrowthMetrics {
    fn add_assign(&mut self, rhs: GrowthMetrics) {
        *self = *self + rhs;
    }
}

impl fmt::Display for GrowthMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Growth Metrics ({} attempts) ===", self.attempts)?;
        writeln!(f, "  Dimensions processed:   {}", self.dimensions_processed)?;
        writeln!(f, "  Rectangles scanned:     {}", self.rectangles_scanned)?;
        writeln!(f, "  Relevance hits:         {}", self.relevance_hits)?;
        write!(f, "  Dimensions constrained: {}", self.dimensions_constrained)
    }
}
