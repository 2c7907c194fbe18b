//! Seed-anchored growth of the largest rectangle disjoint from existing ones.
//!
//! The grower follows these steps:
//!
//! 1. **No existing rectangles**: the result is the dataset's global
//!    bounding box.
//!
//! 2. **Otherwise** the box starts as the degenerate point at the seed and
//!    dimensions are processed one at a time, in an order shuffled per call
//!    so that repeated rule construction does not always favour the same
//!    axes:
//!    - an existing rectangle is *relevant* to dimension `d` if it overlaps
//!      the partially grown box in every other dimension; only relevant
//!      rectangles can block growth along `d`;
//!    - continuous: a relevant rectangle entirely below the seed raises the
//!      lower bound to its upper bound, any other one lowers the upper bound
//!      to its lower bound. Unconstrained sides fall back to the domain;
//!    - categorical: relevant rectangles remove their values from the
//!      candidate set.
//!
//! 3. **Check**: the built box must contain the seed and intersect no
//!    existing rectangle. A failure there is an algorithm defect and is
//!    reported as [`GrowthError::InvariantViolation`].
//!
//! Each dimension reads the box produced by the previous one, so a single
//! growth call is sequential. The relevance scan within one dimension is
//! independent per rectangle and fans out over rayon above
//! [`GrowerConfig::parallel_threshold`] rectangles.

mod error;
mod metrics;

#[cfg(test)]
mod tests;

pub use error::GrowthError;
pub use metrics::GrowthMetrics;

use std::borrow::Borrow;
use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::GrowerConfig;
use crate::dataset::Dataset;
use crate::geometry::{
    intersects, intersects_except_dimension, DimensionInterval, GeometryError, HyperRectangle,
    RectangleBuilder,
};

/// A grown rectangle together with the work it took to grow it.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthOutcome {
    pub rectangle: HyperRectangle,
    pub metrics: GrowthMetrics,
}

/// Builds maximal rectangles around seeds without overlapping existing ones.
///
/// The grower holds only configuration; concurrent calls with different
/// seeds each own their own [`RectangleBuilder`].
#[derive(Debug, Clone, Default)]
pub struct RectangleGrower {
    config: GrowerConfig,
}

/// Bound adjustments gathered from the relevance scan of one dimension.
#[derive(Debug, Clone)]
struct Tightening {
    lower: f64,
    upper: f64,
    excluded: Vec<f64>,
    scanned: usize,
    relevant: usize,
}

impl Tightening {
    fn unbounded() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            excluded: Vec::new(),
            scanned: 0,
            relevant: 0,
        }
    }

    fn merge(mut self, other: Tightening) -> Self {
        self.lower = self.lower.max(other.lower);
        self.upper = self.upper.min(other.upper);
        self.excluded.extend(other.excluded);
        self.scanned += other.scanned;
        self.relevant += other.relevant;
        self
    }
}

impl RectangleGrower {
    pub fn new(config: GrowerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrowerConfig {
        &self.config
    }

    /// Grows around `seed`, processing dimensions in a random order.
    pub fn grow<E, R>(
        &self,
        dataset: &dyn Dataset,
        seed: &[f64],
        existing: &[E],
        rng: &mut R,
    ) -> Result<GrowthOutcome, GrowthError>
    where
        E: Borrow<HyperRectangle> + Sync,
        R: Rng + ?Sized,
    {
        let mut order: Vec<usize> = (0..dataset.feature_count()).collect();
        order.shuffle(rng);
        self.grow_in_order(dataset, seed, existing, &order)
    }

    /// Grows around `seed`, processing dimensions in the given order.
    ///
    /// `order` must be a permutation of `0..feature_count`.
    pub fn grow_in_order<E>(
        &self,
        dataset: &dyn Dataset,
        seed: &[f64],
        existing: &[E],
        order: &[usize],
    ) -> Result<GrowthOutcome, GrowthError>
    where
        E: Borrow<HyperRectangle> + Sync,
    {
        let domains = seed_domains(dataset, seed)?;
        check_order(order, domains.len())?;

        let mut metrics = GrowthMetrics {
            attempts: 1,
            ..GrowthMetrics::default()
        };

        if existing.is_empty() {
            let rectangle = RectangleBuilder::maximal(dataset)?.try_build()?;
            debug!(
                features = rectangle.feature_count(),
                "no existing rectangles, returning the bounding box"
            );
            return Ok(GrowthOutcome { rectangle, metrics });
        }

        let mut builder = RectangleBuilder::around_seed(seed, dataset)?;
        for &feature in order {
            self.grow_dimension(
                &mut builder,
                feature,
                seed[feature],
                &domains[feature],
                existing,
                &mut metrics,
            )?;
        }

        let rectangle = builder.try_build().map_err(infeasible_or_invalid)?;
        verify(&rectangle, seed, existing)?;

        debug!(
            existing = existing.len(),
            relevance_hits = metrics.relevance_hits,
            constrained = metrics.dimensions_constrained,
            "grew disjoint rectangle"
        );
        Ok(GrowthOutcome { rectangle, metrics })
    }

    fn grow_dimension<E>(
        &self,
        builder: &mut RectangleBuilder,
        feature: usize,
        seed_value: f64,
        domain: &DimensionInterval,
        existing: &[E],
        metrics: &mut GrowthMetrics,
    ) -> Result<(), GrowthError>
    where
        E: Borrow<HyperRectangle> + Sync,
    {
        let tightening = {
            let target = builder.dimensions();
            if existing.len() >= self.config.parallel_threshold {
                existing
                    .par_iter()
                    .map(|other| tighten(target, as_rectangle(other), feature, seed_value))
                    .try_reduce(Tightening::unbounded, |a, b| Ok(a.merge(b)))?
            } else {
                existing
                    .iter()
                    .try_fold(Tightening::unbounded(), |acc, other| {
                        tighten(target, as_rectangle(other), feature, seed_value)
                            .map(|t| acc.merge(t))
                    })?
            }
        };

        metrics.dimensions_processed += 1;
        metrics.rectangles_scanned += tightening.scanned;
        metrics.relevance_hits += tightening.relevant;

        match domain {
            DimensionInterval::Continuous {
                lower: domain_lower,
                upper: domain_upper,
                ..
            } => {
                let lower = tightening.lower.max(*domain_lower);
                let upper = tightening.upper.min(*domain_upper);
                if !(lower <= seed_value && seed_value < upper) {
                    trace!(feature, lower, upper, seed_value, "seed squeezed out");
                    return Err(GrowthError::ConstructionInfeasible { feature });
                }
                builder
                    .update_start(feature, lower)
                    .map_err(infeasible_or_invalid)?;
                builder
                    .update_end(feature, upper)
                    .map_err(infeasible_or_invalid)?;
                if lower > *domain_lower || upper < *domain_upper {
                    metrics.dimensions_constrained += 1;
                }
                trace!(
                    feature,
                    lower,
                    upper,
                    relevant = tightening.relevant,
                    "committed continuous dimension"
                );
            }
            DimensionInterval::Categorical { values, .. } => {
                let mut excluded = tightening.excluded;
                excluded.sort_by(f64::total_cmp);
                excluded.dedup();
                let remaining: Vec<f64> = values
                    .iter()
                    .copied()
                    .filter(|&value| !sorted_contains(&excluded, value))
                    .collect();
                if !sorted_contains(&remaining, seed_value) {
                    trace!(feature, seed_value, "seed category excluded");
                    return Err(GrowthError::ConstructionInfeasible { feature });
                }
                if remaining.len() < values.len() {
                    metrics.dimensions_constrained += 1;
                }
                trace!(
                    feature,
                    kept = remaining.len(),
                    relevant = tightening.relevant,
                    "committed categorical dimension"
                );
                builder.set_values(feature, remaining)?;
            }
        }
        Ok(())
    }
}

fn as_rectangle<E: Borrow<HyperRectangle>>(item: &E) -> &HyperRectangle {
    item.borrow()
}

/// Bound adjustment a single existing rectangle imposes on `feature`.
fn tighten(
    target: &[DimensionInterval],
    other: &HyperRectangle,
    feature: usize,
    seed_value: f64,
) -> Result<Tightening, GeometryError> {
    let mut tightening = Tightening::unbounded();
    tightening.scanned = 1;
    if !intersects_except_dimension(target, other, feature)? {
        return Ok(tightening);
    }
    tightening.relevant = 1;
    match (&target[feature], &other[feature]) {
        (DimensionInterval::Continuous { .. }, DimensionInterval::Continuous { lower, upper, .. }) => {
            if seed_value >= *upper {
                tightening.lower = *upper;
            } else {
                tightening.upper = *lower;
            }
        }
        (DimensionInterval::Categorical { .. }, DimensionInterval::Categorical { values, .. }) => {
            tightening.excluded = values.clone();
        }
        _ => return Err(GeometryError::KindMismatch { feature }),
    }
    Ok(tightening)
}

/// Validates the seed against the dataset and returns every feature's domain.
fn seed_domains(dataset: &dyn Dataset, seed: &[f64]) -> Result<Vec<DimensionInterval>, GeometryError> {
    if seed.len() != dataset.feature_count() {
        return Err(GeometryError::ArityMismatch {
            expected: dataset.feature_count(),
            found: seed.len(),
        });
    }
    seed.iter()
        .enumerate()
        .map(|(feature, &value)| {
            let domain = dataset.domain(feature)?;
            if !domain.contains(value) {
                return Err(GeometryError::OutsideDomain { feature, value });
            }
            Ok(domain)
        })
        .collect()
}

fn check_order(order: &[usize], count: usize) -> Result<(), GeometryError> {
    if order.len() != count {
        return Err(GeometryError::ArityMismatch {
            expected: count,
            found: order.len(),
        });
    }
    let mut seen = vec![false; count];
    for &feature in order {
        let slot = seen
            .get_mut(feature)
            .ok_or(GeometryError::FeatureOutOfRange { feature, count })?;
        if *slot {
            return Err(GeometryError::DuplicateDimension { feature });
        }
        *slot = true;
    }
    Ok(())
}

fn sorted_contains(values: &[f64], value: f64) -> bool {
    values
        .binary_search_by(|held| held.partial_cmp(&value).unwrap_or(Ordering::Less))
        .is_ok()
}

/// Empty or inverted dimensions mean "no room"; anything else is bad input.
fn infeasible_or_invalid(error: GeometryError) -> GrowthError {
    match error {
        GeometryError::InvalidBounds { feature, .. }
        | GeometryError::EmptyCategorySet { feature }
        | GeometryError::InvariantViolation { feature, .. } => {
            GrowthError::ConstructionInfeasible { feature }
        }
        other => GrowthError::InvalidInput(other),
    }
}

fn verify<E: Borrow<HyperRectangle>>(
    rectangle: &HyperRectangle,
    seed: &[f64],
    existing: &[E],
) -> Result<(), GrowthError> {
    if !rectangle.contains(seed)? {
        return Err(GrowthError::InvariantViolation(format!(
            "grown rectangle {} excludes its seed {:?}",
            rectangle, seed
        )));
    }
    for (index, other) in existing.iter().enumerate() {
        if intersects(rectangle, as_rectangle(other))? {
            return Err(GrowthError::InvariantViolation(format!(
                "grown rectangle {} intersects existing rectangle #{}",
                rectangle, index
            )));
        }
    }
    Ok(())
}
