//! Test suite for the rectangle grower.

use super::*;
use crate::dataset::{FeatureType, InMemoryDataset};
use crate::geometry::next_representable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Builds a rectangle from continuous `(lower, upper)` pairs.
fn boxed(bounds: &[(f64, f64)]) -> HyperRectangle {
    HyperRectangle::new(
        bounds
            .iter()
            .enumerate()
            .map(|(f, &(lo, hi))| DimensionInterval::continuous(f, lo, hi).unwrap())
            .collect(),
    )
    .unwrap()
}

fn line(values: &[f64]) -> InMemoryDataset {
    InMemoryDataset::continuous(values.iter().map(|&v| vec![v]).collect()).unwrap()
}

fn plane() -> InMemoryDataset {
    InMemoryDataset::continuous(vec![
        vec![0.0, 0.0],
        vec![2.0, 3.0],
        vec![4.0, 8.0],
        vec![5.0, 5.0],
        vec![7.0, 2.0],
        vec![9.0, 9.0],
    ])
    .unwrap()
}

fn grower() -> RectangleGrower {
    RectangleGrower::default()
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn test_no_existing_rectangles_yields_full_range() {
        let ds = line(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let none: &[HyperRectangle] = &[];
        let outcome = grower().grow_in_order(&ds, &[5.0], none, &[0]).unwrap();

        assert_eq!(outcome.rectangle, ds.bounding_box().unwrap());
        assert_eq!(
            outcome.rectangle[0].bounds(),
            Some((1.0, next_representable(9.0)))
        );
        for v in [1.0, 3.0, 5.0, 7.0, 9.0] {
            assert!(outcome.rectangle.contains(&[v]).unwrap());
        }
    }

    #[test]
    fn test_no_existing_rectangles_matches_maximal_builder() {
        let ds = InMemoryDataset::new(
            vec![FeatureType::Continuous, FeatureType::Categorical],
            vec![vec![2.0, 1.0], vec![6.0, 4.0], vec![3.0, 1.0]],
        )
        .unwrap();
        let none: &[HyperRectangle] = &[];
        let outcome = grower().grow_in_order(&ds, &[3.0, 1.0], none, &[1, 0]).unwrap();

        let maximal = RectangleBuilder::maximal(&ds).unwrap().try_build().unwrap();
        assert_eq!(outcome.rectangle, maximal);
        assert_eq!(outcome.rectangle[1].values(), Some(&[1.0, 4.0][..]));
        assert_eq!(outcome.metrics.rectangles_scanned, 0);
    }

    #[test]
    fn test_existing_rectangle_below_seed_raises_lower_bound() {
        let ds = plane();
        let existing = vec![boxed(&[(0.0, 5.0), (0.0, next_representable(9.0))])];

        for order in [[0, 1], [1, 0]] {
            let outcome = grower()
                .grow_in_order(&ds, &[7.0, 2.0], &existing, &order)
                .unwrap();
            assert_eq!(
                outcome.rectangle[0].bounds(),
                Some((5.0, next_representable(9.0)))
            );
            assert_eq!(
                outcome.rectangle[1].bounds(),
                Some((0.0, next_representable(9.0)))
            );
        }
    }

    #[test]
    fn test_seed_on_exclusive_boundary_starts_growth_there() {
        let ds = plane();
        let existing = vec![boxed(&[(0.0, 5.0), (0.0, next_representable(9.0))])];
        assert!(!existing[0].contains(&[5.0, 5.0]).unwrap());

        let outcome = grower()
            .grow_in_order(&ds, &[5.0, 5.0], &existing, &[0, 1])
            .unwrap();
        let (lower, _) = outcome.rectangle[0].bounds().unwrap();
        assert_eq!(lower, 5.0);
        assert!(outcome.rectangle.contains(&[5.0, 5.0]).unwrap());
    }
}

#[cfg(test)]
mod growth_rules {
    use super::*;

    #[test]
    fn test_growth_stops_at_nearest_blocker_on_each_side() {
        let ds = line(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let existing = vec![boxed(&[(1.0, 3.0)]), boxed(&[(7.0, 8.0)])];
        let outcome = grower().grow_in_order(&ds, &[5.0], &existing, &[0]).unwrap();
        assert_eq!(outcome.rectangle[0].bounds(), Some((3.0, 7.0)));
        assert_eq!(outcome.metrics.relevance_hits, 2);
        assert_eq!(outcome.metrics.dimensions_constrained, 1);
    }

    #[test]
    fn test_irrelevant_rectangles_do_not_constrain() {
        let ds = plane();
        // Separated from the seed along y, so it never blocks x.
        let existing = vec![boxed(&[(0.0, 9.0), (6.0, 7.0)])];
        let outcome = grower()
            .grow_in_order(&ds, &[2.0, 3.0], &existing, &[0, 1])
            .unwrap();
        assert_eq!(
            outcome.rectangle[0].bounds(),
            Some((0.0, next_representable(9.0)))
        );
        assert_eq!(outcome.rectangle[1].bounds(), Some((0.0, 6.0)));
    }

    #[test]
    fn test_order_changes_shape_but_not_guarantees() {
        let ds = plane();
        let existing = vec![boxed(&[(5.0, 9.0), (5.0, 9.0)])];
        let seed = [2.0, 3.0];

        let x_first = grower()
            .grow_in_order(&ds, &seed, &existing, &[0, 1])
            .unwrap()
            .rectangle;
        let y_first = grower()
            .grow_in_order(&ds, &seed, &existing, &[1, 0])
            .unwrap()
            .rectangle;

        // x first: x is free (y is still a point) so y is cut at 5.
        assert_eq!(x_first[1].bounds(), Some((0.0, 5.0)));
        // y first: y is free so x is cut at 5.
        assert_eq!(y_first[0].bounds(), Some((0.0, 5.0)));
        for rect in [&x_first, &y_first] {
            assert!(rect.contains(&seed).unwrap());
            assert!(!intersects(rect, &existing[0]).unwrap());
        }
    }

    #[test]
    fn test_categorical_growth_removes_blocking_values() {
        let ds = InMemoryDataset::new(
            vec![FeatureType::Continuous, FeatureType::Categorical],
            vec![vec![1.0, 0.0], vec![3.0, 2.0], vec![9.0, 1.0]],
        )
        .unwrap();
        let existing = vec![HyperRectangle::new(vec![
            DimensionInterval::continuous(0, 1.0, next_representable(9.0)).unwrap(),
            DimensionInterval::categorical(1, [0.0, 1.0]).unwrap(),
        ])
        .unwrap()];

        for order in [[0, 1], [1, 0]] {
            let rect = grower()
                .grow_in_order(&ds, &[3.0, 2.0], &existing, &order)
                .unwrap()
                .rectangle;
            assert_eq!(rect[1].values(), Some(&[2.0][..]));
            assert_eq!(
                rect[0].bounds(),
                Some((1.0, next_representable(9.0)))
            );
        }
    }

    #[test]
    fn test_covered_seed_is_infeasible() {
        let ds = line(&[1.0, 2.0, 3.0]);
        let existing = vec![boxed(&[(1.0, 3.0)])];
        let err = grower()
            .grow_in_order(&ds, &[2.0], &existing, &[0])
            .unwrap_err();
        assert_eq!(err, GrowthError::ConstructionInfeasible { feature: 0 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_covered_categorical_seed_is_infeasible() {
        let ds = InMemoryDataset::new(
            vec![FeatureType::Categorical],
            vec![vec![0.0], vec![1.0]],
        )
        .unwrap();
        let existing = vec![HyperRectangle::new(vec![
            DimensionInterval::categorical(0, [1.0]).unwrap(),
        ])
        .unwrap()];
        assert_eq!(
            grower().grow_in_order(&ds, &[1.0], &existing, &[0]),
            Err(GrowthError::ConstructionInfeasible { feature: 0 })
        );
    }

    #[test]
    fn test_shared_rectangles_are_accepted() {
        let ds = line(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let existing = vec![Arc::new(boxed(&[(1.0, 3.0)]))];
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = grower().grow(&ds, &[5.0], &existing, &mut rng).unwrap();
        assert_eq!(
            outcome.rectangle[0].bounds(),
            Some((3.0, next_representable(9.0)))
        );
    }
}

#[cfg(test)]
mod invalid_input {
    use super::*;

    #[test]
    fn test_seed_of_wrong_length() {
        let ds = plane();
        let none: &[HyperRectangle] = &[];
        assert!(matches!(
            grower().grow_in_order(&ds, &[1.0], none, &[0, 1]),
            Err(GrowthError::InvalidInput(GeometryError::ArityMismatch {
                expected: 2,
                found: 1
            }))
        ));
    }

    #[test]
    fn test_seed_outside_domain_or_not_finite() {
        let ds = plane();
        let none: &[HyperRectangle] = &[];
        assert!(matches!(
            grower().grow_in_order(&ds, &[12.0, 1.0], none, &[0, 1]),
            Err(GrowthError::InvalidInput(GeometryError::OutsideDomain {
                feature: 0,
                ..
            }))
        ));
        assert!(matches!(
            grower().grow_in_order(&ds, &[1.0, f64::NAN], none, &[0, 1]),
            Err(GrowthError::InvalidInput(GeometryError::OutsideDomain {
                feature: 1,
                ..
            }))
        ));
    }

    #[test]
    fn test_order_must_be_a_permutation() {
        let ds = plane();
        let none: &[HyperRectangle] = &[];
        let seed = [2.0, 3.0];
        assert!(matches!(
            grower().grow_in_order(&ds, &seed, none, &[0, 0]),
            Err(GrowthError::InvalidInput(GeometryError::DuplicateDimension {
                feature: 0
            }))
        ));
        assert!(matches!(
            grower().grow_in_order(&ds, &seed, none, &[0, 2]),
            Err(GrowthError::InvalidInput(GeometryError::FeatureOutOfRange {
                feature: 2,
                count: 2
            }))
        ));
        assert!(matches!(
            grower().grow_in_order(&ds, &seed, none, &[0]),
            Err(GrowthError::InvalidInput(GeometryError::ArityMismatch { .. }))
        ));
    }

    #[test]
    fn test_existing_rectangle_with_wrong_schema() {
        let ds = plane();
        let existing = vec![boxed(&[(0.0, 1.0)])];
        assert!(matches!(
            grower().grow_in_order(&ds, &[2.0, 3.0], &existing, &[0, 1]),
            Err(GrowthError::InvalidInput(GeometryError::ArityMismatch { .. }))
        ));
    }
}

#[cfg(test)]
mod parallel_scan {
    use super::*;

    fn blockers() -> Vec<HyperRectangle> {
        // A staircase of small boxes scattered over the plane.
        (0..40)
            .map(|i| {
                let x = (i % 10) as f64 * 0.9;
                let y = (i / 10) as f64 * 2.3;
                boxed(&[(x, x + 0.3), (y, y + 0.4)])
            })
            .collect()
    }

    #[test]
    fn test_parallel_and_sequential_scans_agree() {
        let ds = plane();
        let existing = blockers();
        let sequential = RectangleGrower::new(GrowerConfig {
            parallel_threshold: usize::MAX,
        });
        let parallel = RectangleGrower::new(GrowerConfig {
            parallel_threshold: 0,
        });
        let seed = [4.0, 8.0];

        for order in [[0, 1], [1, 0]] {
            let a = sequential.grow_in_order(&ds, &seed, &existing, &order).unwrap();
            let b = parallel.grow_in_order(&ds, &seed, &existing, &order).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.metrics.rectangles_scanned, 2 * existing.len());
        }
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn grown_rectangles_contain_seed_and_stay_disjoint(
            points in prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), 1..30),
            seed in any::<u64>(),
        ) {
            let ds = InMemoryDataset::continuous(
                points.iter().map(|&(x, y)| vec![x, y]).collect(),
            ).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut placed: Vec<HyperRectangle> = Vec::new();

            for &(x, y) in &points {
                let point = [x, y];
                let covered = placed.iter().any(|r| r.contains(&point).unwrap());
                if covered {
                    continue;
                }
                let outcome = grower().grow(&ds, &point, &placed, &mut rng).unwrap();
                prop_assert!(outcome.rectangle.contains(&point).unwrap());
                for other in &placed {
                    prop_assert!(!intersects(&outcome.rectangle, other).unwrap());
                }
                placed.push(outcome.rectangle);
            }

            for &(x, y) in &points {
                prop_assert!(placed.iter().any(|r| r.contains(&[x, y]).unwrap()));
            }
        }
    }
}
