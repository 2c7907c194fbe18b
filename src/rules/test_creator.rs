//! Conversion of grown rectangles into rule antecedents.

use std::fmt;
use std::ops::Deref;

use crate::dataset::Dataset;
use crate::geometry::{DimensionInterval, GeometryError, HyperRectangle};

use super::RuleError;

/// Predicate a single feature value must satisfy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// `lower <= v < upper`.
    InRange { lower: f64, upper: f64 },
    /// `v` is one of the listed codes (sorted, unique).
    OneOf(Vec<f64>),
}

impl Condition {
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            Condition::InRange { lower, upper } => *lower <= value && value < *upper,
            Condition::OneOf(values) => values.iter().any(|v| *v == value),
        }
    }
}

/// A condition bound to one feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureTest {
    pub feature: usize,
    pub condition: Condition,
}

impl FeatureTest {
    pub fn new(feature: usize, condition: Condition) -> Self {
        Self { feature, condition }
    }

    /// True if the point's value for this feature passes. A point too short
    /// to hold the feature fails.
    pub fn passes(&self, point: &[f64]) -> bool {
        point
            .get(self.feature)
            .is_some_and(|value| self.condition.accepts(*value))
    }

    /// The region this test admits along its feature.
    pub fn interval(&self) -> Result<DimensionInterval, GeometryError> {
        match &self.condition {
            Condition::InRange { lower, upper } => {
                DimensionInterval::continuous(self.feature, *lower, *upper)
            }
            Condition::OneOf(values) => {
                DimensionInterval::categorical(self.feature, values.iter().copied())
            }
        }
    }
}

impl From<&DimensionInterval> for FeatureTest {
    fn from(interval: &DimensionInterval) -> Self {
        let condition = match interval {
            DimensionInterval::Continuous { lower, upper, .. } => Condition::InRange {
                lower: *lower,
                upper: *upper,
            },
            DimensionInterval::Categorical { values, .. } => Condition::OneOf(values.clone()),
        };
        Self::new(interval.feature(), condition)
    }
}

impl fmt::Display for FeatureTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.condition {
            Condition::InRange { lower, upper } => {
                write!(f, "x{} ∈ [{:.3}, {:.3})", self.feature, lower, upper)
            }
            Condition::OneOf(values) => {
                let codes: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "x{} ∈ {{{}}}", self.feature, codes.join(", "))
            }
        }
    }
}

/// Conjunction of feature tests, at most one per feature, ordered by feature.
///
/// Features without a test are unconstrained.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<FeatureTest>", into = "Vec<FeatureTest>")
)]
pub struct Antecedent {
    tests: Vec<FeatureTest>,
}

impl Antecedent {
    pub fn new(mut tests: Vec<FeatureTest>) -> Result<Self, RuleError> {
        tests.sort_by_key(|test| test.feature);
        if let Some(pair) = tests.windows(2).find(|w| w[0].feature == w[1].feature) {
            return Err(RuleError::DuplicateTest {
                feature: pair[0].feature,
            });
        }
        Ok(Self { tests })
    }

    /// The antecedent that matches every point.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn tests(&self) -> &[FeatureTest] {
        &self.tests
    }

    pub fn test_for(&self, feature: usize) -> Option<&FeatureTest> {
        self.tests
            .binary_search_by_key(&feature, |test| test.feature)
            .ok()
            .map(|index| &self.tests[index])
    }

    pub fn matches(&self, point: &[f64]) -> bool {
        self.tests.iter().all(|test| test.passes(point))
    }
}

impl Deref for Antecedent {
    type Target = [FeatureTest];

    fn deref(&self) -> &Self::Target {
        &self.tests
    }
}

impl TryFrom<Vec<FeatureTest>> for Antecedent {
    type Error = RuleError;

    fn try_from(tests: Vec<FeatureTest>) -> Result<Self, Self::Error> {
        Antecedent::new(tests)
    }
}

impl From<Antecedent> for Vec<FeatureTest> {
    fn from(antecedent: Antecedent) -> Self {
        antecedent.tests
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tests.is_empty() {
            return write!(f, "true");
        }
        for (i, test) in self.tests.iter().enumerate() {
            if i > 0 {
                write!(f, " ∧ ")?;
            }
            write!(f, "{}", test)?;
        }
        Ok(())
    }
}

/// Turns a grown rectangle into the tests of a rule antecedent.
pub trait TestCreator: Send + Sync {
    fn create_tests(
        &self,
        rectangle: &HyperRectangle,
        dataset: &dyn Dataset,
    ) -> Result<Antecedent, RuleError>;
}

/// Emits a test only for dimensions narrower than the feature's domain.
///
/// A dimension spanning the whole domain admits every observed value, so
/// the rule's region is unchanged when its test is left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryTestCreator;

impl TestCreator for BoundaryTestCreator {
    fn create_tests(
        &self,
        rectangle: &HyperRectangle,
        dataset: &dyn Dataset,
    ) -> Result<Antecedent, RuleError> {
        if rectangle.feature_count() != dataset.feature_count() {
            return Err(GeometryError::ArityMismatch {
                expected: dataset.feature_count(),
                found: rectangle.feature_count(),
            }
            .into());
        }
        let mut tests = Vec::new();
        for interval in rectangle.iter() {
            if *interval != dataset.domain(interval.feature())? {
                tests.push(FeatureTest::from(interval));
            }
        }
        Antecedent::new(tests)
    }
}
