//! Rules, their antecedent tests and the consistency bookkeeping around them.
//!
//! A [`Rule`] pairs an [`Antecedent`] (the region it fires on) with a
//! [`Consequent`] (the labels it predicts). The region of a rule is only
//! materialised as a [`HyperRectangle`] on demand, through
//! [`Rule::rectangle`] or the shared [`RectangleCache`].

mod cache;
mod consistency;
mod error;
mod test_creator;

pub use cache::{CacheStats, RectangleCache};
pub use consistency::{ConflictGraph, ConsistencyChecker};
pub use error::RuleError;
pub use test_creator::{Antecedent, BoundaryTestCreator, Condition, FeatureTest, TestCreator};

use std::fmt;
use std::ops::Deref;

use crate::dataset::{Dataset, FeatureType};
use crate::geometry::{GeometryError, HyperRectangle};
use crate::{generate_id, Id};

/// Class label predicted by a rule.
pub type Label = u32;

/// Sorted, de-duplicated set of labels a rule predicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consequent(Vec<Label>);

impl Consequent {
    pub fn new(labels: impl IntoIterator<Item = Label>) -> Self {
        let mut labels: Vec<Label> = labels.into_iter().collect();
        labels.sort_unstable();
        labels.dedup();
        Self(labels)
    }

    pub fn single(label: Label) -> Self {
        Self(vec![label])
    }

    pub fn labels(&self) -> &[Label] {
        &self.0
    }

    pub fn contains(&self, label: Label) -> bool {
        self.0.binary_search(&label).is_ok()
    }
}

impl From<Label> for Consequent {
    fn from(label: Label) -> Self {
        Self::single(label)
    }
}

impl fmt::Display for Consequent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.0.iter().map(|l| l.to_string()).collect();
        write!(f, "{{{}}}", labels.join(", "))
    }
}

/// An immutable classification rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    id: Id,
    antecedent: Antecedent,
    consequent: Consequent,
}

impl Rule {
    /// Creates a rule with a fresh unique id.
    pub fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        Self::with_id(generate_id(), antecedent, consequent)
    }

    pub fn with_id(id: impl Into<Id>, antecedent: Antecedent, consequent: Consequent) -> Self {
        Self {
            id: id.into(),
            antecedent,
            consequent,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn antecedent(&self) -> &Antecedent {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Consequent {
        &self.consequent
    }

    /// True if every test of the antecedent passes for `point`.
    pub fn matches(&self, point: &[f64]) -> bool {
        self.antecedent.matches(point)
    }

    /// Rebuilds the region this rule fires on.
    ///
    /// Features without a test span their whole domain. A test on a feature
    /// the dataset does not have, or whose condition kind disagrees with the
    /// feature type, is rejected.
    pub fn rectangle(&self, dataset: &dyn Dataset) -> Result<HyperRectangle, RuleError> {
        let count = dataset.feature_count();
        let mut dimensions = (0..count)
            .map(|feature| dataset.domain(feature))
            .collect::<Result<Vec<_>, _>>()?;

        for test in self.antecedent.iter() {
            let feature = test.feature;
            if feature >= count {
                return Err(GeometryError::FeatureOutOfRange { feature, count }.into());
            }
            let interval = test.interval()?;
            let expected_continuous = dataset.feature_type(feature) == FeatureType::Continuous;
            if interval.is_continuous() != expected_continuous {
                return Err(GeometryError::KindMismatch { feature }.into());
            }
            dimensions[feature] = interval;
        }
        Ok(HyperRectangle::new(dimensions)?)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {}", self.antecedent, self.consequent)
    }
}

/// Ordered collection of accepted rules with pairwise distinct ids.
///
/// Rule regions are cached by id, so two rules sharing an id would resolve
/// to the same region. Every way into a set rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Rule>", into = "Vec<Rule>")
)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `rules` in order, failing on the first repeated id.
    pub fn from_rules<I: IntoIterator<Item = Rule>>(rules: I) -> Result<Self, RuleError> {
        let mut set = Self::new();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, rule: Rule) -> Result<(), RuleError> {
        if self.contains_id(rule.id()) {
            return Err(RuleError::DuplicateId {
                id: rule.id().to_owned(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id() == id)
    }

    /// Consequents of the rules that match `point`, in rule order.
    pub fn predict(&self, point: &[f64]) -> Vec<&Consequent> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(point))
            .map(Rule::consequent)
            .collect()
    }

    /// Distinct consequents across the set, in first-seen order.
    pub fn consequents(&self) -> Vec<&Consequent> {
        let mut seen: Vec<&Consequent> = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.consequent()) {
                seen.push(rule.consequent());
            }
        }
        seen
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

impl Deref for RuleSet {
    type Target = [Rule];

    fn deref(&self) -> &Self::Target {
        &self.rules
    }
}

impl TryFrom<Vec<Rule>> for RuleSet {
    type Error = RuleError;

    fn try_from(rules: Vec<Rule>) -> Result<Self, Self::Error> {
        Self::from_rules(rules)
    }
}

impl From<RuleSet> for Vec<Rule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            writeln!(f, "[{}] {}", i, rule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;
    use crate::geometry::{next_representable, DimensionInterval};

    fn dataset() -> InMemoryDataset {
        InMemoryDataset::new(
            vec![FeatureType::Continuous, FeatureType::Categorical],
            vec![vec![1.0, 0.0], vec![4.0, 1.0], vec![9.0, 2.0]],
        )
        .unwrap()
    }

    fn range(feature: usize, lower: f64, upper: f64) -> FeatureTest {
        FeatureTest::new(feature, Condition::InRange { lower, upper })
    }

    #[test]
    fn consequent_is_a_sorted_set() {
        let c = Consequent::new([3, 1, 3, 2]);
        assert_eq!(c.labels(), &[1, 2, 3]);
        assert!(c.contains(2));
        assert_eq!(c, Consequent::new([2, 1, 3]));
        assert_eq!(c.to_string(), "{1, 2, 3}");
    }

    #[test]
    fn rules_get_unique_ids() {
        let a = Rule::new(Antecedent::always(), Consequent::single(0));
        let b = Rule::new(Antecedent::always(), Consequent::single(0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn rectangle_fills_untested_features_with_domain() {
        let ds = dataset();
        let rule = Rule::new(
            Antecedent::new(vec![range(0, 2.0, 5.0)]).unwrap(),
            Consequent::single(1),
        );
        let rect = rule.rectangle(&ds).unwrap();
        assert_eq!(rect[0].bounds(), Some((2.0, 5.0)));
        assert_eq!(rect[1], ds.domain(1).unwrap());
        assert!(rule.matches(&[4.0, 2.0]));
        assert!(!rule.matches(&[5.0, 2.0]));
    }

    #[test]
    fn empty_antecedent_spans_bounding_box() {
        let ds = dataset();
        let rule = Rule::new(Antecedent::always(), Consequent::single(0));
        assert_eq!(rule.rectangle(&ds).unwrap(), ds.bounding_box().unwrap());
        assert_eq!(
            rule.rectangle(&ds).unwrap()[0].bounds(),
            Some((1.0, next_representable(9.0)))
        );
    }

    #[test]
    fn rectangle_rejects_unknown_features_and_kinds() {
        let ds = dataset();
        let unknown = Rule::new(
            Antecedent::new(vec![range(5, 0.0, 1.0)]).unwrap(),
            Consequent::single(0),
        );
        assert_eq!(
            unknown.rectangle(&ds),
            Err(RuleError::Geometry(GeometryError::FeatureOutOfRange {
                feature: 5,
                count: 2
            }))
        );

        let wrong_kind = Rule::new(
            Antecedent::new(vec![range(1, 0.0, 1.0)]).unwrap(),
            Consequent::single(0),
        );
        assert_eq!(
            wrong_kind.rectangle(&ds),
            Err(RuleError::Geometry(GeometryError::KindMismatch { feature: 1 }))
        );
    }

    #[test]
    fn rule_display() {
        let rule = Rule::with_id(
            "r1",
            Antecedent::new(vec![FeatureTest::from(
                &DimensionInterval::categorical(1, [0.0, 2.0]).unwrap(),
            )])
            .unwrap(),
            Consequent::new([4, 2]),
        );
        assert_eq!(rule.to_string(), "IF x1 ∈ {0, 2} THEN {2, 4}");
    }

    #[test]
    fn rule_set_predicts_and_lists_consequents() {
        let mut set = RuleSet::new();
        set.push(Rule::with_id(
            "low",
            Antecedent::new(vec![range(0, 0.0, 5.0)]).unwrap(),
            Consequent::single(0),
        ))
        .unwrap();
        set.push(Rule::with_id(
            "high",
            Antecedent::new(vec![range(0, 5.0, 10.0)]).unwrap(),
            Consequent::single(1),
        ))
        .unwrap();
        set.push(Rule::with_id("any", Antecedent::always(), Consequent::single(0)))
            .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.get("high").map(Rule::consequent), Some(&Consequent::single(1)));
        assert_eq!(set.predict(&[7.0, 0.0]).len(), 2);
        assert_eq!(set.consequents().len(), 2);
        assert!(set.to_string().starts_with("[0] IF x0 ∈ [0.000, 5.000) THEN {0}"));
    }

    #[test]
    fn rule_set_rejects_repeated_ids() {
        let mut set = RuleSet::new();
        set.push(Rule::with_id(
            "dup",
            Antecedent::new(vec![range(0, 0.0, 1.0)]).unwrap(),
            Consequent::single(0),
        ))
        .unwrap();
        let again = Rule::with_id(
            "dup",
            Antecedent::new(vec![range(0, 5.0, 6.0)]).unwrap(),
            Consequent::single(0),
        );
        assert_eq!(
            set.push(again.clone()),
            Err(RuleError::DuplicateId { id: "dup".into() })
        );
        assert_eq!(set.len(), 1);
        assert!(set.contains_id("dup"));

        let first = set[0].clone();
        assert_eq!(
            RuleSet::try_from(vec![first, again]),
            Err(RuleError::DuplicateId { id: "dup".into() })
        );
    }

    #[test]
    fn rule_set_from_distinct_rules_keeps_order() {
        let set = RuleSet::from_rules(vec![
            Rule::with_id("b", Antecedent::always(), Consequent::single(1)),
            Rule::with_id("a", Antecedent::always(), Consequent::single(0)),
        ])
        .unwrap();
        let ids: Vec<&str> = set.iter().map(Rule::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(Vec::from(set).len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialising_rejects_repeated_ids() {
        let rule = Rule::with_id("dup", Antecedent::always(), Consequent::single(0));
        let json = serde_json::to_string(&vec![rule.clone(), rule]).unwrap();
        assert!(serde_json::from_str::<RuleSet>(&json).is_err());
    }
}
