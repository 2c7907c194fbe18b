//! One rule-generation pass over a labelled dataset.
//!
//! The pass repeats until a stop condition holds:
//!
//! 1. pick a seed among the uncovered instances,
//! 2. grow the largest rectangle around it that avoids every accepted rule,
//! 3. turn the rectangle into antecedent tests and label it with the
//!    majority label of the instances it holds,
//! 4. check the candidate against the accepted rules, accept it and merge
//!    its region into the coverage.
//!
//! Infeasible growth consumes one unit of the retry budget and excludes the
//! seed for the rest of the pass. Every other error aborts the pass.

mod error;

pub use error::GenerationError;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::GenerationConfig;
use crate::coverage::{Coverage, CoverageError, SeedSelector};
use crate::dataset::Dataset;
use crate::geometry::HyperRectangle;
use crate::growth::{GrowthMetrics, RectangleGrower};
use crate::rules::{
    BoundaryTestCreator, CacheStats, ConsistencyChecker, Consequent, Label, Rule, RuleSet,
    TestCreator,
};

/// Why a generation pass stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationStatus {
    /// Every instance is covered by an accepted rule.
    FullyCovered,
    /// The configured number of infeasible attempts was reached.
    RetryBudgetExhausted,
    /// The configured rule cap was reached.
    RuleLimitReached,
    /// Every remaining uncovered instance already failed as a seed.
    SeedsExhausted,
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationStatus::FullyCovered => "fully covered",
            TerminationStatus::RetryBudgetExhausted => "retry budget exhausted",
            TerminationStatus::RuleLimitReached => "rule limit reached",
            TerminationStatus::SeedsExhausted => "seeds exhausted",
        };
        f.write_str(text)
    }
}

/// Outcome of a generation pass.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub rules: RuleSet,
    /// Coverage of the dataset by `rules`, frozen at the end of the pass.
    pub coverage: Coverage,
    pub status: TerminationStatus,
    /// Rules added by this pass; the first `rules.len() - accepted` rules
    /// were given to it.
    pub accepted: usize,
    /// Growth counters summed over every attempt, infeasible ones included.
    pub metrics: GrowthMetrics,
    pub infeasible_attempts: usize,
    pub cache: CacheStats,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Generation Report ({}) ===", self.status)?;
        writeln!(
            f,
            "  Rules:               {} ({} accepted)",
            self.rules.len(),
            self.accepted
        )?;
        writeln!(
            f,
            "  Covered instances:   {}/{} ({:.1}%)",
            self.coverage.covered_count(),
            self.coverage.len(),
            self.coverage.ratio() * 100.0
        )?;
        writeln!(f, "  Infeasible attempts: {}", self.infeasible_attempts)?;
        writeln!(f, "  {}", self.cache)?;
        write!(f, "{}", self.metrics)
    }
}

/// Drives rule construction over one dataset.
pub struct RuleGenerator<C: TestCreator = BoundaryTestCreator> {
    config: GenerationConfig,
    grower: RectangleGrower,
    test_creator: C,
}

impl RuleGenerator<BoundaryTestCreator> {
    pub fn new(config: GenerationConfig) -> Self {
        Self::with_test_creator(config, BoundaryTestCreator)
    }
}

impl Default for RuleGenerator<BoundaryTestCreator> {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

impl<C: TestCreator> RuleGenerator<C> {
    pub fn with_test_creator(config: GenerationConfig, test_creator: C) -> Self {
        let grower = RectangleGrower::new(config.grower.clone());
        Self {
            config,
            grower,
            test_creator,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs one pass from an empty rule set.
    ///
    /// `labels[i]` is the class of instance `i`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        dataset: &dyn Dataset,
        labels: &[Label],
        rng: &mut R,
    ) -> Result<GenerationReport, GenerationError> {
        self.extend(dataset, labels, RuleSet::new(), rng)
    }

    /// Runs one pass that keeps `existing` and adds rules for the instances
    /// it leaves uncovered.
    ///
    /// New rules never overlap any existing rule. The existing rules are
    /// taken as given and not checked against each other; their ids are
    /// distinct, as in every [`RuleSet`].
    pub fn extend<R: Rng + ?Sized>(
        &self,
        dataset: &dyn Dataset,
        labels: &[Label],
        existing: RuleSet,
        rng: &mut R,
    ) -> Result<GenerationReport, GenerationError> {
        let instance_count = dataset.instance_count();
        if labels.len() != instance_count {
            return Err(GenerationError::LabelCount {
                expected: instance_count,
                found: labels.len(),
            });
        }

        let checker = ConsistencyChecker::with_cache_capacity(dataset, self.config.cache_capacity);
        let mut regions = existing
            .iter()
            .map(|rule| checker.region(rule))
            .collect::<Result<Vec<Arc<HyperRectangle>>, _>>()?;
        let mut coverage = Coverage::compute(dataset, &regions)?;
        let mut rules = existing;
        let mut selector = SeedSelector::new();
        let mut metrics = GrowthMetrics::default();
        let mut accepted = 0;
        let mut infeasible_attempts = 0;

        let status = loop {
            let seed_index = match selector.try_find_seed(&coverage, rules.len(), rng) {
                Ok(index) => index,
                Err(CoverageError::NoUncoveredInstances) => break TerminationStatus::FullyCovered,
                Err(CoverageError::AllSeedsExcluded { uncovered }) => {
                    warn!(uncovered, "every uncovered instance failed as a seed");
                    break TerminationStatus::SeedsExhausted;
                }
                Err(e) => return Err(e.into()),
            };
            // Only a pass with work left can be stopped by the cap.
            if self.config.max_rules.is_some_and(|cap| accepted >= cap) {
                break TerminationStatus::RuleLimitReached;
            }
            let seed = dataset.instance(seed_index);

            let outcome = match self.grower.grow(dataset, seed, &regions, rng) {
                Ok(outcome) => outcome,
                Err(e) if e.is_recoverable() => {
                    metrics.attempts += 1;
                    infeasible_attempts += 1;
                    selector.exclude(seed_index);
                    warn!(seed = seed_index, error = %e, "rectangle growth infeasible");
                    if infeasible_attempts >= self.config.retry_budget {
                        warn!(
                            attempts = infeasible_attempts,
                            "retry budget exhausted, stopping the pass"
                        );
                        break TerminationStatus::RetryBudgetExhausted;
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            metrics += outcome.metrics;

            let antecedent = self.test_creator.create_tests(&outcome.rectangle, dataset)?;
            let consequent = majority_label(dataset, labels, &outcome.rectangle, labels[seed_index])?;
            let rule = Rule::new(antecedent, consequent);

            checker.check_candidate(&rule, &rules)?;
            let region = checker.region(&rule)?;
            if !region.contains(seed)? {
                return Err(GenerationError::SeedNotCovered {
                    rule: rule.id().to_owned(),
                });
            }
            let newly_covered = coverage.include(dataset, &region)?;

            debug!(
                rule = %rule.id(),
                seed = seed_index,
                newly_covered,
                uncovered = coverage.uncovered_count(),
                "accepted rule {}",
                rule
            );
            rules.push(rule)?;
            regions.push(region);
            accepted += 1;
        };

        debug!(
            rules = rules.len(),
            accepted,
            covered = coverage.covered_count(),
            infeasible = infeasible_attempts,
            %status,
            "generation pass finished"
        );
        Ok(GenerationReport {
            rules,
            coverage,
            status,
            accepted,
            metrics,
            infeasible_attempts,
            cache: checker.cache().stats(),
        })
    }
}

/// Most frequent label among the instances inside `rectangle`; ties go to
/// `seed_label` if it is among the most frequent, else to the smallest label.
fn majority_label(
    dataset: &dyn Dataset,
    labels: &[Label],
    rectangle: &HyperRectangle,
    seed_label: Label,
) -> Result<Consequent, GenerationError> {
    let mut counts: HashMap<Label, usize> = HashMap::new();
    for (index, &label) in labels.iter().enumerate() {
        if rectangle.contains(dataset.instance(index))? {
            *counts.entry(label).or_default() += 1;
        }
    }
    let best = counts.values().copied().max().unwrap_or(0);
    if counts.get(&seed_label).copied().unwrap_or(0) == best {
        return Ok(Consequent::single(seed_label));
    }
    let label = counts
        .iter()
        .filter(|&(_, count)| *count == best)
        .map(|(&label, _)| label)
        .min()
        .unwrap_or(seed_label);
    Ok(Consequent::single(label))
}
