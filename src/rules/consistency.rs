//! Pairwise consistency between rules.
//!
//! Two rules are consistent when they predict the same consequent or when
//! their regions do not intersect. The consequent comparison runs first so
//! agreeing rules never touch the geometry.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use super::{RectangleCache, Rule, RuleError, RuleSet};
use crate::dataset::Dataset;
use crate::geometry::{intersects, HyperRectangle};
use crate::Id;

/// Checks rule consistency against one dataset.
///
/// Rule regions are resolved through a [`RectangleCache`] owned by the
/// checker. Cached regions depend on the dataset's domains, so the cache
/// never outlives or changes its dataset.
pub struct ConsistencyChecker<'a> {
    dataset: &'a dyn Dataset,
    cache: RectangleCache,
}

impl<'a> ConsistencyChecker<'a> {
    pub fn new(dataset: &'a dyn Dataset) -> Self {
        Self {
            dataset,
            cache: RectangleCache::default(),
        }
    }

    /// A checker whose region cache holds at most `capacity` entries; zero
    /// disables caching.
    pub fn with_cache_capacity(dataset: &'a dyn Dataset, capacity: usize) -> Self {
        Self {
            dataset,
            cache: RectangleCache::new(capacity),
        }
    }

    pub fn dataset(&self) -> &'a dyn Dataset {
        self.dataset
    }

    pub fn cache(&self) -> &RectangleCache {
        &self.cache
    }

    /// Region of `rule` over this checker's dataset.
    pub fn region(&self, rule: &Rule) -> Result<Arc<HyperRectangle>, RuleError> {
        self.cache.get_or_derive(rule, self.dataset)
    }

    /// Fails with [`RuleError::DuplicateId`] for two different rules that
    /// share an id, since they would share a cached region.
    pub fn are_consistent(&self, a: &Rule, b: &Rule) -> Result<bool, RuleError> {
        if a.id() == b.id() {
            if a == b {
                return Ok(true);
            }
            return Err(RuleError::DuplicateId {
                id: a.id().to_owned(),
            });
        }
        if a.consequent() == b.consequent() {
            return Ok(true);
        }
        let ra = self.region(a)?;
        let rb = self.region(b)?;
        Ok(!intersects(&ra, &rb)?)
    }

    /// Checks one candidate against already accepted rules in O(k).
    ///
    /// Fails with [`RuleError::DuplicateId`] if an accepted rule already
    /// carries the candidate's id, and with [`RuleError::Inconsistent`]
    /// naming the first conflicting accepted rule.
    pub fn check_candidate(&self, candidate: &Rule, accepted: &RuleSet) -> Result<(), RuleError> {
        if accepted.contains_id(candidate.id()) {
            return Err(RuleError::DuplicateId {
                id: candidate.id().to_owned(),
            });
        }
        for existing in accepted.iter() {
            if !self.are_consistent(candidate, existing)? {
                return Err(RuleError::Inconsistent {
                    candidate: candidate.id().to_owned(),
                    existing: existing.id().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Checks every pair of the set in O(k²).
    pub fn is_consistent(&self, rules: &RuleSet) -> Result<bool, RuleError> {
        for (i, a) in rules.iter().enumerate() {
            for b in &rules[i + 1..] {
                if !self.are_consistent(a, b)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Builds the graph whose edges are the inconsistent pairs of `rules`.
    pub fn conflict_graph(&self, rules: &RuleSet) -> Result<ConflictGraph, RuleError> {
        let mut graph = UnGraph::<Id, ()>::with_capacity(rules.len(), 0);
        let mut node_by_id = HashMap::with_capacity(rules.len());
        let nodes: Vec<NodeIndex> = rules
            .iter()
            .map(|rule| {
                let node = graph.add_node(rule.id().to_owned());
                node_by_id.insert(rule.id().to_owned(), node);
                node
            })
            .collect();

        for (i, a) in rules.iter().enumerate() {
            for (j, b) in rules.iter().enumerate().skip(i + 1) {
                if !self.are_consistent(a, b)? {
                    graph.add_edge(nodes[i], nodes[j], ());
                }
            }
        }

        debug!(
            rules = rules.len(),
            conflicts = graph.edge_count(),
            "built conflict graph"
        );
        Ok(ConflictGraph { graph, node_by_id })
    }
}

/// Rules as nodes, inconsistent pairs as edges.
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    graph: UnGraph<Id, ()>,
    node_by_id: HashMap<Id, NodeIndex>,
}

impl ConflictGraph {
    pub fn graph(&self) -> &UnGraph<Id, ()> {
        &self.graph
    }

    pub fn conflict_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_consistent(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Ids of the rules conflicting with `id`, sorted.
    pub fn conflicts_of(&self, id: &str) -> Vec<&str> {
        let Some(&node) = self.node_by_id.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors(node)
            .map(|other| self.graph[other].as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All conflicting pairs as id tuples.
    pub fn conflicting_pairs(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(a, b)| (self.graph[a].as_str(), self.graph[b].as_str()))
            .collect()
    }

    /// Number of connected groups of rules, isolated rules included.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }
}
