//! LRU cache of rule regions keyed by rule id.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{Rule, RuleError};
use crate::dataset::Dataset;
use crate::geometry::HyperRectangle;
use crate::Id;

/// Snapshot of cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache {}/{} entries, {} hits, {} misses ({:.1}% hit rate)",
            self.entries,
            self.capacity,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Id, Arc<HyperRectangle>>,
    /// Least recently used id at the front.
    recency: VecDeque<Id>,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn touch(&mut self, id: &str) {
        if let Some(position) = self.recency.iter().position(|entry| entry == id) {
            if let Some(entry) = self.recency.remove(position) {
                self.recency.push_back(entry);
            }
        }
    }

    fn insert(&mut self, id: Id, rectangle: Arc<HyperRectangle>, capacity: usize) {
        if self.entries.insert(id.clone(), rectangle).is_some() {
            self.touch(&id);
            return;
        }
        self.recency.push_back(id);
        while self.entries.len() > capacity {
            match self.recency.pop_front() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    trace!(rule = %evicted, "evicted cached rectangle");
                }
                None => break,
            }
        }
    }
}

/// Bounded cache from rule id to the rule's derived rectangle.
///
/// Map and recency list live behind a single lock, so concurrent readers
/// serialise on it. Rectangles are handed out as `Arc`s and never mutated.
/// A capacity of zero disables caching: every lookup derives afresh.
///
/// Entries are keyed by rule id alone and depend on the dataset's domains,
/// so one cache serves one dataset and rules with distinct ids, as a
/// [`super::ConsistencyChecker`] arranges.
#[derive(Debug)]
pub struct RectangleCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl RectangleCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached rectangle of `rule`, deriving and caching it on a miss.
    ///
    /// Derivation runs outside the lock; two threads missing on the same rule
    /// both derive, and the later insert wins with an equal value.
    pub fn get_or_derive(
        &self,
        rule: &Rule,
        dataset: &dyn Dataset,
    ) -> Result<Arc<HyperRectangle>, RuleError> {
        {
            let mut state = self.state.lock();
            if let Some(rectangle) = state.entries.get(rule.id()).cloned() {
                state.hits += 1;
                state.touch(rule.id());
                return Ok(rectangle);
            }
            state.misses += 1;
        }

        let rectangle = Arc::new(rule.rectangle(dataset)?);
        if self.capacity > 0 {
            self.state
                .lock()
                .insert(rule.id().to_owned(), Arc::clone(&rectangle), self.capacity);
        }
        Ok(rectangle)
    }

    /// Stores a rectangle already known for a rule, e.g. the one it was grown from.
    pub fn insert(&self, id: impl Into<Id>, rectangle: Arc<HyperRectangle>) {
        if self.capacity == 0 {
            return;
        }
        self.state.lock().insert(id.into(), rectangle, self.capacity);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().entries.contains_key(id)
    }

    /// Drops the entry of one rule; returns whether it was cached.
    pub fn invalidate(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let removed = state.entries.remove(id).is_some();
        if removed {
            state.recency.retain(|entry| entry != id);
        }
        removed
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        *self.state.lock() = CacheState::default();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for RectangleCache {
    fn default() -> Self {
        Self::new(256)
    }
}
