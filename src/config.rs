//! Configuration for rectangle growth and rule-generation passes.

/// Tuning knobs for [`crate::growth::RectangleGrower`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowerConfig {
    /// Minimum number of existing rectangles before the per-dimension
    /// relevance scan fans out over the rayon thread pool.
    pub parallel_threshold: usize,
}

impl Default for GrowerConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 64,
        }
    }
}

/// Configuration for a single [`crate::generation::RuleGenerator`] pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Settings forwarded to the grower.
    pub grower: GrowerConfig,
    /// Stop once this many rules were accepted (`None` = until covered).
    pub max_rules: Option<usize>,
    /// Number of infeasible growth attempts tolerated before the pass stops.
    pub retry_budget: usize,
    /// Capacity of the rule → rectangle LRU cache (0 disables caching).
    pub cache_capacity: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grower: GrowerConfig::default(),
            max_rules: None,
            retry_budget: 32,
            cache_capacity: 256,
        }
    }
}
