//! hyperrule - disjoint hyper-rectangle construction for rule-based classifiers
//!
//! Grows the largest axis-aligned region around a seed instance that does not
//! overlap any region already claimed by a rule, and keeps the coverage and
//! consistency bookkeeping that lets a rule-generation pass terminate.

pub mod config;
pub mod coverage;
pub mod dataset;
pub mod generation;
pub mod geometry;
pub mod growth;
pub mod rules;

pub use config::{GenerationConfig, GrowerConfig};
pub use coverage::{Coverage, CoverageError, SeedSelector};
pub use dataset::{Dataset, DatasetError, FeatureType, InMemoryDataset};
pub use generation::{GenerationError, GenerationReport, RuleGenerator, TerminationStatus};
pub use geometry::{DimensionInterval, GeometryError, HyperRectangle, RectangleBuilder};
pub use growth::{GrowthError, GrowthMetrics, GrowthOutcome, RectangleGrower};
pub use rules::{
    Antecedent, BoundaryTestCreator, ConsistencyChecker, Consequent, Label, RectangleCache, Rule,
    RuleError, RuleSet, TestCreator,
};

/// Identifier type used for rules.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
