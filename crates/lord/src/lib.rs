//! lord: local-optimal rule discovery for classification.
//!
//! Rows are pre-encoded as ascending arrays of selector ids. Training builds a
//! prefix tree over all rows, derives the support of any selector set through
//! occurrence-list algebra, searches one locally optimal rule per row, filters
//! the candidates, and indexes the survivors in a rule trie used for
//! prediction.
//!
//! # Key Types
//!
//! - [`LordModel`] - High-level classifier with train/predict/explain
//! - [`LordConfig`] - Configuration builder
//! - [`Heuristic`] - Rule quality metrics
//! - [`Dataset`] - Validated training rows
//!
//! # Lower-level building blocks
//!
//! - [`repr::PrefixTree`] and [`repr::OccurrenceList`] for support counting
//! - [`training::RuleSearcher`] for per-row search
//! - [`repr::RuleTrie`] for covering-rule queries

// Re-export approx traits for users who want to compare heuristic values
pub use approx;

pub mod data;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{LordConfig, LordModel, Prediction};

// Training types
pub use training::{Heuristic, HeuristicFn, SearchStrategy, TrainError, Verbosity};

// Data types
pub use data::{Dataset, DatasetError, Selector, SelectorId, SelectorTable};

// Rule types
pub use repr::{RuleInfo, RuleTrie};

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
