//! Rule mining.
//!
//! Training runs in three phases over a shared, read-only prefix tree and its
//! base occurrence lists:
//!
//! 1. [`mine_rules`]: one [`RuleSearcher`] per worker explains each claimed
//!    row with a single rule
//! 2. [`filter_rules`]: candidates are reduced per [`FilterMode`]
//! 3. the final [`RuleTrie`](crate::repr::RuleTrie) is built by the model
//!
//! ## Heuristics
//!
//! - [`HeuristicFn`]: scoring trait over [`RuleStats`]
//! - [`Heuristic`]: runtime choice among the built-in metrics
//!
//! ## Plumbing
//!
//! - [`run_claiming_workers`]: one-index-at-a-time row partitioning
//! - [`TrainingLogger`], [`Verbosity`]: progress reporting
//! - [`PairSupportMatrix`]: pairwise support counts via map-reduce

mod error;
mod filter;
pub mod heuristics;
mod logger;
mod miner;
mod pair_support;
pub mod search;
mod workers;

pub use error::{SearchError, TrainError};
pub use filter::{filter_rules, FilterMode};
pub use heuristics::{
    Cosine, Entropy, Gini, Heuristic, HeuristicFn, Laplace, LinearCost, MEstimate,
    MRelativeLaplace, Precision, RelativeCost, RuleStats,
};
pub use logger::{TrainingLogger, Verbosity};
pub use miner::{mine_rules, MiningParams};
pub use pair_support::PairSupportMatrix;
pub use search::{CandidateHeads, ExhaustiveParams, NlistCache, RuleSearcher, SearchStrategy};
pub use workers::run_claiming_workers;
