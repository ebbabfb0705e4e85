//! Training configuration with builder pattern.
//!
//! [`LordConfig`] gathers every knob of a training run and uses the `bon`
//! crate for builder generation with validation at build time.
//!
//! # Example
//!
//! ```
//! use lord::model::LordConfig;
//! use lord::training::{Heuristic, SearchStrategy};
//!
//! // All defaults: greedy search scored by m-estimate (m = 0.1)
//! let config = LordConfig::builder().build().unwrap();
//!
//! let config = LordConfig::builder()
//!     .heuristic(Heuristic::laplace())
//!     .search(SearchStrategy::exhaustive_with_max_len(4))
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::repr::InsertOrder;
use crate::training::{
    CandidateHeads, FilterMode, Heuristic, MiningParams, SearchStrategy, Verbosity,
};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("heuristic parameter {name} is out of range: {value}")]
    InvalidHeuristicParameter { name: &'static str, value: f64 },

    #[error("max_rule_len must be at least 2, got {0}")]
    InvalidMaxRuleLength(usize),
}

// =============================================================================
// LordConfig
// =============================================================================

/// Configuration of a rule-set training run.
///
/// # Structure
///
/// - **Scoring**: the [`Heuristic`] ranking candidate rules
/// - **Search**: strategy and candidate heads of the per-row search
/// - **Filtering**: how candidates are reduced before the final trie
/// - **Resources**: threading and logging
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct LordConfig {
    // === Scoring ===
    /// Rule quality metric. Default: m-estimate with `m = 0.1`.
    #[builder(default)]
    pub heuristic: Heuristic,

    // === Search ===
    /// Per-row search strategy. Default: greedy.
    #[builder(default)]
    pub search: SearchStrategy,

    /// Heads scored by exhaustive search. Default: the row's own class.
    #[builder(default)]
    pub candidate_heads: CandidateHeads,

    /// Drop a row's rule when the rules kept for earlier rows already
    /// predict its class.
    #[builder(default = false)]
    pub skip_covered: bool,

    // === Filtering ===
    #[builder(default)]
    pub filter: FilterMode,

    /// Path order of rule tries. Default: descending.
    #[builder(default)]
    pub trie_order: InsertOrder,

    // === Resource control ===
    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: lord_config_builder::IsComplete> LordConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - a heuristic parameter is not finite, `m < 0`, or a cost is outside `[0, 1]`
    /// - an exhaustive `max_rule_len` is below 2
    pub fn build(self) -> Result<LordConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl LordConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, value)) = self.heuristic.parameter() {
            let valid = match name {
                "cost" => (0.0..=1.0).contains(&value),
                _ => value.is_finite() && value >= 0.0,
            };
            if !valid {
                return Err(ConfigError::InvalidHeuristicParameter { name, value });
            }
        }

        if let SearchStrategy::Exhaustive(params) = self.search
            && let Some(len) = params.max_rule_len
            && len < 2
        {
            return Err(ConfigError::InvalidMaxRuleLength(len));
        }

        Ok(())
    }

    /// Thread count in `run_with_threads` terms (0 = all cores).
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }

    pub(crate) fn mining_params(&self) -> MiningParams {
        MiningParams {
            strategy: self.search,
            candidate_heads: self.candidate_heads,
            skip_covered: self.skip_covered,
            order: self.trie_order,
        }
    }
}

impl Default for LordConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
