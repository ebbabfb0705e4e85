//! Per-example local rule search.
//!
//! A [`RuleSearcher`] looks for the best rule explaining one training row,
//! using only occurrence-list algebra over the shared base lists. Two
//! strategies are available:
//!
//! - [`SearchStrategy::Greedy`]: grow the body one selector at a time while the
//!   heuristic improves, then prune single selectors while it improves
//! - [`SearchStrategy::Exhaustive`]: depth-first branch-and-bound over all
//!   ascending sub-combinations of the body
//!
//! A candidate replaces the incumbent when its heuristic value is higher, or
//! equal with a larger `p`.

mod cache;
mod exhaustive;
mod greedy;

pub use cache::NlistCache;

use crate::data::{SelectorId, SelectorTable};
use crate::repr::{OccurrenceList, RuleInfo};
use crate::training::heuristics::{HeuristicFn, RuleStats};
use crate::training::SearchError;

// =============================================================================
// Search Parameters
// =============================================================================

/// Bounds of the branch-and-bound search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExhaustiveParams {
    /// Maximum rule length counting the head. `None` leaves depth unbounded.
    pub max_rule_len: Option<usize>,
    /// Start from the greedy rule as incumbent.
    pub seed_with_greedy: bool,
}

impl ExhaustiveParams {
    fn max_body_len(&self) -> usize {
        self.max_rule_len.map_or(usize::MAX, |len| len.saturating_sub(1))
    }
}

/// Local search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    #[default]
    Greedy,
    Exhaustive(ExhaustiveParams),
}

impl SearchStrategy {
    pub fn exhaustive() -> Self {
        Self::Exhaustive(ExhaustiveParams::default())
    }

    pub fn exhaustive_with_max_len(max_rule_len: usize) -> Self {
        Self::Exhaustive(ExhaustiveParams {
            max_rule_len: Some(max_rule_len),
            seed_with_greedy: false,
        })
    }
}

/// Heads scored by the exhaustive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateHeads {
    /// Only the class of the row being explained.
    #[default]
    ExampleClass,
    /// Every class selector.
    AllClasses,
}

// =============================================================================
// Scored Candidate
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct Scored {
    body: Vec<SelectorId>,
    head: SelectorId,
    covered: u32,
    p: u32,
    h: f64,
}

impl Scored {
    fn into_rule(self) -> RuleInfo {
        RuleInfo::new(self.body, self.head, self.p, self.covered - self.p, self.h)
    }

    fn n(&self) -> u32 {
        self.covered - self.p
    }
}

/// Acceptance rule shared by both strategies.
#[inline]
fn improves(best: &Option<Scored>, h: f64, p: u32) -> bool {
    match best {
        None => !h.is_nan(),
        Some(b) => h > b.h || (h == b.h && p > b.p),
    }
}

// =============================================================================
// RuleSearcher
// =============================================================================

/// Finds one rule per training row.
///
/// Holds a private memo, so each worker owns its own searcher; the base lists
/// and selector table are shared read-only.
pub struct RuleSearcher<'a, H: HeuristicFn> {
    selectors: &'a SelectorTable,
    heuristic: &'a H,
    n_rows: u32,
    strategy: SearchStrategy,
    candidate_heads: CandidateHeads,
    cache: NlistCache<'a>,
    scratch: Vec<SelectorId>,
}

impl<'a, H: HeuristicFn> RuleSearcher<'a, H> {
    pub fn new(
        base_lists: &'a [OccurrenceList],
        selectors: &'a SelectorTable,
        heuristic: &'a H,
        n_rows: u32,
    ) -> Self {
        Self {
            selectors,
            heuristic,
            n_rows,
            strategy: SearchStrategy::default(),
            candidate_heads: CandidateHeads::default(),
            cache: NlistCache::new(base_lists),
            scratch: Vec::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_candidate_heads(mut self, candidate_heads: CandidateHeads) -> Self {
        self.candidate_heads = candidate_heads;
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Search a rule for a row given its predictor ids (ascending) and class.
    ///
    /// Returns `None` when no candidate scores a defined heuristic value,
    /// which includes an empty body.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnknownClass`] if `class` is not a class selector
    /// - [`SearchError::NonPredictorBody`] if `body` holds a class or unknown id
    /// - [`SearchError::UnsortedBody`] if `body` is not strictly ascending
    /// - [`SearchError::MissingOccurrenceList`] if a selector has no list
    pub fn search(
        &mut self,
        body: &[SelectorId],
        class: SelectorId,
    ) -> Result<Option<RuleInfo>, SearchError> {
        if !self.selectors.is_target(class) {
            return Err(SearchError::UnknownClass { selector: class });
        }
        if let Some(&selector) = body.iter().find(|&&id| !self.selectors.is_predictor(id)) {
            return Err(SearchError::NonPredictorBody { selector });
        }
        if let Some(pair) = body.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(SearchError::UnsortedBody { selector: pair[1] });
        }
        self.cache.clear();

        let best = match self.strategy {
            SearchStrategy::Greedy => self.greedy(body, class)?,
            SearchStrategy::Exhaustive(params) => {
                let heads: Vec<SelectorId> = match self.candidate_heads {
                    CandidateHeads::ExampleClass => vec![class],
                    CandidateHeads::AllClasses => self.selectors.target_ids().collect(),
                };
                let seed = if params.seed_with_greedy {
                    self.greedy(body, class)?
                } else {
                    None
                };
                self.exhaustive(body, &heads, &params, seed)?
            }
        };
        Ok(best.map(Scored::into_rule))
    }

    /// Rows of a class.
    #[inline]
    fn class_support(&self, class: SelectorId) -> Result<u32, SearchError> {
        self.cache.base(class).map(OccurrenceList::support)
    }

    #[inline]
    fn score(&self, covered: u32, p: u32, positives: u32) -> f64 {
        self.heuristic
            .evaluate(&RuleStats::new(covered, p, self.n_rows, positives))
    }

    /// `(support(body), support(body ∪ {class}))`; the class id must exceed
    /// every body id.
    fn counts(
        &mut self,
        body: &[SelectorId],
        class: SelectorId,
    ) -> Result<(u32, u32), SearchError> {
        let covered = self.cache.support(body)?;
        self.scratch.clear();
        self.scratch.extend_from_slice(body);
        self.scratch.push(class);
        let p = self.cache.support(&self.scratch)?;
        Ok((covered, p))
    }
}
