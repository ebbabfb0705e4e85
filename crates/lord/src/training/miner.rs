//! Candidate rule mining.
//!
//! Every training row is handed to a [`RuleSearcher`]; each worker collects
//! its rules in a private map keyed by [`RuleSignature`], and the maps are
//! unioned once all rows are processed. Rules sharing a signature have equal
//! counts, so the union does not depend on which worker wrote first.
//!
//! With `skip_covered`, workers keep each row's rule instead, and a single
//! pass in row order decides which of them survive. The result is the same
//! for every thread count.

use std::collections::HashMap;
use std::sync::Arc;

use crate::data::Dataset;
use crate::repr::{InsertOrder, OccurrenceList, RuleInfo, RuleSignature, RuleTrie};
use crate::training::heuristics::HeuristicFn;
use crate::training::search::{CandidateHeads, RuleSearcher, SearchStrategy};
use crate::training::workers::run_claiming_workers;
use crate::training::SearchError;
use crate::utils::Parallelism;

/// Knobs of the mining phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MiningParams {
    pub strategy: SearchStrategy,
    pub candidate_heads: CandidateHeads,
    /// Drop a row's rule when the rules kept for earlier rows already
    /// predict its class. Rows are visited in index order.
    pub skip_covered: bool,
    /// Path order of the trie used with `skip_covered`.
    pub order: InsertOrder,
}

/// Per-worker mining state.
struct MinerState<'a, H: HeuristicFn> {
    searcher: RuleSearcher<'a, H>,
    rules: HashMap<RuleSignature, Arc<RuleInfo>>,
    /// `(row, rule)` pairs, filled instead of `rules` when skipping.
    by_row: Option<Vec<(usize, RuleInfo)>>,
}

impl<H: HeuristicFn> MinerState<'_, H> {
    fn mine_row(&mut self, dataset: &Dataset, idx: usize) -> Result<(), SearchError> {
        let body = dataset.body(idx);
        if body.is_empty() {
            return Ok(());
        }
        let Some(rule) = self.searcher.search(body, dataset.class_of(idx))? else {
            return Ok(());
        };
        match self.by_row.as_mut() {
            Some(by_row) => by_row.push((idx, rule)),
            None => {
                self.rules.entry(rule.signature()).or_insert_with(|| Arc::new(rule));
            }
        }
        Ok(())
    }
}

/// Keep a row's rule only if the rules kept so far do not already predict
/// the row's class and the new rule beats the one they would select.
///
/// `by_row` must be sorted by row index.
fn skip_covered_rows(
    dataset: &Dataset,
    by_row: Vec<(usize, RuleInfo)>,
    order: InsertOrder,
) -> HashMap<RuleSignature, Arc<RuleInfo>> {
    let mut trie = RuleTrie::new(order);
    let mut kept = HashMap::new();
    for (idx, rule) in by_row {
        let body = dataset.body(idx);
        let selected = trie.best_covering_rule(body).cloned();
        if selected.as_ref().is_some_and(|held| held.head() == dataset.class_of(idx)) {
            continue;
        }
        if selected.is_none_or(|held| rule.is_better_than(&held)) {
            let rule = Arc::new(rule);
            trie.insert(Arc::clone(&rule));
            kept.entry(rule.signature()).or_insert(rule);
        }
    }
    kept
}

/// Mine one candidate rule per training row.
///
/// Rows without predictors are skipped. The result is sorted by signature
/// and does not depend on the thread count.
///
/// # Errors
///
/// The first [`SearchError`] raised by any worker.
pub fn mine_rules<H: HeuristicFn>(
    dataset: &Dataset,
    base_lists: &[OccurrenceList],
    heuristic: &H,
    params: &MiningParams,
    parallelism: Parallelism,
) -> Result<Vec<Arc<RuleInfo>>, SearchError> {
    let n_rows = dataset.n_rows() as u32;
    let states = run_claiming_workers(
        dataset.n_rows(),
        parallelism,
        || MinerState {
            searcher: RuleSearcher::new(base_lists, dataset.selectors(), heuristic, n_rows)
                .with_strategy(params.strategy)
                .with_candidate_heads(params.candidate_heads),
            rules: HashMap::new(),
            by_row: params.skip_covered.then(Vec::new),
        },
        |state: &mut MinerState<'_, H>, idx| state.mine_row(dataset, idx),
    )?;

    if !params.skip_covered {
        return Ok(union_sorted(states.into_iter().map(|state| state.rules)));
    }
    let mut by_row: Vec<(usize, RuleInfo)> = states
        .into_iter()
        .flat_map(|state| state.by_row.unwrap_or_default())
        .collect();
    by_row.sort_unstable_by_key(|&(idx, _)| idx);
    Ok(union_sorted([skip_covered_rows(dataset, by_row, params.order)]))
}

/// Union worker maps and sort the rules by signature.
pub(crate) fn union_sorted(
    maps: impl IntoIterator<Item = HashMap<RuleSignature, Arc<RuleInfo>>>,
) -> Vec<Arc<RuleInfo>> {
    let mut merged: HashMap<RuleSignature, Arc<RuleInfo>> = HashMap::new();
    for map in maps {
        for (signature, rule) in map {
            merged.entry(signature).or_insert(rule);
        }
    }
    let mut rules: Vec<(RuleSignature, Arc<RuleInfo>)> = merged.into_iter().collect();
    rules.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    rules.into_iter().map(|(_, rule)| rule).collect()
}
