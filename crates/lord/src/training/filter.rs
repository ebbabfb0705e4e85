//! Candidate rule filtering.
//!
//! Mining yields one rule per row, many of which never decide a prediction.
//! Filtering shrinks the candidates to the rules that are the best correct
//! explanation of at least one training row.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use crate::data::Dataset;
use crate::repr::{InsertOrder, RuleInfo, RuleSignature, RuleTrie, select_best};
use crate::training::miner::union_sorted;
use crate::training::workers::run_claiming_workers;
use crate::utils::Parallelism;

/// How mined candidates are reduced before the final trie is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Keep, per row, the preferred covering rule predicting the row's class.
    #[default]
    BestPerRow,
    /// Drop rules whose body extends a shorter rule scoring at least as high.
    Specialization,
    /// Keep every candidate.
    None,
}

/// Reduce candidate rules. The result is sorted by signature.
pub fn filter_rules(
    dataset: &Dataset,
    candidates: Vec<Arc<RuleInfo>>,
    mode: FilterMode,
    order: InsertOrder,
    parallelism: Parallelism,
) -> Vec<Arc<RuleInfo>> {
    match mode {
        FilterMode::None => candidates,
        FilterMode::BestPerRow => best_per_row(dataset, candidates, order, parallelism),
        FilterMode::Specialization => drop_specializations(candidates, order),
    }
}

fn best_per_row(
    dataset: &Dataset,
    candidates: Vec<Arc<RuleInfo>>,
    order: InsertOrder,
    parallelism: Parallelism,
) -> Vec<Arc<RuleInfo>> {
    let trie = RuleTrie::from_rules(order, candidates);

    let Ok(states) = run_claiming_workers::<_, Infallible, _, _>(
        dataset.n_rows(),
        parallelism,
        HashMap::new,
        |kept: &mut HashMap<RuleSignature, Arc<RuleInfo>>, idx| {
            let class = dataset.class_of(idx);
            let covering = trie.find_covering_rules(dataset.body(idx));
            if let Some(rule) = select_best(covering.into_iter().filter(|r| r.head() == class)) {
                kept.entry(rule.signature()).or_insert_with(|| Arc::clone(rule));
            }
            Ok(())
        },
    );
    union_sorted(states)
}

fn drop_specializations(
    mut candidates: Vec<Arc<RuleInfo>>,
    order: InsertOrder,
) -> Vec<Arc<RuleInfo>> {
    candidates.sort_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| b.preference(a))
            .then_with(|| a.body().cmp(b.body()))
    });

    let mut trie = RuleTrie::new(order);
    for rule in candidates {
        trie.insert_with_filter(rule);
    }
    let kept = trie
        .iter_rules()
        .map(|rule| (rule.signature(), Arc::clone(rule)))
        .collect::<HashMap<_, _>>();
    union_sorted([kept])
}
