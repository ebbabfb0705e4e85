//! Training under non-default search, filtering and scoring options.

use std::num::NonZeroUsize;

use rstest::rstest;

use lord::data::Dataset;
use lord::repr::InsertOrder;
use lord::testing::{brute_force_support, reference_dataset, synthetic_classification};
use lord::training::{CandidateHeads, ExhaustiveParams, FilterMode};
use lord::{Heuristic, LordConfig, LordModel, SearchStrategy, Verbosity};

const ONE: NonZeroUsize = NonZeroUsize::MIN;

fn train(ds: &Dataset, config: LordConfig) -> LordModel {
    LordModel::train(ds, config).unwrap()
}

fn rules_are_consistent(ds: &Dataset, model: &LordModel) -> bool {
    model.rule_list().iter().all(|rule| {
        let mut with_head = rule.body().to_vec();
        with_head.push(rule.head());
        brute_force_support(ds, rule.body()) == rule.coverage()
            && brute_force_support(ds, &with_head) == rule.p()
    })
}

#[rstest]
#[case::precision(Heuristic::precision())]
#[case::laplace(Heuristic::laplace())]
#[case::m_estimate(Heuristic::m_estimate(22.466))]
#[case::entropy(Heuristic::entropy())]
#[case::cosine(Heuristic::cosine())]
#[case::linear_cost(Heuristic::linear_cost(0.5))]
#[case::relative_cost(Heuristic::relative_cost(0.5))]
#[case::m_relative_laplace(Heuristic::m_relative_laplace(0.5))]
fn every_heuristic_trains(#[case] heuristic: Heuristic) {
    let ds = reference_dataset();
    let config = LordConfig::builder()
        .n_threads(ONE)
        .heuristic(heuristic)
        .build()
        .unwrap();
    let model = train(&ds, config);

    assert!(rules_are_consistent(&ds, &model));
    for row in ds.rows() {
        assert!(ds.selectors().is_target(model.predict(row)));
    }
}

#[test]
fn exhaustive_respects_max_rule_len() {
    let ds = synthetic_classification(200, 5, 3, 3, 21, 0.05);
    let config = LordConfig::builder()
        .n_threads(ONE)
        .search(SearchStrategy::exhaustive_with_max_len(3))
        .build()
        .unwrap();
    let model = train(&ds, config);

    assert!(model.n_rules() > 0);
    assert!(model.rule_list().iter().all(|rule| rule.len() <= 2));
    assert!(rules_are_consistent(&ds, &model));
}

#[test]
fn exhaustive_keeps_a_rule_for_every_row() {
    let ds = reference_dataset();
    let config = LordConfig::builder()
        .n_threads(ONE)
        .search(SearchStrategy::Exhaustive(ExhaustiveParams {
            max_rule_len: None,
            seed_with_greedy: true,
        }))
        .build()
        .unwrap();
    let model = train(&ds, config);

    assert!(rules_are_consistent(&ds, &model));
    for idx in 0..ds.n_rows() {
        let explained = model.explain(ds.row(idx));
        assert!(
            explained
                .covering_rules
                .iter()
                .any(|rule| rule.head() == ds.class_of(idx)),
            "row {idx}"
        );
    }
}

#[test]
fn all_class_heads_stay_consistent() {
    let ds = synthetic_classification(150, 4, 3, 3, 2, 0.2);
    let config = LordConfig::builder()
        .n_threads(ONE)
        .search(SearchStrategy::exhaustive_with_max_len(4))
        .candidate_heads(CandidateHeads::AllClasses)
        .build()
        .unwrap();
    let model = train(&ds, config);

    assert!(model.n_rules() > 0);
    assert!(rules_are_consistent(&ds, &model));
}

#[test]
fn skip_covered_mines_no_more_rules() {
    let ds = synthetic_classification(300, 5, 3, 3, 13, 0.05);
    let unfiltered = LordConfig::builder()
        .n_threads(ONE)
        .filter(FilterMode::None)
        .build()
        .unwrap();
    let skipping = LordConfig::builder()
        .n_threads(ONE)
        .filter(FilterMode::None)
        .skip_covered(true)
        .build()
        .unwrap();
    let full = train(&ds, unfiltered);
    let skipped = train(&ds, skipping);

    assert!(skipped.n_rules() > 0);
    assert!(skipped.n_rules() <= full.n_rules());
    assert!(rules_are_consistent(&ds, &skipped));
}

#[test]
fn specialization_filter_drops_dominated_extensions() {
    let ds = synthetic_classification(300, 5, 3, 3, 17, 0.1);
    let unfiltered = LordConfig::builder()
        .n_threads(ONE)
        .filter(FilterMode::None)
        .build()
        .unwrap();
    let specialization = LordConfig::builder()
        .n_threads(ONE)
        .filter(FilterMode::Specialization)
        .build()
        .unwrap();
    let full = train(&ds, unfiltered);
    let filtered = train(&ds, specialization);

    assert!(filtered.n_rules() <= full.n_rules());
    // descending paths: a rule's trie ancestors hold its highest ids
    let rules = filtered.rule_list();
    for specific in &rules {
        for general in &rules {
            let k = general.len();
            let on_path =
                k < specific.len() && general.body() == &specific.body()[specific.len() - k..];
            if on_path {
                assert!(
                    specific.heuristic_value() > general.heuristic_value(),
                    "{specific} under {general}"
                );
            }
        }
    }
}

#[test]
fn ascending_trie_stores_every_rule() {
    let ds = synthetic_classification(250, 5, 3, 3, 4, 0.1);
    let config = LordConfig::builder()
        .n_threads(ONE)
        .trie_order(InsertOrder::Ascending)
        .build()
        .unwrap();
    let model = train(&ds, config);

    assert_eq!(model.trie().order(), InsertOrder::Ascending);
    assert!(rules_are_consistent(&ds, &model));
    for rule in model.rule_list() {
        assert_eq!(model.trie().get(rule.body()).map(|r| r.head()), Some(rule.head()));
    }
}

#[test]
fn verbose_training_matches_silent() {
    let ds = reference_dataset();
    let silent = LordConfig::builder().n_threads(ONE).build().unwrap();
    let verbose = LordConfig::builder()
        .n_threads(ONE)
        .verbosity(Verbosity::Debug)
        .build()
        .unwrap();

    assert_eq!(train(&ds, silent).rule_list(), train(&ds, verbose).rule_list());
}
