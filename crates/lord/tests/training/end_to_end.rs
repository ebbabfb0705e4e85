//! Train/predict round trips on generated and degenerate datasets.

use std::num::NonZeroUsize;

use lord::data::{Dataset, SelectorId, SelectorTable};
use lord::repr::RuleInfo;
use lord::testing::{brute_force_support, synthetic_classification};
use lord::{LordConfig, LordModel};

fn config_with_threads(n: usize) -> LordConfig {
    LordConfig::builder()
        .n_threads(NonZeroUsize::new(n).unwrap())
        .build()
        .unwrap()
}

/// Every rule's `p` and `n` agree with a scan of the training rows.
fn assert_counts_match(ds: &Dataset, rules: &[RuleInfo]) {
    for rule in rules {
        let covered = brute_force_support(ds, rule.body());
        let mut with_head = rule.body().to_vec();
        with_head.push(rule.head());
        with_head.sort_unstable();
        let p = brute_force_support(ds, &with_head);
        assert_eq!((rule.p(), rule.n()), (p, covered - p), "{rule}");
    }
}

#[test]
fn fits_generated_training_set() {
    let ds = synthetic_classification(500, 6, 4, 3, 7, 0.05);
    let model = LordModel::train(&ds, config_with_threads(2)).unwrap();

    assert!(model.n_rules() > 0);
    assert_counts_match(&ds, &model.rule_list());

    let eval = model.evaluate(&ds).unwrap();
    assert_eq!(eval.total(), 500);
    assert!(eval.accuracy() > 0.75, "accuracy {}", eval.accuracy());
}

#[test]
fn thread_count_does_not_change_rules() {
    let ds = synthetic_classification(300, 5, 3, 3, 11, 0.1);
    let single = LordModel::train(&ds, config_with_threads(1)).unwrap();
    let multi = LordModel::train(&ds, config_with_threads(4)).unwrap();

    assert_eq!(single.rule_list(), multi.rule_list());
    for row in ds.rows() {
        assert_eq!(single.predict(row), multi.predict(row));
    }
}

#[test]
fn skip_covered_is_thread_independent() {
    let ds = synthetic_classification(400, 6, 4, 3, 5, 0.2);
    let skipping = |n: usize| {
        LordConfig::builder()
            .n_threads(NonZeroUsize::new(n).unwrap())
            .skip_covered(true)
            .build()
            .unwrap()
    };
    let single = LordModel::train(&ds, skipping(1)).unwrap();
    assert!(single.n_rules() > 0);
    for _ in 0..3 {
        let multi = LordModel::train(&ds, skipping(4)).unwrap();
        assert_eq!(single.rule_list(), multi.rule_list());
    }
}

#[test]
fn batch_prediction_matches_single() {
    let ds = synthetic_classification(200, 5, 3, 2, 3, 0.1);
    let model = LordModel::train(&ds, config_with_threads(2)).unwrap();

    let rows: Vec<Vec<SelectorId>> = ds.rows().map(<[SelectorId]>::to_vec).collect();
    let batch = model.predict_batch(&rows, 3).unwrap();
    let single: Vec<SelectorId> = rows.iter().map(|r| model.predict(r)).collect();
    assert_eq!(batch, single);
}

#[test]
fn empty_dataset_predicts_default_class() {
    let table = SelectorTable::with_counts(4, 2).unwrap();
    let ds = Dataset::empty(table);
    let model = LordModel::train(&ds, config_with_threads(1)).unwrap();

    assert_eq!(model.n_rules(), 0);
    assert!(model.rule_list().is_empty());
    let default = model.default_class();
    assert!(ds.selectors().is_target(default));
    assert_eq!(model.predict(&[0, 2]), default);
    assert!(model.explain(&[0, 2]).selected_rule.is_none());
}

#[test]
fn rows_without_predictors_yield_no_rules() {
    let table = SelectorTable::with_counts(3, 2).unwrap();
    let ds = Dataset::new(table, vec![vec![3], vec![4], vec![4]]).unwrap();
    let model = LordModel::train(&ds, config_with_threads(1)).unwrap();

    assert_eq!(model.n_rules(), 0);
    assert_eq!(model.default_class(), 4);
    assert_eq!(model.predict(&[0, 1, 2]), 4);
}

#[test]
fn rule_list_survives_json() {
    let ds = synthetic_classification(150, 4, 3, 2, 5, 0.0);
    let model = LordModel::train(&ds, config_with_threads(1)).unwrap();
    let rules = model.rule_list();

    let json = serde_json::to_string(&rules).unwrap();
    let restored: Vec<RuleInfo> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, rules);
}

#[test]
fn truncation_keeps_best_rules() {
    let ds = synthetic_classification(300, 5, 3, 3, 9, 0.1);
    let mut model = LordModel::train(&ds, config_with_threads(2)).unwrap();
    let full = model.rule_list();

    model.truncate(0.25);
    let kept = model.rule_list();
    assert_eq!(kept.len(), (full.len() as f64 * 0.75) as usize);
    assert_eq!(kept[..], full[..kept.len()]);

    // out-of-range portions are clamped
    model.truncate(-1.0);
    assert_eq!(model.n_rules(), kept.len());
}
