//! Rule-set classifier.
//!
//! High-level wrapper around a [`RuleTrie`] with training and prediction.
//! Access components via [`trie()`](LordModel::trie) and
//! [`config()`](LordModel::config).

use std::sync::Arc;

use crate::data::{Dataset, ExampleRef, SelectorId, SelectorTable};
use crate::repr::{export_order, PrefixTree, RuleInfo, RuleTrie, select_best};
use crate::training::{filter_rules, mine_rules, TrainError, TrainingLogger};
use crate::utils::{run_with_threads, Parallelism};

use super::{EvalError, LordConfig, ModelEvaluation};

/// Outcome of one query together with the rules that decided it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: SelectorId,
    /// Every rule whose body is contained in the example.
    pub covering_rules: Vec<Arc<RuleInfo>>,
    /// The preferred covering rule; `None` when the default class was used.
    pub selected_rule: Option<Arc<RuleInfo>>,
}

/// Classifier made of mined rules.
///
/// The model is immutable after training and can be shared across threads
/// for concurrent prediction.
#[derive(Debug, Clone)]
pub struct LordModel {
    trie: RuleTrie,
    selectors: SelectorTable,
    default_class: SelectorId,
    config: LordConfig,
}

impl LordModel {
    /// Train a model on a dataset.
    ///
    /// Runs on `config.n_threads` threads (all cores when unset).
    ///
    /// # Errors
    ///
    /// - [`TrainError::ThreadPool`] if the thread pool cannot be built
    /// - [`TrainError::Search`] if a rule search hits a missing occurrence list
    pub fn train(dataset: &Dataset, config: LordConfig) -> Result<Self, TrainError> {
        run_with_threads(config.thread_count(), |parallelism| {
            Self::train_inner(dataset, config, parallelism)
        })?
    }

    fn train_inner(
        dataset: &Dataset,
        config: LordConfig,
        parallelism: Parallelism,
    ) -> Result<Self, TrainError> {
        let selectors = dataset.selectors();
        let mut logger = TrainingLogger::new(config.verbosity);
        logger.start_training(dataset.n_rows(), selectors.len());
        if dataset.is_empty() {
            logger.warn("empty training set, every prediction falls back to the default class");
        }

        let tree = PrefixTree::from_dataset(dataset);
        logger.log_phase("prefix tree", format_args!("{} nodes", tree.n_nodes()));

        let base_lists = tree.base_lists(selectors.len());
        logger.log_phase("base lists", format_args!("{} lists", base_lists.len()));

        let candidates = mine_rules(
            dataset,
            &base_lists,
            &config.heuristic,
            &config.mining_params(),
            parallelism,
        )?;
        logger.log_phase("mining", format_args!("{} candidate rules", candidates.len()));

        let kept = filter_rules(dataset, candidates, config.filter, config.trie_order, parallelism);
        logger.log_phase("filtering", format_args!("{} rules kept", kept.len()));

        let trie = RuleTrie::from_rules(config.trie_order, kept);
        logger.log_phase(
            "rule trie",
            format_args!("{} nodes, {} rules", trie.n_nodes(), trie.len()),
        );
        let default_class = dataset.majority_class();
        logger.debug(format_args!("default class {default_class}"));
        logger.finish_training(trie.len());

        Ok(Self {
            trie,
            selectors: selectors.clone(),
            default_class,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn trie(&self) -> &RuleTrie {
        &self.trie
    }

    pub fn config(&self) -> &LordConfig {
        &self.config
    }

    pub fn selectors(&self) -> &SelectorTable {
        &self.selectors
    }

    /// Majority class of the training set, used when no rule covers a query.
    pub fn default_class(&self) -> SelectorId {
        self.default_class
    }

    pub fn n_rules(&self) -> usize {
        self.trie.len()
    }

    /// Rules best first: heuristic value, then `p`, then lower head, then body.
    pub fn rule_list(&self) -> Vec<RuleInfo> {
        let mut rules: Vec<&Arc<RuleInfo>> = self.trie.iter_rules().collect();
        rules.sort_by(|a, b| export_order(a, b));
        rules.into_iter().map(|rule| RuleInfo::clone(rule)).collect()
    }

    /// Drop the worst `portion` of the rule list and rebuild the trie.
    ///
    /// `portion` is clamped to `[0, 1]`; the kept count is rounded down.
    pub fn truncate(&mut self, portion: f64) {
        let portion = if portion.is_nan() { 0.0 } else { portion.clamp(0.0, 1.0) };
        let mut rules: Vec<Arc<RuleInfo>> = self.trie.iter_rules().cloned().collect();
        rules.sort_by(|a, b| export_order(a, b));
        let keep = (rules.len() as f64 * (1.0 - portion)) as usize;
        rules.truncate(keep);
        self.trie = RuleTrie::from_rules(self.config.trie_order, rules);
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict the class of an example.
    ///
    /// Accepts an ascending id slice or a set; class selectors and unknown
    /// ids in the example are ignored.
    pub fn predict<'e>(&self, example: impl Into<ExampleRef<'e>>) -> SelectorId {
        let body = example.into().predictor_ids(&self.selectors);
        if body.is_empty() {
            return self.default_class;
        }
        self.trie
            .best_covering_rule(&body)
            .map_or(self.default_class, |rule| rule.head())
    }

    /// Predict the class of an example and report the rules involved.
    pub fn explain<'e>(&self, example: impl Into<ExampleRef<'e>>) -> Prediction {
        let body = example.into().predictor_ids(&self.selectors);
        let covering_rules: Vec<Arc<RuleInfo>> = if body.is_empty() {
            Vec::new()
        } else {
            self.trie.find_covering_rules(&body).into_iter().cloned().collect()
        };
        let selected_rule = select_best(&covering_rules).cloned();
        Prediction {
            class: selected_rule
                .as_ref()
                .map_or(self.default_class, |rule| rule.head()),
            covering_rules,
            selected_rule,
        }
    }

    /// Predict many examples, in parallel unless `n_threads == 1`.
    ///
    /// # Errors
    ///
    /// Returns the pool builder error if a dedicated pool cannot be created.
    pub fn predict_batch<R>(
        &self,
        rows: &[R],
        n_threads: usize,
    ) -> Result<Vec<SelectorId>, rayon::ThreadPoolBuildError>
    where
        R: AsRef<[SelectorId]> + Sync,
    {
        run_with_threads(n_threads, |parallelism| {
            parallelism.maybe_par_map(rows, |row| self.predict(row.as_ref()))
        })
    }

    /// Predict every row of a dataset and score against its classes.
    ///
    /// # Errors
    ///
    /// [`EvalError::UnknownClass`] if the dataset uses class ids this model
    /// was not trained on.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<ModelEvaluation, EvalError> {
        let predicted: Vec<SelectorId> = dataset.rows().map(|row| self.predict(row)).collect();
        let classes: Vec<SelectorId> = self.selectors.target_ids().collect();
        ModelEvaluation::from_predictions(&dataset.classes(), &predicted, &classes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testing::reference_dataset;

    fn model() -> LordModel {
        let config = LordConfig::builder()
            .n_threads(std::num::NonZeroUsize::MIN)
            .build()
            .unwrap();
        LordModel::train(&reference_dataset(), config).unwrap()
    }

    #[test]
    fn test_training_set_is_fitted() {
        let ds = reference_dataset();
        let model = model();
        assert!(model.n_rules() > 0);
        for i in 0..ds.n_rows() {
            assert_eq!(model.predict(ds.body(i)), ds.class_of(i), "row {i}");
        }
        let eval = model.evaluate(&ds).unwrap();
        assert_eq!(eval.misses(), 0);
    }

    #[test]
    fn test_set_and_slice_agree() {
        let ds = reference_dataset();
        let model = model();
        for row in ds.rows() {
            let set: HashSet<SelectorId> = row.iter().copied().collect();
            assert_eq!(model.predict(row), model.predict(&set));
        }
    }

    #[test]
    fn test_empty_body_uses_default_class() {
        let model = model();
        assert_eq!(model.default_class(), 13);
        assert_eq!(model.predict(&[] as &[SelectorId]), 13);
        // class selector only
        assert_eq!(model.predict(&[11]), 13);

        let explained = model.explain(&[11]);
        assert!(explained.covering_rules.is_empty());
        assert!(explained.selected_rule.is_none());
    }

    #[test]
    fn test_explain_matches_predict() {
        let ds = reference_dataset();
        let model = model();
        for row in ds.rows() {
            let explained = model.explain(row);
            assert_eq!(explained.class, model.predict(row));
            let selected = explained.selected_rule.unwrap();
            assert!(explained.covering_rules.contains(&selected));
            assert!(selected.body().iter().all(|id| row.contains(id)));
        }
    }

    #[test]
    fn test_rule_list_order() {
        let model = model();
        let rules = model.rule_list();
        assert_eq!(rules.len(), model.n_rules());
        for pair in rules.windows(2) {
            assert!(export_order(&pair[0], &pair[1]).is_lt());
        }
    }

    #[test]
    fn test_truncate_keeps_best() {
        let mut model = model();
        let before = model.rule_list();
        model.truncate(0.5);
        let after = model.rule_list();
        assert_eq!(after.len(), before.len() / 2);
        assert_eq!(after[..], before[..after.len()]);

        model.truncate(1.0);
        assert_eq!(model.n_rules(), 0);
        assert_eq!(model.predict(&[1, 3, 9, 10]), model.default_class());
    }

    #[test]
    fn test_predict_batch_matches_predict() {
        let ds = reference_dataset();
        let model = model();
        let rows: Vec<Vec<SelectorId>> = ds.rows().map(|r| r.to_vec()).collect();
        let batch = model.predict_batch(&rows, 2).unwrap();
        let single: Vec<SelectorId> = rows.iter().map(|r| model.predict(r)).collect();
        assert_eq!(batch, single);
    }
}
