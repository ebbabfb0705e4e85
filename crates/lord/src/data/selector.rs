//! Selectors: the integer-coded conditions that rows are made of.

use serde::{Deserialize, Serialize};

use super::DatasetError;

/// Identifier of a selector. Predictor ids are dense and precede target ids.
pub type SelectorId = u32;

/// Whether a selector is a condition on a predictor attribute or a class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorRole {
    Predictor,
    Target,
}

/// One encoded condition over a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub id: SelectorId,
    /// Attribute the condition is defined over.
    pub attribute_id: u32,
    /// Number of training rows holding this selector.
    pub support: u32,
    pub role: SelectorRole,
}

impl Selector {
    pub fn predictor(id: SelectorId, attribute_id: u32) -> Self {
        Self {
            id,
            attribute_id,
            support: 0,
            role: SelectorRole::Predictor,
        }
    }

    pub fn target(id: SelectorId, attribute_id: u32) -> Self {
        Self {
            id,
            attribute_id,
            support: 0,
            role: SelectorRole::Target,
        }
    }

    #[inline]
    pub fn is_target(&self) -> bool {
        self.role == SelectorRole::Target
    }
}

/// Validated selector vocabulary.
///
/// Selector `i` is stored at position `i`; all predictors come first,
/// followed by at least one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTable {
    selectors: Vec<Selector>,
    n_predictors: usize,
}

impl SelectorTable {
    /// Validate a selector vocabulary.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::SelectorIdMismatch`] if ids are not `0..len` in order
    /// - [`DatasetError::PredictorAfterTarget`] if a predictor follows a target
    /// - [`DatasetError::NoTargetSelectors`] if there is no target selector
    pub fn new(selectors: Vec<Selector>) -> Result<Self, DatasetError> {
        for (position, selector) in selectors.iter().enumerate() {
            if selector.id as usize != position {
                return Err(DatasetError::SelectorIdMismatch {
                    position,
                    id: selector.id,
                });
            }
        }

        let n_predictors = selectors.iter().take_while(|s| !s.is_target()).count();
        if let Some(s) = selectors[n_predictors..].iter().find(|s| !s.is_target()) {
            return Err(DatasetError::PredictorAfterTarget { id: s.id });
        }
        if n_predictors == selectors.len() {
            return Err(DatasetError::NoTargetSelectors);
        }

        Ok(Self {
            selectors,
            n_predictors,
        })
    }

    /// Build a table with `n_predictors` predictor selectors followed by
    /// `n_targets` target selectors, one attribute per selector group.
    pub fn with_counts(n_predictors: usize, n_targets: usize) -> Result<Self, DatasetError> {
        let predictors = (0..n_predictors).map(|i| Selector::predictor(i as SelectorId, 0));
        let targets = (n_predictors..n_predictors + n_targets)
            .map(|i| Selector::target(i as SelectorId, 1));
        Self::new(predictors.chain(targets).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SelectorId) -> Option<&Selector> {
        self.selectors.get(id as usize)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    #[inline]
    pub fn n_predictors(&self) -> usize {
        self.n_predictors
    }

    #[inline]
    pub fn n_targets(&self) -> usize {
        self.selectors.len() - self.n_predictors
    }

    #[inline]
    pub fn contains(&self, id: SelectorId) -> bool {
        (id as usize) < self.selectors.len()
    }

    #[inline]
    pub fn is_target(&self, id: SelectorId) -> bool {
        let id = id as usize;
        id >= self.n_predictors && id < self.selectors.len()
    }

    #[inline]
    pub fn is_predictor(&self, id: SelectorId) -> bool {
        (id as usize) < self.n_predictors
    }

    /// Target selector ids in ascending order.
    pub fn target_ids(&self) -> impl Iterator<Item = SelectorId> + '_ {
        (self.n_predictors..self.selectors.len()).map(|i| i as SelectorId)
    }

    /// The target selector with the largest support.
    ///
    /// Ties keep the lowest id.
    pub fn majority_target(&self) -> SelectorId {
        let targets = &self.selectors[self.n_predictors..];
        let mut best = &targets[0];
        for selector in &targets[1..] {
            if selector.support > best.support {
                best = selector;
            }
        }
        best.id
    }

    pub(crate) fn set_supports(&mut self, supports: &[u32]) {
        for (selector, &support) in self.selectors.iter_mut().zip(supports) {
            selector.support = support;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_roles() {
        let table = SelectorTable::with_counts(3, 2).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.n_predictors(), 3);
        assert_eq!(table.n_targets(), 2);
        assert!(table.is_predictor(2));
        assert!(table.is_target(3));
        assert!(table.is_target(4));
        assert!(!table.is_target(5));
        assert_eq!(table.target_ids().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_rejects_gap_in_ids() {
        let selectors = vec![Selector::predictor(0, 0), Selector::target(2, 1)];
        assert_eq!(
            SelectorTable::new(selectors),
            Err(DatasetError::SelectorIdMismatch { position: 1, id: 2 })
        );
    }

    #[test]
    fn test_rejects_predictor_after_target() {
        let selectors = vec![
            Selector::predictor(0, 0),
            Selector::target(1, 1),
            Selector::predictor(2, 0),
        ];
        assert_eq!(
            SelectorTable::new(selectors),
            Err(DatasetError::PredictorAfterTarget { id: 2 })
        );
    }

    #[test]
    fn test_rejects_missing_targets() {
        let selectors = vec![Selector::predictor(0, 0)];
        assert_eq!(
            SelectorTable::new(selectors),
            Err(DatasetError::NoTargetSelectors)
        );
    }

    #[test]
    fn test_majority_target_ties_keep_lowest_id() {
        let mut table = SelectorTable::with_counts(1, 3).unwrap();
        table.set_supports(&[4, 2, 5, 5]);
        assert_eq!(table.majority_target(), 2);

        table.set_supports(&[4, 0, 0, 0]);
        assert_eq!(table.majority_target(), 1);
    }
}
