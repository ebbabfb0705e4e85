//! Borrowed views of an example to classify.

use std::collections::HashSet;

use super::selector::{SelectorId, SelectorTable};

/// An example given either as an ascending id array or as a set of ids.
///
/// Sorted arrays are matched with a one-directional scan; sets are matched by
/// membership.
#[derive(Debug, Clone, Copy)]
pub enum ExampleRef<'a> {
    Sorted(&'a [SelectorId]),
    Set(&'a HashSet<SelectorId>),
}

impl ExampleRef<'_> {
    #[inline]
    pub fn contains(&self, id: SelectorId) -> bool {
        match self {
            ExampleRef::Sorted(ids) => ids.binary_search(&id).is_ok(),
            ExampleRef::Set(ids) => ids.contains(&id),
        }
    }

    /// Predictor ids of the example, ascending and deduplicated.
    ///
    /// Target ids and ids outside the vocabulary are dropped.
    pub fn predictor_ids(&self, selectors: &SelectorTable) -> Vec<SelectorId> {
        let mut ids: Vec<SelectorId> = match self {
            ExampleRef::Sorted(ids) => ids.to_vec(),
            ExampleRef::Set(ids) => ids.iter().copied().collect(),
        };
        ids.retain(|&id| selectors.is_predictor(id));
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl<'a> From<&'a [SelectorId]> for ExampleRef<'a> {
    fn from(ids: &'a [SelectorId]) -> Self {
        ExampleRef::Sorted(ids)
    }
}

impl<'a, const N: usize> From<&'a [SelectorId; N]> for ExampleRef<'a> {
    fn from(ids: &'a [SelectorId; N]) -> Self {
        ExampleRef::Sorted(ids)
    }
}

impl<'a> From<&'a Vec<SelectorId>> for ExampleRef<'a> {
    fn from(ids: &'a Vec<SelectorId>) -> Self {
        ExampleRef::Sorted(ids)
    }
}

impl<'a> From<&'a HashSet<SelectorId>> for ExampleRef<'a> {
    fn from(ids: &'a HashSet<SelectorId>) -> Self {
        ExampleRef::Set(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictor_ids_normalizes() {
        let table = SelectorTable::with_counts(5, 2).unwrap();
        let raw = vec![4, 1, 6, 1, 9];
        assert_eq!(ExampleRef::from(&raw).predictor_ids(&table), vec![1, 4]);

        let set: HashSet<SelectorId> = [3, 0, 5].into_iter().collect();
        assert_eq!(ExampleRef::from(&set).predictor_ids(&table), vec![0, 3]);
    }

    #[test]
    fn test_contains() {
        let ids = [1, 3, 8];
        let sorted = ExampleRef::from(&ids);
        assert!(sorted.contains(3));
        assert!(!sorted.contains(4));

        let set: HashSet<SelectorId> = ids.into_iter().collect();
        assert!(ExampleRef::from(&set).contains(8));
    }
}
