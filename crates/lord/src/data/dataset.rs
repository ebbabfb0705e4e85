//! Validated training rows.

use super::selector::{SelectorId, SelectorTable};

/// Errors raised while validating a selector vocabulary or training rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("selector vocabulary has no target selector")]
    NoTargetSelectors,

    #[error("selector at position {position} has id {id}; ids must be dense and ordered")]
    SelectorIdMismatch { position: usize, id: SelectorId },

    #[error("predictor selector {id} follows a target selector")]
    PredictorAfterTarget { id: SelectorId },

    #[error("row {row} references unknown selector {id}")]
    UnknownSelector { row: usize, id: SelectorId },

    #[error("row {row} holds selector {id} more than once")]
    DuplicateSelector { row: usize, id: SelectorId },

    #[error("row {row} has no class selector")]
    MissingClass { row: usize },

    #[error("row {row} has more than one class selector")]
    MultipleClasses { row: usize },
}

/// A set of training rows over a selector vocabulary.
///
/// Every row is stored as an ascending array of selector ids whose last
/// element is its single class selector. Selector supports in the table are
/// recomputed from the rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    selectors: SelectorTable,
    rows: Vec<Box<[SelectorId]>>,
}

impl Dataset {
    /// Validate and normalize rows.
    ///
    /// Rows may be given in any order; they are sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if a row references an unknown selector, holds
    /// a selector twice, or does not hold exactly one class selector.
    pub fn new(
        mut selectors: SelectorTable,
        rows: Vec<Vec<SelectorId>>,
    ) -> Result<Self, DatasetError> {
        let mut supports = vec![0u32; selectors.len()];
        let mut normalized = Vec::with_capacity(rows.len());

        for (row_idx, mut row) in rows.into_iter().enumerate() {
            row.sort_unstable();
            if let Some(&id) = row.iter().find(|&&id| !selectors.contains(id)) {
                return Err(DatasetError::UnknownSelector { row: row_idx, id });
            }
            if let Some(pair) = row.windows(2).find(|w| w[0] == w[1]) {
                return Err(DatasetError::DuplicateSelector {
                    row: row_idx,
                    id: pair[0],
                });
            }
            match row.iter().filter(|&&id| selectors.is_target(id)).count() {
                0 => return Err(DatasetError::MissingClass { row: row_idx }),
                1 => {}
                _ => return Err(DatasetError::MultipleClasses { row: row_idx }),
            }

            for &id in &row {
                supports[id as usize] += 1;
            }
            normalized.push(row.into_boxed_slice());
        }

        selectors.set_supports(&supports);
        Ok(Self {
            selectors,
            rows: normalized,
        })
    }

    /// A dataset with no rows.
    pub fn empty(mut selectors: SelectorTable) -> Self {
        selectors.set_supports(&vec![0; selectors.len()]);
        Self {
            selectors,
            rows: Vec::new(),
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn selectors(&self) -> &SelectorTable {
        &self.selectors
    }

    /// Full row: body followed by its class selector.
    #[inline]
    pub fn row(&self, idx: usize) -> &[SelectorId] {
        &self.rows[idx]
    }

    /// Predictor selectors of a row.
    #[inline]
    pub fn body(&self, idx: usize) -> &[SelectorId] {
        let row = &self.rows[idx];
        &row[..row.len() - 1]
    }

    /// Class selector of a row.
    #[inline]
    pub fn class_of(&self, idx: usize) -> SelectorId {
        let row = &self.rows[idx];
        row[row.len() - 1]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[SelectorId]> + '_ {
        self.rows.iter().map(|row| &row[..])
    }

    /// Class selector of every row, in row order.
    pub fn classes(&self) -> Vec<SelectorId> {
        (0..self.n_rows()).map(|i| self.class_of(i)).collect()
    }

    /// Majority class among target selectors; ties keep the lowest id.
    #[inline]
    pub fn majority_class(&self) -> SelectorId {
        self.selectors.majority_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SelectorTable {
        SelectorTable::with_counts(4, 2).unwrap()
    }

    #[test]
    fn test_rows_are_sorted_and_split() {
        let ds = Dataset::new(table(), vec![vec![4, 2, 0], vec![5, 1]]).unwrap();
        assert_eq!(ds.row(0), &[0, 2, 4]);
        assert_eq!(ds.body(0), &[0, 2]);
        assert_eq!(ds.class_of(0), 4);
        assert_eq!(ds.body(1), &[1]);
        assert_eq!(ds.classes(), vec![4, 5]);
    }

    #[test]
    fn test_supports_are_recounted() {
        let ds = Dataset::new(table(), vec![vec![0, 4], vec![0, 1, 5], vec![1, 5]]).unwrap();
        let supports: Vec<u32> = ds.selectors().selectors().iter().map(|s| s.support).collect();
        assert_eq!(supports, vec![2, 2, 0, 0, 1, 2]);
        assert_eq!(ds.majority_class(), 5);
    }

    #[test]
    fn test_class_only_row_is_accepted() {
        let ds = Dataset::new(table(), vec![vec![4]]).unwrap();
        assert!(ds.body(0).is_empty());
    }

    #[test]
    fn test_rejects_invalid_rows() {
        assert_eq!(
            Dataset::new(table(), vec![vec![0, 1]]).unwrap_err(),
            DatasetError::MissingClass { row: 0 }
        );
        assert_eq!(
            Dataset::new(table(), vec![vec![0, 4], vec![0, 4, 5]]).unwrap_err(),
            DatasetError::MultipleClasses { row: 1 }
        );
        assert_eq!(
            Dataset::new(table(), vec![vec![0, 9, 4]]).unwrap_err(),
            DatasetError::UnknownSelector { row: 0, id: 9 }
        );
        assert_eq!(
            Dataset::new(table(), vec![vec![1, 1, 4]]).unwrap_err(),
            DatasetError::DuplicateSelector { row: 0, id: 1 }
        );
    }

    #[test]
    fn test_empty_dataset_defaults_to_first_target() {
        let ds = Dataset::empty(table());
        assert!(ds.is_empty());
        assert_eq!(ds.majority_class(), 4);
    }
}
