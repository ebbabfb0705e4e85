//! Per-search memo of occurrence lists keyed by selector set.

use std::collections::HashMap;

use crate::data::SelectorId;
use crate::repr::OccurrenceList;
use crate::training::SearchError;

/// Occurrence lists of selector sets, derived on demand from base lists.
///
/// The list of an ascending id set `s` is `extend(list(s[..k-1]), base(s[k-1]))`;
/// the longest cached prefix is reused.
#[derive(Debug)]
pub struct NlistCache<'a> {
    base: &'a [OccurrenceList],
    memo: HashMap<Box<[SelectorId]>, OccurrenceList>,
}

impl<'a> NlistCache<'a> {
    pub fn new(base: &'a [OccurrenceList]) -> Self {
        Self {
            base,
            memo: HashMap::new(),
        }
    }

    /// Base list of a single selector.
    ///
    /// # Errors
    ///
    /// [`SearchError::MissingOccurrenceList`] if the selector has no list.
    #[inline]
    pub fn base(&self, id: SelectorId) -> Result<&'a OccurrenceList, SearchError> {
        self.base
            .get(id as usize)
            .ok_or(SearchError::MissingOccurrenceList { selector: id })
    }

    /// List of an ascending, non-empty id set.
    pub fn list(&mut self, ids: &[SelectorId]) -> Result<&OccurrenceList, SearchError> {
        debug_assert!(!ids.is_empty());
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids must be ascending");
        if ids.len() == 1 {
            return self.base(ids[0]);
        }

        let mut known = ids.len();
        while known > 1 && !self.memo.contains_key(&ids[..known]) {
            known -= 1;
        }
        for len in known + 1..=ids.len() {
            let last = self.base(ids[len - 1])?;
            let extended = {
                let prefix = if len == 2 {
                    self.base(ids[0])?
                } else {
                    &self.memo[&ids[..len - 1]]
                };
                prefix.extend(last)
            };
            self.memo.insert(ids[..len].into(), extended);
        }
        Ok(&self.memo[ids])
    }

    /// Support of an ascending, non-empty id set.
    #[inline]
    pub fn support(&mut self, ids: &[SelectorId]) -> Result<u32, SearchError> {
        self.list(ids).map(OccurrenceList::support)
    }

    /// Number of memoized sets.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::PrefixTree;
    use crate::testing::{brute_force_support, reference_dataset};

    #[test]
    fn test_support_matches_brute_force() {
        let ds = reference_dataset();
        let tree = PrefixTree::from_dataset(&ds);
        let lists = tree.base_lists(ds.selectors().len());
        let mut cache = NlistCache::new(&lists);

        for ids in [
            &[5u32][..],
            &[5, 8][..],
            &[5, 8, 11][..],
            &[2, 6, 7, 12][..],
            &[0, 9, 11][..],
            &[3, 10][..],
        ] {
            assert_eq!(cache.support(ids).unwrap(), brute_force_support(&ds, ids), "{ids:?}");
        }
    }

    #[test]
    fn test_reuses_prefixes() {
        let ds = reference_dataset();
        let tree = PrefixTree::from_dataset(&ds);
        let lists = tree.base_lists(ds.selectors().len());
        let mut cache = NlistCache::new(&lists);

        cache.support(&[1, 9, 10, 13]).unwrap();
        // {1,9}, {1,9,10}, {1,9,10,13}
        assert_eq!(cache.len(), 3);
        cache.support(&[1, 9, 10]).unwrap();
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_list_fails_fast() {
        let lists = vec![OccurrenceList::new(); 3];
        let mut cache = NlistCache::new(&lists);
        assert_eq!(
            cache.support(&[0, 7]),
            Err(SearchError::MissingOccurrenceList { selector: 7 })
        );
    }
}
