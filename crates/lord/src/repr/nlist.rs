//! Occurrence lists (N-lists) and their algebra.
//!
//! An [`OccurrenceList`] holds, for one selector set, the prefix-tree nodes at
//! which rows containing the whole set pass through the set's highest
//! selector, each with the number of such rows. Entries are sorted by
//! pre-order code and the counts sum to the set's support.
//!
//! Three operators derive new lists without touching the rows again:
//!
//! - [`OccurrenceList::extend`] grows a selector set by one selector
//! - [`OccurrenceList::conjunction`] / [`OccurrenceList::disjunction`] combine
//!   arbitrary compound expressions whose lists are antichains of the same tree
//!
//! All three are single two-pointer sweeps.

use std::cmp::Ordering;
use std::fmt;

/// One prefix-tree node in an occurrence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occurrence {
    pub pre: u32,
    pub pos: u32,
    pub count: u32,
}

impl Occurrence {
    #[inline]
    pub fn new(pre: u32, pos: u32, count: u32) -> Self {
        Self { pre, pos, count }
    }

    /// `self` is a strict ancestor of `other`.
    #[inline]
    pub fn is_ancestor_of(&self, other: &Occurrence) -> bool {
        self.pre < other.pre && self.pos > other.pos
    }
}

/// Occurrence list of a selector set or compound expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceList {
    entries: Vec<Occurrence>,
    support: u32,
}

impl OccurrenceList {
    /// The empty (zero-support) list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            support: 0,
        }
    }

    /// Append an entry. Entries must arrive in ascending `pre` order.
    #[inline]
    pub fn push(&mut self, entry: Occurrence) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.pre < entry.pre),
            "entries must be pushed in ascending pre order"
        );
        self.support += entry.count;
        self.entries.push(entry);
    }

    /// Add `count` onto `ancestor`, merging with the last entry if it is the
    /// same node.
    #[inline]
    fn accumulate(&mut self, ancestor: Occurrence, count: u32) {
        match self.entries.last_mut() {
            Some(last) if last.pre == ancestor.pre => last.count += count,
            _ => self.entries.push(Occurrence { count, ..ancestor }),
        }
        self.support += count;
    }

    /// Total count over all entries.
    #[inline]
    pub fn support(&self) -> u32 {
        self.support
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[Occurrence] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occurrence> {
        self.entries.iter()
    }

    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// List of `P ∪ {x}` from the list of `P` (`self`) and the list of `P`
    /// with its last selector replaced by `x` (`ancestors`), where `x` is
    /// greater than every selector in `P`.
    ///
    /// Each entry of `self` lying strictly below an entry of `ancestors` adds
    /// its count onto that ancestor. Not commutative.
    pub fn extend(&self, ancestors: &OccurrenceList) -> OccurrenceList {
        if self.is_empty() || ancestors.is_empty() {
            return OccurrenceList::new();
        }

        let (a, b) = (&self.entries, &ancestors.entries);
        let mut out = OccurrenceList::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (desc, anc) = (a[i], b[j]);
            if desc.pre > anc.pre {
                if desc.pos < anc.pos {
                    out.accumulate(anc, desc.count);
                    i += 1;
                } else {
                    // `anc` ends before `desc` starts
                    j += 1;
                }
            } else {
                i += 1;
            }
        }
        out
    }

    /// Boolean AND of two expressions: matched ancestor/descendant pairs keep
    /// the descendant. Commutative.
    pub fn conjunction(&self, other: &OccurrenceList) -> OccurrenceList {
        if self.is_empty() || other.is_empty() {
            return OccurrenceList::new();
        }

        let (a, b) = (&self.entries, &other.entries);
        let mut out = OccurrenceList::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (x, y) = (a[i], b[j]);
            match x.pre.cmp(&y.pre) {
                Ordering::Equal => {
                    out.push(x);
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    if x.is_ancestor_of(&y) {
                        out.push(y);
                        j += 1;
                    } else {
                        i += 1;
                    }
                }
                Ordering::Greater => {
                    if y.is_ancestor_of(&x) {
                        out.push(x);
                        i += 1;
                    } else {
                        j += 1;
                    }
                }
            }
        }
        out
    }

    /// Boolean OR of two expressions: matched ancestor/descendant pairs keep
    /// the ancestor. Commutative.
    pub fn disjunction(&self, other: &OccurrenceList) -> OccurrenceList {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let (a, b) = (&self.entries, &other.entries);
        let mut out = OccurrenceList::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (x, y) = (a[i], b[j]);
            match x.pre.cmp(&y.pre) {
                Ordering::Equal => {
                    out.push(x);
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    if x.is_ancestor_of(&y) {
                        j += 1;
                    } else {
                        out.push(x);
                        i += 1;
                    }
                }
                Ordering::Greater => {
                    if y.is_ancestor_of(&x) {
                        i += 1;
                    } else {
                        out.push(y);
                        j += 1;
                    }
                }
            }
        }
        for &x in &a[i..] {
            out.push(x);
        }
        for &y in &b[j..] {
            out.push(y);
        }
        out
    }
}

impl FromIterator<Occurrence> for OccurrenceList {
    fn from_iter<I: IntoIterator<Item = Occurrence>>(iter: I) -> Self {
        let mut list = OccurrenceList::new();
        for entry in iter {
            list.push(entry);
        }
        list
    }
}

impl<'a> IntoIterator for &'a OccurrenceList {
    type Item = &'a Occurrence;
    type IntoIter = std::slice::Iter<'a, Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for OccurrenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (k, e) in self.entries.iter().enumerate() {
            if k > 0 {
                f.write_str("; ")?;
            }
            write!(f, "<{},{}>:{}", e.pre, e.pos, e.count)?;
        }
        write!(f, "}} support={}", self.support)
    }
}
