//! Mined classification rules.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::SelectorId;

/// A rule `body -> head` with its coverage counts and heuristic score.
///
/// `n + p` is the support of the body and `p` the support of the body together
/// with the head. Rules are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInfo {
    body: Box<[SelectorId]>,
    head: SelectorId,
    p: u32,
    n: u32,
    heuristic_value: f64,
}

impl RuleInfo {
    /// Create a rule. `body` must be ascending and must not contain `head`.
    pub fn new(
        body: impl Into<Box<[SelectorId]>>,
        head: SelectorId,
        p: u32,
        n: u32,
        heuristic_value: f64,
    ) -> Self {
        let body = body.into();
        debug_assert!(body.windows(2).all(|w| w[0] < w[1]), "body must be ascending");
        debug_assert!(!body.contains(&head));
        Self {
            body,
            head,
            p,
            n,
            heuristic_value,
        }
    }

    #[inline]
    pub fn body(&self) -> &[SelectorId] {
        &self.body
    }

    #[inline]
    pub fn head(&self) -> SelectorId {
        self.head
    }

    /// Covered rows of the head class.
    #[inline]
    pub fn p(&self) -> u32 {
        self.p
    }

    /// Covered rows of other classes.
    #[inline]
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Support of the body (`n + p`).
    #[inline]
    pub fn coverage(&self) -> u32 {
        self.n + self.p
    }

    #[inline]
    pub fn heuristic_value(&self) -> f64 {
        self.heuristic_value
    }

    /// Number of selectors in the body.
    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn signature(&self) -> RuleSignature {
        RuleSignature {
            body: self.body.clone(),
            head: self.head,
        }
    }

    /// Rank against another rule: higher heuristic value, then higher `p`,
    /// then lower head id. `Greater` means `self` is preferred.
    ///
    /// A NaN heuristic value ranks below any number.
    pub fn preference(&self, other: &RuleInfo) -> Ordering {
        cmp_heuristic(self.heuristic_value, other.heuristic_value)
            .then_with(|| self.p.cmp(&other.p))
            .then_with(|| other.head.cmp(&self.head))
    }

    /// `true` if `self` strictly outranks `other` under [`RuleInfo::preference`].
    #[inline]
    pub fn is_better_than(&self, other: &RuleInfo) -> bool {
        self.preference(other) == Ordering::Greater
    }
}

/// Compare heuristic values with NaN below every number.
#[inline]
pub(crate) fn cmp_heuristic(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Export order: best first, ties broken by body so the order is total.
pub fn export_order(a: &RuleInfo, b: &RuleInfo) -> Ordering {
    b.preference(a).then_with(|| a.body.cmp(&b.body))
}

impl fmt::Display for RuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (k, id) in self.body.iter().enumerate() {
            if k > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        write!(
            f,
            "] -> {} (p={}, n={}, h={:.6})",
            self.head, self.p, self.n, self.heuristic_value
        )
    }
}

/// Identity of a rule: its body and head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleSignature {
    pub body: Box<[SelectorId]>,
    pub head: SelectorId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        let base = RuleInfo::new(vec![1, 2], 10, 5, 1, 0.8);
        let higher_h = RuleInfo::new(vec![1], 11, 1, 0, 0.9);
        let higher_p = RuleInfo::new(vec![3], 11, 6, 2, 0.8);
        let lower_head = RuleInfo::new(vec![4], 9, 5, 1, 0.8);

        assert!(higher_h.is_better_than(&base));
        assert!(higher_p.is_better_than(&base));
        assert!(lower_head.is_better_than(&base));
        assert!(!base.is_better_than(&lower_head));
        assert_eq!(base.preference(&base), Ordering::Equal);
    }

    #[test]
    fn test_nan_ranks_last() {
        let nan = RuleInfo::new(vec![1], 10, 0, 0, f64::NAN);
        let neg = RuleInfo::new(vec![1], 10, 0, 0, f64::MIN);
        assert!(neg.is_better_than(&nan));
        assert!(!nan.is_better_than(&neg));
    }

    #[test]
    fn test_export_order_is_total() {
        let mut rules = vec![
            RuleInfo::new(vec![2], 10, 3, 0, 0.5),
            RuleInfo::new(vec![1], 10, 3, 0, 0.5),
            RuleInfo::new(vec![5], 11, 1, 0, 0.9),
        ];
        rules.sort_by(export_order);
        let bodies: Vec<_> = rules.iter().map(|r| r.body().to_vec()).collect();
        assert_eq!(bodies, vec![vec![5], vec![1], vec![2]]);
    }

    #[test]
    fn test_display_and_signature() {
        let rule = RuleInfo::new(vec![0, 4], 12, 3, 1, 0.75);
        assert_eq!(rule.to_string(), "[0,4] -> 12 (p=3, n=1, h=0.750000)");
        assert_eq!(rule.coverage(), 4);
        assert_eq!(rule.signature(), RuleSignature { body: vec![0, 4].into(), head: 12 });
    }
}
