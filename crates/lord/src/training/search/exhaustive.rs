//! Depth-first branch-and-bound search.
//!
//! Bodies are enumerated as ascending sub-combinations of the row's
//! predictors. At every body, each candidate head is scored and the
//! extensions by a larger sibling are derived from the body's list. Once the
//! incumbent has `n = 0`, any set supported by fewer than `p` rows can no
//! longer win and is cut, together with everything below it.

use crate::data::SelectorId;
use crate::repr::OccurrenceList;
use crate::training::heuristics::{HeuristicFn, RuleStats};
use crate::training::SearchError;

use super::{improves, ExhaustiveParams, RuleSearcher, Scored};

/// A selector with its base list. `positives` is only meaningful for heads.
#[derive(Clone, Copy)]
struct Candidate<'l> {
    id: SelectorId,
    positives: u32,
    list: &'l OccurrenceList,
}

/// A body extension waiting to be explored.
struct Branch<'l> {
    base: Candidate<'l>,
    list: OccurrenceList,
}

struct BranchAndBound<'h, H> {
    heuristic: &'h H,
    n_rows: u32,
    max_body_len: usize,
    best: Option<Scored>,
}

impl<H: HeuristicFn> BranchAndBound<'_, H> {
    /// Whether a set supported by `support` rows is cut by the incumbent.
    #[inline]
    fn cut(&self, support: u32) -> bool {
        self.best
            .as_ref()
            .is_some_and(|b| b.n() == 0 && support < b.p)
    }

    fn descend<'l>(
        &mut self,
        body: &mut Vec<SelectorId>,
        body_list: &OccurrenceList,
        siblings: &[Candidate<'l>],
        heads: &[Candidate<'l>],
    ) {
        let mut next: Vec<Branch<'l>> = Vec::new();
        if body.len() < self.max_body_len {
            for sibling in siblings {
                let list = body_list.extend(sibling.list);
                if self.cut(list.support()) {
                    continue;
                }
                next.push(Branch {
                    base: *sibling,
                    list,
                });
            }
        }

        let covered = body_list.support();
        let mut next_heads: Vec<Candidate<'l>> = Vec::with_capacity(heads.len());
        for head in heads {
            let p = body_list.extend(head.list).support();
            if self.cut(p) {
                continue;
            }
            next_heads.push(*head);

            let h = self.heuristic.evaluate(&RuleStats::new(
                covered,
                p,
                self.n_rows,
                head.positives,
            ));
            if improves(&self.best, h, p) {
                self.best = Some(Scored {
                    body: body.clone(),
                    head: head.id,
                    covered,
                    p,
                    h,
                });
            }
        }

        if next_heads.is_empty() || next.is_empty() {
            return;
        }

        let bases: Vec<Candidate<'l>> = next.iter().map(|branch| branch.base).collect();
        for (k, branch) in next.iter().enumerate() {
            body.push(branch.base.id);
            self.descend(body, &branch.list, &bases[k + 1..], &next_heads);
            body.pop();
        }
    }
}

impl<H: HeuristicFn> RuleSearcher<'_, H> {
    pub(super) fn exhaustive(
        &mut self,
        body: &[SelectorId],
        heads: &[SelectorId],
        params: &ExhaustiveParams,
        seed: Option<Scored>,
    ) -> Result<Option<Scored>, SearchError> {
        let bases = body
            .iter()
            .map(|&id| {
                self.cache.base(id).map(|list| Candidate {
                    id,
                    positives: 0,
                    list,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let heads = heads
            .iter()
            .map(|&id| {
                self.cache.base(id).map(|list| Candidate {
                    id,
                    positives: list.support(),
                    list,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let max_body_len = params.max_body_len();
        let mut bnb = BranchAndBound {
            heuristic: self.heuristic,
            n_rows: self.n_rows,
            max_body_len,
            // a seed longer than the bound is not a valid answer
            best: seed.filter(|s| s.body.len() <= max_body_len),
        };
        if bnb.max_body_len == 0 {
            return Ok(bnb.best);
        }

        let mut current = Vec::with_capacity(body.len());
        for (k, first) in bases.iter().enumerate() {
            current.push(first.id);
            bnb.descend(&mut current, first.list, &bases[k + 1..], &heads);
            current.pop();
        }
        Ok(bnb.best)
    }
}
