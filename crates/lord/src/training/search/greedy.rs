//! Greedy grow-then-prune search.

use crate::data::SelectorId;
use crate::training::heuristics::HeuristicFn;
use crate::training::SearchError;

use super::{improves, RuleSearcher, Scored};

impl<H: HeuristicFn> RuleSearcher<'_, H> {
    pub(super) fn greedy(
        &mut self,
        body: &[SelectorId],
        class: SelectorId,
    ) -> Result<Option<Scored>, SearchError> {
        let positives = self.class_support(class)?;
        let mut best: Option<Scored> = None;
        let mut current: Vec<SelectorId> = Vec::with_capacity(body.len());
        let mut candidate: Vec<SelectorId> = Vec::with_capacity(body.len());

        // Grow
        loop {
            let mut accepted = false;
            for &id in body {
                if current.binary_search(&id).is_ok() {
                    continue;
                }
                candidate.clear();
                candidate.extend_from_slice(&current);
                let at = candidate.partition_point(|&c| c < id);
                candidate.insert(at, id);

                let (covered, p) = self.counts(&candidate, class)?;
                let h = self.score(covered, p, positives);
                if improves(&best, h, p) {
                    best = Some(Scored {
                        body: candidate.clone(),
                        head: class,
                        covered,
                        p,
                        h,
                    });
                    accepted = true;
                }
            }
            match &best {
                Some(b) if accepted => current.clone_from(&b.body),
                _ => break,
            }
        }

        // Prune
        while current.len() > 1 {
            let mut accepted = false;
            for skip in 0..current.len() {
                candidate.clear();
                candidate.extend(
                    current
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != skip)
                        .map(|(_, &id)| id),
                );

                let (covered, p) = self.counts(&candidate, class)?;
                let h = self.score(covered, p, positives);
                if improves(&best, h, p) {
                    best = Some(Scored {
                        body: candidate.clone(),
                        head: class,
                        covered,
                        p,
                        h,
                    });
                    accepted = true;
                }
            }
            match &best {
                Some(b) if accepted => current.clone_from(&b.body),
                _ => break,
            }
        }

        Ok(best)
    }
}
