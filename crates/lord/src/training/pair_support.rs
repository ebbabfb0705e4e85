//! Support counts of every selector pair, read off the prefix tree.
//!
//! Paths read high-to-low, so a node with selector `a` below an ancestor with
//! selector `b > a` stands for `weight(node)` rows holding both. Top-level
//! subtrees are disjoint; each worker folds a private matrix over a share of
//! them and the matrices are summed.

use ndarray::Array2;
use rayon::prelude::*;

use crate::data::SelectorId;
use crate::repr::{NodeId, PrefixTree};
use crate::utils::Parallelism;

/// Symmetric pair support matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSupportMatrix {
    /// `counts[[low, high]]`, upper triangle unused.
    counts: Array2<u32>,
}

impl PairSupportMatrix {
    pub fn compute(tree: &PrefixTree, n_selectors: usize, parallelism: Parallelism) -> Self {
        let zeros = || Array2::<u32>::zeros((n_selectors, n_selectors));
        let top = tree.children(PrefixTree::ROOT);

        let counts = if parallelism.is_parallel() {
            top.par_iter()
                .fold(zeros, |mut acc, &subtree| {
                    accumulate(tree, subtree, &mut acc);
                    acc
                })
                .reduce(zeros, |a, b| a + b)
        } else {
            top.iter().fold(zeros(), |mut acc, &subtree| {
                accumulate(tree, subtree, &mut acc);
                acc
            })
        };
        Self { counts }
    }

    pub fn n_selectors(&self) -> usize {
        self.counts.nrows()
    }

    /// Rows holding both selectors. Zero for `a == b` or unknown ids.
    pub fn support(&self, a: SelectorId, b: SelectorId) -> u32 {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.counts
            .get((low as usize, high as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Pairs `(low, high)` supported by at least `min_support` rows, in
    /// ascending order.
    pub fn frequent_pairs(&self, min_support: u32) -> Vec<(SelectorId, SelectorId, u32)> {
        self.counts
            .indexed_iter()
            .filter(|&((low, high), &count)| low < high && count > 0 && count >= min_support)
            .map(|((low, high), &count)| (low as SelectorId, high as SelectorId, count))
            .collect()
    }
}

fn accumulate(tree: &PrefixTree, subtree: NodeId, acc: &mut Array2<u32>) {
    let mut stack = vec![subtree];
    while let Some(node) = stack.pop() {
        stack.extend_from_slice(tree.children(node));
        let low = tree.selector(node) as usize;
        let weight = tree.weight(node);
        for ancestor in tree.ancestors(node).take_while(|&a| a != PrefixTree::ROOT) {
            let high = tree.selector(ancestor) as usize;
            if let Some(cell) = acc.get_mut((low, high)) {
                *cell += weight;
            }
        }
    }
}
