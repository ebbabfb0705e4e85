//! PPC prefix tree over training rows.
//!
//! Rows are inserted with their selector ids in descending order, so class
//! selectors (the highest ids) sit directly under the root and each path from
//! the root reads high-to-low. After all insertions, [`PrefixTree::assign_codes`]
//! labels every node with its pre-order and post-order rank, which turns
//! ancestor tests into two integer comparisons.
//!
//! Nodes live in parallel arrays indexed by [`NodeId`]; the parent link is a
//! plain index.

use std::fmt;

use crate::data::{Dataset, SelectorId};

use super::nlist::{Occurrence, OccurrenceList};
use super::NodeId;

/// Prefix tree with pre/post-order codes.
#[derive(Clone)]
pub struct PrefixTree {
    selectors: Vec<SelectorId>,
    parents: Vec<Option<NodeId>>,
    /// Children of each node, sorted ascending by selector id.
    children: Vec<Vec<NodeId>>,
    weights: Vec<u32>,
    pre: Vec<u32>,
    pos: Vec<u32>,
    coded: bool,
}

impl Default for PrefixTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTree {
    /// The root node. It holds no selector.
    pub const ROOT: NodeId = 0;

    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            selectors: vec![SelectorId::MAX],
            parents: vec![None],
            children: vec![Vec::new()],
            weights: vec![0],
            pre: Vec::new(),
            pos: Vec::new(),
            coded: false,
        }
    }

    /// Insert every row and assign codes.
    pub fn build<'a>(rows: impl IntoIterator<Item = &'a [SelectorId]>) -> Self {
        let mut tree = Self::new();
        for row in rows {
            tree.insert(row);
        }
        tree.assign_codes();
        tree
    }

    /// Build the tree over all rows of a dataset (class selectors included).
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::build(dataset.rows())
    }

    /// Insert one example given as an ascending id array.
    ///
    /// Ids are walked in descending order. Existing children are found by
    /// binary search and get their weight incremented; missing ones are
    /// inserted at the search position. Invalidates previously assigned codes.
    pub fn insert(&mut self, example: &[SelectorId]) {
        debug_assert!(example.windows(2).all(|w| w[0] < w[1]), "example must be ascending");
        if example.is_empty() {
            return;
        }
        self.coded = false;
        self.weights[Self::ROOT as usize] += 1;

        let mut node = Self::ROOT;
        for &id in example.iter().rev() {
            let found = self.children[node as usize]
                .binary_search_by_key(&id, |&child| self.selectors[child as usize]);
            node = match found {
                Ok(k) => {
                    let child = self.children[node as usize][k];
                    self.weights[child as usize] += 1;
                    child
                }
                Err(k) => {
                    let child = self.push_node(id, node);
                    self.children[node as usize].insert(k, child);
                    child
                }
            };
        }
    }

    fn push_node(&mut self, selector: SelectorId, parent: NodeId) -> NodeId {
        let id = self.selectors.len() as NodeId;
        self.selectors.push(selector);
        self.parents.push(Some(parent));
        self.children.push(Vec::new());
        self.weights.push(1);
        id
    }

    /// Assign pre-order and post-order codes with one depth-first traversal.
    ///
    /// Must run after the last insertion.
    pub fn assign_codes(&mut self) {
        let n = self.n_nodes();
        self.pre = vec![0; n];
        self.pos = vec![0; n];

        let mut next_pre = 1u32;
        let mut next_pos = 0u32;
        let mut stack: Vec<(NodeId, usize)> = vec![(Self::ROOT, 0)];
        while let Some(top) = stack.last_mut() {
            let (node, next_child) = *top;
            match self.children[node as usize].get(next_child) {
                Some(&child) => {
                    top.1 += 1;
                    self.pre[child as usize] = next_pre;
                    next_pre += 1;
                    stack.push((child, 0));
                }
                None => {
                    self.pos[node as usize] = next_pos;
                    next_pos += 1;
                    stack.pop();
                }
            }
        }
        self.coded = true;
    }

    /// Whether codes reflect the current structure.
    #[inline]
    pub fn is_coded(&self) -> bool {
        self.coded
    }

    /// Number of nodes including the root.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.selectors.len()
    }

    /// Number of rows inserted.
    #[inline]
    pub fn n_rows(&self) -> u32 {
        self.weights[Self::ROOT as usize]
    }

    /// Selector of a node. The root holds `SelectorId::MAX`.
    #[inline]
    pub fn selector(&self, node: NodeId) -> SelectorId {
        self.selectors[node as usize]
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents[node as usize]
    }

    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.children[node as usize]
    }

    /// Number of rows whose prefix ends at or passes through this node.
    #[inline]
    pub fn weight(&self, node: NodeId) -> u32 {
        self.weights[node as usize]
    }

    #[inline]
    pub fn pre(&self, node: NodeId) -> u32 {
        debug_assert!(self.coded);
        self.pre[node as usize]
    }

    #[inline]
    pub fn pos(&self, node: NodeId) -> u32 {
        debug_assert!(self.coded);
        self.pos[node as usize]
    }

    /// Code-based ancestor test: `u` is a strict ancestor of `v`.
    #[inline]
    pub fn is_ancestor(&self, u: NodeId, v: NodeId) -> bool {
        debug_assert!(self.coded);
        let (u, v) = (u as usize, v as usize);
        self.pre[u] < self.pre[v] && self.pos[u] > self.pos[v]
    }

    /// Strict ancestors of a node, nearest first, ending with the root.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// Occurrence entry of a node.
    #[inline]
    pub fn occurrence(&self, node: NodeId) -> Occurrence {
        Occurrence::new(self.pre(node), self.pos(node), self.weight(node))
    }

    /// Build one occurrence list per selector id.
    ///
    /// Walks non-root nodes in pre-order, so every list comes out sorted by
    /// `pre`. The result has at least `n_selectors` lists.
    pub fn base_lists(&self, n_selectors: usize) -> Vec<OccurrenceList> {
        debug_assert!(self.coded, "assign_codes must run before base_lists");
        let max_selector = self.selectors[1..].iter().max().map_or(0, |&s| s as usize + 1);
        let mut lists = vec![OccurrenceList::new(); n_selectors.max(max_selector)];

        let mut by_pre = vec![Self::ROOT; self.n_nodes()];
        for node in 0..self.n_nodes() {
            by_pre[self.pre[node] as usize] = node as NodeId;
        }
        for &node in &by_pre[1..] {
            lists[self.selector(node) as usize].push(self.occurrence(node));
        }
        for list in &mut lists {
            list.shrink_to_fit();
        }
        lists
    }
}

impl fmt::Debug for PrefixTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixTree")
            .field("n_nodes", &self.n_nodes())
            .field("n_rows", &self.n_rows())
            .field("coded", &self.coded)
            .finish()
    }
}
