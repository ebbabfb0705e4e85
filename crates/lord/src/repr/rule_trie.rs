//! Rule trie: rules indexed by body, queried by example.
//!
//! Each rule is stored at the end of the path spelled by its body. A node
//! holds at most one rule; when two rules share a body, the preferred one by
//! [`RuleInfo::preference`] stays. Covering-rule queries walk every path whose
//! selectors all occur in the example.

use std::sync::Arc;

use crate::data::{ExampleRef, SelectorId};

use super::rule::{cmp_heuristic, RuleInfo};
use super::NodeId;

/// Order in which a body's selectors spell the trie path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertOrder {
    Ascending,
    /// Highest id first, as in the prefix tree.
    #[default]
    Descending,
}

#[derive(Debug, Clone)]
struct TrieNode {
    selector: SelectorId,
    parent: Option<NodeId>,
    /// Sorted ascending by selector id.
    children: Vec<NodeId>,
    rule: Option<Arc<RuleInfo>>,
}

impl TrieNode {
    fn new(selector: SelectorId, parent: Option<NodeId>) -> Self {
        Self {
            selector,
            parent,
            children: Vec::new(),
            rule: None,
        }
    }
}

/// Prefix tree over rule bodies.
#[derive(Debug, Clone)]
pub struct RuleTrie {
    nodes: Vec<TrieNode>,
    order: InsertOrder,
    n_rules: usize,
}

impl Default for RuleTrie {
    fn default() -> Self {
        Self::new(InsertOrder::default())
    }
}

/// Body selectors in path order.
fn path(order: InsertOrder, body: &[SelectorId]) -> impl Iterator<Item = SelectorId> + '_ {
    let n = body.len();
    (0..n).map(move |k| match order {
        InsertOrder::Ascending => body[k],
        InsertOrder::Descending => body[n - 1 - k],
    })
}

impl RuleTrie {
    pub const ROOT: NodeId = 0;

    pub fn new(order: InsertOrder) -> Self {
        Self {
            nodes: vec![TrieNode::new(SelectorId::MAX, None)],
            order,
            n_rules: 0,
        }
    }

    /// Build a trie by inserting every rule with [`RuleTrie::insert`].
    pub fn from_rules(order: InsertOrder, rules: impl IntoIterator<Item = Arc<RuleInfo>>) -> Self {
        let mut trie = Self::new(order);
        for rule in rules {
            trie.insert(rule);
        }
        trie
    }

    #[inline]
    pub fn order(&self) -> InsertOrder {
        self.order
    }

    /// Number of stored rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_rules
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_rules == 0
    }

    /// Number of nodes including the root.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn find_child(&self, node: NodeId, id: SelectorId) -> Result<usize, usize> {
        self.nodes[node as usize]
            .children
            .binary_search_by_key(&id, |&c| self.nodes[c as usize].selector)
    }

    /// Child of `node` for `id`, created if missing. The flag tells whether
    /// it already existed.
    fn child_or_insert(&mut self, node: NodeId, id: SelectorId) -> (NodeId, bool) {
        match self.find_child(node, id) {
            Ok(k) => (self.nodes[node as usize].children[k], true),
            Err(k) => {
                let child = self.nodes.len() as NodeId;
                self.nodes.push(TrieNode::new(id, Some(node)));
                self.nodes[node as usize].children.insert(k, child);
                (child, false)
            }
        }
    }

    /// Keep the preferred of `rule` and the rule already at `node`.
    fn place(&mut self, node: NodeId, rule: Arc<RuleInfo>) -> bool {
        let slot = &mut self.nodes[node as usize].rule;
        if let Some(held) = slot.as_ref()
            && !rule.is_better_than(held)
        {
            return false;
        }
        if slot.is_none() {
            self.n_rules += 1;
        }
        *slot = Some(rule);
        true
    }

    /// Insert a rule along its body.
    ///
    /// Returns `true` if the rule is now stored, `false` if a preferred rule
    /// with the same body was already there.
    pub fn insert(&mut self, rule: Arc<RuleInfo>) -> bool {
        let mut node = Self::ROOT;
        for id in path(self.order, rule.body()) {
            node = self.child_or_insert(node, id).0;
        }
        self.place(node, rule)
    }

    /// Insert a rule unless a strict ancestor on its path already holds a
    /// rule with a heuristic value at least as high.
    ///
    /// Rules must be offered in non-decreasing body length for the check to
    /// see every shorter generalization.
    pub fn insert_with_filter(&mut self, rule: Arc<RuleInfo>) -> bool {
        let body_len = rule.len();
        if body_len > 0 && self.dominated_by(Self::ROOT, &rule) {
            return false;
        }

        let mut node = Self::ROOT;
        for (depth, id) in path(self.order, rule.body()).enumerate() {
            let (child, existed) = self.child_or_insert(node, id);
            if existed && depth + 1 < body_len && self.dominated_by(child, &rule) {
                return false;
            }
            node = child;
        }
        self.place(node, rule)
    }

    fn dominated_by(&self, node: NodeId, rule: &RuleInfo) -> bool {
        self.nodes[node as usize].rule.as_ref().is_some_and(|held| {
            cmp_heuristic(held.heuristic_value(), rule.heuristic_value()).is_ge()
        })
    }

    /// Rule stored for exactly this body, if any.
    pub fn get(&self, body: &[SelectorId]) -> Option<&Arc<RuleInfo>> {
        let mut node = Self::ROOT;
        for id in path(self.order, body) {
            let k = self.find_child(node, id).ok()?;
            node = self.nodes[node as usize].children[k];
        }
        self.nodes[node as usize].rule.as_ref()
    }

    /// Every stored rule whose body is a subset of the example.
    ///
    /// A sorted example must be ascending.
    pub fn find_covering_rules<'e>(
        &self,
        example: impl Into<ExampleRef<'e>>,
    ) -> Vec<&Arc<RuleInfo>> {
        let mut out = Vec::new();
        match example.into() {
            ExampleRef::Sorted(ids) => self.covering_sorted(ids, &mut out),
            ExampleRef::Set(ids) => {
                let mut stack = vec![Self::ROOT];
                while let Some(node) = stack.pop() {
                    let node = &self.nodes[node as usize];
                    if let Some(rule) = &node.rule {
                        out.push(rule);
                    }
                    stack.extend(
                        node.children
                            .iter()
                            .filter(|&&c| ids.contains(&self.nodes[c as usize].selector)),
                    );
                }
            }
        }
        out
    }

    fn covering_sorted<'t>(&'t self, ids: &[SelectorId], out: &mut Vec<&'t Arc<RuleInfo>>) {
        let start = match self.order {
            InsertOrder::Ascending => 0,
            InsertOrder::Descending => ids.len(),
        };
        let mut stack = vec![(Self::ROOT, start)];
        while let Some((node, bound)) = stack.pop() {
            let node = &self.nodes[node as usize];
            if let Some(rule) = &node.rule {
                out.push(rule);
            }
            for &child in &node.children {
                if let Some(next) = self.locate(ids, self.nodes[child as usize].selector, bound) {
                    stack.push((child, next));
                }
            }
        }
    }

    /// Scan for `id` away from `bound` in path direction; returns the bound
    /// for the next path element.
    fn locate(&self, ids: &[SelectorId], id: SelectorId, bound: usize) -> Option<usize> {
        match self.order {
            InsertOrder::Descending => {
                let mut k = bound;
                while k > 0 {
                    k -= 1;
                    if ids[k] == id {
                        return Some(k);
                    }
                    if ids[k] < id {
                        return None;
                    }
                }
                None
            }
            InsertOrder::Ascending => {
                for (k, &held) in ids.iter().enumerate().skip(bound) {
                    if held == id {
                        return Some(k + 1);
                    }
                    if held > id {
                        return None;
                    }
                }
                None
            }
        }
    }

    /// Preferred covering rule; ties keep the first one found.
    pub fn best_covering_rule<'e>(
        &self,
        example: impl Into<ExampleRef<'e>>,
    ) -> Option<&Arc<RuleInfo>> {
        select_best(self.find_covering_rules(example))
    }

    /// Stored rules in insertion order of their nodes.
    pub fn iter_rules(&self) -> impl Iterator<Item = &Arc<RuleInfo>> + '_ {
        self.nodes.iter().filter_map(|n| n.rule.as_ref())
    }

    /// Body spelled by the path to `node`, ascending.
    pub fn body_of(&self, node: NodeId) -> Vec<SelectorId> {
        let mut body = Vec::new();
        let mut cur = node;
        while let Some(parent) = self.nodes[cur as usize].parent {
            body.push(self.nodes[cur as usize].selector);
            cur = parent;
        }
        body.sort_unstable();
        body
    }

    /// Node ids holding a rule.
    pub fn rule_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .filter(|&k| self.nodes[k].rule.is_some())
            .map(|k| k as NodeId)
    }
}

/// Preferred rule of a candidate list; ties keep the earliest.
pub fn select_best<'r>(
    rules: impl IntoIterator<Item = &'r Arc<RuleInfo>>,
) -> Option<&'r Arc<RuleInfo>> {
    let mut best: Option<&Arc<RuleInfo>> = None;
    for rule in rules {
        if best.is_none_or(|b| rule.is_better_than(b)) {
            best = Some(rule);
        }
    }
    best
}
