//! Core data structures: the PPC prefix tree, occurrence lists, rules and the
//! rule trie.

/// Node identifier inside a [`PrefixTree`] or [`RuleTrie`] arena.
pub type NodeId = u32;

pub mod nlist;
pub mod ppc_tree;
pub mod rule;
pub mod rule_trie;

pub use nlist::{Occurrence, OccurrenceList};
pub use ppc_tree::PrefixTree;
pub use rule::{export_order, RuleInfo, RuleSignature};
pub use rule_trie::{select_best, InsertOrder, RuleTrie};
