// Prefix Index Implementation
// An immutable-once-built trie where every node caches its subtree's top-K
// suggestions, so a lookup is a path walk plus one Vec copy.

use std::collections::HashMap;

use tracing::debug;

use crate::builders::TypeaheadConfig;
use crate::contracts::{QueryRecord, Suggestion};

/// One node per distinct prefix. Children are a sparse map rather than a
/// fixed 26-slot array so the alphabet can widen without a layout change.
#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// Suggestions terminating at this node. Usually zero or one; more than
    /// one only when distinct texts collide on a length-capped path.
    terminals: Vec<Suggestion>,
    /// Top-K of the entire subtree, frequency descending. Finalized by the
    /// post-order pass and never touched afterwards.
    top_k: Vec<Suggestion>,
}

/// The in-memory prefix index. Built in full by [`PrefixIndex::build`],
/// read-only thereafter; rebuilds produce a wholly new instance.
#[derive(Debug)]
pub struct PrefixIndex {
    root: TrieNode,
    config: TypeaheadConfig,
}

impl PrefixIndex {
    /// Build a new index from a store snapshot.
    ///
    /// Two phases: a pure structural insert of every record, then a single
    /// bottom-up pass computing each node's top-K exactly once from its
    /// children's already-final lists. O(N*K*log K) total, versus the
    /// O(N*depth*K) of recomputing ancestor aggregates per insertion.
    pub fn build(records: &[QueryRecord], config: TypeaheadConfig) -> Self {
        let mut root = TrieNode::default();

        for record in records {
            // The path is capped at max_query_length characters; the
            // suggestion keeps the record's full text.
            let mut cur = &mut root;
            for ch in record.text.chars().take(config.max_query_length) {
                cur = cur.children.entry(ch).or_default();
            }
            cur.terminals
                .push(Suggestion::new(record.text.clone(), record.frequency));
        }

        finalize_top_k(&mut root, config.max_suggestions);

        debug!(
            records = records.len(),
            max_suggestions = config.max_suggestions,
            "Prefix index built"
        );

        Self { root, config }
    }

    /// An index with no entries; every lookup returns an empty list.
    /// Serves as the pre-warm-up placeholder.
    pub fn empty(config: TypeaheadConfig) -> Self {
        Self::build(&[], config)
    }

    /// Walk the trie one character per step and return the matched node's
    /// cached top-K. A missing path is an empty result, not an error.
    pub fn lookup(&self, prefix: &str) -> Vec<Suggestion> {
        let mut cur = &self.root;
        for ch in prefix.chars() {
            match cur.children.get(&ch) {
                Some(child) => cur = child,
                None => return Vec::new(),
            }
        }
        cur.top_k.clone()
    }

    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }

    /// Number of nodes reachable from the root, counting the root
    pub fn node_count(&self) -> usize {
        fn count(node: &TrieNode) -> usize {
            1 + node.children.values().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    #[cfg(test)]
    fn for_each_node(&self, f: &mut impl FnMut(&[Suggestion])) {
        fn walk(node: &TrieNode, f: &mut impl FnMut(&[Suggestion])) {
            f(&node.top_k);
            for child in node.children.values() {
                walk(child, f);
            }
        }
        walk(&self.root, f);
    }
}

/// Post-order aggregation: a node's candidate set is its own terminal
/// suggestions plus every child's finalized top-K; sort by frequency
/// descending with lexicographic tie-break, truncate to K.
fn finalize_top_k(node: &mut TrieNode, k: usize) {
    let mut candidates: Vec<Suggestion> = Vec::new();

    for child in node.children.values_mut() {
        finalize_top_k(child, k);
        candidates.extend_from_slice(&child.top_k);
    }
    candidates.extend_from_slice(&node.terminals);

    candidates.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.text.cmp(&b.text))
    });
    candidates.truncate(k);
    node.top_k = candidates;
}
