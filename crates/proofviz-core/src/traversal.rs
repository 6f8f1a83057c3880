//! DAG iterators relative to the parent ("premise") relation.
//!
//! Both visit every node reachable from the leaf set exactly once in
//! O(nodes + edges) time. Sibling order is unspecified.

use crate::dag::Dag;
use crate::node::{NodeId, ProofNode};
use std::collections::{BTreeMap, HashSet};
use std::iter::FusedIterator;

/// Parents-first traversal: a node is yielded only after all of its parents.
///
/// Iterative depth-first search with an explicit stack seeded from the
/// derivation tips; deep derivations cannot overflow the call stack.
#[derive(Debug, Clone)]
pub struct PostOrder<'a> {
    nodes: &'a BTreeMap<NodeId, ProofNode>,
    todo: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl<'a> PostOrder<'a> {
    pub fn new(dag: &'a Dag) -> Self {
        Self::from_seeds(dag.node_table(), dag.leaves().iter().copied())
    }

    /// Traverse a bare node table from explicit seeds. Used when parent lists
    /// were rewritten after the leaf set was computed.
    pub(crate) fn from_seeds(
        nodes: &'a BTreeMap<NodeId, ProofNode>,
        seeds: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            nodes,
            todo: seeds.into_iter().collect(),
            visited: HashSet::with_capacity(nodes.len()),
        }
    }
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a ProofNode;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(&current) = self.todo.last() {
            if self.visited.contains(&current) {
                self.todo.pop();
                continue;
            }
            let Some(node) = nodes.get(&current) else {
                self.todo.pop();
                continue;
            };

            // Unvisited parents go on top; `current` is revisited once they are done.
            let mut pending_parent = false;
            for parent in &node.parents {
                if !self.visited.contains(parent) && nodes.contains_key(parent) {
                    self.todo.push(*parent);
                    pending_parent = true;
                }
            }

            if !pending_parent {
                self.visited.insert(current);
                self.todo.pop();
                return Some(node);
            }
        }
        None
    }
}

impl FusedIterator for PostOrder<'_> {}

/// Node-before-parents traversal: post-order replayed back to front.
#[derive(Debug, Clone)]
pub struct ReversePostOrder<'a> {
    post_order: Vec<&'a ProofNode>,
}

impl<'a> ReversePostOrder<'a> {
    pub fn new(dag: &'a Dag) -> Self {
        Self {
            post_order: PostOrder::new(dag).collect(),
        }
    }
}

impl<'a> Iterator for ReversePostOrder<'a> {
    type Item = &'a ProofNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.post_order.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.post_order.len(), Some(self.post_order.len()))
    }
}

impl ExactSizeIterator for ReversePostOrder<'_> {}

impl FusedIterator for ReversePostOrder<'_> {}
