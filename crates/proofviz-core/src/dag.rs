//! The derivation DAG: an id-keyed arena of proof nodes.
//!
//! Every cross-reference is a `NodeId` looked up through the arena, so a
//! parent may be inserted after its children without any fix-up. A `Dag` is
//! never mutated after assembly; transformations build a new one.

use crate::node::{NodeId, ProofNode};
use crate::traversal::{PostOrder, ReversePostOrder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// Errors raised when assembling a `Dag` from caller-supplied nodes.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("node {node} references missing parent {parent}")]
    DanglingParent { node: NodeId, parent: NodeId },

    #[error("node table key {key} holds node {number}")]
    KeyMismatch { key: NodeId, number: NodeId },
}

/// Immutable derivation graph.
///
/// `leaves` are the derivation tips: ids that no node lists as a parent.
/// Traversals start there and walk towards the premises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DagRepr")]
pub struct Dag {
    nodes: BTreeMap<NodeId, ProofNode>,
    leaves: BTreeSet<NodeId>,
}

#[derive(Deserialize)]
struct DagRepr {
    nodes: BTreeMap<NodeId, ProofNode>,
}

impl TryFrom<DagRepr> for Dag {
    type Error = DagError;

    fn try_from(repr: DagRepr) -> Result<Self, Self::Error> {
        for (id, node) in &repr.nodes {
            if *id != node.number {
                return Err(DagError::KeyMismatch {
                    key: *id,
                    number: node.number,
                });
            }
        }
        Self::checked(repr.nodes)
    }
}

impl Dag {
    /// Build a DAG from explicit nodes, rejecting duplicate ids and parent
    /// references that point outside the node set.
    ///
    /// Acyclicity is not checked; transcripts guarantee it by construction.
    pub fn from_nodes(nodes: impl IntoIterator<Item = ProofNode>) -> Result<Self, DagError> {
        let mut table = BTreeMap::new();
        for node in nodes {
            let id = node.number;
            if table.insert(id, node).is_some() {
                return Err(DagError::DuplicateNode(id));
            }
        }
        Self::checked(table)
    }

    fn checked(nodes: BTreeMap<NodeId, ProofNode>) -> Result<Self, DagError> {
        for node in nodes.values() {
            if let Some(parent) = node
                .parents
                .iter()
                .find(|parent| !nodes.contains_key(*parent))
            {
                return Err(DagError::DanglingParent {
                    node: node.number,
                    parent: *parent,
                });
            }
        }
        Ok(Self::assemble(nodes))
    }

    /// Finish a node table whose parent references are known to resolve:
    /// recompute every `children` set and the leaf set.
    pub(crate) fn assemble(mut nodes: BTreeMap<NodeId, ProofNode>) -> Self {
        let mut edges = Vec::new();
        for node in nodes.values_mut() {
            node.children.clear();
            for parent in &node.parents {
                edges.push((*parent, node.number));
            }
        }

        let mut non_leaves = BTreeSet::new();
        for (parent, child) in edges {
            non_leaves.insert(parent);
            if let Some(parent_node) = nodes.get_mut(&parent) {
                parent_node.children.insert(child);
            }
        }

        let leaves = nodes
            .keys()
            .filter(|id| !non_leaves.contains(*id))
            .copied()
            .collect();
        Self { nodes, leaves }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ProofNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterate nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ProofNode> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn leaves(&self) -> &BTreeSet<NodeId> {
        &self.leaves
    }

    pub(crate) fn node_table(&self) -> &BTreeMap<NodeId, ProofNode> {
        &self.nodes
    }

    /// Children of `id`, or `None` if the id is unknown.
    pub fn children_of(&self, id: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.nodes.get(&id).map(|node| &node.children)
    }

    /// Number of activations recorded in the graph.
    pub fn history_length(&self) -> u64 {
        self.nodes
            .values()
            .filter(|node| node.active_time().is_some())
            .count() as u64
    }

    /// The replay step at which the whole derivation is visible.
    pub fn last_step(&self) -> u64 {
        self.history_length()
    }

    /// Ids visible when the replay stands at `step`, ascending.
    pub fn visible_at(&self, step: u64) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.visible_at(step))
            .map(|node| node.number)
            .collect()
    }

    /// Parents-first traversal.
    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder::new(self)
    }

    /// Node-before-parents traversal.
    pub fn reverse_post_order(&self) -> ReversePostOrder<'_> {
        ReversePostOrder::new(self)
    }

    /// Content-addressed reference of this view, stable across runs.
    pub fn snapshot_ref(&self) -> String {
        let mut hasher = Sha256::new();
        for node in self.nodes.values() {
            hasher.update(node.number.to_le_bytes());
            hasher.update(node.clause.as_bytes());
            hasher.update([0]);
            hasher.update(node.inference_rule.as_bytes());
            hasher.update([0]);
            for parent in &node.parents {
                hasher.update(parent.to_le_bytes());
            }
            hasher.update([u8::from(node.is_from_preprocessing)]);
            hasher.update(node.active_time().unwrap_or(u64::MAX).to_le_bytes());
        }
        format!("dag1_{:x}", hasher.finalize())
    }
}
