//! Preprocessing compaction.
//!
//! Provers rewrite an input formula several times (clausification,
//! skolemization, ...) before a clause enters the search. Only the edge from
//! the original input to the final preprocessing clause is kept; the
//! intermediate rewriting steps disappear from the graph.

use crate::dag::Dag;
use crate::node::{NodeId, ProofNode};
use crate::traversal::PostOrder;
use std::collections::BTreeMap;
use tracing::debug;

/// Collapse chains of preprocessing steps.
///
/// For each preprocessing node, a preprocessing parent is replaced by its own
/// parents; a parentless preprocessing parent is kept unless its rule is
/// `choice_axiom_rule` (background theory, never shown). Nodes processed
/// earlier already carry rewritten parent lists, so chains of any length
/// collapse in one pass. Nodes no longer reachable from the original
/// derivation tips are dropped.
pub fn merge_preprocessing(dag: &Dag, choice_axiom_rule: &str) -> Dag {
    let order: Vec<NodeId> = dag.post_order().map(|node| node.number).collect();
    let mut nodes = dag.node_table().clone();

    for id in order {
        let rewritten = match nodes.get(&id) {
            Some(current) if current.is_from_preprocessing => {
                rewrite_parents(&nodes, current, choice_axiom_rule)
            }
            _ => continue,
        };
        if let Some(current) = nodes.get_mut(&id) {
            current.parents = rewritten;
        }
    }

    let reachable: BTreeMap<NodeId, ProofNode> =
        PostOrder::from_seeds(&nodes, dag.leaves().iter().copied())
            .map(|node| (node.number, node.clone()))
            .collect();
    debug!(
        "merged preprocessing: {} intermediate node(s) dropped",
        dag.len() - reachable.len()
    );
    Dag::assemble(reachable)
}

fn rewrite_parents(
    nodes: &BTreeMap<NodeId, ProofNode>,
    current: &ProofNode,
    choice_axiom_rule: &str,
) -> Vec<NodeId> {
    let mut rewritten = Vec::with_capacity(current.parents.len());
    let mut push = |id: NodeId| {
        if !rewritten.contains(&id) {
            rewritten.push(id);
        }
    };

    for parent_id in &current.parents {
        match nodes.get(parent_id) {
            Some(parent) if parent.is_from_preprocessing => {
                if parent.parents.is_empty() && parent.inference_rule != choice_axiom_rule {
                    push(*parent_id);
                }
                for grandparent in &parent.parents {
                    push(*grandparent);
                }
            }
            _ => push(*parent_id),
        }
    }
    rewritten
}
