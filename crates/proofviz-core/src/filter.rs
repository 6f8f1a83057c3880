//! Ancestor and descendant closures over a `Dag`.
//!
//! Both filters are pure: the source `Dag` is left untouched and a new one is
//! returned, so callers can stack views for drill-down and undo.

use crate::dag::Dag;
use crate::node::NodeId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Errors raised by id-driven transformations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown node id: {0}")]
    UnknownId(NodeId),
}

/// Reject the request before any traversal if an id is absent from `dag`.
pub(crate) fn ensure_known(dag: &Dag, ids: &BTreeSet<NodeId>) -> Result<(), FilterError> {
    match ids.iter().find(|id| !dag.contains(**id)) {
        Some(unknown) => Err(FilterError::UnknownId(*unknown)),
        None => Ok(()),
    }
}

/// Keep `ids` and everything they are derived from. Edges are unchanged.
pub fn ancestor_filter(
    dag: &Dag,
    ids: impl IntoIterator<Item = NodeId>,
) -> Result<Dag, FilterError> {
    let relevant: BTreeSet<NodeId> = ids.into_iter().collect();
    ensure_known(dag, &relevant)?;
    Ok(ancestor_closure(dag, relevant))
}

fn ancestor_closure(dag: &Dag, mut relevant: BTreeSet<NodeId>) -> Dag {
    let mut remaining = BTreeMap::new();
    for node in dag.reverse_post_order() {
        if relevant.contains(&node.number) {
            relevant.extend(node.parents.iter().copied());
            remaining.insert(node.number, node.clone());
        }
    }
    Dag::assemble(remaining)
}

/// Keep `ids` and everything derived from them.
///
/// A kept node whose derivation also uses clauses outside the closure keeps
/// those edges, each pointing at a boundary copy of the outside parent. A seed
/// with no kept parent is itself replaced by its boundary copy, so no
/// unwanted ancestry is pulled into the view.
pub fn descendant_filter(
    dag: &Dag,
    ids: impl IntoIterator<Item = NodeId>,
) -> Result<Dag, FilterError> {
    let mut relevant: BTreeSet<NodeId> = ids.into_iter().collect();
    ensure_known(dag, &relevant)?;

    let mut remaining = BTreeMap::new();
    for node in dag.post_order() {
        let has_relevant_parent = node.parents.iter().any(|parent| relevant.contains(parent));
        if !has_relevant_parent && !relevant.contains(&node.number) {
            continue;
        }
        relevant.insert(node.number);

        if has_relevant_parent {
            for parent in &node.parents {
                if relevant.contains(parent) {
                    continue;
                }
                if let Some(outside) = dag.get(*parent) {
                    remaining.insert(*parent, outside.boundary_copy());
                }
            }
            remaining.insert(node.number, node.clone());
        } else {
            remaining.insert(node.number, node.boundary_copy());
        }
    }
    Ok(Dag::assemble(remaining))
}

/// Drop every node that does not contribute to some activated clause.
///
/// Passive-but-never-activated sub-derivations are noise for replay.
pub fn prune_inactive(dag: &Dag) -> Dag {
    let activated: BTreeSet<NodeId> = dag
        .nodes()
        .filter(|node| node.active_time().is_some())
        .map(|node| node.number)
        .collect();
    let pruned = ancestor_closure(dag, activated);
    debug!(
        "pruned {} node(s) not deriving an activated clause",
        dag.len() - pruned.len()
    );
    pruned
}
