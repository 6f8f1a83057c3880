//! Common-consequence search.

use crate::dag::Dag;
use crate::filter::{FilterError, ensure_known};
use crate::node::NodeId;
use std::collections::{BTreeSet, HashMap};

/// Ids of every node whose derivation (itself plus all transitive parents)
/// contains all of `ids`, in post-order.
///
/// An empty `ids` matches every node.
pub fn find_common_consequences(
    dag: &Dag,
    ids: impl IntoIterator<Item = NodeId>,
) -> Result<Vec<NodeId>, FilterError> {
    let interesting: BTreeSet<NodeId> = ids.into_iter().collect();
    ensure_known(dag, &interesting)?;

    // Per node: the interesting ids occurring in its derivation.
    let mut reached: HashMap<NodeId, BTreeSet<NodeId>> = HashMap::with_capacity(dag.len());
    let mut consequences = Vec::new();

    for node in dag.post_order() {
        let mut subset = BTreeSet::new();
        if interesting.contains(&node.number) {
            subset.insert(node.number);
        }
        for parent in &node.parents {
            if let Some(from_parent) = reached.get(parent) {
                subset.extend(from_parent.iter().copied());
            }
        }
        if subset.len() == interesting.len() {
            consequences.push(node.number);
        }
        reached.insert(node.number, subset);
    }
    Ok(consequences)
}
