//! Single-pass reconstruction of the derivation from parsed transcript lines.
//!
//! The builder folds the event stream into a node table. Timestamps other
//! than `active_time` record the index of the line in the parsed sequence;
//! `active_time` records the activation counter, which is the replay step.

use crate::compaction::merge_preprocessing;
use crate::config::BuildOptions;
use crate::dag::Dag;
use crate::filter::prune_inactive;
use crate::line_parser::{LineKind, ParsedLine};
use crate::node::{LifecycleViolation, NodeId, ProofNode};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("parsed line {index}: {kind} event for clause {id} is out of lifecycle order")]
    OutOfOrderEvent {
        index: usize,
        id: NodeId,
        kind: LineKind,
    },

    #[error("parsed line {index}: clause {id} restated with {field} `{found}`, expected `{expected}`")]
    InconsistentRestatement {
        index: usize,
        id: NodeId,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("parsed line {index}: clause {id} is declared twice")]
    DuplicateDeclaration { index: usize, id: NodeId },

    #[error("parsed line {index}: `{kind}` for clause {id} without a preceding reduction")]
    MissingReductionContext {
        index: usize,
        id: NodeId,
        kind: LineKind,
    },

    #[error("parsed line {index}: clause {id}: {source}")]
    Lifecycle {
        index: usize,
        id: NodeId,
        #[source]
        source: LifecycleViolation,
    },
}

/// Explicit builder state threaded through the line dispatch.
#[derive(Debug)]
pub struct DagBuilder {
    options: BuildOptions,
    nodes: BTreeMap<NodeId, ProofNode>,
    /// Ids currently held by a synthesized placeholder.
    placeholders: BTreeSet<NodeId>,
    activations: u64,
    /// Clause of the most recent reduce event.
    cursor: Option<NodeId>,
    saturated: bool,
}

impl DagBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            nodes: BTreeMap::new(),
            placeholders: BTreeSet::new(),
            activations: 0,
            cursor: None,
            saturated: false,
        }
    }

    /// Whether the empty clause was derived. Later lines are ignored.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Fold one parsed line, `index` being its position in the sequence.
    pub fn apply(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        if self.saturated {
            return Ok(());
        }
        match line.kind {
            LineKind::Preprocessing => self.declare_preprocessing(index, line)?,
            LineKind::New => self.declare_new(index, line)?,
            LineKind::Passive => self.mark_passive(index, line)?,
            LineKind::Active => self.mark_active(index, line)?,
            LineKind::ForwardReduce | LineKind::BackwardReduce => self.reduce(index, line)?,
            LineKind::ReplacedBy | LineKind::Using => self.record_reduction_parent(index, line)?,
        }
        if line.kind.is_declaration() {
            self.ensure_parents(line);
        }
        Ok(())
    }

    /// Assemble the node table, then run the enabled cleanup passes.
    pub fn finish(self) -> Dag {
        let placeholders = self.placeholders.len();
        let mut dag = Dag::assemble(self.nodes);
        info!(
            "built derivation: {} node(s), {} placeholder(s), {} activation(s)",
            dag.len(),
            placeholders,
            self.activations
        );

        if self.options.prune_inactive {
            if self.activations == 0 && !dag.is_empty() {
                warn!("no clause was activated; pruning leaves an empty derivation");
            }
            dag = prune_inactive(&dag);
        }
        if self.options.merge_preprocessing {
            dag = merge_preprocessing(&dag, &self.options.choice_axiom_rule);
        }
        dag
    }

    fn is_declared(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id) && !self.placeholders.contains(&id)
    }

    fn fresh_node(line: &ParsedLine, is_from_preprocessing: bool) -> ProofNode {
        ProofNode::new(
            line.id,
            line.clause.clone(),
            line.inference_rule.clone(),
            line.parents.clone(),
            line.statistics.clone(),
            is_from_preprocessing,
        )
    }

    /// Insert a node for `line.id`, replacing a placeholder if one holds the id.
    fn insert_fresh(&mut self, line: &ParsedLine, is_from_preprocessing: bool) -> &mut ProofNode {
        if self.placeholders.remove(&line.id) {
            debug!("clause {} replaces its placeholder", line.id);
        }
        let node = Self::fresh_node(line, is_from_preprocessing);
        match self.nodes.entry(line.id) {
            Entry::Occupied(mut slot) => {
                slot.insert(node);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(node),
        }
    }

    fn declare_preprocessing(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        if self.is_declared(line.id) {
            return Err(BuildError::DuplicateDeclaration { index, id: line.id });
        }
        self.insert_fresh(line, true);
        Ok(())
    }

    fn declare_new(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        let time = index as u64;
        if self.is_declared(line.id) {
            self.check_restatement(index, line)?;
            let node = self.node_mut(line.id);
            node.set_new_time(time).map_err(lifecycle(index, line.id))?;
        } else {
            let node = self.insert_fresh(line, false);
            node.set_new_time(time).map_err(lifecycle(index, line.id))?;
        }

        if line.clause == self.options.empty_clause {
            self.activations += 1;
            let step = self.activations;
            let node = self.node_mut(line.id);
            node.set_passive_time(time).map_err(lifecycle(index, line.id))?;
            node.set_active_time(step).map_err(lifecycle(index, line.id))?;
            self.saturated = true;
            info!("empty clause {} derived at step {step}", line.id);
        }
        Ok(())
    }

    fn mark_passive(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        self.require_declared(index, line)?;
        self.check_restatement(index, line)?;
        self.node_mut(line.id)
            .set_passive_time(index as u64)
            .map_err(lifecycle(index, line.id))
    }

    fn mark_active(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        self.require_declared(index, line)?;
        if self
            .nodes
            .get(&line.id)
            .is_none_or(|node| node.passive_time().is_none())
        {
            return Err(BuildError::OutOfOrderEvent {
                index,
                id: line.id,
                kind: line.kind,
            });
        }
        self.check_restatement(index, line)?;

        self.activations += 1;
        let step = self.activations;
        let node = self.node_mut(line.id);
        node.set_active_time(step).map_err(lifecycle(index, line.id))?;
        node.clause = line.clause.clone();
        node.statistics = line.statistics.clone();
        Ok(())
    }

    fn reduce(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        self.require_declared(index, line)?;
        self.node_mut(line.id)
            .set_deletion_time(index as u64)
            .map_err(lifecycle(index, line.id))?;
        self.cursor = Some(line.id);
        Ok(())
    }

    fn record_reduction_parent(&mut self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        let Some(reduced) = self.cursor else {
            return Err(BuildError::MissingReductionContext {
                index,
                id: line.id,
                kind: line.kind,
            });
        };
        self.node_mut(reduced)
            .add_deletion_parent(line.id)
            .map_err(lifecycle(index, reduced))
    }

    fn require_declared(&self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        if self.is_declared(line.id) {
            Ok(())
        } else {
            Err(BuildError::OutOfOrderEvent {
                index,
                id: line.id,
                kind: line.kind,
            })
        }
    }

    /// A restated clause must carry the rule and parents it was declared with.
    fn check_restatement(&self, index: usize, line: &ParsedLine) -> Result<(), BuildError> {
        let Some(known) = self.nodes.get(&line.id) else {
            return Ok(());
        };
        if known.inference_rule != line.inference_rule {
            return Err(BuildError::InconsistentRestatement {
                index,
                id: line.id,
                field: "inference rule",
                expected: known.inference_rule.clone(),
                found: line.inference_rule.clone(),
            });
        }
        if known.parents != line.parents {
            return Err(BuildError::InconsistentRestatement {
                index,
                id: line.id,
                field: "parents",
                expected: format!("{:?}", known.parents),
                found: format!("{:?}", line.parents),
            });
        }
        Ok(())
    }

    fn ensure_parents(&mut self, line: &ParsedLine) {
        for parent in &line.parents {
            if self.nodes.contains_key(parent) {
                continue;
            }
            info!(
                "clause {} references undeclared parent {parent}; inserting placeholder",
                line.id
            );
            self.nodes.insert(*parent, ProofNode::placeholder(*parent));
            self.placeholders.insert(*parent);
        }
    }

    /// Callers check that `id` is in the table first.
    fn node_mut(&mut self, id: NodeId) -> &mut ProofNode {
        self.nodes
            .entry(id)
            .or_insert_with(|| ProofNode::placeholder(id))
    }
}

fn lifecycle(index: usize, id: NodeId) -> impl Fn(LifecycleViolation) -> BuildError {
    move |source| BuildError::Lifecycle { index, id, source }
}

/// Build a `Dag` from a parsed transcript. No partial graph escapes on error.
pub fn build_dag(lines: &[ParsedLine], options: &BuildOptions) -> Result<Dag, BuildError> {
    let mut builder = DagBuilder::new(options.clone());
    for (index, line) in lines.iter().enumerate() {
        builder.apply(index, line)?;
        if builder.is_saturated() {
            debug!("{} parsed line(s) after the empty clause ignored", lines.len() - index - 1);
            break;
        }
    }
    Ok(builder.finish())
}
