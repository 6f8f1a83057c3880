//! Proof nodes: one clause of the derivation and its lifecycle.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Clause number assigned by the prover. Stable for the life of a `Dag`.
pub type NodeId = u64;

/// Rule sentinel carried by boundary copies created by the descendant filter.
pub const BOUNDARY_RULE: &str = "Boundary";

/// Clause text and rule sentinel of a placeholder for a parent that was
/// referenced before it was declared.
pub const PLACEHOLDER_LABEL: &str = "Preproc";

/// One clause of the derivation.
///
/// `parents` are lookup keys into the owning `Dag`, never ownership.
/// `children` is the exact inverse of the parent relation and is recomputed
/// whenever a `Dag` is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    pub number: NodeId,
    pub clause: String,
    pub inference_rule: String,
    #[serde(default)]
    pub parents: Vec<NodeId>,
    #[serde(default)]
    pub children: BTreeSet<NodeId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub statistics: BTreeMap<String, u64>,
    #[serde(default)]
    pub is_from_preprocessing: bool,

    // ── Lifecycle (set only through the stamping methods) ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    new_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    passive_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deletion_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    deletion_parents: Vec<NodeId>,
}

/// The four lifecycle timestamps of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stamp {
    New,
    Passive,
    Active,
    Deletion,
}

impl Display for Stamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stamp::New => "new",
            Stamp::Passive => "passive",
            Stamp::Active => "active",
            Stamp::Deletion => "deletion",
        };
        f.write_str(name)
    }
}

/// A timestamp transition that breaks the new → passive → active order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleViolation {
    #[error("{0} time is already set")]
    AlreadySet(Stamp),

    #[error("{stamp} time requires {requires} time to be set first")]
    MissingPrerequisite { stamp: Stamp, requires: Stamp },

    #[error("{stamp} time cannot be set after {later} time")]
    AfterLaterStamp { stamp: Stamp, later: Stamp },

    #[error("deletion parents require a deletion time")]
    NotDeleted,
}

/// How a node presents at one replay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Activated at or before the step.
    Active,
    /// Part of the preprocessed input; visible from the start.
    Preprocessing,
    /// Not yet part of the replayed derivation.
    Hidden,
}

impl NodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Active => "active",
            NodeState::Preprocessing => "preprocessing",
            NodeState::Hidden => "hidden",
        }
    }
}

impl ProofNode {
    pub fn new(
        number: NodeId,
        clause: impl Into<String>,
        inference_rule: impl Into<String>,
        parents: Vec<NodeId>,
        statistics: BTreeMap<String, u64>,
        is_from_preprocessing: bool,
    ) -> Self {
        Self {
            number,
            clause: clause.into(),
            inference_rule: inference_rule.into(),
            parents,
            children: BTreeSet::new(),
            statistics,
            is_from_preprocessing,
            new_time: None,
            passive_time: None,
            active_time: None,
            deletion_time: None,
            deletion_parents: Vec::new(),
        }
    }

    /// Synthetic ancestor standing in for a parent that has not been declared.
    pub fn placeholder(number: NodeId) -> Self {
        Self::new(
            number,
            PLACEHOLDER_LABEL,
            PLACEHOLDER_LABEL,
            Vec::new(),
            BTreeMap::new(),
            true,
        )
    }

    /// Copy marking "the derivation continues outside this view".
    ///
    /// Keeps identity, clause, statistics and timestamps; drops parents and
    /// children and replaces the rule by [`BOUNDARY_RULE`].
    pub fn boundary_copy(&self) -> Self {
        Self {
            number: self.number,
            clause: self.clause.clone(),
            inference_rule: BOUNDARY_RULE.to_string(),
            parents: Vec::new(),
            children: BTreeSet::new(),
            statistics: self.statistics.clone(),
            is_from_preprocessing: self.is_from_preprocessing,
            new_time: self.new_time,
            passive_time: self.passive_time,
            active_time: self.active_time,
            deletion_time: self.deletion_time,
            deletion_parents: self.deletion_parents.clone(),
        }
    }

    pub fn label(&self) -> &str {
        &self.clause
    }

    pub fn is_boundary(&self) -> bool {
        self.inference_rule == BOUNDARY_RULE
    }

    pub fn new_time(&self) -> Option<u64> {
        self.new_time
    }

    pub fn passive_time(&self) -> Option<u64> {
        self.passive_time
    }

    pub fn active_time(&self) -> Option<u64> {
        self.active_time
    }

    pub fn deletion_time(&self) -> Option<u64> {
        self.deletion_time
    }

    /// Clauses named by the "replaced by" / "using" lines of the deletion.
    pub fn deletion_parents(&self) -> &[NodeId] {
        &self.deletion_parents
    }

    pub fn set_new_time(&mut self, time: u64) -> Result<(), LifecycleViolation> {
        if self.new_time.is_some() {
            return Err(LifecycleViolation::AlreadySet(Stamp::New));
        }
        if self.passive_time.is_some() {
            return Err(LifecycleViolation::AfterLaterStamp {
                stamp: Stamp::New,
                later: Stamp::Passive,
            });
        }
        if self.active_time.is_some() {
            return Err(LifecycleViolation::AfterLaterStamp {
                stamp: Stamp::New,
                later: Stamp::Active,
            });
        }
        self.new_time = Some(time);
        Ok(())
    }

    pub fn set_passive_time(&mut self, time: u64) -> Result<(), LifecycleViolation> {
        if self.new_time.is_none() {
            return Err(LifecycleViolation::MissingPrerequisite {
                stamp: Stamp::Passive,
                requires: Stamp::New,
            });
        }
        if self.passive_time.is_some() {
            return Err(LifecycleViolation::AlreadySet(Stamp::Passive));
        }
        if self.active_time.is_some() {
            return Err(LifecycleViolation::AfterLaterStamp {
                stamp: Stamp::Passive,
                later: Stamp::Active,
            });
        }
        self.passive_time = Some(time);
        Ok(())
    }

    pub fn set_active_time(&mut self, step: u64) -> Result<(), LifecycleViolation> {
        if self.new_time.is_none() {
            return Err(LifecycleViolation::MissingPrerequisite {
                stamp: Stamp::Active,
                requires: Stamp::New,
            });
        }
        if self.passive_time.is_none() {
            return Err(LifecycleViolation::MissingPrerequisite {
                stamp: Stamp::Active,
                requires: Stamp::Passive,
            });
        }
        if self.active_time.is_some() {
            return Err(LifecycleViolation::AlreadySet(Stamp::Active));
        }
        self.active_time = Some(step);
        Ok(())
    }

    /// Stamp the deletion and clear any previously recorded deletion parents.
    pub fn set_deletion_time(&mut self, time: u64) -> Result<(), LifecycleViolation> {
        if self.new_time.is_none() {
            return Err(LifecycleViolation::MissingPrerequisite {
                stamp: Stamp::Deletion,
                requires: Stamp::New,
            });
        }
        if self.deletion_time.is_some() {
            return Err(LifecycleViolation::AlreadySet(Stamp::Deletion));
        }
        self.deletion_time = Some(time);
        self.deletion_parents.clear();
        Ok(())
    }

    pub fn add_deletion_parent(&mut self, parent: NodeId) -> Result<(), LifecycleViolation> {
        if self.deletion_time.is_none() {
            return Err(LifecycleViolation::NotDeleted);
        }
        self.deletion_parents.push(parent);
        Ok(())
    }

    /// Whether the node is shown when the replay stands at `step`.
    pub fn visible_at(&self, step: u64) -> bool {
        self.is_from_preprocessing || self.active_time.is_some_and(|active| active <= step)
    }

    pub fn state_at(&self, step: u64) -> NodeState {
        match self.active_time {
            Some(active) if active <= step => NodeState::Active,
            _ if self.is_from_preprocessing => NodeState::Preprocessing,
            _ => NodeState::Hidden,
        }
    }
}

impl Display for ProofNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {} [{}", self.number, self.clause, self.inference_rule)?;
        if !self.parents.is_empty() {
            let parents: Vec<String> = self.parents.iter().map(ToString::to_string).collect();
            write!(f, " {}", parents.join(","))?;
        }
        f.write_str("]")
    }
}
