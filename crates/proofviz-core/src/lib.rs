//! # proofviz-core
//!
//! Reconstructs the derivation DAG of a saturation prover run from its
//! textual transcript, and transforms that DAG for interactive navigation.
//!
//! This crate provides:
//! - `parse_line` / `parse_transcript` (one text line → `ParsedLine`)
//! - `ProofNode` and `Dag` (an id-keyed arena of clauses)
//! - `DagBuilder` (the clause lifecycle state machine)
//! - post-order and reverse-post-order traversal
//! - ancestor/descendant filters, preprocessing compaction, and the
//!   common-consequence search
//! - `DagHistory` (an undo stack of derived views)
//!
//! Layout, styling, and prover supervision live outside this crate.
//!
//! ## Data flow
//!
//! ```text
//! transcript text
//!     │  parse_transcript
//! Vec<ParsedLine>
//!     │  build_dag  (prune inactive, merge preprocessing)
//! Dag ──► ancestor_filter / descendant_filter / find_common_consequences ──► Dag / ids
//! ```

pub mod builder;
pub mod compaction;
pub mod config;
pub mod dag;
pub mod error;
pub mod filter;
pub mod history;
pub mod line_parser;
pub mod node;
pub mod search;
pub mod transcript;
pub mod traversal;

pub use builder::{BuildError, DagBuilder, build_dag};
pub use compaction::merge_preprocessing;
pub use config::{BuildOptions, ConfigError};
pub use dag::{Dag, DagError};
pub use error::ProofvizError;
pub use filter::{FilterError, ancestor_filter, descendant_filter, prune_inactive};
pub use history::DagHistory;
pub use line_parser::{LineKind, ParsedLine, parse_line, parse_transcript, parse_transcript_until};
pub use node::{
    BOUNDARY_RULE, LifecycleViolation, NodeId, NodeState, PLACEHOLDER_LABEL, ProofNode, Stamp,
};
pub use search::find_common_consequences;
pub use transcript::{TranscriptError, load_dag_from_path, read_transcript_from_path};
pub use traversal::{PostOrder, ReversePostOrder};
