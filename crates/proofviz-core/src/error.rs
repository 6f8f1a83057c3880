//! Crate-level error for the load-and-build path.

use crate::builder::BuildError;
use crate::config::ConfigError;
use crate::dag::DagError;
use crate::filter::FilterError;
use crate::transcript::TranscriptError;

#[derive(Debug, thiserror::Error)]
pub enum ProofvizError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Dag(#[from] DagError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}
