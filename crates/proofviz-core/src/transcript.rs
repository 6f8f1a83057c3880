//! Transcript files on disk.
//!
//! A transcript is the raw text a saturation prover prints with full proof
//! extras enabled. Reading validates the bytes before any line is parsed.

use crate::builder::build_dag;
use crate::config::BuildOptions;
use crate::dag::Dag;
use crate::error::ProofvizError;
use crate::line_parser::parse_transcript_until;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Errors from reading a transcript file.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("corrupted transcript: {0}")]
    Corrupt(String),
}

/// Read a transcript, rejecting NUL bytes and non-UTF-8 content.
pub fn read_transcript_from_path(path: impl AsRef<Path>) -> Result<String, TranscriptError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| TranscriptError::Io(format!("{}: {e}", path.display())))?;
    if bytes.contains(&0) {
        return Err(TranscriptError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    String::from_utf8(bytes).map_err(|_| {
        TranscriptError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        ))
    })
}

/// Read, parse and build in one step.
pub fn load_dag_from_path(
    path: impl AsRef<Path>,
    options: &BuildOptions,
) -> Result<Dag, ProofvizError> {
    let path = path.as_ref();
    let text = read_transcript_from_path(path)?;
    let lines = parse_transcript_until(&text, &options.refutation_marker);
    debug!("{}: {} clause line(s) recognized", path.display(), lines.len());
    if lines.is_empty() && !text.trim().is_empty() {
        warn!("{}: no transcript line matched any clause grammar", path.display());
    }
    Ok(build_dag(&lines, options)?)
}
