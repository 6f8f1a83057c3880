//! Build options, optionally read from a TOML file.
//!
//! ```toml
//! prune-inactive = true
//! merge-preprocessing = true
//! empty-clause = "$false"
//! refutation-marker = "% Refutation found. Thanks to"
//! choice-axiom-rule = "choice axiom"
//! ```

use crate::line_parser::DEFAULT_REFUTATION_MARKER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Clause text of the refutation. Deriving it ends saturation.
pub const DEFAULT_EMPTY_CLAUSE: &str = "$false";

/// Rule of the skolemization artifacts treated as background theory.
pub const DEFAULT_CHOICE_AXIOM_RULE: &str = "choice axiom";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Knobs of `DagBuilder`. Every key is optional; missing keys keep defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildOptions {
    /// Drop nodes that do not derive any activated clause.
    pub prune_inactive: bool,
    /// Collapse multi-step preprocessing chains.
    pub merge_preprocessing: bool,
    pub empty_clause: String,
    pub refutation_marker: String,
    pub choice_axiom_rule: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            prune_inactive: true,
            merge_preprocessing: true,
            empty_clause: DEFAULT_EMPTY_CLAUSE.to_string(),
            refutation_marker: DEFAULT_REFUTATION_MARKER.to_string(),
            choice_axiom_rule: DEFAULT_CHOICE_AXIOM_RULE.to_string(),
        }
    }
}

impl BuildOptions {
    /// Options for the raw lifecycle graph, without either cleanup pass.
    pub fn raw() -> Self {
        Self {
            prune_inactive: false,
            merge_preprocessing: false,
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names the source in error messages.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }
}
