use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "proofviz",
    about = "proofviz: derivation DAGs reconstructed from saturation prover transcripts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the derivation DAG and summarize it
    Build {
        /// Path to the prover transcript
        transcript: String,

        /// Build options TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep the given clauses and everything they are derived from
    Ancestors {
        /// Path to the prover transcript
        transcript: String,

        /// Clause ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        id: Vec<u64>,

        /// Build options TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep the given clauses and everything derived from them
    Descendants {
        /// Path to the prover transcript
        transcript: String,

        /// Clause ids (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        id: Vec<u64>,

        /// Build options TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List clauses whose derivation uses all of the given clauses
    Consequences {
        /// Path to the prover transcript
        transcript: String,

        /// Clause ids (comma-separated); none matches every clause
        #[arg(long, value_delimiter = ',')]
        id: Vec<u64>,

        /// Build options TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the clauses visible at one replay step
    Replay {
        /// Path to the prover transcript
        transcript: String,

        /// Replay step (defaults to the last activation)
        #[arg(long)]
        step: Option<u64>,

        /// Build options TOML
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the recognized transcript lines without building
    Lines {
        /// Path to the prover transcript
        transcript: String,

        /// Build options TOML (only the refutation marker is used)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
