//! proofviz CLI: the `proofviz` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            transcript,
            config,
            json,
        } => commands::build::run(transcript, config, json),

        Commands::Ancestors {
            transcript,
            id,
            config,
            json,
        } => commands::ancestors::run(transcript, id, config, json),

        Commands::Descendants {
            transcript,
            id,
            config,
            json,
        } => commands::descendants::run(transcript, id, config, json),

        Commands::Consequences {
            transcript,
            id,
            config,
            json,
        } => commands::consequences::run(transcript, id, config, json),

        Commands::Replay {
            transcript,
            step,
            config,
            json,
        } => commands::replay::run(transcript, step, config, json),

        Commands::Lines {
            transcript,
            config,
            json,
        } => commands::lines::run(transcript, config, json),
    }
}
