use proofviz_core::{
    BuildOptions, Dag, FilterError, NodeId, load_dag_from_path, read_transcript_from_path,
};
use serde_json::{Value, json};
use tracing::debug;

pub const PAYLOAD_SCHEMA: u64 = 1;

pub fn load_options_or_exit(config: Option<&str>) -> BuildOptions {
    let Some(path) = config else {
        return BuildOptions::default();
    };
    debug!("loading build options from {path}");
    BuildOptions::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn read_transcript_or_exit(transcript: &str) -> String {
    read_transcript_from_path(transcript).unwrap_or_else(|e| {
        eprintln!("error: failed to read {transcript}: {e}");
        std::process::exit(1);
    })
}

pub fn load_dag_or_exit(transcript: &str, config: Option<&str>) -> Dag {
    let options = load_options_or_exit(config);
    load_dag_from_path(transcript, &options).unwrap_or_else(|e| {
        eprintln!("error: failed to build {transcript}: {e}");
        std::process::exit(1);
    })
}

pub fn filter_or_exit(result: Result<Dag, FilterError>) -> Dag {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

/// Payload shared by every command that emits a graph view.
pub fn dag_payload(kind: &str, transcript: &str, ids: &[NodeId], dag: &Dag) -> Value {
    json!({
        "schema": PAYLOAD_SCHEMA,
        "kind": kind,
        "transcript": transcript,
        "ids": ids,
        "snapshotRef": dag.snapshot_ref(),
        "historyLength": dag.history_length(),
        "dag": dag,
    })
}

pub fn print_dag_text(title: &str, transcript: &str, dag: &Dag) {
    println!("proofviz {title}");
    println!("  Transcript: {transcript}");
    println!("  Nodes: {}", dag.len());
    println!("  Leaves: {}", join_ids(dag.leaves().iter().copied()));
    println!("  History length: {}", dag.history_length());
    for node in dag.nodes() {
        println!("  {node}");
    }
}

pub fn join_ids(ids: impl IntoIterator<Item = NodeId>) -> String {
    let rendered: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
    if rendered.is_empty() {
        "(none)".to_string()
    } else {
        rendered.join(",")
    }
}
