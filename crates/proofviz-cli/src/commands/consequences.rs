use crate::support::{PAYLOAD_SCHEMA, join_ids, load_dag_or_exit, print_json};
use proofviz_core::find_common_consequences;
use serde_json::json;

pub fn run(transcript: String, ids: Vec<u64>, config: Option<String>, json_output: bool) {
    let dag = load_dag_or_exit(&transcript, config.as_deref());
    let consequences = find_common_consequences(&dag, ids.iter().copied()).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if json_output {
        let clauses: Vec<_> = consequences
            .iter()
            .filter_map(|id| dag.get(*id))
            .map(|node| {
                json!({
                    "id": node.number,
                    "clause": node.clause,
                    "rule": node.inference_rule,
                })
            })
            .collect();
        print_json(&json!({
            "schema": PAYLOAD_SCHEMA,
            "kind": "proofviz.consequences.v1",
            "transcript": transcript,
            "ids": ids,
            "consequences": consequences,
            "clauses": clauses,
        }));
    } else {
        println!("proofviz consequences");
        println!("  Transcript: {transcript}");
        println!("  Of: {}", join_ids(ids.iter().copied()));
        println!("  Found: {}", consequences.len());
        for id in &consequences {
            if let Some(node) = dag.get(*id) {
                println!("  {node}");
            }
        }
    }
}
