use crate::support::{PAYLOAD_SCHEMA, load_dag_or_exit, print_json};
use serde_json::json;

pub fn run(transcript: String, step: Option<u64>, config: Option<String>, json_output: bool) {
    let dag = load_dag_or_exit(&transcript, config.as_deref());
    let last_step = dag.last_step();
    let step = step.unwrap_or(last_step);
    if step > last_step {
        eprintln!("error: step {step} is past the last step {last_step}");
        std::process::exit(1);
    }

    let visible: Vec<_> = dag
        .visible_at(step)
        .into_iter()
        .filter_map(|id| dag.get(id))
        .collect();

    if json_output {
        let nodes: Vec<_> = visible
            .iter()
            .map(|node| {
                json!({
                    "id": node.number,
                    "clause": node.clause,
                    "rule": node.inference_rule,
                    "parents": node.parents,
                    "state": node.state_at(step),
                    "activeTime": node.active_time(),
                })
            })
            .collect();
        print_json(&json!({
            "schema": PAYLOAD_SCHEMA,
            "kind": "proofviz.replay.v1",
            "transcript": transcript,
            "step": step,
            "lastStep": last_step,
            "visible": nodes,
        }));
    } else {
        println!("proofviz replay");
        println!("  Transcript: {transcript}");
        println!("  Step: {step} of {last_step}");
        println!("  Visible: {}", visible.len());
        for node in visible {
            println!("  [{}] {node}", node.state_at(step).as_str());
        }
    }
}
