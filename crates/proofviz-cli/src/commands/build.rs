use crate::support::{dag_payload, load_dag_or_exit, print_dag_text, print_json};

pub fn run(transcript: String, config: Option<String>, json_output: bool) {
    let dag = load_dag_or_exit(&transcript, config.as_deref());

    if json_output {
        print_json(&dag_payload("proofviz.build.v1", &transcript, &[], &dag));
    } else {
        print_dag_text("build", &transcript, &dag);
        println!("  Snapshot: {}", dag.snapshot_ref());
    }
}
