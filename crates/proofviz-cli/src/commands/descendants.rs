use crate::support::{
    dag_payload, filter_or_exit, join_ids, load_dag_or_exit, print_dag_text, print_json,
};
use proofviz_core::descendant_filter;

pub fn run(transcript: String, ids: Vec<u64>, config: Option<String>, json_output: bool) {
    let dag = load_dag_or_exit(&transcript, config.as_deref());
    let view = filter_or_exit(descendant_filter(&dag, ids.iter().copied()));

    if json_output {
        print_json(&dag_payload("proofviz.descendants.v1", &transcript, &ids, &view));
    } else {
        print_dag_text("descendants", &transcript, &view);
        let boundaries: Vec<u64> = view
            .nodes()
            .filter(|node| node.is_boundary())
            .map(|node| node.number)
            .collect();
        println!("  Boundaries: {}", join_ids(boundaries));
    }
}
