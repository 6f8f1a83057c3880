//! Integration tests: build DAGs from recorded prover transcripts.
//!
//! Each fixture in tests/fixtures/ has:
//! - transcript.txt: raw prover output
//! - case.json: build options
//! - expect.json: the expected graph summary, or the expected build error
//!
//! The summary lists every node's rule, parents, activation step and
//! deletion parents, plus the leaf set and the history length.

use proofviz_core::{BuildOptions, Dag, load_dag_from_path};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn summarize(dag: &Dag) -> Value {
    let nodes: Map<String, Value> = dag
        .nodes()
        .map(|node| {
            (
                node.number.to_string(),
                json!({
                    "rule": node.inference_rule,
                    "parents": node.parents,
                    "active_time": node.active_time(),
                    "deletion_parents": node.deletion_parents(),
                }),
            )
        })
        .collect();
    json!({
        "history_length": dag.history_length(),
        "leaves": dag.leaves(),
        "nodes": nodes,
    })
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);

    let case_path = dir.join("case.json");
    let expect_path = dir.join("expect.json");
    let transcript_path = dir.join("transcript.txt");

    let case_str = std::fs::read_to_string(&case_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", case_path.display()));
    let expect_str = std::fs::read_to_string(&expect_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", expect_path.display()));

    let case: Value = serde_json::from_str(&case_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", case_path.display()));
    let expected: Value = serde_json::from_str(&expect_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", expect_path.display()));

    let options: BuildOptions = serde_json::from_value(case["options"].clone())
        .unwrap_or_else(|e| panic!("bad options in {}: {e}", case_path.display()));

    let result_json = match load_dag_from_path(&transcript_path, &options) {
        Ok(dag) => summarize(&dag),
        Err(error) => json!({ "error": error.to_string() }),
    };

    assert_eq!(
        result_json,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&result_json).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn resolution_refutation() {
    run_fixture("resolution_refutation");
}

#[test]
fn choice_axiom_skolemisation() {
    run_fixture("choice_axiom_skolemisation");
}

#[test]
fn raw_reductions() {
    run_fixture("raw_reductions");
}

#[test]
fn active_before_passive() {
    run_fixture("active_before_passive");
}

#[test]
fn resolution_refutation_filters() {
    let path = fixtures_dir().join("resolution_refutation/transcript.txt");
    let dag = load_dag_from_path(&path, &BuildOptions::default()).expect("fixture should build");

    let ancestors = proofviz_core::ancestor_filter(&dag, [9]).expect("filter should succeed");
    let ids: Vec<u64> = ancestors.ids().collect();
    assert_eq!(ids, vec![1, 2, 6, 7, 9]);

    let descendants = proofviz_core::descendant_filter(&dag, [7]).expect("filter should succeed");
    let ids: Vec<u64> = descendants.ids().collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    assert!(descendants.get(6).expect("boundary for 6").is_boundary());
    assert!(descendants.get(8).expect("boundary for 8").is_boundary());
    assert!(descendants.get(7).expect("seed").is_boundary());
    assert!(!descendants.get(10).expect("conclusion").is_boundary());

    let shared = proofviz_core::find_common_consequences(&dag, [1, 3])
        .expect("search should succeed");
    assert_eq!(shared, vec![10]);
}

#[test]
fn replay_visibility_tracks_activation_steps() {
    let path = fixtures_dir().join("resolution_refutation/transcript.txt");
    let dag = load_dag_from_path(&path, &BuildOptions::default()).expect("fixture should build");

    assert_eq!(dag.last_step(), 4);
    // Preprocessing clauses are visible from the start.
    assert_eq!(dag.visible_at(0), vec![1, 2, 3, 6, 7, 8]);
    assert_eq!(dag.visible_at(3), vec![1, 2, 3, 6, 7, 8]);
    assert_eq!(dag.visible_at(4), vec![1, 2, 3, 6, 7, 8, 10]);
}
