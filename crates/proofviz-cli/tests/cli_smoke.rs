use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "proofviz-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_proofviz<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_proofviz");
    Command::new(bin)
        .args(args)
        .output()
        .expect("proofviz command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Clause 3 is derived from 1 and 2 and activated; clause 4 never is.
fn write_sample_transcript(path: &Path) {
    let lines = [
        "% Running in auto input_syntax mode. Trying TPTP",
        "1. p(a) [input]",
        "2. p(a) => q(a) [input]",
        "[SA] new: 3. q(a) [resolution 1,2]",
        "[SA] passive: 3. q(a) [resolution 1,2]",
        "[SA] active: 3. q(a) [resolution 1,2] {a:1,w:2}",
        "[SA] new: 4. r(b) [input]",
    ];
    fs::write(path, format!("{}\n", lines.join("\n"))).expect("sample transcript should be written");
}

fn sample(tmp: &TempDirGuard) -> String {
    let path = tmp.path().join("transcript.txt");
    write_sample_transcript(&path);
    path.display().to_string()
}

fn node_ids(payload: &Value) -> Vec<String> {
    payload["dag"]["nodes"]
        .as_object()
        .expect("dag.nodes should be an object")
        .keys()
        .cloned()
        .collect()
}

#[test]
fn build_json_emits_pruned_dag() {
    let tmp = TempDirGuard::new("build-json");
    let transcript = sample(&tmp);

    let output = run_proofviz(["build", transcript.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);

    assert_eq!(payload["schema"], 1);
    assert_eq!(payload["kind"], "proofviz.build.v1");
    assert_eq!(payload["historyLength"], 1);
    assert_eq!(node_ids(&payload), vec!["1", "2", "3"]);
    assert_eq!(payload["dag"]["leaves"], serde_json::json!([3]));
    assert_eq!(payload["dag"]["nodes"]["3"]["parents"], serde_json::json!([1, 2]));
    assert_eq!(payload["dag"]["nodes"]["1"]["children"], serde_json::json!([3]));
    assert!(
        payload["snapshotRef"]
            .as_str()
            .is_some_and(|value| value.starts_with("dag1_"))
    );
}

#[test]
fn build_text_lists_clauses() {
    let tmp = TempDirGuard::new("build-text");
    let transcript = sample(&tmp);

    let output = run_proofviz(["build", transcript.as_str()]);
    assert_success(&output);
    let stdout = stdout_text(&output);
    assert!(stdout.contains("Nodes: 3"));
    assert!(stdout.contains("3. q(a) [resolution 1,2]"));
}

#[test]
fn build_honors_config_file() {
    let tmp = TempDirGuard::new("build-config");
    let transcript = sample(&tmp);
    let config = tmp.path().join("proofviz.toml");
    fs::write(&config, "prune-inactive = false\n").expect("config should be written");

    let output = run_proofviz([
        "build",
        transcript.as_str(),
        "--config",
        config.to_str().expect("utf-8 path"),
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(node_ids(&payload), vec!["1", "2", "3", "4"]);
}

#[test]
fn build_rejects_unknown_config_keys() {
    let tmp = TempDirGuard::new("build-bad-config");
    let transcript = sample(&tmp);
    let config = tmp.path().join("proofviz.toml");
    fs::write(&config, "prune = false\n").expect("config should be written");

    let output = run_proofviz([
        "build",
        transcript.as_str(),
        "--config",
        config.to_str().expect("utf-8 path"),
    ]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("invalid toml"));
}

#[test]
fn build_rejects_corrupt_transcript() {
    let tmp = TempDirGuard::new("build-corrupt");
    let path = tmp.path().join("transcript.txt");
    fs::write(&path, b"1. p(a) [input]\n\0").expect("corrupt transcript should be written");

    let output = run_proofviz(["build", path.to_str().expect("utf-8 path")]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("NUL"));
}

#[test]
fn ancestors_keep_derivation() {
    let tmp = TempDirGuard::new("ancestors");
    let transcript = sample(&tmp);

    let output = run_proofviz(["ancestors", transcript.as_str(), "--id", "3", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["kind"], "proofviz.ancestors.v1");
    assert_eq!(payload["ids"], serde_json::json!([3]));
    assert_eq!(node_ids(&payload), vec!["1", "2", "3"]);
}

#[test]
fn descendants_cut_outside_parents() {
    let tmp = TempDirGuard::new("descendants");
    let transcript = sample(&tmp);

    let output = run_proofviz(["descendants", transcript.as_str(), "--id", "1", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(node_ids(&payload), vec!["1", "2", "3"]);
    let nodes = &payload["dag"]["nodes"];
    assert_eq!(nodes["2"]["inference_rule"], "Boundary");
    assert_eq!(nodes["2"]["parents"], serde_json::json!([]));
    assert_eq!(nodes["3"]["inference_rule"], "resolution");
}

#[test]
fn unknown_id_fails_with_message() {
    let tmp = TempDirGuard::new("unknown-id");
    let transcript = sample(&tmp);

    let output = run_proofviz(["ancestors", transcript.as_str(), "--id", "3,42"]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("unknown node id: 42"));
}

#[test]
fn consequences_of_both_inputs() {
    let tmp = TempDirGuard::new("consequences");
    let transcript = sample(&tmp);

    let output = run_proofviz(["consequences", transcript.as_str(), "--id", "1,2", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["consequences"], serde_json::json!([3]));
    assert_eq!(payload["clauses"][0]["clause"], "q(a)");
}

#[test]
fn replay_reports_states_per_step() {
    let tmp = TempDirGuard::new("replay");
    let transcript = sample(&tmp);

    let output = run_proofviz(["replay", transcript.as_str(), "--step", "0", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    let visible = payload["visible"].as_array().expect("visible should be an array");
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|node| node["state"] == "preprocessing"));

    let output = run_proofviz(["replay", transcript.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["step"], 1);
    assert_eq!(payload["lastStep"], 1);
    let visible = payload["visible"].as_array().expect("visible should be an array");
    assert_eq!(visible.len(), 3);
    assert_eq!(visible[2]["state"], "active");

    let output = run_proofviz(["replay", transcript.as_str(), "--step", "5"]);
    assert_failure(&output);
}

#[test]
fn lines_dump_recognized_events() {
    let tmp = TempDirGuard::new("lines");
    let transcript = sample(&tmp);

    let output = run_proofviz(["lines", transcript.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["count"], 6);
    assert_eq!(payload["lines"][0]["kind"], "preprocessing");
    assert_eq!(payload["lines"][2]["kind"], "new");
    assert_eq!(payload["lines"][4]["statistics"]["w"], 2);

    let output = run_proofviz(["lines", transcript.as_str()]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("#3 passive: 3. q(a) [resolution 1,2]"));
}
