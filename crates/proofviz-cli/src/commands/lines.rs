use crate::support::{PAYLOAD_SCHEMA, load_options_or_exit, print_json, read_transcript_or_exit};
use proofviz_core::parse_transcript_until;
use serde_json::json;

pub fn run(transcript: String, config: Option<String>, json_output: bool) {
    let options = load_options_or_exit(config.as_deref());
    let text = read_transcript_or_exit(&transcript);
    let lines = parse_transcript_until(&text, &options.refutation_marker);

    if json_output {
        print_json(&json!({
            "schema": PAYLOAD_SCHEMA,
            "kind": "proofviz.lines.v1",
            "transcript": transcript,
            "count": lines.len(),
            "lines": lines,
        }));
    } else {
        println!("proofviz lines");
        println!("  Transcript: {transcript}");
        println!("  Recognized: {}", lines.len());
        for (index, line) in lines.iter().enumerate() {
            let parents: Vec<String> = line.parents.iter().map(ToString::to_string).collect();
            println!(
                "  #{index} {}: {}. {} [{} {}]",
                line.kind,
                line.id,
                line.clause,
                line.inference_rule,
                parents.join(",")
            );
        }
    }
}
