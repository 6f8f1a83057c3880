//! Line grammars of the prover transcript.
//!
//! Four fixed grammars are tried in order; the first match wins and a line
//! matching none of them is skipped. Transcripts interleave clause events
//! with banners, statistics and blank lines, so "no match" is normal.

use crate::node::NodeId;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;
use tracing::debug;

/// Everything after this prefix is the human-readable refutation certificate.
pub const DEFAULT_REFUTATION_MARKER: &str = "% Refutation found. Thanks to";

const CLAUSE_PATTERN: &str =
    r"(\d+)\. (.*) \[(\D*) ?([\d,]*)\](?: (\{[a-z]\w*:\d+(?:,[a-z]\w*:\d+)*\}))?";

/// Event kind carried by one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Preprocessing,
    New,
    Passive,
    Active,
    ForwardReduce,
    BackwardReduce,
    ReplacedBy,
    Using,
}

impl LineKind {
    /// Map the kind text of a `[SA] <kind>:` line.
    fn from_saturation(kind: &str) -> Option<Self> {
        match kind {
            "new" => Some(LineKind::New),
            "passive" => Some(LineKind::Passive),
            "active" => Some(LineKind::Active),
            "forward reduce" => Some(LineKind::ForwardReduce),
            "backward reduce" => Some(LineKind::BackwardReduce),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Preprocessing => "preprocessing",
            LineKind::New => "new",
            LineKind::Passive => "passive",
            LineKind::Active => "active",
            LineKind::ForwardReduce => "forward reduce",
            LineKind::BackwardReduce => "backward reduce",
            LineKind::ReplacedBy => "replaced by",
            LineKind::Using => "using",
        }
    }

    /// Whether the line declares or restates a clause (as opposed to a reduction).
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            LineKind::Preprocessing | LineKind::New | LineKind::Passive | LineKind::Active
        )
    }
}

impl Display for LineKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized transcript line. Lives for a single parse pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub kind: LineKind,
    pub id: NodeId,
    pub clause: String,
    pub inference_rule: String,
    pub parents: Vec<NodeId>,
    pub statistics: BTreeMap<String, u64>,
}

fn saturation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\[SA\] ([a-z ]{{3,15}}): {CLAUSE_PATTERN}$"))
            .expect("saturation regex must compile")
    })
}

fn preprocessing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^{CLAUSE_PATTERN}$")).expect("preprocessing regex must compile")
    })
}

fn reduction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*(forward reduce|backward reduce):? {CLAUSE_PATTERN}$"
        ))
        .expect("reduction regex must compile")
    })
}

fn continuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*(replaced by|using) {CLAUSE_PATTERN}$"))
            .expect("continuation regex must compile")
    })
}

fn statistic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z]\w*):(\d+)").expect("statistic regex must compile"))
}

/// Parse one transcript line, or `None` if no grammar matches.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    if let Some(caps) = saturation_re().captures(line) {
        let kind = LineKind::from_saturation(&caps[1])?;
        return clause_fields(kind, &caps, 2);
    }
    if let Some(caps) = preprocessing_re().captures(line) {
        return clause_fields(LineKind::Preprocessing, &caps, 1);
    }
    if let Some(caps) = reduction_re().captures(line) {
        let kind = match &caps[1] {
            "forward reduce" => LineKind::ForwardReduce,
            _ => LineKind::BackwardReduce,
        };
        return clause_fields(kind, &caps, 2);
    }
    if let Some(caps) = continuation_re().captures(line) {
        let kind = match &caps[1] {
            "replaced by" => LineKind::ReplacedBy,
            _ => LineKind::Using,
        };
        return clause_fields(kind, &caps, 2);
    }
    None
}

/// Parse a full transcript, stopping at the default refutation marker.
pub fn parse_transcript(text: &str) -> Vec<ParsedLine> {
    parse_transcript_until(text, DEFAULT_REFUTATION_MARKER)
}

/// Parse a full transcript, stopping at the first line starting with `marker`.
pub fn parse_transcript_until(text: &str, marker: &str) -> Vec<ParsedLine> {
    let mut parsed = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if !marker.is_empty() && line.starts_with(marker) {
            debug!("refutation marker at line {}; ignoring the rest", line_no + 1);
            break;
        }
        match parse_line(line) {
            Some(parsed_line) => parsed.push(parsed_line),
            None if line.trim().is_empty() => {}
            None => debug!("line {}: no grammar matched; skipped", line_no + 1),
        }
    }
    parsed
}

/// Extract the clause fields starting at capture group `first`.
fn clause_fields(kind: LineKind, caps: &Captures<'_>, first: usize) -> Option<ParsedLine> {
    let id = caps[first].parse::<NodeId>().ok()?;
    let clause = caps[first + 1].trim_end().replace(['\'', '"'], "");
    let inference_rule = caps[first + 2].trim().to_string();
    let parents = parse_parents(&caps[first + 3])?;
    let statistics = match caps.get(first + 4) {
        Some(raw) => parse_statistics(raw.as_str())?,
        None => BTreeMap::new(),
    };
    Some(ParsedLine {
        kind,
        id,
        clause,
        inference_rule,
        parents,
        statistics,
    })
}

fn parse_parents(raw: &str) -> Option<Vec<NodeId>> {
    raw.split(',')
        .filter(|parent| !parent.is_empty())
        .map(|parent| parent.parse::<NodeId>().ok())
        .collect()
}

fn parse_statistics(raw: &str) -> Option<BTreeMap<String, u64>> {
    statistic_re()
        .captures_iter(raw)
        .map(|caps| Some((caps[1].to_string(), caps[2].parse::<u64>().ok()?)))
        .collect()
}
