use serde_json::Value;

use super::*;

fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> (Result<(), CliError>, String) {
    let mut buf = Vec::new();
    let result = run(&mut buf);
    (result, String::from_utf8(buf).unwrap())
}

const DEFAULT_PLACEMENT: Placement = Placement { origin_x: 0.0, origin_y: 0.0, scale: 1.0 };

#[test]
fn run_parse_emits_node_and_edge_json() {
    let (result, text) = output(|out| run_parse("graph TD\nA{Decision} -->|Yes| B(Process)", true, out));
    result.unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["direction"], "TD");
    assert_eq!(json["nodes"][0], serde_json::json!({ "id": "A", "text": "Decision", "type": "decision" }));
    assert_eq!(json["nodes"][1]["type"], "subprocess");
    assert_eq!(json["edges"][0]["from"], "A");
    assert_eq!(json["edges"][0]["to"], "B");
    assert_eq!(json["edges"][0]["text"], "Yes");
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn run_parse_omits_absent_edge_text_and_direction() {
    let (result, text) = output(|out| run_parse("A --> B", false, out));
    result.unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    assert!(json.get("direction").is_none());
    assert!(json["edges"][0].get("text").is_none());
    assert!(text.lines().count() > 1);
}

#[test]
fn run_parse_empty_input_emits_placeholder() {
    let (result, text) = output(|out| run_parse("", true, out));
    result.unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["nodes"][0]["id"], "placeholder");
    assert_eq!(json["nodes"][0]["text"], "No valid nodes found");
    assert_eq!(json["edges"], serde_json::json!([]));
}

#[test]
fn run_layout_emits_object_descriptors() {
    let config = LayoutConfig::default();
    let (result, text) =
        output(|out| run_layout("A -->|go| B", &config, DEFAULT_PLACEMENT, true, out));
    result.unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["rectangle", "rectangle", "arrow", "text"]);
}

#[test]
fn run_layout_applies_placement() {
    let config = LayoutConfig::default();
    let placement = Placement { origin_x: 100.0, origin_y: 50.0, scale: 0.5 };
    let (result, text) = output(|out| run_layout("A", &config, placement, true, out));
    result.unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json[0]["x"], 60.0);
    assert_eq!(json[0]["y"], 35.0);
    assert_eq!(json[0]["width"], 80.0);
}

#[test]
fn run_check_reports_ok_summary() {
    let (result, text) = output(|out| run_check("A --> B --> C", out));
    result.unwrap();
    assert_eq!(text, "ok: 3 nodes, 2 edges\n");
}

#[test]
fn run_check_reports_placeholder() {
    let (result, text) = output(|out| run_check("%% nothing here", out));
    result.unwrap();
    assert_eq!(text, "ok: no nodes\n");
}

#[test]
fn run_check_lists_skipped_statements_and_fails() {
    let (result, text) = output(|out| run_check("A --> B\nC[oops\nD extra", out));
    assert!(matches!(result, Err(CliError::Malformed { count: 2 })));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "line 2: label opened with `[` is never closed: C[oops");
    assert_eq!(lines[1], "line 3: unexpected input `extra`: D extra");
}

#[test]
fn run_fmt_normalizes_text() {
    let (result, text) = output(|out| run_fmt("graph LR;A[Start]-->B;", out));
    result.unwrap();
    assert_eq!(text, "flowchart LR\n    A[Start]\n    B\n    A --> B\n");
}

#[test]
fn read_input_reports_missing_file() {
    let err = read_input("/definitely/not/here.mmd").unwrap_err();
    assert!(matches!(err, CliError::Read { ref path, .. } if path == "/definitely/not/here.mmd"));
    assert!(err.to_string().starts_with("failed to read /definitely/not/here.mmd"));
}
