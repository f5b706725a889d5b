//! Wire-shape tests: the JSON structures consumed by review UIs.

use serde_json::{json, Value};

use diffweave::{
    Engine, HighlightLinesRequest, ParseDiffRequest, ParseDiffResponse, ParseRequest, Response,
};

fn parsed(patch: &str) -> diffweave::ParsedDiff {
    let engine = Engine::default();
    engine
        .parse_diff(&ParseRequest {
            patch: patch.to_string(),
            filename: "demo.rs".to_string(),
            ..ParseRequest::default()
        })
        .unwrap()
}

#[test]
fn hunks_and_skips_are_tagged() {
    let diff = parsed("@@ -1,1 +1,1 @@\n-a\n+b\n@@ -40,1 +40,1 @@ fn later()\n ctx\n");
    let value = serde_json::to_value(&diff).unwrap();

    let hunks = value["hunks"].as_array().unwrap();
    assert_eq!(hunks.len(), 3);
    assert_eq!(hunks[0]["type"], "hunk");
    assert_eq!(hunks[0]["oldStart"], 1);
    assert_eq!(hunks[0]["newStart"], 1);
    assert_eq!(hunks[1]["type"], "skip");
    assert_eq!(hunks[1]["count"], 38);
    assert_eq!(hunks[1]["content"], "fn later()");
    assert_eq!(hunks[2]["type"], "hunk");
}

#[test]
fn lines_carry_camel_case_numbers_and_typed_segments() {
    let diff = parsed("@@ -1,2 +1,2 @@\n ctx\n-short\n+entirely different text here\n");
    let value = serde_json::to_value(&diff).unwrap();
    let lines = value["hunks"][0]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 3);

    let context = &lines[0];
    assert_eq!(context["type"], "normal");
    assert_eq!(context["oldLineNumber"], 1);
    assert_eq!(context["newLineNumber"], 1);
    let segment = &context["content"][0];
    assert_eq!(segment["type"], "normal");
    assert_eq!(segment["value"], "ctx");
    assert!(segment["html"].is_string());

    let deletion = &lines[1];
    assert_eq!(deletion["type"], "delete");
    assert_eq!(deletion["oldLineNumber"], 2);
    assert_eq!(deletion.get("newLineNumber"), None, "unset numbers are omitted");

    let insertion = &lines[2];
    assert_eq!(insertion["type"], "insert");
    assert_eq!(insertion["newLineNumber"], 2);
    assert_eq!(insertion.get("oldLineNumber"), None);
}

#[test]
fn rendered_output_round_trips_through_json() {
    let diff = parsed("@@ -1,1 +1,1 @@\n-hello world\n+hello there\n");
    let text = serde_json::to_string(&diff).unwrap();
    let back: diffweave::ParsedDiff = serde_json::from_str(&text).unwrap();
    assert_eq!(diff, back);
}

#[test]
fn parse_request_accepts_minimal_and_full_forms() {
    let minimal: ParseDiffRequest = serde_json::from_value(json!({
        "id": "7",
        "patch": "@@ -1,1 +1,1 @@\n-a\n+b\n",
        "filename": "demo.rs",
    }))
    .unwrap();
    assert_eq!(minimal.id, "7");
    assert!(minimal.previous_filename.is_none());
    assert!(minimal.old_content.is_none());

    let full: ParseDiffRequest = serde_json::from_value(json!({
        "id": "8",
        "patch": "",
        "filename": "new.rs",
        "previousFilename": "old.rs",
        "oldContent": "a\n",
        "newContent": "b\n",
    }))
    .unwrap();
    assert_eq!(full.previous_filename.as_deref(), Some("old.rs"));

    let (id, request) = full.into_parse_request();
    assert_eq!(id, "8");
    assert_eq!(request.filename, "new.rs");
    assert_eq!(request.old_content.as_deref(), Some("a\n"));
}

#[test]
fn highlight_request_uses_camel_case_start_line() {
    let request: HighlightLinesRequest = serde_json::from_value(json!({
        "id": "9",
        "content": "fn main() {}\n",
        "filename": "main.rs",
        "startLine": 1,
        "count": 1,
    }))
    .unwrap();
    assert_eq!(request.start_line, 1);
}

#[test]
fn response_envelope_is_result_or_error() {
    let ok: ParseDiffResponse = Response::from_outcome(
        "11".to_string(),
        Ok::<_, diffweave::PoolError>(parsed("@@ -1,1 +1,1 @@\n-a\n+b\n")),
    );
    let value = serde_json::to_value(&ok).unwrap();
    assert_eq!(value["id"], "11");
    assert!(value.get("result").is_some());
    assert!(value.get("error").is_none());

    let err: ParseDiffResponse = Response::from_outcome(
        "12".to_string(),
        Err::<diffweave::ParsedDiff, _>(diffweave::PoolError::Terminated),
    );
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["id"], "12");
    assert_eq!(value["error"], "request cancelled: pool terminated");
}

#[test]
fn response_parses_back_from_wire_text() {
    let value: ParseDiffResponse =
        serde_json::from_value(json!({ "id": "3", "error": "malformed patch: bad header" }))
            .unwrap();
    match value {
        Response::Error { id, error } => {
            assert_eq!(id, "3");
            assert!(error.starts_with("malformed patch"));
        }
        Response::Result { .. } => panic!("expected the error arm"),
    }
}

#[test]
fn deep_equality_check() {
    let a: Value = serde_json::to_value(parsed("@@ -1,1 +1,1 @@\n-a\n+b\n")).unwrap();
    let b: Value = serde_json::to_value(parsed("@@ -1,1 +1,1 @@\n-a\n+b\n")).unwrap();
    assert_eq!(a, b);
}
