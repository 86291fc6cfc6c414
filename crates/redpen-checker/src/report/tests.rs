//! Unit tests for report normalisation.

use rstest::rstest;

use super::*;

fn single(stdout: &str, offset: u32) -> DiagnosticRecord {
    let report = normalize("notes.md", stdout, "", offset).expect("parse report");
    assert_eq!(report.diagnostics.len(), 1, "{report:?}");
    report
        .diagnostics
        .into_iter()
        .next()
        .expect("one diagnostic")
}

#[test]
fn flat_shape_is_normalised() {
    let record = single(
        r#"[{"document":"notes.md","errors":[
            {"lineNum":5,"sentenceStartColumnNum":10,"message":"m","sentence":"s"}
        ]}]"#,
        0,
    );
    assert_eq!(
        record,
        DiagnosticRecord {
            message: String::from("m"),
            preview_text: String::from("s"),
            line: 5,
            column: 11,
        }
    );
}

#[test]
fn nested_shape_applies_line_offset() {
    let record = single(
        r#"[{"errors":[
            {"startPosition":{"lineNum":2,"offset":3},"message":"m2","sentence":"s2"}
        ]}]"#,
        7,
    );
    assert_eq!(record.line, 9);
    assert_eq!(record.column, 4);
    assert_eq!(record.message, "m2");
    assert_eq!(record.preview_text, "s2");
}

#[test]
fn nested_position_wins_over_flat_fields() {
    let record = single(
        r#"[{"errors":[{
            "lineNum":40,"sentenceStartColumnNum":40,
            "startPosition":{"lineNum":2,"offset":0},
            "endPosition":{"lineNum":2,"offset":6},
            "message":"m","sentence":"s","validator":"Spelling"
        }]}]"#,
        0,
    );
    assert_eq!((record.line, record.column), (2, 1));
}

#[test]
fn findings_keep_tool_order() {
    let report = normalize(
        "notes.md",
        r#"[{"errors":[
            {"lineNum":9,"sentenceStartColumnNum":0,"message":"later","sentence":""},
            {"lineNum":1,"sentenceStartColumnNum":0,"message":"earlier","sentence":""}
        ]}]"#,
        "",
        0,
    )
    .expect("parse report");
    let messages: Vec<&str> = report
        .diagnostics
        .iter()
        .map(|record| record.message.as_str())
        .collect();
    assert_eq!(messages, ["later", "earlier"]);
}

#[test]
fn empty_error_list_is_a_success() {
    let report = normalize("notes.md", r#"[{"document":"notes.md","errors":[]}]"#, "", 0)
        .expect("parse report");
    assert!(report.is_success());
    assert_eq!(report.summary(), "No errors in notes.md");
}

#[test]
fn only_the_first_document_is_read() {
    let report = normalize(
        "notes.md",
        r#"[{"errors":[{"message":"m","sentence":"s","lineNum":2,"sentenceStartColumnNum":0}]},
            {"document":42,"errors":"not a list"}]"#,
        "",
        0,
    )
    .expect("parse report");
    assert_eq!(report.diagnostics.len(), 1);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \n")]
#[case::not_json("not json")]
#[case::object(r#"{"errors":[]}"#)]
#[case::empty_array("[]")]
#[case::missing_errors(r#"[{"document":"a"}]"#)]
#[case::no_position(r#"[{"errors":[{"message":"m","sentence":"s"}]}]"#)]
fn malformed_output_is_unparseable(#[case] stdout: &str) {
    let error = normalize("notes.md", stdout, "java.lang.Exception: boom", 0)
        .expect_err("should be unparseable");
    let ToolError::Unparseable { stderr, .. } = error;
    assert_eq!(stderr, "java.lang.Exception: boom");
}

#[rstest]
#[case(0, "No errors in a.txt")]
#[case(1, "1 errors in a.txt")]
#[case(3, "3 errors in a.txt")]
fn summary_counts_findings(#[case] count: usize, #[case] expected: &str) {
    let record = DiagnosticRecord {
        message: String::from("m"),
        preview_text: String::new(),
        line: 1,
        column: 1,
    };
    let report = ValidationReport::new("a.txt", vec![record; count]);
    assert_eq!(report.summary(), expected);
}
