//! Unit tests for the input document

use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;

use ci_sync_runtime::deps::RealFileSystem;

use super::*;
use crate::test_helpers::MockFileSystemMock;

fn parse(content: &str) -> Result<InputDocument, DocumentError> {
    InputDocument::parse(content, Path::new("variables.json"))
}

#[test]
fn test_parse_primitives_in_file_order() {
    let document = parse(r#"{"ZED": "last-alpha", "A": 1, "B": true, "C": 2.5}"#).unwrap();

    let keys: Vec<&str> = document.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["ZED", "A", "B", "C"]);

    let values: Vec<String> = document
        .entries
        .iter()
        .map(|e| e.value.to_string())
        .collect();
    assert_eq!(values, vec!["last-alpha", "1", "true", "2.5"]);
    assert!(document.skipped.is_empty());
}

#[test]
fn test_non_primitive_values_are_skipped() {
    let document =
        parse(r#"{"A": "1", "NESTED": {"x": 1}, "LIST": [1, 2], "NOTHING": null, "B": false}"#)
            .unwrap();

    assert_eq!(document.entries.len(), 2);
    assert_eq!(
        document.skipped,
        vec![
            SkippedEntry {
                key: "NESTED".to_string(),
                kind: "object",
            },
            SkippedEntry {
                key: "LIST".to_string(),
                kind: "array",
            },
            SkippedEntry {
                key: "NOTHING".to_string(),
                kind: "null",
            },
        ]
    );
}

#[test]
fn test_empty_object_is_valid() {
    assert_eq!(parse("{}").unwrap(), InputDocument::default());
}

#[rstest]
#[case::array("[1, 2]", "array")]
#[case::null("null", "null")]
#[case::string("\"A=1\"", "string")]
#[case::number("42", "number")]
fn test_top_level_must_be_object(#[case] content: &str, #[case] expected: &str) {
    match parse(content) {
        Err(DocumentError::NotAnObject { found, .. }) => assert_eq!(found, expected),
        other => panic!("expected NotAnObject, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = parse(r#"{"A": "1",}"#).unwrap_err();
    assert!(matches!(err, DocumentError::Parse { .. }));
    assert!(err.to_string().contains("variables.json is not valid JSON"));
}

#[test]
fn test_load_missing_file() {
    let mut fs = MockFileSystemMock::new();
    fs.expect_exists().times(1).returning(|_| false);
    fs.expect_read_to_string().never();

    let err = InputDocument::load(&fs, Path::new("missing.json")).unwrap_err();
    assert!(matches!(err, DocumentError::Missing { .. }));
    assert_eq!(err.to_string(), "variables file not found: missing.json");
}

#[test]
fn test_load_read_failure() {
    let mut fs = MockFileSystemMock::new();
    fs.expect_exists().returning(|_| true);
    fs.expect_read_to_string()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("permission denied")));

    let err = InputDocument::load(&fs, Path::new("locked.json")).unwrap_err();
    assert!(matches!(err, DocumentError::Read { .. }));
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("variables.json");
    std::fs::write(&path, r#"{"A": "1", "B": true}"#).unwrap();

    let document = InputDocument::load(&RealFileSystem, &path).unwrap();

    assert_eq!(
        document.entries,
        vec![
            VariableEntry {
                key: "A".to_string(),
                value: VariableValue::String("1".to_string()),
            },
            VariableEntry {
                key: "B".to_string(),
                value: VariableValue::Bool(true),
            },
        ]
    );
}
