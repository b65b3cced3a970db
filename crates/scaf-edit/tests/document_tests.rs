//! File-level tests for the structured-document editor

use pretty_assertions::assert_eq;
use scaf_edit::{DocumentEditor, Editor, Value};

#[test]
fn test_invalid_json_is_fatal() {
    assert!(DocumentEditor::from_content("/tmp/x.json", "{not json").is_err());
}

#[test]
fn test_save_with_no_edits_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.json");
    std::fs::write(&path, "{\"name\": \"demo\"}\n").unwrap();

    let mut doc = DocumentEditor::from_path(&path).unwrap();
    assert!(!doc.save().unwrap());
    // untouched file is not rewritten, not even re-indented
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"name\": \"demo\"}\n");
}

#[test]
fn test_script_append_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.json");
    std::fs::write(&path, r#"{"scripts": {"build": "webpack"}}"#).unwrap();

    let mut doc = DocumentEditor::from_path(&path).unwrap();
    doc.append_to_script("build", "webpack --watch").unwrap();
    assert!(doc.save().unwrap());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({"scripts": {"build": ["webpack", "webpack --watch"]}})
    );
}

#[test]
fn test_key_order_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("composer.json");
    std::fs::write(
        &path,
        r#"{"name": "demo", "require": {"php": "^8.2"}, "autoload": {}}"#,
    )
    .unwrap();

    let mut doc = DocumentEditor::from_path(&path).unwrap();
    doc.set("require.laravel/framework", Value::str("^11.0"))
        .unwrap();
    doc.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let name = written.find("\"name\"").unwrap();
    let require = written.find("\"require\"").unwrap();
    let autoload = written.find("\"autoload\"").unwrap();
    assert!(name < require && require < autoload);
    assert!(written.contains("laravel/framework"));
}

#[test]
fn test_two_space_indentation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.json");
    std::fs::write(&path, "{}").unwrap();

    let mut doc = DocumentEditor::from_path(&path).unwrap();
    doc.set("name", Value::str("demo")).unwrap();
    doc.save().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\n  \"name\": \"demo\"\n}\n"
    );
}

#[test]
fn test_script_lifecycle() {
    let mut doc = DocumentEditor::from_content("/tmp/package.json", "{}").unwrap();
    assert!(!doc.has_script("test"));
    doc.add_script("test", "phpunit").unwrap();
    assert!(doc.has_script("test"));
    doc.remove_script("test");
    assert!(!doc.has_script("test"));
}
