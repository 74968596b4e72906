//! Configuration and program-model loading from disk.

use indoc::indoc;
use relaymap::config::{load_config_from, parse_and_validate_config};
use relaymap::io::{collect_model_files, load_all, load_units};
use relaymap::{analyze_units, Error, RelaymapConfig, Severity};
use std::fs;
use tempfile::TempDir;

const SIGNAL_MODEL: &str = indoc! {r#"
    {
        "path": "Signals.kt",
        "functions": [
            {
                "name": "Badge",
                "annotations": [{ "name": "androidx.compose.runtime.Composable" }],
                "params": [{ "name": "count", "ty": { "name": "Signal<Int>" } }],
                "body": [
                    { "kind": "expr", "expr": {
                        "kind": "call", "callee": "Text",
                        "target": { "kind": "resolved", "name": "Text" },
                        "args": [{ "value": {
                            "kind": "member",
                            "receiver": { "kind": "ident", "name": "count" },
                            "name": "value"
                        } }]
                    } }
                ]
            },
            {
                "name": "Toolbar",
                "annotations": [{ "name": "Composable" }],
                "params": [{ "name": "count", "ty": { "name": "Signal<Int>" } }],
                "body": [
                    { "kind": "expr", "expr": {
                        "kind": "call", "callee": "Badge",
                        "target": { "kind": "resolved", "name": "Badge", "signature": ["Signal<Int>"] },
                        "args": [{ "name": "count", "value": { "kind": "ident", "name": "count" } }]
                    } }
                ]
            },
            {
                "name": "Header",
                "annotations": [{ "name": "Composable" }],
                "params": [{
                    "name": "count",
                    "ty": { "name": "Signal<Int>" },
                    "location": { "file": "Signals.kt", "line": 30, "column": 12 }
                }],
                "body": [
                    { "kind": "expr", "expr": {
                        "kind": "call", "callee": "Toolbar",
                        "target": { "kind": "resolved", "name": "Toolbar", "signature": ["Signal<Int>"] },
                        "args": [{ "value": { "kind": "ident", "name": "count" } }]
                    } }
                ]
            }
        ]
    }
"#};

const SIGNAL_CONFIG: &str = indoc! {r#"
    [detection]
    severity = "error"

    [reactive_types]
    value_holder = ["State", "Signal"]
"#};

#[test]
fn test_invalid_config_is_rejected() {
    let err = parse_and_validate_config("[detection]\nmin_relay_links = 0\n").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    let err = parse_and_validate_config("[detection\n").unwrap_err();
    assert!(matches!(err, Error::Toml(_)));
}

#[test]
fn test_custom_container_type_from_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(".relaymap.toml");
    let model_path = dir.path().join("signals.json");
    fs::write(&config_path, SIGNAL_CONFIG).unwrap();
    fs::write(&model_path, SIGNAL_MODEL).unwrap();

    let units = load_units(&model_path).unwrap();
    assert_eq!(units.len(), 1);

    // Unknown container type under the defaults: nothing is reactive.
    let report = analyze_units(&units, &RelaymapConfig::default());
    assert!(report.findings.is_empty());

    let config = load_config_from(&config_path).unwrap();
    let report = analyze_units(&units, &config);
    let functions: Vec<_> = report.findings.iter().map(|f| f.function.as_str()).collect();
    assert_eq!(functions, vec!["Header", "Toolbar"]);
    assert!(report.findings.iter().all(|f| f.severity == Severity::Error));
    assert_eq!(report.findings[0].location.line, 30);
    assert_eq!(report.findings[0].origin, None);
}

#[test]
fn test_model_directory_loading() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("app/screens")).unwrap();
    fs::write(dir.path().join("app/screens/signals.json"), SIGNAL_MODEL).unwrap();
    fs::write(
        dir.path().join("app/empty.json"),
        r#"[{ "path": "Empty.kt" }]"#,
    )
    .unwrap();
    fs::write(dir.path().join("app/README.md"), "not a model").unwrap();

    let files = collect_model_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 2);

    let units = load_all(&files).unwrap();
    let paths: Vec<_> = units.iter().map(|u| u.path.display().to_string()).collect();
    assert_eq!(paths, vec!["Empty.kt", "Signals.kt"]);
}

#[test]
fn test_malformed_model_reports_path() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("broken.json");
    fs::write(&model_path, r#"{ "path": "X.kt", "functions": [{ "params": [] }] }"#).unwrap();

    let err = load_units(&model_path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}
