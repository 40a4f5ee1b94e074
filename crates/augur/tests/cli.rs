use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn augur() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("augur").into();
    cmd.env_remove("AUGUR_CONFIG");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const REQUEST: &str = r#"{
    "event": {"id": "e1", "title": "Will the economy slow down?", "volume": 1200.0},
    "sources": [
        {
            "title": "Rates outlook",
            "url": "https://example.com/rates",
            "text": "Rising interest rates causes economic slowdown.",
            "relevanceScore": 0.8
        }
    ]
}"#;

fn request_file() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = write_file(tmp.path(), "request.json", REQUEST);
    (tmp, path)
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    augur()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("augur"));
}

#[test]
fn config_prints_defaults() {
    let output = augur().arg("config").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["quality"]["max_entities_per_source"], 5);
    assert_eq!(json["weights"]["trusted_providers"][0], "Airweave");
    assert_eq!(json["strict_validation"], false);
}

// --- Analyze ---

#[test]
fn analyze_prints_graph_and_predictions() {
    let (tmp, request) = request_file();

    let output = augur().arg("analyze").arg(&request).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let nodes = json["graph"]["nodes"].as_array().unwrap();
    assert!(nodes.iter().any(|n| n["id"] == "e1" && n["type"] == "Event"));
    assert!(nodes.iter().any(|n| n["id"] == "entity_rising_interest_rates"));
    assert_eq!(json["graph"]["metadata"]["totalSources"], 1);

    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(
        predictions[0]["reasoning"],
        "Insufficient causal data for prediction"
    );
    drop(tmp);
}

#[test]
fn analyze_output_predictions_only() {
    let (tmp, request) = request_file();

    let output = augur()
        .arg("analyze")
        .arg(&request)
        .args(["--output", "predictions"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let predictions = json.as_array().unwrap();
    assert_eq!(predictions[0]["outcome"], "Yes");
    assert_eq!(predictions[0]["confidence"], "Low");
    drop(tmp);
}

#[test]
fn analyze_output_graph_pretty() {
    let (tmp, request) = request_file();

    augur()
        .arg("analyze")
        .arg(&request)
        .args(["--output", "graph", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"nodes\""))
        .stdout(predicate::str::contains("CAUSES"))
        .stdout(predicate::str::contains("predictions").not());
    drop(tmp);
}

#[test]
fn analyze_missing_file_fails() {
    let tmp = TempDir::new().unwrap();

    augur()
        .arg("analyze")
        .arg(tmp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn analyze_invalid_json_fails() {
    let tmp = TempDir::new().unwrap();
    let request = write_file(tmp.path(), "request.json", "{not json");

    augur()
        .arg("analyze")
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid analysis request"));
}

#[test]
fn analyze_rejects_invalid_config() {
    let (tmp, request) = request_file();
    let config = write_file(
        tmp.path(),
        "config.json",
        r#"{"chains": {"length_decay": 2.0}}"#,
    );

    augur()
        .arg("analyze")
        .arg(&request)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn analyze_reads_config_from_env() {
    let tmp = TempDir::new().unwrap();
    let request = write_file(
        tmp.path(),
        "request.json",
        r#"{"event": {"id": "e1", "title": "  "}, "sources": []}"#,
    );
    let config = write_file(tmp.path(), "config.json", r#"{"strict_validation": true}"#);

    augur()
        .arg("analyze")
        .arg(&request)
        .env("AUGUR_CONFIG", &config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid event"));

    augur()
        .arg("analyze")
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("Untitled event"));
}

// --- Extract ---

#[test]
fn extract_prints_raw_extraction() {
    let tmp = TempDir::new().unwrap();
    let text = write_file(
        tmp.path(),
        "article.txt",
        "Rising interest rates causes economic slowdown. Analysts expect the Federal Reserve will hold rates steady.",
    );

    let output = augur().arg("extract").arg(&text).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entities = json["entities"].as_array().unwrap();
    assert!(entities.iter().any(|e| e["text"] == "Federal Reserve"));

    let relationships = json["relationships"].as_array().unwrap();
    assert!(relationships
        .iter()
        .any(|r| r["relation_type"] == "CAUSES" && r["target"]["text"] == "economic slowdown"));
}

#[test]
fn extract_short_text_is_empty() {
    let tmp = TempDir::new().unwrap();
    let text = write_file(tmp.path(), "short.txt", "Too short.");

    augur()
        .arg("extract")
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"entities":[],"relationships":[]}"#));
}
