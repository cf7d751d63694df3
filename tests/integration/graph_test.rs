use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn graph_json(extra: &[&str]) -> serde_json::Value {
    let fixture = fixture_path("web_app");
    let output = Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(&fixture)
        .args(["--format", "json", "--quiet"])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn graph_json_stats() {
    let value = graph_json(&[]);
    let stats = &value["stats"];
    assert_eq!(stats["total_files"], 9);
    assert_eq!(stats["analyzed_files"], 9);
    assert_eq!(stats["failed_files"], 0);
    assert_eq!(stats["total_dependencies"], 12);
    assert_eq!(stats["internal_deps"], 10);
    assert_eq!(stats["external_deps"], 2);
    assert_eq!(value["metadata"]["edge_count"], 10);
    assert!(value["metadata"]["reference"].is_null());
}

#[test]
fn graph_json_resolves_every_specifier_form() {
    let value = graph_json(&[]);
    let edges: Vec<(String, String)> = value["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["source"].as_str().unwrap().to_string(),
                e["target"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    let expected = [
        ("src/index.js", "src/App.tsx"),
        ("src/index.js", "src/styles/main.css"),
        ("src/App.tsx", "src/pages/Home.tsx"),
        ("src/pages/Home.tsx", "src/utils/date.ts"),
        ("src/components/Button.jsx", "src/utils/classnames.js"),
        ("src/styles/main.css", "src/styles/button.css"),
    ];
    for (source, target) in expected {
        assert!(
            edges.iter().any(|(s, t)| s == source && t == target),
            "missing edge {source} -> {target}"
        );
    }

    let nodes = value["nodes"].as_array().unwrap();
    let date = nodes.iter().find(|n| n["id"] == "src/utils/date.ts").unwrap();
    assert_eq!(
        date["imported_by"],
        serde_json::json!(["src/App.tsx", "src/pages/Home.tsx"])
    );
}

#[test]
fn graph_max_files_caps_analysis() {
    let value = graph_json(&["--max-files", "2", "--jobs", "1"]);
    assert_eq!(value["stats"]["total_files"], 9);
    assert_eq!(value["stats"]["analyzed_files"], 2);
}

#[test]
fn graph_sequential_and_parallel_agree() {
    let mut seq = graph_json(&["--jobs", "1", "--no-cache"]);
    let mut par = graph_json(&["--jobs", "4"]);
    seq["metadata"]["elapsed_ms"] = 0.into();
    par["metadata"]["elapsed_ms"] = 0.into();
    assert_eq!(seq, par);
}

#[test]
fn graph_exclude_pattern() {
    let value = graph_json(&["--exclude", "**/*.css"]);
    assert_eq!(value["stats"]["total_files"], 7);
    assert!(value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["language"] != "css"));
}

#[test]
fn graph_dot_output() {
    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(fixture_path("web_app"))
        .args(["--format", "dot", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph dependencies"))
        .stdout(predicate::str::contains(
            "\"src/index.js\" -> \"src/App.tsx\";",
        ));
}

#[test]
fn graph_text_output() {
    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(fixture_path("web_app"))
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Repodeps Dependency Report"))
        .stdout(predicate::str::contains("Imports:    12 (10 internal, 2 external)"))
        .stdout(predicate::str::contains("Top "))
        .stderr(predicate::str::contains("Analyzed 9 of 9 files"));
}

#[test]
fn graph_default_excludes_skip_node_modules() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("node_modules/react")).unwrap();
    std::fs::write(tmp.path().join("node_modules/react/index.js"), "").unwrap();
    std::fs::write(tmp.path().join("index.js"), "import React from 'react';\n").unwrap();

    let output = Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(tmp.path())
        .args(["--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stats"]["total_files"], 1);
    assert_eq!(value["stats"]["external_deps"], 1);
}

#[test]
fn graph_empty_directory_fails() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(tmp.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn graph_missing_path_fails() {
    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["graph", "/definitely/not/here", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}
