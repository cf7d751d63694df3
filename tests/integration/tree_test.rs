use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn tree_text_listing() {
    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("tree")
        .arg(fixture_path("web_app"))
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("web_app/\n├── src/\n"))
        .stdout(predicate::str::contains("│   ├── components/\n│   │   └── Button.jsx"))
        .stdout(predicate::str::contains("└── README.md"))
        .stdout(predicate::str::contains("9 files"));
}

#[test]
fn tree_json_structure() {
    let output = Command::cargo_bin("repodeps")
        .unwrap()
        .arg("tree")
        .arg(fixture_path("web_app"))
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["id"], "root");
    assert_eq!(value["name"], "web_app");
    assert_eq!(value["full_path"], "");
    let top: Vec<&str> = value["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(top, vec!["src", "README.md"]);

    let src = &value["children"][0];
    let names: Vec<&str> = src["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["components", "pages", "styles", "utils", "App.tsx", "index.js"]
    );
}

#[test]
fn tree_format_follows_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".repodeps.toml"), "[defaults]\nformat = \"text\"\n").unwrap();
    std::fs::write(tmp.path().join("main.ts"), "").unwrap();

    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("tree")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("├── .repodeps.toml"))
        .stdout(predicate::str::contains("└── main.ts"));
}
