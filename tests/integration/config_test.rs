use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn config_show_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .env_remove("REPODEPS_MAX_FILES")
        .env_remove("REPODEPS_FORMAT")
        .env_remove("REPODEPS_CACHE_TTL")
        .env("REPODEPS_CACHE_DIR", "/tmp/repodeps-test-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved settings:"))
        .stdout(predicate::str::contains("analysis.max_files: 100 <- default"))
        .stdout(predicate::str::contains("cache.ttl_secs: 3600"))
        .stdout(predicate::str::contains(
            "cache.dir: /tmp/repodeps-test-cache <- env var (REPODEPS_CACHE_DIR)",
        ));
}

#[test]
fn config_show_with_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".repodeps.toml"),
        r#"
[defaults]
format = "text"

[analysis]
max_files = 250

[targeting]
exclude = ["fixtures/**"]
"#,
    )
    .unwrap();

    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .env_remove("REPODEPS_MAX_FILES")
        .env_remove("REPODEPS_FORMAT")
        .env_remove("REPODEPS_EXCLUDE")
        .assert()
        .success()
        .stdout(predicate::str::contains(".repodeps.toml"))
        .stdout(predicate::str::contains("defaults.format: text <- project config"))
        .stdout(predicate::str::contains(
            "analysis.max_files: 250 <- project config",
        ))
        .stdout(predicate::str::contains(
            "targeting.exclude: [\"fixtures/**\"] <- project config",
        ));
}

#[test]
fn config_show_env_var_wins() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".repodeps.toml"), "[analysis]\njobs = 2\n").unwrap();

    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .env("REPODEPS_JOBS", "6")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "analysis.jobs: 6 <- env var (REPODEPS_JOBS)",
        ));
}

#[test]
fn config_show_lists_ignore_patterns() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".repodepsignore"), "# ignored\nstories/\n").unwrap();

    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ignore patterns (.repodepsignore):"))
        .stdout(predicate::str::contains("**/stories/**"));
}

#[test]
fn invalid_project_config_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".repodeps.toml"), "[defaults]\nformat = \"svg\"\n").unwrap();

    Command::cargo_bin("repodeps")
        .unwrap()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn ignore_file_excludes_from_graph() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("stories")).unwrap();
    std::fs::write(tmp.path().join("stories/button.js"), "import '../a';\n").unwrap();
    std::fs::write(tmp.path().join("a.js"), "").unwrap();
    std::fs::write(tmp.path().join(".repodepsignore"), "stories/\n").unwrap();

    let output = Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(tmp.path())
        .arg("--quiet")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![".repodepsignore", "a.js"]);
}
