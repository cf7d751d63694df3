use assert_cmd::Command;
use git2::{Repository, Signature};
use predicates::prelude::*;
use std::path::Path;

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

fn graph_at(root: &Path, reference: Option<&str>) -> serde_json::Value {
    let cache = tempfile::tempdir().unwrap();
    graph_with_cache(root, reference, cache.path(), &[])
}

fn graph_with_cache(
    root: &Path,
    reference: Option<&str>,
    cache_dir: &Path,
    extra: &[&str],
) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("repodeps").unwrap();
    cmd.arg("graph")
        .arg(root)
        .arg("--quiet")
        .args(extra)
        .env("REPODEPS_CACHE_DIR", cache_dir);
    if let Some(r) = reference {
        cmd.args(["--ref", r]);
    }
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn graph_reads_committed_content_at_ref() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    write(tmp.path(), "src/a.js", "import b from './b';\n");
    write(tmp.path(), "src/b.js", "export default 1;\n");
    commit_all(&repo, "initial");

    // Working tree drops the import after the commit
    write(tmp.path(), "src/a.js", "export default 2;\n");

    let at_head = graph_at(tmp.path(), Some("HEAD"));
    assert_eq!(at_head["stats"]["internal_deps"], 1);
    assert_eq!(at_head["metadata"]["reference"], "HEAD");
    assert_eq!(at_head["edges"][0]["target"], "src/b.js");

    let worktree = graph_at(tmp.path(), None);
    assert_eq!(worktree["stats"]["internal_deps"], 0);
}

#[test]
fn repeated_runs_at_ref_read_the_content_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    write(tmp.path(), "src/a.js", "import b from './b';\n");
    write(tmp.path(), "src/b.js", "export default 1;\n");
    write(tmp.path(), "src/c.js", "export default 3;\n");
    commit_all(&repo, "initial");

    let first = graph_with_cache(tmp.path(), Some("HEAD"), cache.path(), &[]);
    assert_eq!(first["edges"][0]["target"], "src/b.js");

    // Edit the stored copy of src/a.js; only a cache hit can see it
    let mut rewritten = 0;
    for entry in std::fs::read_dir(cache.path()).unwrap() {
        let path = entry.unwrap().path();
        let text = std::fs::read_to_string(&path).unwrap();
        if text.contains("./b") {
            std::fs::write(&path, text.replace("./b", "./c")).unwrap();
            rewritten += 1;
        }
    }
    assert_eq!(rewritten, 1);

    let second = graph_with_cache(tmp.path(), Some("HEAD"), cache.path(), &[]);
    assert_eq!(second["edges"][0]["target"], "src/c.js");

    let bypassed = graph_with_cache(tmp.path(), Some("HEAD"), cache.path(), &["--no-cache"]);
    assert_eq!(bypassed["edges"][0]["target"], "src/b.js");
}

#[test]
fn working_tree_reads_are_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    write(tmp.path(), "a.js", "import b from './b';\n");
    write(tmp.path(), "b.js", "");

    let graph = graph_with_cache(tmp.path(), None, cache.path(), &[]);
    assert_eq!(graph["stats"]["internal_deps"], 1);
    assert_eq!(std::fs::read_dir(cache.path()).unwrap().count(), 0);
}

#[test]
fn huge_cache_ttl_is_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    write(tmp.path(), "a.js", "import b from './b';\n");
    write(tmp.path(), "b.js", "");
    commit_all(&repo, "initial");

    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(tmp.path())
        .args(["--ref", "HEAD", "--quiet"])
        .env("REPODEPS_CACHE_DIR", cache.path())
        .env("REPODEPS_CACHE_TTL", u64::MAX.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"internal_deps\": 1"));
}

#[test]
fn tree_at_ref_lists_committed_files_only() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    write(tmp.path(), "lib/x.js", "");
    commit_all(&repo, "initial");
    write(tmp.path(), "lib/untracked.js", "");

    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("tree")
        .arg(tmp.path())
        .args(["--ref", "HEAD", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("x.js"))
        .stdout(predicate::str::contains("untracked.js").not());
}

#[test]
fn unknown_ref_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = Repository::init(tmp.path()).unwrap();
    write(tmp.path(), "a.js", "");
    commit_all(&repo, "initial");

    Command::cargo_bin("repodeps")
        .unwrap()
        .arg("graph")
        .arg(tmp.path())
        .args(["--ref", "no-such-branch", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not resolve ref"));
}
