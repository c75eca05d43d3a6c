use std::path::Path;
use std::process::{Command, Output};

use git2::{Oid, Repository, ResetType, Signature, Time};

const T0: i64 = 1_700_000_000;

fn commit(
    repo: &Repository,
    files: &[(&str, &str)],
    author: &str,
    timestamp: i64,
    message: &str,
) -> Oid {
    commit_with_parent(repo, None, files, author, timestamp, message)
}

fn commit_with_parent(
    repo: &Repository,
    other: Option<Oid>,
    files: &[(&str, &str)],
    author: &str,
    timestamp: i64,
    message: &str,
) -> Oid {
    let root = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new(author, &format!("{author}@example.com"), &Time::new(timestamp, 0))
        .unwrap();
    let mut parents: Vec<git2::Commit> = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .into_iter()
        .collect();
    parents.extend(other.map(|oid| repo.find_commit(oid).unwrap()));
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn sample_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    commit(
        &repo,
        &[
            ("src/app.py", "print('a')\nprint('b')\n"),
            ("README.md", "# Demo\n"),
        ],
        "alice",
        T0,
        "initial import",
    );
    commit(
        &repo,
        &[("src/app.py", "print('a')\nprint('b')\nprint('c')\n")],
        "bob",
        T0 + 1_800,
        "feat: third line | more",
    );
    commit(
        &repo,
        &[("config.json", "{}\n")],
        "alice",
        T0 + 20_000,
        "add config",
    );
    dir
}

/// `main` and `side` diverge from `base`, then `side` is merged back.
fn merge_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let base = commit(&repo, &[("base.txt", "base\n")], "alice", T0, "base");
    let side_body = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
    let side = commit(&repo, &[("side.txt", side_body)], "bob", T0 + 600, "side");
    let base_object = repo.find_object(base, None).unwrap();
    repo.reset(&base_object, ResetType::Hard, None).unwrap();
    commit(&repo, &[("main.txt", "main\n")], "alice", T0 + 1_200, "main");
    commit_with_parent(
        &repo,
        Some(side),
        &[("side.txt", side_body)],
        "alice",
        T0 + 1_800,
        "merge side",
    );
    dir
}

fn gitpace(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitpace"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn analyze_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["analyze", "--format", "json"];
    args.extend_from_slice(extra);
    let output = gitpace(dir, &args);
    assert!(
        output.status.success(),
        "gitpace analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn analyze_reports_history_as_json() {
    let repo = sample_repo();
    let doc = analyze_json(repo.path(), &[]);

    let totals = &doc["statistics"]["totals"];
    assert_eq!(totals["commits"], 3);
    assert_eq!(totals["files"], 3);
    assert_eq!(totals["lines"], 5);
    assert_eq!(totals["insertions"], 5);
    assert_eq!(totals["deletions"], 0);
    assert_eq!(totals["netLines"], 5);

    assert_eq!(doc["commits"][0]["message"], "add config");
    assert_eq!(doc["commits"][1]["message"], "feat: third line | more");
    assert_eq!(doc["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(doc["statistics"]["categories"]["script"], 1);
    assert_eq!(doc["statistics"]["categories"]["configuration"], 2);
    assert_eq!(doc["statistics"]["timeSpan"]["seconds"], 20_000);
    assert_eq!(doc["estimate"]["actual"]["days"], 0.5);
    assert_eq!(doc["diagnostics"]["failedQueries"], 0);

    let app = doc["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["path"] == "src/app.py")
        .unwrap();
    assert_eq!(app["commitCount"], 2);
    assert_eq!(app["language"], "Python");
}

#[test]
fn analyze_text_summary() {
    let repo = sample_repo();
    let output = gitpace(repo.path(), &["analyze"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("commits: 3"));
    assert!(stdout.contains("sessions: 2"));
    assert!(stdout.contains("actual_days: 0.50"));
    assert!(stdout.contains("efficiency_multiplier:"));
}

#[test]
fn analyze_writes_output_file() {
    let repo = sample_repo();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("analysis.json");

    let output = gitpace(
        repo.path(),
        &["analyze", "--output", out.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["statistics"]["totals"]["commits"], 3);
}

#[test]
fn config_file_changes_sessions_and_exclusions() {
    let repo = sample_repo();
    let config = repo.path().join("custom.toml");
    std::fs::write(
        &config,
        "[history]\nexclude = [\"*.md\"]\n\n[sessions]\nidle_gap_secs = 600\n",
    )
    .unwrap();

    let doc = analyze_json(repo.path(), &["--config", config.to_str().unwrap()]);
    assert_eq!(doc["sessions"].as_array().unwrap().len(), 3);
    assert_eq!(doc["statistics"]["totals"]["files"], 2);
    assert_eq!(doc["settings"]["idleGapSecs"], 600);
}

#[test]
fn invalid_config_is_rejected() {
    let repo = sample_repo();
    std::fs::write(
        repo.path().join(".gitpace.toml"),
        "[estimation.scenarios]\naverage = 0.0\n",
    )
    .unwrap();

    let output = gitpace(repo.path(), &["analyze"]);
    assert!(!output.status.success());
}

#[test]
fn outside_a_repository_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output = gitpace(dir.path(), &["analyze"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not a git repository"));
}

#[test]
fn cli_backend_agrees_with_libgit2() {
    let has_git = Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !has_git {
        return;
    }

    let repo = sample_repo();
    let native = analyze_json(repo.path(), &[]);
    let cli = analyze_json(repo.path(), &["--backend", "cli"]);

    assert_eq!(cli["statistics"]["totals"], native["statistics"]["totals"]);
    assert_eq!(cli["sessions"], native["sessions"]);
    assert_eq!(cli["commits"], native["commits"]);
    assert_eq!(cli["files"], native["files"]);

    let repo = merge_repo();
    let native = analyze_json(repo.path(), &[]);
    let cli = analyze_json(repo.path(), &["--backend", "cli"]);

    assert_eq!(cli["files"], native["files"]);
    assert_eq!(cli["statistics"]["totals"], native["statistics"]["totals"]);
    let side = native["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["path"] == "side.txt")
        .unwrap();
    assert_eq!(side["commitCount"], 1);
    assert_eq!(side["authors"], serde_json::json!(["bob"]));
}
