//! Integration tests for the `parent-gate` binary.
//!
//! Every invocation runs with an isolated home and config directory so a
//! developer's own configuration cannot change the policy under test.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// A repository with `main` at `head`, plus unreferenced pushed commits.
struct TestRepo {
    dir: TempDir,
    home: TempDir,
    base: String,
    head: String,
    fresh: String,
    stale: String,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        let path = dir.path();

        run_git(path, &["init", "-b", "main"]);
        run_git(path, &["config", "user.email", "test@example.com"]);
        run_git(path, &["config", "user.name", "Test User"]);
        run_git(path, &["config", "commit.gpgsign", "false"]);

        std::fs::write(path.join("README.md"), "# Test Repo\n").unwrap();
        run_git(path, &["add", "README.md"]);
        run_git(path, &["commit", "-m", "base"]);
        let base = git_output(path, &["rev-parse", "HEAD"]);

        std::fs::write(path.join("a.txt"), "a\n").unwrap();
        run_git(path, &["add", "a.txt"]);
        run_git(path, &["commit", "-m", "head"]);
        let head = git_output(path, &["rev-parse", "HEAD"]);

        let tree = git_output(path, &["rev-parse", "HEAD^{tree}"]);
        let fresh = git_output(path, &["commit-tree", &tree, "-p", &head, "-m", "fresh"]);
        let stale = git_output(path, &["commit-tree", &tree, "-p", &base, "-m", "stale"]);

        Self {
            dir,
            home,
            base,
            head,
            fresh,
            stale,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The binary, pointed at this repository with isolated config.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("parent-gate").unwrap();
        cmd.arg("--cwd")
            .arg(self.path())
            .env("PARENT_GATE_CONFIG", self.home.path().join("missing.toml"))
            .env("XDG_CONFIG_HOME", self.home.path())
            .env("HOME", self.home.path())
            .env_remove("PARENT_GATE_LOG");
        cmd
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

// =============================================================================
// Basic
// =============================================================================

#[test]
fn help_lists_commands() {
    Command::cargo_bin("parent-gate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-receive"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn completion_bash() {
    Command::cargo_bin("parent-gate")
        .unwrap()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parent-gate"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_fresh_commit_accepted() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["--reject", "check", "--ref", "main", &repo.fresh])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted"))
        .stderr(predicate::str::contains("(W)").not());
}

#[test]
fn check_stale_commit_warns_by_default() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["check", "--ref", "main", &repo.stale])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted with warning"))
        .stderr(predicate::str::contains(
            "(W) !!! PLEASE UPDATE REPO AND REBASE YOUR COMMIT !!!",
        ))
        .stderr(predicate::str::contains(format!(
            "(W) Server-side HEAD-Id ({}) != Parent-Id for this commit ({})",
            repo.head, repo.base
        )));
}

#[test]
fn check_stale_commit_rejected_with_flag() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["--reject", "check", "--ref", "refs/heads/main", &repo.stale])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Commit parent validation failed"));
}

#[test]
fn check_json_output() {
    let repo = TestRepo::new();
    let output = repo
        .cmd()
        .args(["--reject", "check", "--ref", "main", "--json", &repo.stale])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["commit"], repo.stale.as_str());
    assert_eq!(json["target"], "main");
    assert_eq!(json["policy"]["reject_parent_not_head"], true);
    assert_eq!(json["verdict"], "rejected");
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 2);
    assert_eq!(json["diagnostics"][0]["severity"], "warning");
}

#[test]
fn check_unknown_ref_warns() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["--reject", "check", "--ref", "refs/heads/nope", &repo.stale])
        .assert()
        .success()
        .stderr(predicate::str::contains("(W2) ref not found: refs/heads/nope"));
}

#[test]
fn check_unknown_revision_fails() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["check", "--ref", "main", "no-such-rev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-rev"));
}

#[test]
fn git_config_enables_rejection() {
    let repo = TestRepo::new();
    run_git(
        repo.path(),
        &["config", "commitcheck.rejectParentNotHead", "true"],
    );

    repo.cmd()
        .args(["check", "--ref", "main", &repo.stale])
        .assert()
        .failure();

    repo.cmd()
        .args(["--no-reject", "check", "--ref", "main", &repo.stale])
        .assert()
        .success();
}

// =============================================================================
// config
// =============================================================================

#[test]
fn config_set_get_and_list() {
    let repo = TestRepo::new();

    repo.cmd()
        .args(["config", "get", "commitcheck.reject_parent_not_head"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    repo.cmd()
        .args(["config", "set", "commitcheck.reject_parent_not_head", "yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set commitcheck.reject_parent_not_head"));

    assert!(repo.path().join(".git/parent-gate/config.toml").exists());

    repo.cmd()
        .args(["config", "get", "commitcheck.reject_parent_not_head"])
        .assert()
        .success()
        .stdout(predicate::str::diff("true\n"));

    repo.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Effective (").and(predicate::str::contains(
            "config.toml)\ncommitcheck.reject_parent_not_head = true",
        )));

    repo.cmd()
        .args(["check", "--ref", "main", &repo.stale])
        .assert()
        .failure();
}

#[test]
fn config_list_defaults() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Effective (default)\ncommitcheck.reject_parent_not_head = false",
        ));
}

#[test]
fn config_rejects_unknown_key_and_bad_value() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["config", "set", "commitcheck.nope", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "known keys: commitcheck.reject_parent_not_head",
        ));

    repo.cmd()
        .args(["config", "set", "commitcheck.reject_parent_not_head", "maybe"])
        .assert()
        .failure();
}

// =============================================================================
// Hooks
// =============================================================================

#[test]
fn pre_receive_accepts_fresh_and_skips_tags() {
    let repo = TestRepo::new();
    let input = format!(
        "{} {} refs/heads/main\n{} {} refs/tags/v1\n",
        repo.head,
        repo.fresh,
        "0".repeat(40),
        repo.stale
    );

    repo.cmd()
        .args(["--reject", "pre-receive"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("(W)").not());
}

#[test]
fn pre_receive_rejects_stale_push() {
    let repo = TestRepo::new();
    let input = format!("{} {} refs/heads/main\n", repo.head, repo.stale);

    repo.cmd()
        .args(["--reject", "pre-receive"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "refs/heads/main: (W) !!! PLEASE UPDATE REPO AND REBASE YOUR COMMIT !!!",
        ))
        .stderr(predicate::str::contains(
            "refs/heads/main: Commit parent validation failed",
        ));
}

#[test]
fn pre_receive_warns_on_new_branch() {
    let repo = TestRepo::new();
    let input = format!("{} {} refs/heads/feature\n", "0".repeat(40), repo.stale);

    repo.cmd()
        .args(["--reject", "pre-receive"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("refs/heads/feature: (W2)"));
}

#[test]
fn pre_receive_with_broken_config_file_does_not_block() {
    let repo = TestRepo::new();
    std::fs::write(repo.home.path().join("missing.toml"), "[commitcheck\nnot toml").unwrap();

    repo.cmd()
        .arg("pre-receive")
        .write_stdin(format!("{} {} refs/heads/main\n", repo.head, repo.fresh))
        .assert()
        .success()
        .stderr(predicate::str::contains("(W2) Failed to load config"))
        .stderr(predicate::str::contains("reject_parent_not_head = false"));

    repo.cmd()
        .arg("pre-receive")
        .write_stdin(format!("{} {} refs/heads/main\n", repo.head, repo.stale))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "refs/heads/main: (W) !!! PLEASE UPDATE REPO AND REBASE YOUR COMMIT !!!",
        ));
}

#[test]
fn pre_receive_with_broken_repo_config_does_not_block() {
    let repo = TestRepo::new();
    let dir = repo.path().join(".git/parent-gate");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[commitcheck]\nreject_everything = true\n").unwrap();

    repo.cmd()
        .args(["update", "refs/heads/main", &repo.head, &repo.stale])
        .assert()
        .success()
        .stderr(predicate::str::contains("(W2)"));
}

#[test]
fn pre_receive_with_bad_git_config_value_keeps_flag() {
    let repo = TestRepo::new();
    run_git(
        repo.path(),
        &["config", "commitcheck.rejectParentNotHead", "maybe"],
    );
    let input = format!("{} {} refs/heads/main\n", repo.head, repo.stale);

    repo.cmd()
        .arg("pre-receive")
        .write_stdin(input.clone())
        .assert()
        .success()
        .stderr(predicate::str::contains("(W2)"));

    repo.cmd()
        .args(["--reject", "pre-receive"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Commit parent validation failed"));
}

#[test]
fn check_with_broken_config_file_fails() {
    let repo = TestRepo::new();
    std::fs::write(repo.home.path().join("missing.toml"), "[commitcheck\nnot toml").unwrap();

    repo.cmd()
        .args(["check", "--ref", "main", &repo.fresh])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn pre_receive_malformed_input_fails() {
    let repo = TestRepo::new();
    repo.cmd()
        .arg("pre-receive")
        .write_stdin("not a valid line at all\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed ref update"));
}

#[test]
fn update_hook_arguments() {
    let repo = TestRepo::new();
    repo.cmd()
        .args(["update", "refs/heads/main", &repo.head, &repo.stale])
        .assert()
        .success()
        .stderr(predicate::str::contains("refs/heads/main: (W) "));

    repo.cmd()
        .args(["--reject", "update", "refs/heads/main", &repo.head, &repo.stale])
        .assert()
        .failure();
}

/// Push through a real pre-receive hook on a bare server. Pushes are
/// forced so the hook, not the client, sees the stale parent.
#[test]
fn real_push_through_hook() {
    let repo = TestRepo::new();
    let server_dir = TempDir::new().unwrap();
    let server = server_dir.path().join("server.git");

    run_git(
        server_dir.path(),
        &["clone", "--bare", repo.path().to_str().unwrap(), "server.git"],
    );
    run_git(&server, &["config", "commitcheck.rejectParentNotHead", "true"]);

    let bin = assert_cmd::cargo::cargo_bin("parent-gate");
    let hook = server.join("hooks/pre-receive");
    std::fs::write(
        &hook,
        format!("#!/bin/sh\nexec \"{}\" pre-receive\n", bin.display()),
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let push = |rev: &str| {
        StdCommand::new("git")
            .args(["push", server.to_str().unwrap()])
            .arg(format!("+{}:refs/heads/main", rev))
            .current_dir(repo.path())
            .env("PARENT_GATE_CONFIG", repo.home.path().join("missing.toml"))
            .env("XDG_CONFIG_HOME", repo.home.path())
            .env_remove("PARENT_GATE_LOG")
            .output()
            .unwrap()
    };

    let output = push(&repo.stale);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PLEASE UPDATE REPO AND REBASE YOUR COMMIT"), "{}", stderr);
    assert_eq!(git_output(&server, &["rev-parse", "main"]), repo.head);

    let output = push(&repo.fresh);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(git_output(&server, &["rev-parse", "main"]), repo.fresh);
}
