//! End-to-end tests for the CLI.
//!
//! These tests verify argument handling, exit codes, and the offline
//! success path. Network access is never required: the success-path tests
//! seed the on-disk cache with both manifests before running the binary,
//! and the failure-path tests force errors before any fetch happens.
//!
//! Exit code conventions:
//! - 0: success
//! - 1: pipeline failure (message prefixed `Failed to compare YAML files:`)
//! - 2: invalid command-line usage (handled by clap)

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

use canasta_diff::fetcher::{Fetcher, CANASTA_REPO, TAQASTA_REPO, TAQASTA_VALUES_FILE};

/// Seed the cache directory with a Taqasta and a Canasta manifest so the
/// binary runs without touching the network.
fn seed_cache(cache_dir: &std::path::Path, taqasta_yaml: &str, canasta_yaml: &str) {
    let fetcher = Fetcher::new(cache_dir).unwrap();
    // The seeded Taqasta manifests carry no version key, so the fetcher
    // routes to the default 1.43 revisions file.
    std::fs::write(
        fetcher.cache_path(TAQASTA_REPO, "master", TAQASTA_VALUES_FILE),
        taqasta_yaml,
    )
    .unwrap();
    std::fs::write(
        fetcher.cache_path(CANASTA_REPO, "main", "1.43.yaml"),
        canasta_yaml,
    )
    .unwrap();
}

#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--help").assert().code(0);
}

#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--version").assert().code(0);
}

#[test]
fn test_exit_code_usage_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--unknown-flag-that-does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_exit_code_error_unusable_cache_dir() {
    let temp = assert_fs::TempDir::new().unwrap();
    let blocker = temp.child("blocker");
    blocker.write_str("not a directory").unwrap();

    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--cache-dir")
        .arg(blocker.path().join("cache"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to compare YAML files:"));
}

#[test]
fn test_compare_from_seeded_cache() {
    let temp = assert_fs::TempDir::new().unwrap();
    seed_cache(
        temp.path(),
        "extensions:\n- Ext1:\n    commit: abc123\n",
        "extensions:\n- Ext1:\n    commit: def456\n",
    );

    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--cache-dir")
        .arg(temp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Comparing Taqasta (master) vs Canasta (main)",
        ))
        .stdout(predicate::str::contains("MediaWiki Version: 1.43"))
        .stdout(predicate::str::contains("~ Ext1:"))
        .stdout(predicate::str::contains("Taqasta commit: abc123"))
        .stdout(predicate::str::contains("Canasta commit: def456"));
}

#[test]
fn test_identical_manifests_report_no_differences() {
    let temp = assert_fs::TempDir::new().unwrap();
    let manifest = "extensions:\n- Ext1:\n    commit: abc123\n";
    seed_cache(temp.path(), manifest, manifest);

    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--cache-dir")
        .arg(temp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No differences found!"));
}

#[test]
fn test_output_flag_writes_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let manifest = "extensions:\n- Ext1:\n    commit: abc123\n";
    seed_cache(temp.path(), manifest, manifest);
    let output = temp.child("out/diff.txt");

    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.arg("--cache-dir")
        .arg(temp.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Diff saved to"));

    output.assert(predicate::str::contains("No differences found!"));
}

#[test]
fn test_cache_dir_env_variable() {
    let temp = assert_fs::TempDir::new().unwrap();
    let manifest = "extensions:\n- Ext1:\n    commit: abc123\n";
    seed_cache(temp.path(), manifest, manifest);

    let mut cmd = cargo_bin_cmd!("canasta-diff");
    cmd.env("CANASTA_DIFF_CACHE", temp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No differences found!"));
}
