//! End-to-end tests for the docsmith binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn docsmith() -> Command {
    Command::cargo_bin("docsmith").expect("binary built")
}

/// Lay out a minimal valid documentation project.
fn make_project(root: &Path) {
    fs::write(root.join("config.json"), r#"{"title": "Demo Docs"}"#).unwrap();
    fs::create_dir_all(root.join("assets/css")).unwrap();
    fs::write(root.join("assets/css/site.css"), "body {}").unwrap();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/site.json"), r#"{"name": "Demo"}"#).unwrap();
}

#[test]
fn help_exits_zero_without_touching_context() {
    docsmith()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--example"))
        .stdout(predicate::str::contains("clean, build, lint, or watch"));
}

#[test]
fn version_exits_zero() {
    docsmith()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docsmith"));
}

#[test]
fn unknown_example_fails_with_exit_one() {
    let tmp = TempDir::new().unwrap();
    docsmith()
        .current_dir(tmp.path())
        .args(["build", "--example", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no example named 'nope'"));
}

#[test]
fn invalid_environment_fails_with_exit_one() {
    let tmp = TempDir::new().unwrap();
    docsmith()
        .current_dir(tmp.path())
        .args(["build", "--env", "staging"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid environment 'staging'"));
}

#[test]
fn build_writes_dist_artifacts() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    docsmith()
        .current_dir(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build finished!"));

    let dist = tmp.path().join("dist");
    assert!(dist.join("build-manifest.json").exists());
    assert!(dist.join("assets/css/site.css").exists());
    assert!(dist.join("data.json").exists());
}

#[test]
fn missing_action_defaults_to_build() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    docsmith().current_dir(tmp.path()).assert().success();

    assert!(tmp.path().join("dist/build-manifest.json").exists());
}

#[test]
fn action_priority_order_decides_between_tokens() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    // lint comes first on the command line, but build outranks it.
    docsmith()
        .current_dir(tmp.path())
        .args(["lint", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build finished!"));
}

#[test]
fn clean_removes_generated_output() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    docsmith().current_dir(tmp.path()).arg("build").assert().success();
    assert!(tmp.path().join("dist").exists());

    docsmith()
        .current_dir(tmp.path())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed:"));

    assert!(!tmp.path().join("dist").exists());
    assert!(!tmp.path().join(".tmp").exists());
}

#[test]
fn lint_failure_exits_one() {
    let tmp = TempDir::new().unwrap();

    docsmith()
        .current_dir(tmp.path())
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn pipeline_error_exits_one() {
    let tmp = TempDir::new().unwrap();
    // A config file that is not valid JSON fails the build's config merge.
    fs::write(tmp.path().join("config.json"), "{ nope").unwrap();
    fs::create_dir_all(tmp.path().join("assets")).unwrap();
    fs::create_dir_all(tmp.path().join("data")).unwrap();

    docsmith()
        .current_dir(tmp.path())
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn quiet_suppresses_banner_and_context_dump() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    let output = docsmith()
        .current_dir(tmp.path())
        .args(["build", "--quiet"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(!stdout.contains("docsmith v"));
    assert!(!stdout.contains("config "));
    // The summary block still prints.
    assert!(stdout.contains("Build finished!"));
}

#[test]
fn banner_dumps_context_in_canonical_order() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());

    let output = docsmith()
        .current_dir(tmp.path())
        .arg("build")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let positions: Vec<usize> = ["config", "assets", "data", "dist", "temp", "env"]
        .iter()
        .map(|field| stdout.find(&format!("  {field}")).expect("field in dump"))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn comma_separated_config_list_merges_in_order() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());
    fs::write(
        tmp.path().join("extra.json"),
        r#"{"title": "Override", "toc": true}"#,
    )
    .unwrap();

    docsmith()
        .current_dir(tmp.path())
        .args(["build", "--config", "config.json,extra.json"])
        .assert()
        .success();

    let manifest =
        fs::read_to_string(tmp.path().join("dist/build-manifest.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    // Later config files win on key collision.
    assert_eq!(manifest["settings"]["title"], "Override");
    assert_eq!(manifest["settings"]["toc"], true);
}

#[test]
fn workspace_config_file_layers_under_cli_flags() {
    let tmp = TempDir::new().unwrap();
    make_project(tmp.path());
    fs::write(
        tmp.path().join("docsmith.toml"),
        "[defaults]\ndist = \"./public\"\n",
    )
    .unwrap();

    docsmith().current_dir(tmp.path()).arg("build").assert().success();
    assert!(tmp.path().join("public/build-manifest.json").exists());

    // A CLI flag still overrides the file value.
    docsmith()
        .current_dir(tmp.path())
        .args(["build", "--dist", "./out"])
        .assert()
        .success();
    assert!(tmp.path().join("out/build-manifest.json").exists());
}
