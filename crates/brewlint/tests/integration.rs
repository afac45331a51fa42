//! End-to-end CLI integration tests for the `brewlint` binary.
//!
//! Each test lays out formula files in its own temporary directory and runs
//! the binary as a subprocess via `assert_cmd`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// sha256 of the bytes `hello`.
const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Build a `Command` targeting the cargo-built `brewlint` binary.
fn brewlint() -> Command {
    let mut cmd = Command::cargo_bin("brewlint").unwrap();
    cmd.env_remove("BREWLINT_CONFIG").env("NO_COLOR", "1");
    cmd
}

fn formula(version: &str, sha: &str, target: &str, test_arg: &str) -> String {
    format!(
        r##"class Morama < Formula
  desc "A CLI tool for managing your watched movies and dramas"
  homepage "https://github.com/kiku99/morama"
  url "https://github.com/kiku99/morama/archive/refs/tags/{version}.tar.gz"
  sha256 "{sha}"
  version "{version}"
  license "MIT"

  depends_on "go" => :build

  def install
    system "go", "build", *std_go_args(ldflags: "-s -w"), "{target}"
  end

  test do
    system "#{{bin}}/morama", "{test_arg}"
  end
end
"##
    )
}

fn valid_formula(version: &str) -> String {
    formula(version, HELLO_SHA256, ".", "version")
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// The two published variants of the same release: placeholder checksums and
/// different build targets.
fn divergent_tap() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "Formula/morama.rb",
        &formula("v1.0.0", &"0".repeat(64), ".", "version"),
    );
    write(
        tmp.path(),
        "internal/formula/morama.rb",
        &formula("v1.0.0", "YOUR_TARBALL_SHA256", "./cmd/morama", "--version"),
    );
    tmp
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_clean_formula_succeeds() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Formula/morama.rb", &valid_formula("v1.0.0"));

    brewlint()
        .args(["validate", "Formula"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Formula/morama.rb"))
        .stdout(predicate::str::contains("0 violation(s)"));
}

#[test]
fn validate_reports_every_problem() {
    let tmp = divergent_tap();

    brewlint()
        .args(["validate", "Formula", "internal"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("checksum_format_invalid").count(2))
        .stdout(predicate::str::contains("conflicting_duplicate"))
        .stdout(predicate::str::contains("3 violation(s)"))
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn validate_json_output() {
    let tmp = divergent_tap();

    let output = brewlint()
        .args(["validate", "--json", "Formula", "internal"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["files"], 2);
    assert_eq!(json["violations"], 3);
    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    let conflict = &records[1]["errors"][1];
    assert_eq!(conflict["kind"], "conflicting_duplicate");
    assert_eq!(conflict["other"], "Formula/morama.rb");
    let fields: Vec<&str> = conflict["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(fields.contains(&"install"));
    assert!(fields.contains(&"test"));
}

#[test]
fn validate_reports_parse_errors_and_continues() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Formula/good.rb", &valid_formula("v1.0.0"));
    write(
        tmp.path(),
        "Formula/broken.rb",
        "class Broken < Formula\n  desc \"x\"\n  bottle :unneeded\nend\n",
    );

    brewlint()
        .args(["validate", "Formula"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Formula/broken.rb"))
        .stdout(predicate::str::contains("line 3: unsupported statement"))
        .stdout(predicate::str::contains("Formula/good.rb"))
        .stdout(predicate::str::contains("1 parse error(s)"));
}

#[test]
fn validate_uses_configured_formula_dirs() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "brewlint.yaml", "formula-dirs: [taps]\n");
    write(tmp.path(), "taps/morama.rb", &valid_formula("v1.0.0"));
    fs::create_dir_all(tmp.path().join("sub")).unwrap();

    brewlint()
        .arg("validate")
        .current_dir(tmp.path().join("sub"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) checked"));
}

#[test]
fn validate_with_no_files_fails() {
    let tmp = TempDir::new().unwrap();
    brewlint()
        .arg("validate")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no formula files found"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    brewlint()
        .args(["validate", "--config", "nope.yaml"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

// ---------------------------------------------------------------------------
// show / render
// ---------------------------------------------------------------------------

#[test]
fn show_json_returns_record() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.rb", &valid_formula("v1.0.0"));

    let output = brewlint()
        .args(["show", "morama.rb", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "morama");
    assert_eq!(json["version"], "v1.0.0");
    assert_eq!(json["build_dependencies"][0], "go");
    assert_eq!(json["build_command"][2]["splat"], r#"std_go_args(ldflags: "-s -w")"#);
}

#[test]
fn render_is_canonical() {
    let tmp = TempDir::new().unwrap();
    let text = valid_formula("v1.0.0");
    write(tmp.path(), "morama.rb", &text);

    brewlint()
        .args(["render", "morama.rb"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(text);
}

#[test]
fn render_toml_parses_back() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.rb", &valid_formula("v1.0.0"));

    let output = brewlint()
        .args(["render", "morama.rb", "--format", "toml"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    fs::write(tmp.path().join("morama.formula.toml"), &output.stdout).unwrap();

    brewlint()
        .args(["render", "morama.formula.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(valid_formula("v1.0.0"));
}

// ---------------------------------------------------------------------------
// latest
// ---------------------------------------------------------------------------

#[test]
fn latest_picks_highest_version() {
    let tmp = TempDir::new().unwrap();
    for v in ["v1.0.6", "v1.1.0", "v1.0.0", "v1.0.5"] {
        write(tmp.path(), &format!("Formula/{}/morama.rb", v), &valid_formula(v));
    }

    let output = brewlint()
        .args(["latest", "Formula", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["version"], "v1.1.0");

    brewlint()
        .args(["latest", "Formula", "--name", "morama"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("v1.1.0"))
        .stdout(predicate::str::contains("v1.0.6").not());
}

#[test]
fn latest_unknown_package_fails() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Formula/morama.rb", &valid_formula("v1.0.0"));

    brewlint()
        .args(["latest", "Formula", "--name", "other"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no records found for package 'other'"));
}

// ---------------------------------------------------------------------------
// digest
// ---------------------------------------------------------------------------

#[test]
fn digest_of_archive() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.tar.gz", "hello");

    brewlint()
        .args(["digest", "morama.tar.gz"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(HELLO_SHA256));
}

#[test]
fn digest_against_formula() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.rb", &valid_formula("v1.0.0"));
    write(tmp.path(), "good.tar.gz", "hello");
    write(tmp.path(), "bad.tar.gz", "tampered");

    brewlint()
        .args(["digest", "good.tar.gz", "--against", "morama.rb"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("matches"));

    brewlint()
        .args(["digest", "bad.tar.gz", "--against", "morama.rb"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("checksum mismatch"));
}

// ---------------------------------------------------------------------------
// bump
// ---------------------------------------------------------------------------

#[test]
fn bump_writes_successor_record() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "Formula/morama.rb", &formula("v1.0.0", &"a".repeat(64), ".", "version"));
    write(tmp.path(), "v1.1.0.tar.gz", "hello");

    brewlint()
        .args([
            "bump",
            "Formula/morama.rb",
            "--to",
            "v1.1.0",
            "--archive",
            "v1.1.0.tar.gz",
            "-o",
            "next/morama.rb",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let written = fs::read_to_string(tmp.path().join("next/morama.rb")).unwrap();
    assert_eq!(written, valid_formula("v1.1.0"));

    // The superseded record is untouched.
    let old = fs::read_to_string(tmp.path().join("Formula/morama.rb")).unwrap();
    assert!(old.contains("v1.0.0"));
}

#[test]
fn bump_refuses_to_overwrite_input() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.rb", &valid_formula("v1.0.0"));

    brewlint()
        .args([
            "bump", "morama.rb", "--to", "v1.1.0", "--sha256", HELLO_SHA256, "-o", "morama.rb",
            "--force",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
fn bump_to_same_version_fails() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "morama.rb", &valid_formula("v1.0.0"));

    brewlint()
        .args(["bump", "morama.rb", "--to", "v1.0.0", "--sha256", HELLO_SHA256])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already at version"));
}

// ---------------------------------------------------------------------------
// version / completion
// ---------------------------------------------------------------------------

#[test]
fn version_prints_tool_version() {
    brewlint()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("brewlint version"));
}

#[test]
fn completion_generates_script() {
    brewlint()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brewlint"));
}
