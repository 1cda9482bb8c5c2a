//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the personaweb binary
fn engine_cmd() -> Command {
    Command::cargo_bin("personaweb").unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    engine_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PersonaWeb Engine"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("decide"))
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    engine_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("personaweb"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_short_version_flag() {
    engine_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("personaweb"));
}

// ─────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_default() {
    engine_cmd()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("[engine]"))
        .stdout(predicate::str::contains("[timing]"))
        .stdout(predicate::str::contains("[session]"))
        .stdout(predicate::str::contains("[logging]"));
}

#[test]
fn test_config_validate_default() {
    // Default config should always be valid
    engine_cmd()
        .arg("config")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_missing_file() {
    engine_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg("/nonexistent/personaweb.toml")
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E100"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("engine.toml");

    engine_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    assert!(path.exists());

    // A second init without --force must refuse
    engine_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ─────────────────────────────────────────────────────────────────
// Persona Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_persona_list() {
    engine_cmd()
        .arg("persona")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("buy_now"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("gaming"))
        .stdout(predicate::str::contains("budget"));
}

#[test]
fn test_persona_show() {
    engine_cmd()
        .arg("persona")
        .arg("show")
        .arg("gaming")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gamer"))
        .stdout(predicate::str::contains("dark"));
}

#[test]
fn test_persona_show_html() {
    engine_cmd()
        .arg("persona")
        .arg("show")
        .arg("budget")
        .arg("--html")
        .assert()
        .success()
        .stdout(predicate::str::contains("data-template=\"budget\""))
        .stdout(predicate::str::contains("pw-countdown"));
}

#[test]
fn test_persona_show_unknown() {
    engine_cmd()
        .arg("persona")
        .arg("show")
        .arg("whale")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────
// Decide Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_decide_with_forced_persona() {
    engine_cmd()
        .arg("decide")
        .arg("--url")
        .arg("https://shop.example/?persona=gaming")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"persona\":\"gaming\""))
        .stdout(predicate::str::contains("\"confidence\":99"))
        .stdout(predicate::str::contains("Persona override"));
}

#[test]
fn test_decide_scores_page_content() {
    engine_cmd()
        .arg("decide")
        .arg("--title")
        .arg("Compare the best 4K monitors")
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"persona\": \"compare\""));
}

#[test]
fn test_decide_direct_visit() {
    engine_cmd()
        .arg("decide")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"persona\":\"buy_now\""))
        .stdout(predicate::str::contains("referrer -> direct"));
}

// ─────────────────────────────────────────────────────────────────
// Run Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_run_quits_on_q() {
    engine_cmd()
        .arg("run")
        .arg("--url")
        .arg("https://shop.example/?persona=budget")
        .env("PERSONAWEB_SHIMMER_MS", "0")
        .env("PERSONAWEB_FADE_MS", "0")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("BUDGET"));
}

#[test]
fn test_run_writes_html_out() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("hero.html");

    engine_cmd()
        .arg("run")
        .arg("--url")
        .arg("https://shop.example/?persona=compare")
        .arg("--html-out")
        .arg(path.to_str().unwrap())
        .env("PERSONAWEB_SHIMMER_MS", "0")
        .env("PERSONAWEB_FADE_MS", "0")
        .write_stdin("q\n")
        .assert()
        .success();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("data-template=\"compare\""));
    assert!(html.contains("pw-specs"));
}
