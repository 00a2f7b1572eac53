//! Binary-level tests for `ptg`.
//!
//! None of these reach a hosted provider: every case fails during
//! configuration, before the first request, or against a closed local port.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn ptg(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ptg");
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("PTG_DEFAULTS__PROVIDER")
        .env_remove("PTG_DEFAULTS__PROJECT");
    cmd
}

fn write_config(dir: &TempDir, extra: &str) {
    let root = dir.path().join("Demo");
    fs::create_dir_all(root.join("src/main/ets/pages")).unwrap();
    fs::write(
        root.join("main_pages.json"),
        r#"{"src": ["pages/Index"]}"#,
    )
    .unwrap();
    fs::write(
        root.join("src/main/ets/pages/Index.ets"),
        "@Entry @Component struct Index { build() {} }",
    )
    .unwrap();

    let config = format!(
        "[projects.Demo]\nproject_name = \"Demo\"\nproject_path = {:?}\nmain_pages_path = {:?}\n\n{extra}",
        root.display().to_string(),
        root.join("main_pages.json").display().to_string(),
    );
    fs::write(dir.path().join("ptg.toml"), config).unwrap();
}

#[test]
fn test_help_describes_the_tool() {
    let dir = TempDir::new().unwrap();
    ptg(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("page transition graph"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_unknown_provider() {
    let dir = TempDir::new().unwrap();
    ptg(&dir)
        .args(["--openai", "Demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider"))
        .stderr(predicate::str::contains("openai"));
}

#[test]
fn test_unknown_project() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "");
    ptg(&dir)
        .args(["deepseek", "Elsewhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown project"))
        .stderr(predicate::str::contains("Demo"));
}

#[test]
fn test_project_defaults_to_fixed_name() {
    let dir = TempDir::new().unwrap();
    ptg(&dir)
        .arg("deepseek")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown project \"HarmoneyOpenEye\""));
}

#[test]
fn test_missing_api_key_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "");
    ptg(&dir)
        .args(["--GLM", "--demo"])
        .env_remove("GLM_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing env GLM_API_KEY"));

    assert!(!dir.path().join("result").exists());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    ptg(&dir)
        .args(["--config", "missing.toml", "deepseek", "Demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));

    ptg(&dir)
        .args(["-cmissing.toml", "deepseek", "Demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_short_flag_cluster_is_not_a_provider() {
    let dir = TempDir::new().unwrap();
    ptg(&dir)
        .arg("-vq")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"))
        .stderr(predicate::str::contains("Unknown provider").not());
}

#[test]
fn test_api_key_is_read_from_dotenv() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "[providers.deepseek]\nbase_url = \"http://127.0.0.1:9\"\n\n[traversal]\non_extractor_error = \"abort\"\n",
    );
    fs::write(dir.path().join(".env"), "DEEPSEEK_API_KEY=sk-from-dotenv\n").unwrap();

    ptg(&dir)
        .args(["deepseek", "Demo"])
        .env_remove("DEEPSEEK_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing env").not())
        .stderr(predicate::str::contains("Navigation extraction failed"));
}

#[test]
fn test_workflow_reports_missing_source_root() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "");
    fs::remove_dir_all(dir.path().join("Demo/src")).unwrap();
    fs::write(dir.path().join(".env"), "GLM_API_KEY=from-dotenv\n").unwrap();

    ptg(&dir)
        .args(["--workflow", "--glm", "Demo", "--no-preprocess"])
        .env_remove("GLM_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory does not exist"));

    assert!(!dir.path().join("prompt").exists());
    assert!(!dir.path().join("result").exists());
}

#[test]
fn test_workflow_needs_the_provider_key() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "");
    ptg(&dir)
        .args(["workflow", "doubao", "Demo"])
        .env_remove("DOUBAO_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing env DOUBAO_API_KEY"));
}

#[test]
fn test_unreachable_ollama_is_reported() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        "[providers.local]\nkind = \"ollama\"\nbase_url = \"http://127.0.0.1:9\"\nmodel = \"llama3.2:3b\"\n",
    );
    ptg(&dir)
        .args(["local", "Demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach completion service"));
}
