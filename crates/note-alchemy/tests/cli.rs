//! CLI smoke tests that exercise the `alchemist` binary end to end
//! for the commands that need no model provider.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn alchemist_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("alchemist");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let vault_dir = root.join("vault");
    fs::create_dir_all(&vault_dir).unwrap();
    fs::write(
        vault_dir.join("alpha.md"),
        "# Alpha\n\nA note about cats and mammal taxonomy.",
    )
    .unwrap();
    fs::write(
        vault_dir.join("beta.md"),
        "# Beta\n\nA note about rocks and minerals.",
    )
    .unwrap();

    let config_content = format!(
        r#"[vault]
root = "{root}/vault"

[db]
path = "{root}/data/alchemy.sqlite"

[retrieval]
candidate_k = 25
context_k = 5
"#,
        root = root.display()
    );

    let config_path = root.join("alchemy.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_alchemist(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = alchemist_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run alchemist binary at {:?}: {}", binary, e));

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn init_creates_database() {
    let (tmp, config_path) = setup_test_env();
    let (stdout, stderr, ok) = run_alchemist(&config_path, &["init"]);
    assert!(ok, "init failed: {}", stderr);
    assert!(stdout.contains("Initialized"), "stdout: {}", stdout);
    assert!(tmp.path().join("data/alchemy.sqlite").exists());
}

#[test]
fn init_is_idempotent() {
    let (_tmp, config_path) = setup_test_env();
    assert!(run_alchemist(&config_path, &["init"]).2);
    assert!(run_alchemist(&config_path, &["init"]).2);
}

#[test]
fn stats_on_empty_index() {
    let (_tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    let (stdout, stderr, ok) = run_alchemist(&config_path, &["stats"]);
    assert!(ok, "stats failed: {}", stderr);
    assert!(stdout.contains("documents:     0"), "stdout: {}", stdout);
}

#[test]
fn search_on_empty_index_reports_no_results() {
    let (_tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    let (stdout, _, ok) = run_alchemist(&config_path, &["search", "mammal"]);
    assert!(ok);
    assert!(stdout.contains("No results."));
}

#[test]
fn get_missing_document_is_not_an_error() {
    let (_tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    let (stdout, _, ok) = run_alchemist(&config_path, &["get", "vault/none.md"]);
    assert!(ok);
    assert!(stdout.contains("Document not found"));
}

#[test]
fn delete_missing_document_is_not_an_error() {
    let (_tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    let (_, _, ok) = run_alchemist(&config_path, &["delete", "vault/none.md"]);
    assert!(ok);
}

#[test]
fn index_without_model_counts_failures_per_file() {
    let (_tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    // With the disabled provider each file fails fingerprinting, but the
    // scan itself completes.
    let (stdout, stderr, ok) = run_alchemist(&config_path, &["index"]);
    assert!(ok, "index failed: {}", stderr);
    assert!(stdout.contains("scanned: 2"), "stdout: {}", stdout);
    assert!(stdout.contains("failed:  2"), "stdout: {}", stdout);
}

#[test]
fn process_without_model_fails_with_guidance() {
    let (tmp, config_path) = setup_test_env();
    run_alchemist(&config_path, &["init"]);
    let article = tmp.path().join("article.txt");
    fs::write(&article, "an article").unwrap();
    let (_, stderr, ok) =
        run_alchemist(&config_path, &["process", article.to_str().unwrap()]);
    assert!(!ok);
    assert!(stderr.contains("model provider"), "stderr: {}", stderr);
}
