use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Runs against a config path that does not exist so the user's own config is never read
fn codeask(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codeask").unwrap();
    cmd.arg("-c")
        .arg(config_dir.join("none.toml"))
        .env_remove("CODEASK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules/lib")).unwrap();
    fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();
    fs::write(
        dir.path().join("src/index.ts"),
        "import { run } from './run';\nexport function main() {}\nconst x = 1;\n",
    )
    .unwrap();
    fs::write(dir.path().join("node_modules/lib/index.js"), "module.exports = 1;\n").unwrap();
    fs::write(dir.path().join(".env.local"), "SECRET=1\n").unwrap();
    dir
}

#[test]
fn analyze_prints_project_summary() {
    let project = sample_project();
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .arg("analyze")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Project Structure Summary:"))
        .stdout(predicate::str::contains("- README.md (md)"))
        .stdout(predicate::str::contains("+ src/"))
        .stdout(predicate::str::contains("  - index.ts (ts)"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains(".env.local").not());
}

#[test]
fn analyze_json_dumps_tree() {
    let project = sample_project();
    let home = TempDir::new().unwrap();

    let output = codeask(home.path())
        .arg("analyze")
        .arg(project.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = &tree["entries"];
    assert_eq!(entries["README.md"]["type"], "file");
    assert_eq!(entries["src"]["type"], "directory");
    assert_eq!(entries["src"]["entries"]["index.ts"]["extension"], ".ts");
    assert!(entries.get("node_modules").is_none());
}

#[test]
fn analyze_missing_root_fails() {
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .arg("analyze")
        .arg(home.path().join("does-not-exist"))
        .assert()
        .failure();
}

#[test]
fn context_embeds_question() {
    let project = sample_project();
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .arg("context")
        .arg(project.path())
        .args(["--question", "Where is main defined?"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Context:\nProject Structure Summary:"))
        .stdout(predicate::str::contains("Question: Where is main defined?"))
        .stdout(predicate::str::contains("```json files"));
}

#[test]
fn context_includes_current_file_digest() {
    let project = sample_project();
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .arg("context")
        .arg(project.path())
        .arg("--file")
        .arg(project.path().join("src/index.ts"))
        .args(["--question", "What does main do?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current File ("))
        .stdout(predicate::str::contains("export function main() {}"))
        .stdout(predicate::str::contains("const x = 1;").not());
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DIFY_API_KEY"))
        .stdout(predicate::str::contains("max_chars = 12000"));
}

#[test]
fn config_init_writes_file_once() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("codeask.toml");

    Command::cargo_bin("codeask")
        .unwrap()
        .arg("-c")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
    assert!(fs::read_to_string(&path).unwrap().contains("[scan]"));

    Command::cargo_bin("codeask")
        .unwrap()
        .arg("-c")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn ask_without_api_key_fails() {
    let project = sample_project();
    let home = TempDir::new().unwrap();

    codeask(home.path())
        .env_remove("DIFY_API_KEY")
        .arg("ask")
        .arg("What is this project?")
        .arg("--path")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("DIFY_API_KEY"));
}

#[test]
fn analyze_rejects_invalid_exclusion_pattern() {
    let project = sample_project();
    let home = TempDir::new().unwrap();
    let config = home.path().join("codeask.toml");
    fs::write(&config, "[scan]\nexcluded_file_patterns = [\"[z-a].txt\"]\n").unwrap();

    Command::cargo_bin("codeask")
        .unwrap()
        .arg("-c")
        .arg(&config)
        .arg("analyze")
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid exclusion pattern"));
}
