//! CLI tests for `create-starter`.
//!
//! Spawns the binary with stdin closed so every run is headless, and checks
//! exit codes, stdout and the generated files.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use wizard::exit_codes;

fn create_starter(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_create-starter"))
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .env_remove("RUST_LOG")
        .output()
        .expect("run create-starter")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn schema_prints_json_and_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = create_starter(temp.path(), &["--schema"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let schema: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("schema json");
    assert_eq!(schema["$schema"], "https://json-schema.org/draft-07/schema");
    assert_eq!(schema["x-cli"]["flags"]["git"], "--git");
    assert!(schema["properties"].get("scaffold").is_none());
}

#[test]
fn help_lists_every_question() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = create_starter(temp.path(), &["--help"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let text = stdout(&output);
    assert!(text.starts_with("Scaffold a new Rust or TypeScript project"));
    assert!(text.contains("create-starter [name] [options]"));
    assert!(text.contains("--language <rust|typescript>"));
    assert!(text.contains("(default: rust)"));
}

#[test]
fn headless_run_scaffolds_the_project() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = create_starter(temp.path(), &["demo", "--language", "typescript"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Created demo. Next: cd demo");

    let project = temp.path().join("demo");
    assert!(project.join("README.md").is_file());
    assert!(project.join("package.json").is_file());
    assert!(project.join("src/index.ts").is_file());
    assert!(!project.join("Cargo.toml").exists());
}

#[test]
fn config_values_fill_in_for_missing_flags() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("answers.yaml");
    std::fs::write(&config, "name: from-config\nlanguage: rust\n").expect("write config");

    let output = create_starter(temp.path(), &["--config", "answers.yaml"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
    assert!(temp.path().join("from-config/Cargo.toml").is_file());
}

#[test]
fn missing_name_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = create_starter(temp.path(), &[]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stderr(&output).contains("missing required flag --name"));

    let output = create_starter(temp.path(), &["--yes"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stderr(&output).contains("no default for --name"));
}

#[test]
fn invalid_values_are_rejected_before_scaffolding() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = create_starter(temp.path(), &["Bad Name"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stderr(&output).contains("--name:"));

    let output = create_starter(temp.path(), &["demo", "--language", "go"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stderr(&output).contains("--language: must be one of rust, typescript"));
    assert!(!temp.path().join("demo").exists());
}

#[test]
fn names_outside_the_working_directory_are_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let work = temp.path().join("work");
    std::fs::create_dir(&work).expect("mkdir");

    let output = create_starter(&work, &["../escaped", "-y"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(stderr(&output).contains("must be a path inside the current directory"));
    assert!(!temp.path().join("escaped").exists());

    let output = create_starter(&work, &["--name", "/tmp/escaped", "-y"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn existing_directory_fails_the_task() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(temp.path().join("demo")).expect("mkdir");

    let output = create_starter(temp.path(), &["demo", "-y"]);
    assert_eq!(output.status.code(), Some(exit_codes::TASK_FAILED));
    assert!(stderr(&output).contains("task 'scaffold' failed"));
    assert!(stderr(&output).contains("already exists"));
}
