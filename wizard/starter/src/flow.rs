//! The question flow: name, language, git, then the scaffold task.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use wizard::{DefinitionError, Machine, Output, SelectOption, State, TaskContext};

use crate::scaffold::scaffold;

pub const TOOL: &str = "create-starter";
pub const DESCRIPTION: &str = "Scaffold a new Rust or TypeScript project";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9@/_.-]+$").expect("name pattern is valid"));

/// Reject empty names, names that are not valid package names, and names that
/// would place the project outside the working directory.
pub fn validate_name(value: Option<&str>) -> Option<String> {
    let name = value.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Some("Project name is required".to_string());
    }
    if !NAME_RE.is_match(name) {
        return Some(format!(
            "'{name}' may only contain lowercase letters, digits and @ / _ . -"
        ));
    }
    if name.starts_with('/') || name.split('/').any(|part| part == "." || part == "..") {
        return Some(format!("'{name}' must be a path inside the current directory"));
    }
    None
}

/// Build the flow. Projects are created under `root`.
pub fn machine(root: PathBuf) -> Result<Machine, DefinitionError> {
    Machine::builder("name")
        .state(
            "name",
            State::text("Project name")
                .placeholder("my-project")
                .positional()
                .validate(validate_name)
                .next("language"),
        )
        .state(
            "language",
            State::select(
                "Language",
                vec![
                    SelectOption::new("rust").label("Rust").hint("cargo"),
                    SelectOption::new("typescript").label("TypeScript").hint("npm"),
                ],
            )
            .default_value("rust")
            .next("git"),
        )
        .state(
            "git",
            State::confirm("Initialize a git repository?")
                .default_value(false)
                .next("scaffold"),
        )
        .state(
            "scaffold",
            State::task("Scaffolding project", move |ctx: TaskContext| {
                scaffold(root.clone(), ctx)
            }),
        )
        .build()
}

/// Closing message once the project exists.
pub fn outro(output: &Output) -> String {
    match output.get("name").and_then(|name| name.as_str()) {
        Some(name) => format!("Created {name}. Next: cd {name}"),
        None => "Done!".to_string(),
    }
}
