//! Generated `--help` text.

use crate::core::flags::{camel_to_kebab, flag_name};
use crate::core::machine::{Machine, PromptState};

const FIXED_FLAGS: [(&str, &str); 4] = [
    (
        "--config <json|yaml|file>",
        "Load values from an inline JSON/YAML document or a file",
    ),
    ("--schema", "Print the JSON Schema for the inputs and exit"),
    ("-y, --yes", "Accept defaults without prompting"),
    ("-h, --help", "Show this help"),
];

/// Render usage for `tool`: one option line per prompt state, then the fixed flags.
pub fn usage(machine: &Machine, tool: &str, description: Option<&str>) -> String {
    let mut lines = Vec::new();
    if let Some(description) = description {
        lines.push(description.to_string());
        lines.push(String::new());
    }
    lines.push("Usage:".to_string());
    match machine.positional() {
        Some(id) => lines.push(format!("  {tool} [{}] [options]", camel_to_kebab(id))),
        None => lines.push(format!("  {tool} [options]")),
    }
    lines.push(String::new());
    lines.push("Options:".to_string());

    let mut rows: Vec<(String, String)> = machine
        .prompts()
        .map(|(id, prompt)| (option_column(id, prompt), describe(prompt)))
        .collect();
    rows.extend(
        FIXED_FLAGS
            .iter()
            .map(|(flag, help)| (flag.to_string(), help.to_string())),
    );

    let width = rows.iter().map(|(flag, _)| flag.len()).max().unwrap_or(0);
    for (flag, help) in rows {
        lines.push(format!("  {flag:<width$}  {help}"));
    }
    lines.join("\n")
}

fn option_column(id: &str, prompt: &PromptState) -> String {
    let flag = flag_name(id);
    match prompt {
        PromptState::Text(_) => format!("{flag} <string>"),
        PromptState::Select(select) => {
            let values: Vec<&str> = select.option_values().collect();
            format!("{flag} <{}>", values.join("|"))
        }
        PromptState::Confirm(_) => flag,
    }
}

fn describe(prompt: &PromptState) -> String {
    match prompt.default_value() {
        Some(default) => format!("{} (default: {default})", prompt.message()),
        None => prompt.message().to_string(),
    }
}
