//! JSON Schema description of the inputs a machine accepts.

use serde_json::{Map, Value as Json, json};

use crate::core::flags::flag_name;
use crate::core::machine::{Machine, PromptState};

pub const SCHEMA_DRAFT: &str = "https://json-schema.org/draft-07/schema";

/// Describe every prompt state as a schema property.
///
/// Properties follow declaration order. The `x-cli` extension maps each id to
/// its flag and names the positional state, if any.
pub fn generate_schema(machine: &Machine) -> Json {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut flags = Map::new();
    let mut positional = None;

    for (id, prompt) in machine.prompts() {
        flags.insert(id.to_string(), Json::String(flag_name(id)));
        let property = match prompt {
            PromptState::Text(text) => {
                let mut property = json!({
                    "type": "string",
                    "description": text.message,
                });
                match &text.default {
                    Some(default) => {
                        property["default"] = json!(default);
                    }
                    None => required.push(Json::String(id.to_string())),
                }
                if text.positional {
                    positional = Some(id);
                }
                property
            }
            PromptState::Select(select) => {
                let values: Vec<&str> = select.option_values().collect();
                let mut property = json!({
                    "type": "string",
                    "enum": values,
                    "description": select.message,
                });
                if let Some(default) = &select.default {
                    property["default"] = json!(default);
                }
                property
            }
            PromptState::Confirm(confirm) => json!({
                "type": "boolean",
                "description": confirm.message,
                "default": confirm.default.unwrap_or(false),
            }),
        };
        properties.insert(id.to_string(), property);
    }

    let mut x_cli = json!({ "flags": flags });
    if let Some(id) = positional {
        x_cli["positional"] = json!(id);
    }

    json!({
        "$schema": SCHEMA_DRAFT,
        "type": "object",
        "properties": properties,
        "required": required,
        "x-cli": x_cli,
    })
}
