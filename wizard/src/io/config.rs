//! Config documents supplied through `--config`.
//!
//! The argument is either a path (`.json`, `.yaml`/`.yml`, `.toml`) or an inline
//! document: `{...}` is read as JSON, anything else as YAML. Only string and
//! boolean members become prefill values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value as Json;
use tracing::{debug, warn};

use crate::core::flags::kebab_to_camel;
use crate::core::machine::Machine;
use crate::core::value::{Prefill, Value};
use crate::error::WizardError;

/// Pseudo state id used when a config document is at fault.
pub const CONFIG_SOURCE: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
        }
    }
}

/// Load the `--config` argument into prefill values.
///
/// Keys may be state ids (`projectName`) or flag names (`project-name`). A key
/// naming one of `machine`'s states is taken as is.
pub fn load_config_arg(machine: &Machine, raw: &str) -> Result<Prefill, WizardError> {
    let document = read_document(raw)
        .map_err(|err| WizardError::validation(CONFIG_SOURCE, format!("--config: {err:#}")))?;
    to_prefill(machine, document)
}

fn read_document(raw: &str) -> Result<Json> {
    if let Some(format) = file_format(raw) {
        let path = Path::new(raw);
        debug!(path = %path.display(), format = format.name(), "reading config file");
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        return parse(&contents, format).with_context(|| format!("parse {}", path.display()));
    }
    let trimmed = raw.trim();
    let format = if trimmed.starts_with('{') && trimmed.ends_with('}') {
        Format::Json
    } else {
        Format::Yaml
    };
    parse(trimmed, format)
}

fn file_format(raw: &str) -> Option<Format> {
    if raw.ends_with(".json") {
        Some(Format::Json)
    } else if raw.ends_with(".yaml") || raw.ends_with(".yml") {
        Some(Format::Yaml)
    } else if raw.ends_with(".toml") {
        Some(Format::Toml)
    } else {
        None
    }
}

fn parse(text: &str, format: Format) -> Result<Json> {
    let parsed = match format {
        Format::Json => serde_json::from_str(text).map_err(anyhow::Error::from),
        Format::Yaml => serde_yaml::from_str(text).map_err(anyhow::Error::from),
        Format::Toml => toml::from_str(text).map_err(anyhow::Error::from),
    };
    parsed.map_err(|err| anyhow!("invalid {}: {err}", format.name()))
}

fn to_prefill(machine: &Machine, document: Json) -> Result<Prefill, WizardError> {
    let members = match document {
        Json::Object(members) => members,
        other => {
            return Err(WizardError::validation(
                CONFIG_SOURCE,
                format!("--config: expected an object, got {}", kind(&other)),
            ));
        }
    };
    let mut prefill = Prefill::new();
    for (key, value) in members {
        let id = if key.contains('-') && machine.get(&key).is_none() {
            kebab_to_camel(&key)
        } else {
            key
        };
        match value {
            Json::String(text) => {
                prefill.insert(id, Value::Text(text));
            }
            Json::Bool(flag) => {
                prefill.insert(id, Value::Bool(flag));
            }
            other => warn!(key = %id, kind = kind(&other), "ignoring non-string config value"),
        }
    }
    Ok(prefill)
}

fn kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
