//! Values produced by prompt states and the maps that carry them.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Identifier of a state inside a machine (e.g. `projectName`).
pub type StateId = String;

/// A value produced at a prompt state.
///
/// Text and select states produce strings, confirm states produce booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Values produced by a run, keyed by prompt state id in visitation order.
pub type Output = IndexMap<StateId, Value>;

/// Values known before a run starts (flags, config, positional argument).
pub type Prefill = IndexMap<StateId, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_serializes_untagged() {
        let mut output = Output::new();
        output.insert("name".to_string(), Value::from("demo"));
        output.insert("git".to_string(), Value::from(false));
        let json = serde_json::to_string(&output).expect("serialize");
        assert_eq!(json, r#"{"name":"demo","git":false}"#);
    }
}
