//! Validation of values that arrive without a prompt (flags, config, positional).

use crate::core::flags::flag_name;
use crate::core::machine::PromptState;
use crate::core::value::Value;
use crate::error::WizardError;

/// Check a supplied value against the state's rules.
///
/// Returns the value to record, normalised to the state's kind (confirm states
/// accept `true`/`false`/`yes`/`no` strings from config files).
pub fn validate_provided(id: &str, state: &PromptState, value: &Value) -> Result<Value, WizardError> {
    let flag = flag_name(id);
    match state {
        PromptState::Text(text) => {
            let Value::Text(candidate) = value else {
                return Err(WizardError::validation(
                    id,
                    format!("{flag}: expected a string value"),
                ));
            };
            if let Some(message) = text.check(Some(candidate.as_str())) {
                return Err(WizardError::validation(id, format!("{flag}: {message}")));
            }
            Ok(value.clone())
        }
        PromptState::Select(select) => match value {
            Value::Text(choice) if select.has_option(choice) => Ok(value.clone()),
            _ => {
                let valid: Vec<&str> = select.option_values().collect();
                Err(WizardError::validation(
                    id,
                    format!("{flag}: must be one of {}", valid.join(", ")),
                ))
            }
        },
        PromptState::Confirm(_) => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::Text(raw) => parse_bool(raw).map(Value::Bool).ok_or_else(|| {
                WizardError::validation(id, format!("{flag}: expected true or false, got '{raw}'"))
            }),
        },
    }
}

/// Resolve a prompt value without asking anyone.
///
/// Precedence: supplied value (validated), declared default, `false` for
/// confirm states. Text and select states with neither fail; the message
/// depends on whether defaults were explicitly requested.
pub fn settle_value(
    id: &str,
    state: &PromptState,
    provided: Option<&Value>,
    accept_defaults: bool,
) -> Result<Value, WizardError> {
    if let Some(value) = provided {
        return validate_provided(id, state, value);
    }
    if let Some(default) = state.default_value() {
        return Ok(default);
    }
    match state {
        PromptState::Confirm(_) => Ok(Value::Bool(false)),
        PromptState::Text(_) | PromptState::Select(_) => {
            let flag = flag_name(id);
            let reason = if accept_defaults {
                format!("no default for {flag}")
            } else {
                format!("missing required flag {flag}")
            };
            Err(WizardError::validation(id, reason))
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
