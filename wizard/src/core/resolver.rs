//! Deterministic transition resolution shared by every walker.

use crate::core::machine::{PromptState, TaskState};
use crate::core::value::{StateId, Value};

/// Outcome of a task effect, as far as routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Ok,
    Err,
}

/// Next state after a prompt produced `value`, or `None` when the flow ends.
///
/// A value of the wrong kind for a dynamic route ends the flow.
pub fn resolve_next(state: &PromptState, value: &Value) -> Option<StateId> {
    match (state, value) {
        (PromptState::Text(text), Value::Text(text_value)) => text.next.resolve(text_value),
        (PromptState::Select(select), Value::Text(choice)) => select.next.resolve(choice),
        (PromptState::Confirm(confirm), Value::Bool(flag)) => confirm.next.resolve(flag),
        (PromptState::Text(text), Value::Bool(_)) => text.next.fixed_target().map(str::to_string),
        (PromptState::Select(select), Value::Bool(_)) => {
            select.next.fixed_target().map(str::to_string)
        }
        (PromptState::Confirm(confirm), Value::Text(_)) => {
            confirm.next.fixed_target().map(str::to_string)
        }
    }
}

/// Next state after a task finished with `outcome`.
pub fn resolve_task_next(state: &TaskState, outcome: TaskOutcome) -> Option<&str> {
    match outcome {
        TaskOutcome::Ok => state.next.ok.as_deref(),
        TaskOutcome::Err => state.next.err.as_deref(),
    }
}
