//! Side-effect-free walks over the prompt states of a machine.
//!
//! Task states are passed through along their `ok` branch without running the
//! effect, so a dry run never touches the outside world.

use crate::core::machine::{Machine, PromptState, State};
use crate::core::resolver::resolve_next;
use crate::core::validate::{settle_value, validate_provided};
use crate::core::value::{Output, Prefill, Value};
use crate::error::WizardError;

/// A prompt state reached during a dry run.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'m> {
    pub id: &'m str,
    pub state: &'m PromptState,
}

/// Prompt states visited from `initial`, in order.
///
/// The walk follows supplied values, then defaults, then a kind-specific
/// placeholder that only chooses a direction. It stops at the end of the flow,
/// at an unknown id, or at the machine's step limit.
pub fn traverse<'m>(machine: &'m Machine, provided: &Prefill) -> Vec<Visit<'m>> {
    let mut visits = Vec::new();
    // A truncated walk is still a useful preview; the limit error is dropped.
    let _ = walk(machine, |id, state| {
        visits.push(Visit { id, state });
        Ok(provided
            .get(id)
            .cloned()
            .or_else(|| state.default_value())
            .unwrap_or_else(|| state.synthetic_value()))
    });
    visits
}

/// Pre-supplied values that will skip their prompt, in visitation order.
///
/// Values the state would reject are left out; those prompts are still asked.
pub fn skipped_prefill<'p>(machine: &Machine, provided: &'p Prefill) -> Vec<(&'p str, &'p Value)> {
    traverse(machine, provided)
        .into_iter()
        .filter_map(|visit| {
            let (id, value) = provided.get_key_value(visit.id)?;
            validate_provided(id, visit.state, value)
                .is_ok()
                .then_some((id.as_str(), value))
        })
        .collect()
}

/// Complete a value set along the dry-run path without running tasks.
///
/// Applies the same validation and default rules as the headless executor, so
/// it reports missing or invalid values before any side effect happens.
pub fn complete(
    machine: &Machine,
    provided: &Prefill,
    accept_defaults: bool,
) -> Result<Output, WizardError> {
    let mut output = Output::new();
    walk(machine, |id, state| {
        let value = settle_value(id, state, provided.get(id), accept_defaults)?;
        output.insert(id.to_string(), value.clone());
        Ok(value)
    })?;
    Ok(output)
}

/// Error for a run that keeps transitioning past the machine's step limit.
pub(crate) fn step_limit_exceeded(machine: &Machine, id: &str) -> WizardError {
    WizardError::validation(
        id,
        format!(
            "flow exceeded {} transitions without ending",
            machine.step_limit()
        ),
    )
}

fn walk<'m, F>(machine: &'m Machine, mut visit: F) -> Result<(), WizardError>
where
    F: FnMut(&'m str, &'m PromptState) -> Result<Value, WizardError>,
{
    let mut current = Some(machine.initial().to_string());
    let mut steps = 0usize;
    while let Some(id) = current {
        let Some((key, state)) = machine.states().get_key_value(id.as_str()) else {
            break;
        };
        steps += 1;
        if steps > machine.step_limit() {
            return Err(step_limit_exceeded(machine, key));
        }
        current = match state {
            State::Task(task) => task.next.ok.clone(),
            State::Prompt(prompt) => {
                let value = visit(key.as_str(), prompt)?;
                resolve_next(prompt, &value)
            }
        };
    }
    Ok(())
}
