//! Interactive execution: missing values are asked for through a renderer.

use tracing::{debug, info, instrument, warn};

use crate::core::machine::{Machine, PromptState, State};
use crate::core::resolver::resolve_next;
use crate::core::traverse::step_limit_exceeded;
use crate::core::validate::validate_provided;
use crate::core::value::{Output, Prefill, Value};
use crate::error::WizardError;
use crate::io::renderer::{ConfirmPrompt, PromptRenderer, Reply, SelectPrompt, TextPrompt};
use crate::task::{RunOptions, next_after_task, run_task};

/// Drive `machine`, prompting for every state `prefill` does not satisfy.
///
/// A prefilled value that fails validation is reported through
/// [`PromptRenderer::warn`] and the state is prompted for instead. A cancelled
/// prompt ends the run with [`WizardError::Cancel`] and discards collected
/// values.
#[instrument(skip_all, fields(initial = machine.initial()))]
pub async fn run_interactive<R>(
    machine: &Machine,
    prefill: &Prefill,
    renderer: &mut R,
    options: &RunOptions,
) -> Result<Output, WizardError>
where
    R: PromptRenderer + ?Sized,
{
    let mut output = Output::new();
    let mut current = Some(machine.initial().to_string());
    let mut steps = 0usize;

    while let Some(id) = current {
        options.ensure_live()?;
        let Some(state) = machine.get(&id) else {
            debug!(state = %id, "unknown state, stopping");
            break;
        };
        steps += 1;
        if steps > machine.step_limit() {
            return Err(step_limit_exceeded(machine, &id));
        }

        current = match state {
            State::Task(task) => {
                renderer.spinner_start(&task.message);
                let result = match run_task(task, &output, options).await {
                    Ok(result) => result,
                    Err(err) => {
                        renderer.spinner_stop(&task.message, false);
                        return Err(err);
                    }
                };
                match &result {
                    Ok(()) => renderer.spinner_stop(&task.message, true),
                    Err(cause) => {
                        renderer.spinner_stop(&format!("{}: {cause:#}", task.message), false);
                    }
                }
                next_after_task(&id, task, result)?
            }
            State::Prompt(prompt) => {
                let value = match prefilled(&id, prompt, prefill, renderer) {
                    Some(value) => value,
                    None => match ask(prompt, renderer) {
                        Reply::Value(value) => value,
                        Reply::Cancel => {
                            info!(state = %id, "prompt cancelled");
                            return Err(WizardError::Cancel);
                        }
                    },
                };
                let next = resolve_next(prompt, &value);
                output.insert(id.clone(), value);
                next
            }
        };
        debug!(from = %id, to = ?current, "transition");
    }

    info!(values = output.len(), steps, "interactive run complete");
    Ok(output)
}

fn prefilled<R>(id: &str, prompt: &PromptState, prefill: &Prefill, renderer: &mut R) -> Option<Value>
where
    R: PromptRenderer + ?Sized,
{
    let value = prefill.get(id)?;
    match validate_provided(id, prompt, value) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(state = %id, error = %err, "ignoring invalid prefilled value");
            renderer.warn(&err.to_string());
            None
        }
    }
}

fn ask<R>(prompt: &PromptState, renderer: &mut R) -> Reply<Value>
where
    R: PromptRenderer + ?Sized,
{
    match prompt {
        PromptState::Text(text) => renderer
            .text(&TextPrompt {
                message: &text.message,
                placeholder: text.placeholder.as_deref(),
                initial: text.default.as_deref(),
                validator: text.validator.as_ref(),
            })
            .map(Value::Text),
        PromptState::Select(select) => renderer
            .select(&SelectPrompt {
                message: &select.message,
                options: &select.options,
                initial: select.default.as_deref(),
            })
            .map(Value::Text),
        PromptState::Confirm(confirm) => renderer
            .confirm(&ConfirmPrompt {
                message: &confirm.message,
                initial: confirm.default.unwrap_or(false),
            })
            .map(Value::Bool),
    }
}
