//! Non-interactive execution: every value comes from prefill or defaults.

use tracing::{debug, info, instrument};

use crate::core::machine::{Machine, State};
use crate::core::resolver::resolve_next;
use crate::core::traverse::step_limit_exceeded;
use crate::core::validate::settle_value;
use crate::core::value::{Output, Prefill};
use crate::error::WizardError;
use crate::task::{RunOptions, next_after_task, run_task};

/// Drive `machine` to completion without prompting.
///
/// Task effects run live. The first error aborts the run and no partial output
/// is returned.
#[instrument(skip_all, fields(initial = machine.initial(), accept_defaults = accept_defaults))]
pub async fn run_headless(
    machine: &Machine,
    provided: &Prefill,
    accept_defaults: bool,
    options: &RunOptions,
) -> Result<Output, WizardError> {
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
                debug!(state = %id, "running task");
                let result = run_task(task, &output, options).await?;
                next_after_task(&id, task, result)?
            }
            State::Prompt(prompt) => {
                let value = settle_value(&id, prompt, provided.get(&id), accept_defaults)?;
                let next = resolve_next(prompt, &value);
                output.insert(id.clone(), value);
                next
            }
        };
        debug!(from = %id, to = ?current, "transition");
    }

    info!(values = output.len(), steps, "headless run complete");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::core::machine::{SelectOption, TaskContext};
    use crate::core::value::Value;
    use crate::test_support::name_flag_machine;

    fn prefill(pairs: &[(&str, Value)]) -> Prefill {
        pairs
            .iter()
            .map(|(id, value)| ((*id).to_string(), value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn completes_from_positional_and_defaults() {
        let provided = prefill(&[("name", Value::from("demo"))]);
        let output = run_headless(&name_flag_machine(), &provided, false, &RunOptions::default())
            .await
            .expect("run");
        assert_eq!(output, prefill(&[("name", Value::from("demo")), ("flag", Value::from(false))]));
    }

    #[tokio::test]
    async fn missing_required_value_names_the_flag() {
        let err = run_headless(&name_flag_machine(), &Prefill::new(), false, &RunOptions::default())
            .await
            .expect_err("missing");
        assert!(matches!(&err, WizardError::Validation { state_id, .. } if state_id == "name"));
        assert!(err.to_string().contains("--name"));

        let err = run_headless(&name_flag_machine(), &Prefill::new(), true, &RunOptions::default())
            .await
            .expect_err("missing");
        assert_eq!(err.to_string(), "no default for --name");
    }

    #[tokio::test]
    async fn select_values_outside_the_options_are_rejected() {
        let machine = Machine::builder("color")
            .state(
                "color",
                State::select("Color", vec![SelectOption::new("a"), SelectOption::new("b")]),
            )
            .build()
            .expect("build");
        let provided = prefill(&[("color", Value::from("c"))]);
        let err = run_headless(&machine, &provided, false, &RunOptions::default())
            .await
            .expect_err("invalid");
        assert_eq!(err.to_string(), "--color: must be one of a, b");
    }

    #[tokio::test]
    async fn tasks_run_live_with_collected_values() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let machine = Machine::builder("name")
            .state("name", State::text("Name").next("work"))
            .state(
                "work",
                State::task("Working", move |ctx: TaskContext| {
                    let counter = Arc::clone(&counter);
                    async move {
                        assert_eq!(ctx.values.get("name"), Some(&Value::from("demo")));
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                })
                .on_ok("done"),
            )
            .state("done", State::confirm("Done?").default_value(true))
            .build()
            .expect("build");

        let provided = prefill(&[("name", Value::from("demo"))]);
        let output = run_headless(&machine, &provided, false, &RunOptions::default())
            .await
            .expect("run");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(output.len(), 2);
        assert!(!output.contains_key("work"));
    }

    #[tokio::test]
    async fn failing_task_without_error_branch_aborts() {
        let machine = Machine::builder("work")
            .state(
                "work",
                State::task("Working", |_| async { Err(anyhow!("disk full")) }).on_ok("after"),
            )
            .state("after", State::confirm("After?"))
            .build()
            .expect("build");
        let err = run_headless(&machine, &Prefill::new(), false, &RunOptions::default())
            .await
            .expect_err("task failure");
        assert_eq!(err.state_id(), Some("work"));
        assert_eq!(err.to_string(), "task 'work' failed: disk full");
    }

    #[tokio::test]
    async fn failing_task_with_error_branch_continues() {
        let machine = Machine::builder("work")
            .state(
                "work",
                State::task("Working", |_| async { Err(anyhow!("offline")) })
                    .on_ok("ok")
                    .on_err("recovered"),
            )
            .state("ok", State::confirm("Ok?"))
            .state("recovered", State::confirm("Recovered?").default_value(true))
            .build()
            .expect("build");
        let output = run_headless(&machine, &Prefill::new(), false, &RunOptions::default())
            .await
            .expect("run");
        assert_eq!(output, prefill(&[("recovered", Value::from(true))]));
    }

    #[tokio::test]
    async fn dynamic_loops_are_bounded() {
        let machine = Machine::builder("again")
            .state(
                "again",
                State::confirm("Again?").next_with(|_| Some("again".to_string())),
            )
            .step_limit(10)
            .build()
            .expect("build");
        let err = run_headless(&machine, &Prefill::new(), false, &RunOptions::default())
            .await
            .expect_err("bounded");
        assert!(err.to_string().contains("exceeded 10 transitions"));
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_run() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let provided = prefill(&[("name", Value::from("demo"))]);
        let err = run_headless(
            &name_flag_machine(),
            &provided,
            false,
            &RunOptions::default().with_cancel(cancel),
        )
        .await
        .expect_err("cancelled");
        assert!(matches!(err, WizardError::Cancel));
    }
}
