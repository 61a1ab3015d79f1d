//! Task effect invocation shared by the headless and interactive executors.

use std::time::Duration;

use anyhow::anyhow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::machine::{TaskContext, TaskState};
use crate::core::resolver::{TaskOutcome, resolve_task_next};
use crate::core::value::{Output, StateId};
use crate::error::WizardError;

/// Per-run execution settings.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Cancelling this aborts the run with [`WizardError::Cancel`]. Task effects
    /// receive a child token.
    pub cancel: CancellationToken,
    /// Upper bound on a single task effect. Expiry counts as a task failure.
    pub task_timeout: Option<Duration>,
}

impl RunOptions {
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub(crate) fn ensure_live(&self) -> Result<(), WizardError> {
        if self.cancel.is_cancelled() {
            return Err(WizardError::Cancel);
        }
        Ok(())
    }
}

/// Run a task's effect against a snapshot of `values`.
///
/// The outer error is a run-level cancel; the inner result is the effect's own
/// outcome (including a timeout).
pub(crate) async fn run_task(
    task: &TaskState,
    values: &Output,
    options: &RunOptions,
) -> Result<anyhow::Result<()>, WizardError> {
    options.ensure_live()?;
    let ctx = TaskContext {
        values: values.clone(),
        cancel: options.cancel.child_token(),
    };
    let effect = (task.effect)(ctx);
    let bounded = async move {
        match options.task_timeout {
            Some(limit) => match tokio::time::timeout(limit, effect).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!("timed out after {}ms", limit.as_millis())),
            },
            None => effect.await,
        }
    };

    tokio::select! {
        biased;
        () = options.cancel.cancelled() => {
            debug!(task = %task.message, "task cancelled");
            Err(WizardError::Cancel)
        }
        result = bounded => Ok(result),
    }
}

/// Route a finished task: `ok` on success, `err` on failure, or a task error
/// when the failure has nowhere to go.
pub(crate) fn next_after_task(
    id: &str,
    task: &TaskState,
    result: anyhow::Result<()>,
) -> Result<Option<StateId>, WizardError> {
    match result {
        Ok(()) => Ok(resolve_task_next(task, TaskOutcome::Ok).map(str::to_string)),
        Err(cause) => match resolve_task_next(task, TaskOutcome::Err) {
            Some(next) => {
                warn!(state = %id, error = %format!("{cause:#}"), next, "task failed; taking error branch");
                Ok(Some(next.to_string()))
            }
            None => {
                warn!(state = %id, error = %format!("{cause:#}"), "task failed");
                Err(WizardError::task(id, cause))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::core::machine::State;
    use crate::core::value::Value;

    #[tokio::test]
    async fn effect_sees_a_snapshot_of_collected_values() {
        let seen = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&seen);
        let task = State::task("Check", move |ctx: TaskContext| {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(ctx.values.get("name") == Some(&Value::from("demo")), Ordering::SeqCst);
                Ok(())
            }
        });
        let mut values = Output::new();
        values.insert("name".to_string(), Value::from("demo"));

        let result = run_task(&task, &values, &RunOptions::default())
            .await
            .expect("not cancelled");
        assert!(result.is_ok());
        assert!(seen.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_count_as_task_failures() {
        let task = State::task("Slow", |_| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        let options = RunOptions::default().with_task_timeout(Duration::from_secs(1));
        let result = run_task(&task, &Output::new(), &options)
            .await
            .expect("not cancelled");
        let err = result.expect_err("timed out");
        assert_eq!(err.to_string(), "timed out after 1000ms");
    }

    #[tokio::test]
    async fn cancellation_preempts_a_hanging_effect() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let task = State::task("Hang", move |ctx: TaskContext| {
            let trigger = trigger.clone();
            async move {
                trigger.cancel();
                ctx.cancel.cancelled().await;
                std::future::pending::<()>().await;
                Ok(())
            }
        });
        let options = RunOptions::default().with_cancel(cancel);
        let err = run_task(&task, &Output::new(), &options)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, WizardError::Cancel));
    }

    #[test]
    fn failures_follow_the_error_branch_when_declared() {
        let task = State::task("Work", |_| async { Ok(()) })
            .on_ok("done")
            .on_err("recover");
        let next = next_after_task("work", &task, Err(anyhow!("boom"))).expect("routed");
        assert_eq!(next.as_deref(), Some("recover"));

        let bare = State::task("Work", |_| async { Ok(()) });
        let err = next_after_task("work", &bare, Err(anyhow!("boom"))).expect_err("fatal");
        assert_eq!(err.to_string(), "task 'work' failed: boom");
        assert_eq!(next_after_task("work", &bare, Ok(())).expect("ok"), None);
    }
}
