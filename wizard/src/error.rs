//! Failure kinds returned by a run.

use thiserror::Error;

use crate::core::value::StateId;

/// Why a run stopped without producing an output.
///
/// The set is closed: callers can match exhaustively to pick an exit code or
/// message.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The user aborted an interactive prompt.
    #[error("cancelled")]
    Cancel,
    /// A task effect failed and the task declares no error branch.
    #[error("task '{state_id}' failed: {cause:#}")]
    Task {
        state_id: StateId,
        cause: anyhow::Error,
    },
    /// A supplied value was rejected, or a required one is missing.
    ///
    /// `state_id` names the offending state, or the value source (`config`,
    /// `args`) when no single state is at fault.
    #[error("{reason}")]
    Validation { state_id: StateId, reason: String },
}

impl WizardError {
    pub fn validation(state_id: impl Into<StateId>, reason: impl Into<String>) -> Self {
        WizardError::Validation {
            state_id: state_id.into(),
            reason: reason.into(),
        }
    }

    pub fn task(state_id: impl Into<StateId>, cause: anyhow::Error) -> Self {
        WizardError::Task {
            state_id: state_id.into(),
            cause,
        }
    }

    /// State (or value source) the error is attributed to.
    pub fn state_id(&self) -> Option<&str> {
        match self {
            WizardError::Cancel => None,
            WizardError::Task { state_id, .. } | WizardError::Validation { state_id, .. } => {
                Some(state_id)
            }
        }
    }
}
