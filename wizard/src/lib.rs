//! Declarative wizard state machines.
//!
//! A [`Machine`] describes a flow of prompt states (text, select, confirm) and
//! task states joined by transitions. The same definition drives an
//! interactive run, a headless run fed from flags and config, a JSON Schema of
//! its inputs and generated usage text.
//!
//! - **[`core`]**: Pure, deterministic logic (definition, transitions, dry-run
//!   traversal, validation, schema). No I/O.
//! - **[`io`]**: Argv parsing, config documents and the terminal renderer.
//!
//! The executors ([`headless`], [`interactive`]) run a machine live, and
//! [`cli`] wires argv to them for binaries.

pub mod cli;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod headless;
pub mod interactive;
pub mod io;
pub mod logging;
pub mod task;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::cli::{CliOptions, CliOutcome, Mode, run_cli};
pub use crate::core::machine::{
    ConfirmState, DefinitionError, Machine, MachineBuilder, SelectOption, SelectState, State,
    TaskContext, TaskState, TextState,
};
pub use crate::core::value::{Output, Prefill, StateId, Value};
pub use crate::error::WizardError;
pub use crate::headless::run_headless;
pub use crate::interactive::run_interactive;
pub use crate::io::renderer::{PromptRenderer, Reply, TerminalRenderer};
pub use crate::task::RunOptions;
