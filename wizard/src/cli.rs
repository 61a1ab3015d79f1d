//! Command-line front end for a machine.
//!
//! [`run_cli`] turns argv into a [`CliOutcome`]: schema and usage requests are
//! answered directly, everything else runs the machine headless or
//! interactively. The process itself is never terminated here; the binary
//! prints the outcome and exits with [`CliOutcome::exit_code`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::core::flags::camel_to_kebab;
use crate::core::machine::Machine;
use crate::core::merge::merge_sources;
use crate::core::schema::generate_schema;
use crate::core::traverse::skipped_prefill;
use crate::core::usage::usage;
use crate::core::value::{Output, Prefill};
use crate::error::WizardError;
use crate::exit_codes;
use crate::headless::run_headless;
use crate::interactive::run_interactive;
use crate::io::args::parse_args;
use crate::io::config::load_config_arg;
use crate::io::renderer::PromptRenderer;
use crate::task::RunOptions;

const DEFAULT_OUTRO: &str = "Done!";

type OutroFn = Arc<dyn Fn(&Output) -> String + Send + Sync>;

/// Presentation and execution settings for [`run_cli`].
#[derive(Clone)]
pub struct CliOptions {
    /// Tool name shown in usage and as the default intro.
    pub name: String,
    pub description: Option<String>,
    pub intro: Option<String>,
    outro: Option<OutroFn>,
    pub run: RunOptions,
}

impl CliOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            intro: None,
            outro: None,
            run: RunOptions::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Fixed closing message.
    pub fn outro(mut self, outro: impl Into<String>) -> Self {
        let text = outro.into();
        self.outro = Some(Arc::new(move |_: &Output| text.clone()));
        self
    }

    /// Closing message computed from the collected values.
    pub fn outro_with<F>(mut self, outro: F) -> Self
    where
        F: Fn(&Output) -> String + Send + Sync + 'static,
    {
        self.outro = Some(Arc::new(outro));
        self
    }

    pub fn run_options(mut self, run: RunOptions) -> Self {
        self.run = run;
        self
    }

    fn outro_for(&self, output: &Output) -> String {
        match &self.outro {
            Some(outro) => outro(output),
            None => DEFAULT_OUTRO.to_string(),
        }
    }
}

impl fmt::Debug for CliOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliOptions")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("intro", &self.intro)
            .field("outro", &self.outro.is_some())
            .field("run", &self.run)
            .finish()
    }
}

/// How missing values are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ask through the renderer, unless `--yes` was given.
    Interactive,
    /// Never prompt.
    Headless,
}

/// Result of one invocation.
#[derive(Debug)]
pub enum CliOutcome {
    /// `--schema`: pretty-printed JSON Schema.
    Schema(String),
    /// `--help`: usage text.
    Help(String),
    /// The machine ran to completion. `message` is set when the caller still
    /// has to print the closing text (headless runs).
    Completed {
        output: Output,
        message: Option<String>,
    },
    Failed(WizardError),
}

impl CliOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliOutcome::Schema(_) | CliOutcome::Help(_) | CliOutcome::Completed { .. } => {
                exit_codes::OK
            }
            CliOutcome::Failed(WizardError::Validation { .. }) => exit_codes::INVALID,
            CliOutcome::Failed(WizardError::Task { .. }) => exit_codes::TASK_FAILED,
            CliOutcome::Failed(WizardError::Cancel) => exit_codes::CANCELLED,
        }
    }

    /// Text destined for stdout.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            CliOutcome::Schema(text) | CliOutcome::Help(text) => Some(text.as_str()),
            CliOutcome::Completed { message, .. } => message.as_deref(),
            CliOutcome::Failed(_) => None,
        }
    }

    /// Text destined for stderr.
    pub fn stderr(&self) -> Option<String> {
        match self {
            CliOutcome::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn output(&self) -> Option<&Output> {
        match self {
            CliOutcome::Completed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Parse `args`, merge value sources and run `machine`.
///
/// Runs headless when `mode` is [`Mode::Headless`] or `--yes` was given.
#[instrument(skip_all, fields(tool = %options.name, mode = ?mode))]
pub async fn run_cli<I, S, R>(
    machine: &Machine,
    options: &CliOptions,
    args: I,
    mode: Mode,
    renderer: &mut R,
) -> CliOutcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    R: PromptRenderer + ?Sized,
{
    let parsed = match parse_args(machine, args) {
        Ok(parsed) => parsed,
        Err(err) => return CliOutcome::Failed(err),
    };
    if parsed.schema {
        return CliOutcome::Schema(format!("{:#}", generate_schema(machine)));
    }
    if parsed.help {
        return CliOutcome::Help(usage(
            machine,
            &options.name,
            options.description.as_deref(),
        ));
    }

    let config = match parsed
        .config
        .as_deref()
        .map(|raw| load_config_arg(machine, raw))
        .transpose()
    {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => return CliOutcome::Failed(err),
    };
    let provided = merge_sources(machine, parsed.values, config, &parsed.positionals);
    debug!(provided = provided.len(), yes = parsed.yes, "merged value sources");

    if mode == Mode::Headless || parsed.yes {
        return match run_headless(machine, &provided, parsed.yes, &options.run).await {
            Ok(output) => {
                let message = options.outro_for(&output);
                CliOutcome::Completed {
                    output,
                    message: Some(message),
                }
            }
            Err(err) => CliOutcome::Failed(err),
        };
    }

    renderer.intro(options.intro.as_deref().unwrap_or(&options.name));
    report_prefill(machine, &provided, renderer);
    match run_interactive(machine, &provided, renderer, &options.run).await {
        Ok(output) => {
            renderer.outro(&options.outro_for(&output));
            CliOutcome::Completed {
                output,
                message: None,
            }
        }
        Err(err) => CliOutcome::Failed(err),
    }
}

fn report_prefill<R>(machine: &Machine, provided: &Prefill, renderer: &mut R)
where
    R: PromptRenderer + ?Sized,
{
    for (id, value) in skipped_prefill(machine, provided) {
        renderer.info(&format!("{}: {value}", camel_to_kebab(id)));
    }
}
