//! Command-line flags derived from a machine's prompt states.
//!
//! Every prompt state becomes a long flag (`projectName` -> `--project-name`):
//! string-valued for text and select states, boolean for confirm states
//! (`--git`, `--git=false`). Unknown flags are dropped before parsing so that a
//! wrapper tool can pass extra options through.

use std::collections::HashSet;

use clap::{Arg, ArgAction, Command, value_parser};
use tracing::debug;

use crate::core::flags::camel_to_kebab;
use crate::core::machine::Machine;
use crate::core::value::{Prefill, Value};
use crate::error::WizardError;

/// Pseudo state id used when argv itself cannot be parsed.
pub const ARGS_SOURCE: &str = "args";

const CONFIG: &str = "config";
const SCHEMA: &str = "schema";
const YES: &str = "yes";
const HELP: &str = "help";
const POSITIONALS: &str = "positionals";
const SHORT_FLAGS: [char; 2] = ['y', 'h'];

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Values given through state flags, keyed by state id.
    pub values: Prefill,
    /// Leftover positional tokens, in order.
    pub positionals: Vec<String>,
    /// Raw `--config` argument.
    pub config: Option<String>,
    pub schema: bool,
    pub yes: bool,
    pub help: bool,
}

/// Parse `args` (without the binary name) against the machine's flags.
pub fn parse_args<I, S>(machine: &Machine, args: I) -> Result<ParsedArgs, WizardError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let state_flags: Vec<(String, String, bool)> = machine
        .prompts()
        .map(|(id, prompt)| (id.to_string(), camel_to_kebab(id), prompt.is_boolean()))
        .collect();
    let known: HashSet<&str> = state_flags
        .iter()
        .map(|(_, flag, _)| flag.as_str())
        .chain([CONFIG, SCHEMA, YES, HELP])
        .collect();

    let tokens = retain_known(args.into_iter().map(Into::into), &known);
    let matches = command(&state_flags)
        .try_get_matches_from(tokens)
        .map_err(|err| {
            let rendered = err.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .trim_start_matches("error: ")
                .to_string();
            WizardError::validation(ARGS_SOURCE, reason)
        })?;

    let mut values = Prefill::new();
    for (id, _, boolean) in &state_flags {
        let arg_id = arg_id(id);
        if *boolean {
            if let Some(flag) = matches.get_one::<bool>(&arg_id) {
                values.insert(id.clone(), Value::Bool(*flag));
            }
        } else if let Some(text) = matches.get_one::<String>(&arg_id) {
            values.insert(id.clone(), Value::Text(text.clone()));
        }
    }

    Ok(ParsedArgs {
        values,
        positionals: matches
            .get_many::<String>(POSITIONALS)
            .map(|tokens| tokens.cloned().collect())
            .unwrap_or_default(),
        config: matches.get_one::<String>(CONFIG).cloned(),
        schema: matches.get_flag(SCHEMA),
        yes: matches.get_flag(YES),
        help: matches.get_flag(HELP),
    })
}

fn arg_id(id: &str) -> String {
    format!("state:{id}")
}

fn command(state_flags: &[(String, String, bool)]) -> Command {
    let mut cmd = Command::new("wizard")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(Arg::new(CONFIG).long(CONFIG).num_args(1).action(ArgAction::Set))
        .arg(Arg::new(SCHEMA).long(SCHEMA).action(ArgAction::SetTrue))
        .arg(Arg::new(YES).long(YES).short('y').action(ArgAction::SetTrue))
        .arg(Arg::new(HELP).long(HELP).short('h').action(ArgAction::SetTrue))
        .arg(
            Arg::new(POSITIONALS)
                .num_args(0..)
                .action(ArgAction::Append),
        );
    for (id, flag, boolean) in state_flags {
        let arg = Arg::new(arg_id(id)).long(flag.clone());
        let arg = if *boolean {
            arg.num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(value_parser!(bool))
                .action(ArgAction::Set)
        } else {
            arg.num_args(1).action(ArgAction::Set)
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Drop flags the command does not define; everything after `--` is kept.
fn retain_known(tokens: impl Iterator<Item = String>, known: &HashSet<&str>) -> Vec<String> {
    let mut kept = Vec::new();
    let mut passthrough = false;
    for token in tokens {
        if passthrough || token == "--" {
            passthrough = true;
            kept.push(token);
            continue;
        }
        if let Some(long) = token.strip_prefix("--") {
            let name = long.split_once('=').map_or(long, |(name, _)| name);
            if known.contains(name) {
                kept.push(token);
            } else {
                debug!(flag = %token, "ignoring unknown flag");
            }
            continue;
        }
        if let Some(short) = token.strip_prefix('-').filter(|rest| !rest.is_empty()) {
            if short.chars().all(|ch| SHORT_FLAGS.contains(&ch)) {
                kept.push(token);
            } else {
                debug!(flag = %token, "ignoring unknown flag");
            }
            continue;
        }
        kept.push(token);
    }
    kept
}
