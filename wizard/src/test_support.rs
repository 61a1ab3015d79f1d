//! Test-only helpers: a scripted renderer and small sample machines.

use std::collections::VecDeque;

use crate::core::machine::{Machine, State};
use crate::io::renderer::{ConfirmPrompt, PromptRenderer, Reply, SelectPrompt, TextPrompt};

/// One canned answer for [`ScriptedRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    Text(String),
    Select(String),
    Confirm(bool),
    Cancel,
}

/// Renderer interaction recorded by [`ScriptedRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Text(String),
    Select(String),
    Confirm(String),
    SpinnerStart(String),
    SpinnerStop(String, bool),
    Intro(String),
    Outro(String),
    Info(String),
    Warn(String),
}

/// Renderer that replays scripted answers in order and records every call.
///
/// Running out of answers behaves like closed input and cancels. A reply of
/// the wrong kind panics, since it means the test script is out of sync with
/// the flow.
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    replies: VecDeque<Scripted>,
    pub calls: Vec<Call>,
}

impl ScriptedRenderer {
    pub fn new(replies: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// Whether every scripted answer was consumed.
    pub fn is_exhausted(&self) -> bool {
        self.replies.is_empty()
    }
}

impl PromptRenderer for ScriptedRenderer {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Reply<String> {
        self.calls.push(Call::Text(prompt.message.to_string()));
        loop {
            match self.replies.pop_front() {
                Some(Scripted::Text(value)) => {
                    let rejected = prompt
                        .validator
                        .and_then(|validate| validate(Some(value.as_str())));
                    if rejected.is_none() {
                        return Reply::Value(value);
                    }
                }
                Some(Scripted::Cancel) | None => return Reply::Cancel,
                Some(other) => panic!("expected a text reply for '{}', got {other:?}", prompt.message),
            }
        }
    }

    fn select(&mut self, prompt: &SelectPrompt<'_>) -> Reply<String> {
        self.calls.push(Call::Select(prompt.message.to_string()));
        match self.replies.pop_front() {
            Some(Scripted::Select(value)) => Reply::Value(value),
            Some(Scripted::Cancel) | None => Reply::Cancel,
            Some(other) => panic!("expected a select reply for '{}', got {other:?}", prompt.message),
        }
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> Reply<bool> {
        self.calls.push(Call::Confirm(prompt.message.to_string()));
        match self.replies.pop_front() {
            Some(Scripted::Confirm(value)) => Reply::Value(value),
            Some(Scripted::Cancel) | None => Reply::Cancel,
            Some(other) => panic!("expected a confirm reply for '{}', got {other:?}", prompt.message),
        }
    }

    fn spinner_start(&mut self, message: &str) {
        self.calls.push(Call::SpinnerStart(message.to_string()));
    }

    fn spinner_stop(&mut self, message: &str, succeeded: bool) {
        self.calls.push(Call::SpinnerStop(message.to_string(), succeeded));
    }

    fn intro(&mut self, title: &str) {
        self.calls.push(Call::Intro(title.to_string()));
    }

    fn outro(&mut self, message: &str) {
        self.calls.push(Call::Outro(message.to_string()));
    }

    fn info(&mut self, message: &str) {
        self.calls.push(Call::Info(message.to_string()));
    }

    fn warn(&mut self, message: &str) {
        self.calls.push(Call::Warn(message.to_string()));
    }
}

/// `name` (positional text) followed by `flag` (confirm, default `false`).
pub fn name_flag_machine() -> Machine {
    Machine::builder("name")
        .state("name", State::text("Project name").positional().next("flag"))
        .state("flag", State::confirm("Enable the flag?").default_value(false))
        .build()
        .expect("sample machine is well formed")
}
