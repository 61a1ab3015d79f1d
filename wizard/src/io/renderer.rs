//! Interactive prompt rendering.
//!
//! Executors only talk to the [`PromptRenderer`] trait; [`TerminalRenderer`] is a
//! line-based implementation over any `BufRead`/`Write` pair. End of input is a
//! cancel.

use std::io::{self, BufRead, Stdin, Stdout, Write};

use tracing::warn;

use crate::core::machine::{SelectOption, Validator};

/// Answer from a prompt: a value, or a cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Value(T),
    Cancel,
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Value(value) => Reply::Value(f(value)),
            Reply::Cancel => Reply::Cancel,
        }
    }
}

/// Free-text question.
#[derive(Clone, Copy)]
pub struct TextPrompt<'a> {
    pub message: &'a str,
    pub placeholder: Option<&'a str>,
    pub initial: Option<&'a str>,
    /// Re-ask until this accepts the answer.
    pub validator: Option<&'a Validator>,
}

/// Single-choice question.
#[derive(Debug, Clone, Copy)]
pub struct SelectPrompt<'a> {
    pub message: &'a str,
    pub options: &'a [SelectOption],
    pub initial: Option<&'a str>,
}

/// Yes/no question.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmPrompt<'a> {
    pub message: &'a str,
    pub initial: bool,
}

/// Widgets an interactive run needs.
pub trait PromptRenderer {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Reply<String>;
    fn select(&mut self, prompt: &SelectPrompt<'_>) -> Reply<String>;
    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> Reply<bool>;

    /// Show a progress indicator while a task runs.
    fn spinner_start(&mut self, message: &str);
    /// Replace the progress indicator with a final status line.
    fn spinner_stop(&mut self, message: &str, succeeded: bool);

    fn intro(&mut self, _title: &str) {}
    fn outro(&mut self, _message: &str) {}
    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
}

/// Line-based renderer.
pub struct TerminalRenderer<R, W> {
    input: R,
    output: W,
}

impl TerminalRenderer<io::StdinLock<'static>, Stdout> {
    /// Renderer over the process's stdin/stdout.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalRenderer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the renderer, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush());
        if let Err(err) = result {
            warn!(error = %err, "failed to write prompt output");
        }
    }

    fn line(&mut self, text: &str) {
        self.emit(&format!("{text}\n"));
    }

    /// Read one line without its terminator; `None` on end of input or error.
    fn read_answer(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.input.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!(error = %err, "failed to read prompt input");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> PromptRenderer for TerminalRenderer<R, W> {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Reply<String> {
        loop {
            let mut question = format!("? {}", prompt.message);
            if let Some(placeholder) = prompt.placeholder {
                question.push_str(&format!(" ({placeholder})"));
            }
            if let Some(initial) = prompt.initial.filter(|initial| !initial.is_empty()) {
                question.push_str(&format!(" [{initial}]"));
            }
            question.push_str(": ");
            self.emit(&question);

            let Some(raw) = self.read_answer() else {
                return Reply::Cancel;
            };
            let answer = match prompt.initial {
                Some(initial) if raw.trim().is_empty() => initial.to_string(),
                _ => raw,
            };
            if let Some(message) = prompt.validator.and_then(|validate| validate(Some(answer.as_str()))) {
                self.line(&format!("  ✖ {message}"));
                continue;
            }
            return Reply::Value(answer);
        }
    }

    fn select(&mut self, prompt: &SelectPrompt<'_>) -> Reply<String> {
        if prompt.options.is_empty() {
            return Reply::Cancel;
        }
        let initial_index = prompt
            .initial
            .and_then(|initial| prompt.options.iter().position(|o| o.value == initial))
            .unwrap_or(0);

        self.line(&format!("? {}", prompt.message));
        for (index, option) in prompt.options.iter().enumerate() {
            let marker = if index == initial_index { '>' } else { ' ' };
            let mut row = format!("  {marker} {}) {}", index + 1, option.display_label());
            if let Some(hint) = &option.hint {
                row.push_str(&format!(" ({hint})"));
            }
            self.line(&row);
        }

        loop {
            self.emit(&format!("  choose [1-{}]: ", prompt.options.len()));
            let Some(raw) = self.read_answer() else {
                return Reply::Cancel;
            };
            let answer = raw.trim();
            let chosen = if answer.is_empty() {
                prompt.options.get(initial_index)
            } else if let Ok(number) = answer.parse::<usize>() {
                number
                    .checked_sub(1)
                    .and_then(|index| prompt.options.get(index))
            } else {
                prompt
                    .options
                    .iter()
                    .find(|option| option.value == answer || option.display_label() == answer)
            };
            match chosen {
                Some(option) => return Reply::Value(option.value.clone()),
                None => self.line(&format!(
                    "  ✖ pick a number between 1 and {}",
                    prompt.options.len()
                )),
            }
        }
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> Reply<bool> {
        let choices = if prompt.initial { "Y/n" } else { "y/N" };
        loop {
            self.emit(&format!("? {} ({choices}): ", prompt.message));
            let Some(raw) = self.read_answer() else {
                return Reply::Cancel;
            };
            match raw.trim().to_ascii_lowercase().as_str() {
                "" => return Reply::Value(prompt.initial),
                "y" | "yes" => return Reply::Value(true),
                "n" | "no" => return Reply::Value(false),
                _ => self.line("  ✖ answer y or n"),
            }
        }
    }

    fn spinner_start(&mut self, message: &str) {
        self.line(&format!("◇ {message}..."));
    }

    fn spinner_stop(&mut self, message: &str, succeeded: bool) {
        let mark = if succeeded { '✔' } else { '✖' };
        self.line(&format!("{mark} {message}"));
    }

    fn intro(&mut self, title: &str) {
        self.line(&format!("┌ {title}"));
    }

    fn outro(&mut self, message: &str) {
        self.line(&format!("└ {message}"));
    }

    fn info(&mut self, message: &str) {
        self.line(&format!("│ {message}"));
    }

    fn warn(&mut self, message: &str) {
        self.line(&format!("▲ {message}"));
    }
}
