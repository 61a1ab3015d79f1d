//! Declarative flow definitions: states, transitions and the machine itself.
//!
//! A [`Machine`] is immutable once built. [`MachineBuilder::build`] checks the
//! structural invariants up front so executors never meet a dangling target or a
//! flow that cannot terminate.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::flags::camel_to_kebab;
use crate::core::value::{Output, StateId, Value};

/// Upper bound on transitions per run unless the builder overrides it.
pub const DEFAULT_STEP_LIMIT: usize = 1_000;

/// Long flags owned by the command line itself.
pub const RESERVED_FLAGS: [&str; 4] = ["config", "schema", "yes", "help"];

/// Text validator: receives the candidate (or `None` when absent) and returns an
/// error message when the value is rejected.
pub type Validator = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

/// Future returned by a task effect.
pub type TaskFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Stored task effect.
pub type TaskEffect = Arc<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// Input handed to a task effect.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Snapshot of the values collected before the task started.
    pub values: Output,
    /// Cancelled when the run is aborted; long-running effects should observe it.
    pub cancel: CancellationToken,
}

/// Where a prompt state goes after producing a value.
pub enum Transition<T: ?Sized> {
    /// A fixed successor, or `None` to end the flow.
    Fixed(Option<StateId>),
    /// Successor computed from the produced value.
    Dynamic(Arc<dyn Fn(&T) -> Option<StateId> + Send + Sync>),
}

impl<T: ?Sized> Transition<T> {
    /// Resolve the successor. Dynamic transitions are invoked exactly once.
    pub fn resolve(&self, value: &T) -> Option<StateId> {
        match self {
            Transition::Fixed(next) => next.clone(),
            Transition::Dynamic(route) => route(value),
        }
    }

    /// Fixed target, if this transition is fixed and non-terminal.
    pub fn fixed_target(&self) -> Option<&str> {
        match self {
            Transition::Fixed(next) => next.as_deref(),
            Transition::Dynamic(_) => None,
        }
    }

    fn may_terminate_directly(&self) -> bool {
        match self {
            Transition::Fixed(next) => next.is_none(),
            // Dynamic routes are opaque; assume they can end the flow.
            Transition::Dynamic(_) => true,
        }
    }
}

impl<T: ?Sized> Clone for Transition<T> {
    fn clone(&self) -> Self {
        match self {
            Transition::Fixed(next) => Transition::Fixed(next.clone()),
            Transition::Dynamic(route) => Transition::Dynamic(Arc::clone(route)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Fixed(next) => f.debug_tuple("Fixed").field(next).finish(),
            Transition::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Free-form text prompt.
#[derive(Clone)]
pub struct TextState {
    pub message: String,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    /// Filled from the first positional command-line argument.
    pub positional: bool,
    pub validator: Option<Validator>,
    pub next: Transition<str>,
}

impl TextState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            placeholder: None,
            default: None,
            positional: false,
            validator: None,
            next: Transition::Fixed(None),
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn next(mut self, id: impl Into<StateId>) -> Self {
        self.next = Transition::Fixed(Some(id.into()));
        self
    }

    pub fn next_with<F>(mut self, route: F) -> Self
    where
        F: Fn(&str) -> Option<StateId> + Send + Sync + 'static,
    {
        self.next = Transition::Dynamic(Arc::new(route));
        self
    }

    /// Run the validator, if any.
    pub fn check(&self, value: Option<&str>) -> Option<String> {
        self.validator.as_ref().and_then(|validate| validate(value))
    }
}

impl fmt::Debug for TextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextState")
            .field("message", &self.message)
            .field("placeholder", &self.placeholder)
            .field("default", &self.default)
            .field("positional", &self.positional)
            .field("validator", &self.validator.is_some())
            .field("next", &self.next)
            .finish()
    }
}

/// One entry of a select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: Option<String>,
    pub hint: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            hint: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Label shown to the user; falls back to the value.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Single choice among a fixed list of options.
#[derive(Debug, Clone)]
pub struct SelectState {
    pub message: String,
    pub options: Vec<SelectOption>,
    pub default: Option<String>,
    pub next: Transition<str>,
}

impl SelectState {
    pub fn new(message: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            message: message.into(),
            options,
            default: None,
            next: Transition::Fixed(None),
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn next(mut self, id: impl Into<StateId>) -> Self {
        self.next = Transition::Fixed(Some(id.into()));
        self
    }

    pub fn next_with<F>(mut self, route: F) -> Self
    where
        F: Fn(&str) -> Option<StateId> + Send + Sync + 'static,
    {
        self.next = Transition::Dynamic(Arc::new(route));
        self
    }

    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.value.as_str())
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.option_values().any(|candidate| candidate == value)
    }
}

/// Yes/no prompt.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub default: Option<bool>,
    pub next: Transition<bool>,
}

impl ConfirmState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            next: Transition::Fixed(None),
        }
    }

    pub fn default_value(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }

    pub fn next(mut self, id: impl Into<StateId>) -> Self {
        self.next = Transition::Fixed(Some(id.into()));
        self
    }

    pub fn next_with<F>(mut self, route: F) -> Self
    where
        F: Fn(&bool) -> Option<StateId> + Send + Sync + 'static,
    {
        self.next = Transition::Dynamic(Arc::new(route));
        self
    }
}

/// Successors of a task state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskNext {
    pub ok: Option<StateId>,
    pub err: Option<StateId>,
}

/// Side-effecting step. Never contributes to the output.
#[derive(Clone)]
pub struct TaskState {
    pub message: String,
    pub effect: TaskEffect,
    pub next: TaskNext,
}

impl TaskState {
    pub fn new<F, Fut>(message: impl Into<String>, effect: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            message: message.into(),
            effect: Arc::new(move |ctx: TaskContext| -> TaskFuture { effect(ctx).boxed() }),
            next: TaskNext::default(),
        }
    }

    pub fn on_ok(mut self, id: impl Into<StateId>) -> Self {
        self.next.ok = Some(id.into());
        self
    }

    pub fn on_err(mut self, id: impl Into<StateId>) -> Self {
        self.next.err = Some(id.into());
        self
    }
}

impl fmt::Debug for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskState")
            .field("message", &self.message)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

/// States that produce a value.
#[derive(Debug, Clone)]
pub enum PromptState {
    Text(TextState),
    Select(SelectState),
    Confirm(ConfirmState),
}

impl PromptState {
    pub fn message(&self) -> &str {
        match self {
            PromptState::Text(text) => &text.message,
            PromptState::Select(select) => &select.message,
            PromptState::Confirm(confirm) => &confirm.message,
        }
    }

    /// Declared default as a [`Value`].
    pub fn default_value(&self) -> Option<Value> {
        match self {
            PromptState::Text(text) => text.default.clone().map(Value::Text),
            PromptState::Select(select) => select.default.clone().map(Value::Text),
            PromptState::Confirm(confirm) => confirm.default.map(Value::Bool),
        }
    }

    /// Placeholder value used only to pick a direction during dry runs.
    pub fn synthetic_value(&self) -> Value {
        match self {
            PromptState::Text(_) => Value::Text(String::new()),
            PromptState::Select(select) => Value::Text(
                select
                    .options
                    .first()
                    .map(|option| option.value.clone())
                    .unwrap_or_default(),
            ),
            PromptState::Confirm(_) => Value::Bool(false),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, PromptState::Text(text) if text.positional)
    }

    /// Whether the flag carries a boolean rather than a string.
    pub fn is_boolean(&self) -> bool {
        matches!(self, PromptState::Confirm(_))
    }

    fn fixed_target(&self) -> Option<&str> {
        match self {
            PromptState::Text(text) => text.next.fixed_target(),
            PromptState::Select(select) => select.next.fixed_target(),
            PromptState::Confirm(confirm) => confirm.next.fixed_target(),
        }
    }

    fn may_terminate_directly(&self) -> bool {
        match self {
            PromptState::Text(text) => text.next.may_terminate_directly(),
            PromptState::Select(select) => select.next.may_terminate_directly(),
            PromptState::Confirm(confirm) => confirm.next.may_terminate_directly(),
        }
    }
}

/// One node of the flow graph.
#[derive(Debug, Clone)]
pub enum State {
    Prompt(PromptState),
    Task(TaskState),
}

impl State {
    pub fn text(message: impl Into<String>) -> TextState {
        TextState::new(message)
    }

    pub fn select(message: impl Into<String>, options: Vec<SelectOption>) -> SelectState {
        SelectState::new(message, options)
    }

    pub fn confirm(message: impl Into<String>) -> ConfirmState {
        ConfirmState::new(message)
    }

    pub fn task<F, Fut>(message: impl Into<String>, effect: F) -> TaskState
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        TaskState::new(message, effect)
    }

    pub fn message(&self) -> &str {
        match self {
            State::Prompt(prompt) => prompt.message(),
            State::Task(task) => &task.message,
        }
    }

    pub fn as_prompt(&self) -> Option<&PromptState> {
        match self {
            State::Prompt(prompt) => Some(prompt),
            State::Task(_) => None,
        }
    }

    /// Fixed successors, used for structural checks.
    fn fixed_targets(&self) -> Vec<&str> {
        match self {
            State::Prompt(prompt) => prompt.fixed_target().into_iter().collect(),
            State::Task(task) => [task.next.ok.as_deref(), task.next.err.as_deref()]
                .into_iter()
                .flatten()
                .collect(),
        }
    }

    fn may_terminate_directly(&self) -> bool {
        match self {
            State::Prompt(prompt) => prompt.may_terminate_directly(),
            State::Task(task) => task.next.ok.is_none() || task.next.err.is_none(),
        }
    }
}

impl From<TextState> for State {
    fn from(state: TextState) -> Self {
        State::Prompt(PromptState::Text(state))
    }
}

impl From<SelectState> for State {
    fn from(state: SelectState) -> Self {
        State::Prompt(PromptState::Select(state))
    }
}

impl From<ConfirmState> for State {
    fn from(state: ConfirmState) -> Self {
        State::Prompt(PromptState::Confirm(state))
    }
}

impl From<TaskState> for State {
    fn from(state: TaskState) -> Self {
        State::Task(state)
    }
}

/// Structural problems detected while building a [`Machine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("machine has no states")]
    Empty,
    #[error("initial state '{0}' is not defined")]
    UnknownInitial(StateId),
    #[error("state '{0}' is defined more than once")]
    DuplicateState(StateId),
    #[error("state '{from}' transitions to undefined state '{target}'")]
    DanglingTarget { from: StateId, target: StateId },
    #[error("select state '{0}' has no options")]
    EmptyOptions(StateId),
    #[error("select state '{id}' defaults to '{value}', which is not one of its options")]
    InvalidDefault { id: StateId, value: String },
    #[error("states '{first}' and '{second}' are both positional")]
    MultiplePositional { first: StateId, second: StateId },
    #[error("state '{id}' would use the reserved flag --{flag}")]
    ReservedFlag { id: StateId, flag: String },
    #[error("states '{first}' and '{second}' would both use the flag --{flag}")]
    FlagCollision {
        first: StateId,
        second: StateId,
        flag: String,
    },
    #[error("state '{id}' does not map to a usable flag (got --{flag})")]
    InvalidFlag { id: StateId, flag: String },
    #[error("state '{0}' is reachable but can never reach the end of the flow")]
    NoTermination(StateId),
    #[error("step limit must be greater than zero")]
    ZeroStepLimit,
}

/// Immutable flow definition.
#[derive(Debug, Clone)]
pub struct Machine {
    initial: StateId,
    states: IndexMap<StateId, State>,
    step_limit: usize,
}

impl Machine {
    pub fn builder(initial: impl Into<StateId>) -> MachineBuilder {
        MachineBuilder {
            initial: initial.into(),
            states: IndexMap::new(),
            duplicates: Vec::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// States in declaration order.
    pub fn states(&self) -> &IndexMap<StateId, State> {
        &self.states
    }

    pub fn get(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// Maximum number of transitions a single walk may take.
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Prompt states in declaration order.
    pub fn prompts(&self) -> impl Iterator<Item = (&str, &PromptState)> {
        self.states
            .iter()
            .filter_map(|(id, state)| state.as_prompt().map(|prompt| (id.as_str(), prompt)))
    }

    /// Id of the state fed by the positional argument, if any.
    pub fn positional(&self) -> Option<&str> {
        self.prompts()
            .find(|(_, prompt)| prompt.is_positional())
            .map(|(id, _)| id)
    }
}

/// Incremental [`Machine`] constructor.
#[derive(Debug)]
pub struct MachineBuilder {
    initial: StateId,
    states: IndexMap<StateId, State>,
    duplicates: Vec<StateId>,
    step_limit: usize,
}

impl MachineBuilder {
    pub fn state(mut self, id: impl Into<StateId>, state: impl Into<State>) -> Self {
        let id = id.into();
        if self.states.contains_key(&id) {
            self.duplicates.push(id);
            return self;
        }
        self.states.insert(id, state.into());
        self
    }

    pub fn step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Validate the definition and freeze it.
    pub fn build(self) -> Result<Machine, DefinitionError> {
        if let Some(id) = self.duplicates.into_iter().next() {
            return Err(DefinitionError::DuplicateState(id));
        }
        if self.states.is_empty() {
            return Err(DefinitionError::Empty);
        }
        if self.step_limit == 0 {
            return Err(DefinitionError::ZeroStepLimit);
        }
        if !self.states.contains_key(&self.initial) {
            return Err(DefinitionError::UnknownInitial(self.initial));
        }
        check_states(&self.states)?;
        check_termination(&self.initial, &self.states)?;
        Ok(Machine {
            initial: self.initial,
            states: self.states,
            step_limit: self.step_limit,
        })
    }
}

fn check_states(states: &IndexMap<StateId, State>) -> Result<(), DefinitionError> {
    let mut positional: Option<&str> = None;
    let mut flags: HashMap<String, &str> = HashMap::new();
    for (id, state) in states {
        if state.as_prompt().is_some() {
            let flag = camel_to_kebab(id);
            if flag.is_empty()
                || flag.starts_with('-')
                || flag.contains(|ch: char| ch == '=' || ch.is_whitespace())
            {
                return Err(DefinitionError::InvalidFlag {
                    id: id.clone(),
                    flag,
                });
            }
            if RESERVED_FLAGS.contains(&flag.as_str()) {
                return Err(DefinitionError::ReservedFlag {
                    id: id.clone(),
                    flag,
                });
            }
            if let Some(first) = flags.get(&flag) {
                return Err(DefinitionError::FlagCollision {
                    first: (*first).to_string(),
                    second: id.clone(),
                    flag,
                });
            }
            flags.insert(flag, id);
        }
        for target in state.fixed_targets() {
            if !states.contains_key(target) {
                return Err(DefinitionError::DanglingTarget {
                    from: id.clone(),
                    target: target.to_string(),
                });
            }
        }
        match state {
            State::Prompt(PromptState::Select(select)) => {
                if select.options.is_empty() {
                    return Err(DefinitionError::EmptyOptions(id.clone()));
                }
                if let Some(default) = &select.default {
                    if !select.has_option(default) {
                        return Err(DefinitionError::InvalidDefault {
                            id: id.clone(),
                            value: default.clone(),
                        });
                    }
                }
            }
            State::Prompt(PromptState::Text(text)) if text.positional => {
                if let Some(first) = positional {
                    return Err(DefinitionError::MultiplePositional {
                        first: first.to_string(),
                        second: id.clone(),
                    });
                }
                positional = Some(id);
            }
            State::Prompt(PromptState::Text(_) | PromptState::Confirm(_)) | State::Task(_) => {}
        }
    }
    Ok(())
}

/// Reject flows where a reachable state has no path to the end.
///
/// Only fixed edges are followed; dynamic routes count as possible exits.
fn check_termination(
    initial: &str,
    states: &IndexMap<StateId, State>,
) -> Result<(), DefinitionError> {
    let mut terminates: HashSet<&str> = states
        .iter()
        .filter(|(_, state)| state.may_terminate_directly())
        .map(|(id, _)| id.as_str())
        .collect();
    loop {
        let before = terminates.len();
        for (id, state) in states {
            if terminates.contains(id.as_str()) {
                continue;
            }
            if state
                .fixed_targets()
                .iter()
                .any(|target| terminates.contains(target))
            {
                terminates.insert(id.as_str());
            }
        }
        if terminates.len() == before {
            break;
        }
    }

    let mut reachable: HashSet<&str> = HashSet::new();
    let mut pending = vec![initial];
    while let Some(id) = pending.pop() {
        if !reachable.insert(id) {
            continue;
        }
        if let Some(state) = states.get(id) {
            pending.extend(state.fixed_targets());
        }
    }

    for id in states.keys() {
        if reachable.contains(id.as_str()) && !terminates.contains(id.as_str()) {
            return Err(DefinitionError::NoTermination(id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<SelectOption> {
        values.iter().map(|value| SelectOption::new(*value)).collect()
    }

    #[test]
    fn build_accepts_linear_flow() {
        let machine = Machine::builder("name")
            .state("name", State::text("Name").positional().next("color"))
            .state(
                "color",
                State::select("Color", options(&["a", "b"])).default_value("a"),
            )
            .build()
            .expect("build");
        assert_eq!(machine.initial(), "name");
        assert_eq!(machine.positional(), Some("name"));
        let ids: Vec<&str> = machine.prompts().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["name", "color"]);
    }

    #[test]
    fn build_rejects_unknown_initial() {
        let err = Machine::builder("missing")
            .state("name", State::text("Name"))
            .build()
            .expect_err("should fail");
        assert_eq!(err, DefinitionError::UnknownInitial("missing".to_string()));
    }

    #[test]
    fn build_rejects_dangling_targets() {
        let err = Machine::builder("name")
            .state("name", State::text("Name").next("nowhere"))
            .build()
            .expect_err("should fail");
        assert_eq!(
            err,
            DefinitionError::DanglingTarget {
                from: "name".to_string(),
                target: "nowhere".to_string(),
            }
        );

        let err = Machine::builder("work")
            .state("work", State::task("Work", |_| async { Ok(()) }).on_err("gone"))
            .build()
            .expect_err("should fail");
        assert!(matches!(err, DefinitionError::DanglingTarget { .. }));
    }

    #[test]
    fn build_rejects_bad_select_definitions() {
        let err = Machine::builder("pick")
            .state("pick", State::select("Pick", Vec::new()))
            .build()
            .expect_err("should fail");
        assert_eq!(err, DefinitionError::EmptyOptions("pick".to_string()));

        let err = Machine::builder("pick")
            .state(
                "pick",
                State::select("Pick", options(&["a"])).default_value("z"),
            )
            .build()
            .expect_err("should fail");
        assert!(err.to_string().contains("not one of its options"));
    }

    #[test]
    fn build_rejects_second_positional() {
        let err = Machine::builder("a")
            .state("a", State::text("A").positional().next("b"))
            .state("b", State::text("B").positional())
            .build()
            .expect_err("should fail");
        assert!(matches!(err, DefinitionError::MultiplePositional { .. }));
    }

    #[test]
    fn build_rejects_reserved_flag_names() {
        let err = Machine::builder("yes")
            .state("yes", State::confirm("Proceed?"))
            .build()
            .expect_err("should fail");
        assert_eq!(err.to_string(), "state 'yes' would use the reserved flag --yes");
    }

    #[test]
    fn build_rejects_ids_sharing_a_flag() {
        let err = Machine::builder("projectName")
            .state("projectName", State::text("Name").next("project-name"))
            .state("project-name", State::text("Name again"))
            .build()
            .expect_err("should fail");
        assert_eq!(
            err,
            DefinitionError::FlagCollision {
                first: "projectName".to_string(),
                second: "project-name".to_string(),
                flag: "project-name".to_string(),
            }
        );

        let machine = Machine::builder("workDone")
            .state("workDone", State::task("Work", |_| async { Ok(()) }).on_ok("work-done"))
            .state("work-done", State::confirm("Done?"))
            .build();
        assert!(machine.is_ok(), "tasks have no flag to collide with");
    }

    #[test]
    fn build_rejects_ids_without_a_usable_flag() {
        let err = Machine::builder("Name")
            .state("Name", State::text("Name"))
            .build()
            .expect_err("should fail");
        assert_eq!(
            err,
            DefinitionError::InvalidFlag {
                id: "Name".to_string(),
                flag: "-name".to_string(),
            }
        );

        for id in ["", "out dir", "a=b"] {
            let err = Machine::builder(id)
                .state(id, State::confirm("Bad?"))
                .build()
                .expect_err("should fail");
            assert!(matches!(err, DefinitionError::InvalidFlag { .. }), "{id:?}");
        }
    }

    #[test]
    fn build_rejects_duplicate_ids() {
        let err = Machine::builder("a")
            .state("a", State::text("A"))
            .state("a", State::confirm("A again"))
            .build()
            .expect_err("should fail");
        assert_eq!(err, DefinitionError::DuplicateState("a".to_string()));
    }

    #[test]
    fn build_rejects_closed_cycles() {
        let err = Machine::builder("a")
            .state("a", State::text("A").next("b"))
            .state("b", State::confirm("B").next("a"))
            .build()
            .expect_err("should fail");
        assert_eq!(err, DefinitionError::NoTermination("a".to_string()));
    }

    #[test]
    fn build_allows_cycles_with_an_exit() {
        let machine = Machine::builder("a")
            .state("a", State::text("A").next("again"))
            .state(
                "again",
                State::confirm("Again?").next_with(|again| again.then(|| "a".to_string())),
            )
            .build();
        assert!(machine.is_ok());

        let machine = Machine::builder("retry")
            .state(
                "retry",
                State::task("Flaky", |_| async { Ok(()) })
                    .on_ok("done")
                    .on_err("retry"),
            )
            .state("done", State::confirm("Done?"))
            .build();
        assert!(machine.is_ok());
    }

    #[test]
    fn build_ignores_unreachable_cycles() {
        let machine = Machine::builder("start")
            .state("start", State::confirm("Start?"))
            .state("x", State::confirm("X").next("y"))
            .state("y", State::confirm("Y").next("x"))
            .build();
        assert!(machine.is_ok());
    }

    #[test]
    fn synthetic_values_pick_a_direction() {
        let select: PromptState = PromptState::Select(SelectState::new("S", options(&["x", "y"])));
        assert_eq!(select.synthetic_value(), Value::from("x"));
        let confirm = PromptState::Confirm(ConfirmState::new("C"));
        assert_eq!(confirm.synthetic_value(), Value::from(false));
        let text = PromptState::Text(TextState::new("T"));
        assert_eq!(text.synthetic_value(), Value::from(""));
    }
}
