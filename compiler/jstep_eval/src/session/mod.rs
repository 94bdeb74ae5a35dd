//! Debugging session: the step / step-back / run / reset command surface.
//!
//! A [`Session`] owns the parsed program and all mutable execution state:
//! the unit pointer, the [`Scope`], the control frames and the output
//! buffer. After every command it publishes an [`ExecutionState`] snapshot
//! for the host UI.
//!
//! Stepping back does not replay the program. Before each step the session
//! records a [`Snapshot`] of the state it is about to change; scope values
//! share storage between versions, so a snapshot costs one shallow copy of
//! the binding table. Undo pops the latest snapshot.

mod config;

use jstep_parse::{parse_program, Program};
use serde::Serialize;

use crate::errors::{self, EvalError, EvalErrorKind};
use crate::exec::{ControlStack, Executor, Flow};
use crate::scope::{Scope, Variable};

pub use config::{SessionConfig, UnsupportedPolicy, DEFAULT_MAX_STEPS};

/// Label of the only call-stack frame; user function bodies are never
/// entered.
pub const GLOBAL_FRAME: &str = "(global)";

/// A terminal error with the source line it occurred on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub name: EvalErrorKind,
    pub message: String,
    /// 1-based source line.
    pub line: u32,
}

impl ErrorInfo {
    fn new(error: EvalError, line: u32) -> Self {
        ErrorInfo {
            name: error.kind,
            message: error.message,
            line,
        }
    }
}

/// State published after every command.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    /// Visible bindings sorted by name, flagged if the last step changed them.
    pub variables: Vec<Variable>,
    /// 1-based line of the next unit; one past the last line once complete.
    pub current_line: u32,
    pub call_stack: Vec<String>,
    pub output: Vec<String>,
    pub is_complete: bool,
    pub error: Option<ErrorInfo>,
}

impl Default for ExecutionState {
    fn default() -> Self {
        ExecutionState {
            variables: Vec::new(),
            current_line: 1,
            call_stack: vec![GLOBAL_FRAME.to_string()],
            output: Vec::new(),
            is_complete: false,
            error: None,
        }
    }
}

/// State restored by `step_back`.
#[derive(Clone, Debug)]
struct Snapshot {
    pointer: usize,
    scope: Scope,
    frames: ControlStack,
    output_len: usize,
    steps: usize,
}

/// A step-through execution of one program.
pub struct Session {
    config: SessionConfig,
    source: String,
    program: Program,
    scope: Scope,
    frames: ControlStack,
    output: Vec<String>,
    /// Index of the next unit to execute.
    pointer: usize,
    /// Units executed since initialization.
    steps: usize,
    history: Vec<Snapshot>,
    error: Option<ErrorInfo>,
    state: ExecutionState,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            config,
            source: String::new(),
            program: Program::default(),
            scope: Scope::new(),
            frames: ControlStack::new(),
            output: Vec::new(),
            pointer: 0,
            steps: 0,
            history: Vec::new(),
            error: None,
            state: ExecutionState::default(),
        }
    }

    /// Convenience constructor: a session with `source` already loaded.
    pub fn with_source(config: SessionConfig, source: &str) -> Self {
        let mut session = Session::new(config);
        session.initialize_code(source);
        session
    }

    /// Load a program and reset all execution state.
    ///
    /// A source that does not parse leaves an empty program and publishes
    /// the `SyntaxError` immediately.
    pub fn initialize_code(&mut self, source: &str) {
        self.source = source.to_string();
        self.scope = Scope::new();
        self.frames = ControlStack::new();
        self.output.clear();
        self.pointer = 0;
        self.steps = 0;
        self.history.clear();
        self.error = None;

        match parse_program(source) {
            Ok(program) => {
                tracing::debug!(
                    units = program.units.len(),
                    functions = program.functions.len(),
                    "session initialized"
                );
                self.program = program;
            }
            Err(error) => {
                tracing::debug!(line = error.line, message = %error.message, "program failed to parse");
                self.program = Program::default();
                self.error = Some(ErrorInfo::new(errors::from_parse(&error), error.line));
            }
        }
        self.publish(Vec::new());
    }

    /// Execute one unit. Returns whether more units remain and no error
    /// stopped execution.
    #[tracing::instrument(level = "debug", skip_all, fields(pointer = self.pointer))]
    pub fn step(&mut self) -> bool {
        if !self.can_step() {
            return false;
        }

        self.execute_one();
        let variables = self.diff_against_last_snapshot();
        self.publish(variables);
        self.can_step()
    }

    /// Undo the most recent step. Returns `false` when there is nothing to
    /// undo. Clears an error raised by the undone step.
    pub fn step_back(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        tracing::debug!(pointer = snapshot.pointer, "step back");

        self.pointer = snapshot.pointer;
        self.scope = snapshot.scope;
        self.frames = snapshot.frames;
        self.output.truncate(snapshot.output_len);
        self.steps = snapshot.steps;
        self.error = None;

        let variables = self.diff_against_last_snapshot();
        self.publish(variables);
        true
    }

    /// Step until completion, an error, or `max_steps` steps. Hitting the
    /// ceiling raises a `Timeout` error at the current line and keeps all
    /// state up to that point.
    pub fn run_to_end(&mut self) {
        if self.error.is_some() {
            return;
        }

        let mut executed = 0;
        while self.can_step() {
            if executed >= self.config.max_steps {
                let line = self.current_line();
                tracing::warn!(max_steps = self.config.max_steps, line, "step ceiling reached");
                self.error = Some(ErrorInfo::new(errors::timeout(self.config.max_steps), line));
                break;
            }
            self.execute_one();
            executed += 1;
        }
        tracing::debug!(executed, complete = self.is_complete(), "run finished");

        let variables = self.diff_against_last_snapshot();
        self.publish(variables);
    }

    /// Reload the current source.
    pub fn reset(&mut self) {
        let source = std::mem::take(&mut self.source);
        self.initialize_code(&source);
    }

    /// The most recently published state.
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// Units executed since the program was loaded.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether every unit has run without error.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.pointer >= self.program.units.len()
    }

    pub fn can_step(&self) -> bool {
        self.error.is_none() && self.pointer < self.program.units.len()
    }

    pub fn can_step_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// 1-based line of the next unit, or one past the last line.
    pub fn current_line(&self) -> u32 {
        self.program
            .line_of(self.pointer)
            .unwrap_or(self.program.line_count + 1)
    }

    /// Run the unit under the pointer and record the undo snapshot.
    fn execute_one(&mut self) {
        let snapshot = Snapshot {
            pointer: self.pointer,
            scope: self.scope.clone(),
            frames: self.frames.clone(),
            output_len: self.output.len(),
            steps: self.steps,
        };

        let result = Executor::new(
            &self.program,
            &mut self.scope,
            &mut self.frames,
            &mut self.output,
            self.config.unsupported,
        )
        .execute(self.pointer);

        self.history.push(snapshot);
        self.steps += 1;

        let unit_count = self.program.units.len();
        match result {
            Ok(Flow::Next) => self.pointer += 1,
            Ok(Flow::Jump(target)) => self.pointer = target.min(unit_count),
            Err(error) => {
                let line = self.current_line();
                tracing::debug!(line, %error, "step failed");
                self.error = Some(ErrorInfo::new(error, line));
            }
        }
    }

    /// Variables flagged against the scope before the latest recorded step.
    fn diff_against_last_snapshot(&self) -> Vec<Variable> {
        match self.history.last() {
            Some(snapshot) => self.scope.diff(&snapshot.scope),
            None => self.scope.diff(&Scope::new()),
        }
    }

    fn publish(&mut self, variables: Vec<Variable>) {
        self.state = ExecutionState {
            variables,
            current_line: self.current_line(),
            call_stack: vec![GLOBAL_FRAME.to_string()],
            output: self.output.clone(),
            is_complete: self.is_complete(),
            error: self.error.clone(),
        };
    }
}

#[cfg(test)]
mod tests;
