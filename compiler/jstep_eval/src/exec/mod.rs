//! Statement execution.
//!
//! [`Executor::execute`] runs one unit and reports where execution goes
//! next. Block headers consult and update the [`ControlStack`]; every other
//! statement is a scope or output effect computed by the
//! [`Evaluator`](crate::eval::Evaluator).

pub mod control;

use jstep_ir::{AssignTarget, Binding, DeclKind, Declarator, Expr, Stmt};
use jstep_parse::{Branch, ParseErrorKind, Program, UnitKind};

use crate::errors::{self, EvalError};
use crate::eval::{evaluate_binary, Evaluator};
use crate::scope::{Mutability, Scope, RETURN_SLOT};
use crate::session::UnsupportedPolicy;
use crate::value::Value;

pub use control::{ControlStack, Flow, Frame, LoopFrame, LoopKind};

/// Executes units of one program against borrowed session state.
pub struct Executor<'a> {
    program: &'a Program,
    scope: &'a mut Scope,
    frames: &'a mut ControlStack,
    output: &'a mut Vec<String>,
    policy: UnsupportedPolicy,
}

impl<'a> Executor<'a> {
    pub fn new(
        program: &'a Program,
        scope: &'a mut Scope,
        frames: &'a mut ControlStack,
        output: &'a mut Vec<String>,
        policy: UnsupportedPolicy,
    ) -> Self {
        Executor {
            program,
            scope,
            frames,
            output,
            policy,
        }
    }

    fn evaluator(&mut self) -> Evaluator<'_> {
        Evaluator::new(self.scope, self.output, &self.program.functions)
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        self.evaluator().eval(expr)
    }

    /// Execute the unit at `index`.
    pub fn execute(&mut self, index: usize) -> Result<Flow, EvalError> {
        let program = self.program;
        let Some(unit) = program.units.get(index) else {
            return Ok(Flow::Next);
        };
        tracing::trace!(unit = index, line = unit.line, "execute");

        let stmt = match &unit.stmt {
            Ok(stmt) => stmt,
            Err(error) => {
                if error.kind == ParseErrorKind::Unsupported
                    && self.policy == UnsupportedPolicy::Ignore
                {
                    tracing::warn!(line = unit.line, message = %error.message, "ignoring unsupported syntax");
                    return Ok(match unit.kind {
                        // An `if` or `else if` takes the rest of its chain
                        // with it; other headers skip just their block.
                        UnitKind::Header => {
                            let end = self.end_of(index)?;
                            if unit.branch.is_some_and(Branch::takes_else) {
                                Flow::Jump(program.blocks.else_chain_exit(&program.units, end))
                            } else {
                                Flow::Jump(end + 1)
                            }
                        }
                        UnitKind::Statement | UnitKind::BlockEnd => Flow::Next,
                    });
                }
                return Err(errors::from_parse(error));
            }
        };

        match stmt {
            Stmt::Declaration { .. }
            | Stmt::Assign { .. }
            | Stmt::CompoundAssign { .. }
            | Stmt::IncDec { .. }
            | Stmt::Destructure { .. }
            | Stmt::Expr(_) => {
                self.run_simple(stmt)?;
                Ok(Flow::Next)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Undefined,
                };
                self.scope.define(RETURN_SLOT, value, Mutability::Mutable);
                Ok(Flow::Next)
            }
            Stmt::Break => self.break_loop(),
            Stmt::Continue => self.continue_loop(),
            Stmt::FunctionDecl { name, .. } => {
                let end = self.end_of(index)?;
                tracing::debug!(function = %name, to = end + 1, "skip function body");
                Ok(Flow::Jump(end + 1))
            }
            Stmt::ForHeader {
                init, condition, ..
            } => self.enter_loop(index, LoopKind::For, init.as_deref(), condition.as_ref()),
            Stmt::WhileHeader { condition } => {
                self.enter_loop(index, LoopKind::While, None, Some(condition))
            }
            Stmt::IfHeader { condition } => self.branch(index, Some(condition)),
            Stmt::Else { condition } => self.branch(index, condition.as_ref()),
            Stmt::BlockEnd => self.close_block(index),
        }
    }

    fn end_of(&self, header: usize) -> Result<usize, EvalError> {
        self.program
            .blocks
            .end_of(header)
            .ok_or_else(errors::unexpected_end_of_input)
    }

    fn declare(&mut self, kind: DeclKind, declarators: &[Declarator]) -> Result<(), EvalError> {
        let mutability = if kind.is_const() {
            Mutability::Immutable
        } else {
            Mutability::Mutable
        };
        for declarator in declarators {
            match &declarator.binding {
                Binding::Name(name) => {
                    let value = match &declarator.init {
                        Some(init) => self.eval(init)?,
                        None => Value::Undefined,
                    };
                    self.scope.define(name.as_str(), value, mutability);
                }
                Binding::Array(names) => {
                    let items = self.iterate(declarator.init.as_ref())?;
                    for (i, name) in names.iter().enumerate() {
                        if let Some(name) = name {
                            let item = items.get(i).cloned().unwrap_or(Value::Undefined);
                            self.scope.define(name.as_str(), item, mutability);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Elements of a destructuring source: an array or the characters of a
    /// string.
    fn iterate(&mut self, source: Option<&Expr>) -> Result<Vec<Value>, EvalError> {
        let value = match source {
            Some(expr) => self.eval(expr)?,
            None => Value::Undefined,
        };
        match value {
            Value::Array(items) => Ok(items.to_vec()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            other => {
                let what = source.map_or_else(|| other.to_js_string(), ToString::to_string);
                Err(errors::not_iterable(&what))
            }
        }
    }

    fn condition_holds(&mut self, condition: Option<&Expr>) -> Result<bool, EvalError> {
        match condition {
            Some(expr) => Ok(self.eval(expr)?.is_truthy()),
            None => Ok(true),
        }
    }

    /// A `for` or `while` header.
    ///
    /// Re-entry from the loop's own `}` finds the condition already checked
    /// there, so the header falls straight into the body. On first entry
    /// `init` runs and the condition decides between entering the body and
    /// jumping to the `}`, which then passes through.
    fn enter_loop(
        &mut self,
        header: usize,
        kind: LoopKind,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
    ) -> Result<Flow, EvalError> {
        if self.frames.is_reentry(header) {
            return Ok(Flow::Next);
        }

        let end = self.end_of(header)?;
        if let Some(init) = init {
            self.run_simple(init)?;
        }
        if self.condition_holds(condition)? {
            tracing::debug!(header, end, ?kind, "enter loop");
            self.frames.push(Frame::Loop(LoopFrame {
                reentry: header,
                end,
                kind,
            }));
            Ok(Flow::Next)
        } else {
            tracing::debug!(header, end, "loop condition false on entry");
            Ok(Flow::Jump(end))
        }
    }

    /// An `if`, `else if` or `else` header.
    fn branch(&mut self, header: usize, condition: Option<&Expr>) -> Result<Flow, EvalError> {
        let end = self.end_of(header)?;
        if self.condition_holds(condition)? {
            self.frames.push(Frame::Conditional { header, end });
            Ok(Flow::Next)
        } else {
            tracing::debug!(header, to = end + 1, "branch not taken");
            Ok(Flow::Jump(end + 1))
        }
    }

    /// A closing `}`.
    fn close_block(&mut self, end: usize) -> Result<Flow, EvalError> {
        match self.frames.top() {
            Some(Frame::Loop(frame)) if frame.end == end => {
                let frame = frame.clone();
                self.next_iteration(&frame)
            }
            Some(Frame::Conditional { end: cond_end, .. }) if *cond_end == end => {
                self.frames.pop();
                let exit = self.program.blocks.else_chain_exit(&self.program.units, end);
                Ok(if exit == end + 1 {
                    Flow::Next
                } else {
                    Flow::Jump(exit)
                })
            }
            // Loop whose condition failed on entry, or a skipped block.
            _ => Ok(Flow::Next),
        }
    }

    /// Loop back-edge: apply the update, then test the condition.
    fn next_iteration(&mut self, frame: &LoopFrame) -> Result<Flow, EvalError> {
        let program = self.program;
        let (condition, update) = match program.units.get(frame.reentry).map(|u| &u.stmt) {
            Some(Ok(Stmt::ForHeader {
                condition, update, ..
            })) => (condition.as_ref(), update.as_deref()),
            Some(Ok(Stmt::WhileHeader { condition })) => (Some(condition), None),
            _ => (None, None),
        };

        if let Some(update) = update {
            self.run_simple(update)?;
        }
        if self.condition_holds(condition)? {
            tracing::trace!(header = frame.reentry, "loop back-edge");
            Ok(Flow::Jump(frame.reentry))
        } else {
            tracing::debug!(header = frame.reentry, "loop exit");
            self.frames.pop();
            Ok(Flow::Next)
        }
    }

    fn break_loop(&mut self) -> Result<Flow, EvalError> {
        let (depth, end) = match self.frames.innermost_loop() {
            Some((depth, frame)) => (depth, frame.end),
            None => return Err(errors::illegal_break()),
        };
        self.frames.truncate(depth);
        tracing::debug!(to = end + 1, "break");
        Ok(Flow::Jump(end + 1))
    }

    fn continue_loop(&mut self) -> Result<Flow, EvalError> {
        let (depth, end) = match self.frames.innermost_loop() {
            Some((depth, frame)) => (depth, frame.end),
            None => return Err(errors::illegal_continue()),
        };
        // Keep the loop frame itself; its `}` runs the update and condition.
        self.frames.truncate(depth + 1);
        tracing::debug!(to = end, "continue");
        Ok(Flow::Jump(end))
    }

    /// Statements with only scope or output effects. These also make up
    /// the `init` and `update` clauses of a `for` header.
    fn run_simple(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match stmt {
            Stmt::Declaration { kind, declarators } => self.declare(*kind, declarators),
            Stmt::Assign { target, value } => {
                let mut ev = self.evaluator();
                let place = ev.resolve(target)?;
                let value = ev.eval(value)?;
                ev.write_resolved(&place, value)
            }
            Stmt::CompoundAssign { target, op, value } => {
                let mut ev = self.evaluator();
                let place = ev.resolve(target)?;
                let current = ev.read_resolved(&place)?;
                let rhs = ev.eval(value)?;
                let value = evaluate_binary(*op, &current, &rhs)?;
                ev.write_resolved(&place, value)
            }
            Stmt::IncDec { target, op, .. } => {
                let mut ev = self.evaluator();
                let place = ev.resolve(target)?;
                let current = ev.read_resolved(&place)?.to_number();
                ev.write_resolved(&place, Value::Number(current + op.delta()))
            }
            Stmt::Destructure { targets, value } => {
                let items = self.iterate(Some(value))?;
                let mut ev = self.evaluator();
                for (i, target) in targets.iter().enumerate() {
                    if let AssignTarget::Place(place) = target {
                        let resolved = ev.resolve(place)?;
                        let item = items.get(i).cloned().unwrap_or(Value::Undefined);
                        ev.write_resolved(&resolved, item)?;
                    }
                }
                Ok(())
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
                Ok(())
            }
            _ => Err(errors::unsupported("this statement in a `for` clause")),
        }
    }
}

#[cfg(test)]
mod tests;
