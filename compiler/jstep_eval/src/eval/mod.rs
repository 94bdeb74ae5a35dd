//! Expression evaluation.
//!
//! [`Evaluator`] borrows the session's scope and output buffer for the
//! duration of one statement. Method calls such as `arr.push(x)` write back
//! into the scope through the receiver's [`Place`](jstep_ir::Place), so
//! evaluation needs mutable access even though most expressions are pure.
//!
//! User-defined functions are resolved against the [`FunctionRegistry`] but
//! their bodies are never entered: a call evaluates its arguments and
//! returns `undefined`.

mod builtins;
mod methods;
mod operators;
mod place;

use jstep_ir::{Expr, ListItem, LogicalOp, TemplateSegment, UnaryOp};
use jstep_parse::FunctionRegistry;
use jstep_stack::ensure_sufficient_stack;

use crate::errors::{self, EvalError, EvalResult};
use crate::scope::Scope;
use crate::value::limits::{check_array_length, push_bounded};
use crate::value::{Object, Value};

pub use operators::{evaluate_binary, evaluate_unary};
pub use place::{get_key, get_property, Key, ResolvedPlace};

/// Evaluates expressions against a scope.
pub struct Evaluator<'a> {
    scope: &'a mut Scope,
    output: &'a mut Vec<String>,
    functions: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        scope: &'a mut Scope,
        output: &'a mut Vec<String>,
        functions: &'a FunctionRegistry,
    ) -> Self {
        Evaluator {
            scope,
            output,
            functions,
        }
    }

    /// Evaluate an expression.
    ///
    /// Runs under `ensure_sufficient_stack`, so deeply nested expressions
    /// grow the stack instead of overflowing it.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::string(s.as_str())),
            Expr::Template(segments) => self.eval_template(segments),
            Expr::Bool(b) => Ok(Value::Boolean(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Undefined => Ok(Value::Undefined),
            Expr::Ident(name) => self.lookup(name),
            Expr::Array(items) => Ok(Value::array(self.eval_list(items)?)),
            Expr::Object(fields) => {
                let mut object = Object::new();
                for (key, value) in fields {
                    let value = self.eval(value)?;
                    object.insert(key.as_str(), value);
                }
                Ok(Value::object(object))
            }
            Expr::Member { object, property } => self.eval_member(object, property),
            Expr::Index { object, index } => {
                let target = self.eval(object)?;
                let key = self.eval(index)?;
                get_key(&target, &Key::from_value(&key))
            }
            Expr::Call { callee, args } => self.eval_call(callee, args),
            Expr::Unary {
                op: UnaryOp::Typeof,
                operand,
            } => self.eval_typeof(operand),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Ok(evaluate_unary(*op, &value))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                evaluate_binary(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left)?;
                let short_circuits = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test)?.is_truthy() {
                    self.eval(consequent)
                } else {
                    self.eval(alternate)
                }
            }
        }
    }

    /// Value of an identifier.
    pub fn lookup(&self, name: &str) -> EvalResult {
        if let Some(value) = self.scope.lookup(name) {
            return Ok(value.clone());
        }
        if let Some(value) = builtins::global_value(name) {
            return Ok(value);
        }
        if self.functions.contains(name) || builtins::is_global_function(name) {
            return Err(errors::function_as_value(name));
        }
        if builtins::is_namespace(name) {
            return Err(errors::unsupported(&format!("`{name}` as a value")));
        }
        Err(errors::not_defined(name))
    }

    /// The builtin namespace `expr` names, unless a variable shadows it.
    fn namespace_ref(&self, expr: &Expr) -> Option<&'static str> {
        match expr {
            Expr::Ident(name) if !self.scope.contains(name) => builtins::NAMESPACES
                .iter()
                .copied()
                .find(|ns| *ns == name.as_str()),
            _ => None,
        }
    }

    fn eval_member(&mut self, object: &Expr, property: &str) -> EvalResult {
        if let Some(namespace) = self.namespace_ref(object) {
            return Ok(builtins::namespace_constant(namespace, property).unwrap_or(Value::Undefined));
        }
        let target = self.eval(object)?;
        get_property(&target, property)
    }

    /// `typeof` does not throw for undeclared names.
    fn eval_typeof(&mut self, operand: &Expr) -> EvalResult {
        if let Expr::Ident(name) = operand {
            if !self.scope.contains(name) {
                let tag = if self.functions.contains(name) || builtins::is_global_function(name) {
                    "function"
                } else if builtins::is_namespace(name) {
                    "object"
                } else if let Some(value) = builtins::global_value(name) {
                    value.typeof_name()
                } else {
                    "undefined"
                };
                return Ok(Value::string(tag));
            }
        }
        let value = self.eval(operand)?;
        Ok(Value::string(value.typeof_name()))
    }

    fn eval_template(&mut self, segments: &[TemplateSegment]) -> EvalResult {
        let mut text = String::new();
        for segment in segments {
            match segment {
                TemplateSegment::Text(part) => push_bounded(&mut text, part)?,
                TemplateSegment::Interpolation(expr) => self.eval(expr)?.write_js_string(&mut text)?,
            }
        }
        Ok(Value::string(text))
    }

    /// Evaluate array-literal items or call arguments, expanding spreads.
    pub fn eval_list(&mut self, items: &[ListItem]) -> Result<Vec<Value>, EvalError> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ListItem::Item(expr) => values.push(self.eval(expr)?),
                ListItem::Spread(expr) => match self.eval(expr)? {
                    Value::Array(spread) => {
                        check_array_length(values.len() + spread.len())?;
                        values.extend(spread.iter().cloned());
                    }
                    Value::Str(s) => {
                        check_array_length(values.len() + s.chars().count())?;
                        values.extend(s.chars().map(|c| Value::string(c.to_string())));
                    }
                    _ => return Err(errors::not_iterable(&expr.to_string())),
                },
            }
        }
        Ok(values)
    }

    fn eval_call(&mut self, callee: &Expr, args: &[ListItem]) -> EvalResult {
        match callee {
            Expr::Ident(name) => self.call_function(name, args),
            Expr::Member { object, property } => self.call_method(callee, object, property, args),
            other => {
                self.eval(other)?;
                self.eval_list(args)?;
                Err(errors::not_a_function(&other.to_string()))
            }
        }
    }

    fn call_function(&mut self, name: &str, args: &[ListItem]) -> EvalResult {
        if self.scope.contains(name) {
            return Err(errors::not_a_function(name));
        }
        let functions = self.functions;
        if let Some(def) = functions.get(name) {
            let argv = self.eval_list(args)?;
            tracing::debug!(
                function = %def.name,
                params = def.params.len(),
                args = argv.len(),
                "user function called; body is not executed"
            );
            return Ok(Value::Undefined);
        }
        if !builtins::is_global_function(name) {
            return Err(errors::not_defined(name));
        }
        let argv = self.eval_list(args)?;
        builtins::call_global(name, &argv).unwrap_or_else(|| Err(errors::not_defined(name)))
    }

    fn call_method(
        &mut self,
        callee: &Expr,
        object: &Expr,
        method: &str,
        args: &[ListItem],
    ) -> EvalResult {
        if let Some(namespace) = self.namespace_ref(object) {
            let argv = self.eval_list(args)?;
            if namespace == "console" {
                if !builtins::CONSOLE_METHODS.contains(&method) {
                    return Err(errors::not_a_function(&callee.to_string()));
                }
                let mut line = String::new();
                for (i, value) in argv.iter().enumerate() {
                    if i > 0 {
                        push_bounded(&mut line, " ")?;
                    }
                    push_bounded(&mut line, &value.to_display_checked()?)?;
                }
                self.output.push(line);
                return Ok(Value::Undefined);
            }
            return builtins::call_namespace(namespace, method, &argv)
                .unwrap_or_else(|| Err(errors::not_a_function(&callee.to_string())));
        }

        if methods::is_mutating(method) {
            if let Some(place) = object.as_place() {
                return self.call_mutating(callee, &place, method, args);
            }
        }

        let receiver = self.eval(object)?;
        if receiver.is_nullish() {
            return Err(errors::cannot_read_properties(&receiver, method));
        }
        let argv = self.eval_list(args)?;
        if let Value::Array(items) = &receiver {
            if methods::is_mutating(method) {
                // Temporary receiver such as `[3, 1, 2].sort()`.
                let mut items = items.clone();
                return methods::call_array_mutating(&mut items, method, &argv);
            }
        }
        methods::call_method(&receiver, method, &argv)
            .unwrap_or_else(|| Err(errors::not_a_function(&callee.to_string())))
    }

    /// A mutating method on a variable or element, e.g. `arr.push(x)` or
    /// `grid[i].reverse()`. The receiver is modified in place.
    fn call_mutating(
        &mut self,
        callee: &Expr,
        place: &jstep_ir::Place,
        method: &str,
        args: &[ListItem],
    ) -> EvalResult {
        let resolved = self.resolve(place)?;
        let receiver = self.read_resolved(&resolved)?;
        if receiver.is_nullish() {
            return Err(errors::cannot_read_properties(&receiver, method));
        }
        if !matches!(receiver, Value::Array(_)) {
            return Err(errors::not_a_function(&callee.to_string()));
        }

        let argv = self.eval_list(args)?;
        match self.place_mut(&resolved)? {
            Value::Array(items) => methods::call_array_mutating(items, method, &argv),
            // The arguments reassigned the receiver to a non-array.
            _ => Err(errors::not_a_function(&callee.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
