//! Binary and unary operator semantics.

use std::cmp::Ordering;

use jstep_ir::{BinaryOp, UnaryOp};

use crate::errors::EvalResult;
use crate::Value;

/// Apply a binary operator to two evaluated operands. Only string `+` can
/// fail, when the result would be too long.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let value = match op {
        BinaryOp::Add => return add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        // f64 `%` truncates like JavaScript: the result takes the dividend's sign.
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Pow => Value::Number(pow(left.to_number(), right.to_number())),
        BinaryOp::Eq => Value::Boolean(left.loose_eq(right)),
        BinaryOp::NotEq => Value::Boolean(!left.loose_eq(right)),
        BinaryOp::StrictEq => Value::Boolean(left.strict_eq(right)),
        BinaryOp::StrictNotEq => Value::Boolean(!left.strict_eq(right)),
        BinaryOp::Lt => compare(left, right, |o| o == Ordering::Less),
        BinaryOp::LtEq => compare(left, right, |o| o != Ordering::Greater),
        BinaryOp::Gt => compare(left, right, |o| o == Ordering::Greater),
        BinaryOp::GtEq => compare(left, right, |o| o != Ordering::Less),
    };
    Ok(value)
}

/// Apply `!`, `-` or `+`. `typeof` needs the unevaluated operand and is
/// handled by the evaluator.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Boolean(!operand.is_truthy()),
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::Typeof => Value::string(operand.typeof_name()),
    }
}

fn add(left: &Value, right: &Value) -> EvalResult {
    if left.is_string_like() || right.is_string_like() {
        let mut joined = String::new();
        left.write_js_string(&mut joined)?;
        right.write_js_string(&mut joined)?;
        Ok(Value::string(joined))
    } else {
        Ok(Value::Number(left.to_number() + right.to_number()))
    }
}

fn compare(left: &Value, right: &Value, test: impl Fn(Ordering) -> bool) -> Value {
    Value::Boolean(left.js_compare(right).is_some_and(test))
}

/// `**`, which differs from `powf` for a `NaN` exponent and for `±1` raised
/// to an infinite power.
pub fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() {
        f64::NAN
    } else if exponent == 0.0 {
        1.0
    } else if base.abs() == 1.0 && exponent.is_infinite() {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}
