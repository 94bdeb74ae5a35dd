//! Global functions, namespace objects and their constants.
//!
//! Namespaces (`Math`, `JSON`, ...) are not values: they are recognised
//! syntactically at `Namespace.member` sites, and only while no variable
//! of the same name shadows them.

use std::f64::consts;

use crate::errors::{self, EvalResult};
use crate::value::limits::check_array_length;
use crate::value::number::{parse_float_prefix, parse_int_prefix, to_integer};
use crate::value::{stringify_bounded, Value, MAX_STRING_LENGTH};

pub const NAMESPACES: &[&str] = &["Math", "console", "JSON", "Object", "Array", "Number", "String"];

/// `console` methods; each appends one output line.
pub const CONSOLE_METHODS: &[&str] = &["log", "info", "warn", "error", "debug"];

pub fn is_namespace(name: &str) -> bool {
    NAMESPACES.contains(&name)
}

/// Global identifiers that are values rather than functions.
pub fn global_value(name: &str) -> Option<Value> {
    match name {
        "NaN" => Some(Value::Number(f64::NAN)),
        "Infinity" => Some(Value::Number(f64::INFINITY)),
        _ => None,
    }
}

pub fn is_global_function(name: &str) -> bool {
    matches!(
        name,
        "parseInt" | "parseFloat" | "Number" | "String" | "Boolean" | "isNaN" | "isFinite"
    )
}

/// Call a global function. `None` if `name` is not one.
pub fn call_global(name: &str, args: &[Value]) -> Option<EvalResult> {
    let value = match name {
        "parseInt" => {
            let radix = match arg(args, 1) {
                Value::Undefined => None,
                radix => {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let radix = to_integer(radix.to_number()) as u32;
                    Some(radix).filter(|r| *r != 0)
                }
            };
            Value::Number(parse_int_prefix(&arg(args, 0).to_js_string(), radix))
        }
        "parseFloat" => Value::Number(parse_float_prefix(&arg(args, 0).to_js_string())),
        "Number" => Value::Number(args.first().map_or(0.0, Value::to_number)),
        "String" => match args.first().map(Value::to_js_string_checked).transpose() {
            Ok(text) => Value::string(text.unwrap_or_default()),
            Err(e) => return Some(Err(e)),
        },
        "Boolean" => Value::Boolean(arg(args, 0).is_truthy()),
        "isNaN" => Value::Boolean(arg(args, 0).to_number().is_nan()),
        "isFinite" => Value::Boolean(arg(args, 0).to_number().is_finite()),
        _ => return None,
    };
    Some(Ok(value))
}

/// `Namespace.NAME` constants.
pub fn namespace_constant(namespace: &str, name: &str) -> Option<Value> {
    let n = match (namespace, name) {
        ("Math", "PI") => consts::PI,
        ("Math", "E") => consts::E,
        ("Math", "LN2") => consts::LN_2,
        ("Math", "LN10") => consts::LN_10,
        ("Math", "LOG2E") => consts::LOG2_E,
        ("Math", "LOG10E") => consts::LOG10_E,
        ("Math", "SQRT2") => consts::SQRT_2,
        ("Math", "SQRT1_2") => consts::FRAC_1_SQRT_2,
        ("Number", "MAX_SAFE_INTEGER") => 9_007_199_254_740_991.0,
        ("Number", "MIN_SAFE_INTEGER") => -9_007_199_254_740_991.0,
        ("Number", "EPSILON") => f64::EPSILON,
        ("Number", "MAX_VALUE") => f64::MAX,
        ("Number", "MIN_VALUE") => 5e-324,
        ("Number", "POSITIVE_INFINITY") => f64::INFINITY,
        ("Number", "NEGATIVE_INFINITY") => f64::NEG_INFINITY,
        ("Number", "NaN") => f64::NAN,
        _ => return None,
    };
    Some(Value::Number(n))
}

/// Call `Namespace.method(...)` for every namespace except `console`,
/// which the evaluator handles because it writes output.
pub fn call_namespace(namespace: &str, method: &str, args: &[Value]) -> Option<EvalResult> {
    match namespace {
        "Math" => call_math(method, args),
        "JSON" => call_json(method, args),
        "Object" => call_object(method, args),
        "Array" => call_array(method, args),
        "Number" => call_number(method, args),
        "String" => call_string(method, args),
        _ => None,
    }
}

fn call_math(method: &str, args: &[Value]) -> Option<EvalResult> {
    if let Some(f) = math_unary(method) {
        return Some(Ok(Value::Number(f(arg(args, 0).to_number()))));
    }
    let n = match method {
        "max" => fold_numbers(args, f64::NEG_INFINITY, f64::max),
        "min" => fold_numbers(args, f64::INFINITY, f64::min),
        "pow" => super::operators::pow(arg(args, 0).to_number(), arg(args, 1).to_number()),
        "atan2" => arg(args, 0).to_number().atan2(arg(args, 1).to_number()),
        "hypot" => args
            .iter()
            .map(Value::to_number)
            .fold(0.0, f64::hypot),
        // A random source would make step-back replay diverge.
        "random" => return Some(Err(errors::unsupported("`Math.random`"))),
        _ => return None,
    };
    Some(Ok(Value::Number(n)))
}

fn math_unary(method: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match method {
        "floor" => f64::floor,
        "ceil" => f64::ceil,
        "round" => js_round,
        "abs" => f64::abs,
        "sqrt" => f64::sqrt,
        "cbrt" => f64::cbrt,
        "trunc" => f64::trunc,
        "sign" => js_sign,
        "log" => f64::ln,
        "log2" => f64::log2,
        "log10" => f64::log10,
        "exp" => f64::exp,
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "atan" => f64::atan,
        _ => return None,
    };
    Some(f)
}

/// `Math.max`/`Math.min`: any `NaN` argument makes the result `NaN`.
fn fold_numbers(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for n in args.iter().map(Value::to_number) {
        if n.is_nan() {
            return f64::NAN;
        }
        acc = pick(acc, n);
    }
    acc
}

/// `Math.round` rounds ties toward +∞ (`-2.5` → `-2`).
fn js_round(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn js_sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 {
        x
    } else {
        x.signum()
    }
}

fn call_json(method: &str, args: &[Value]) -> Option<EvalResult> {
    match method {
        "stringify" => Some(json_stringify(args)),
        "parse" => Some(json_parse(&arg(args, 0).to_js_string())),
        _ => None,
    }
}

fn json_stringify(args: &[Value]) -> EvalResult {
    if !arg(args, 1).is_nullish() {
        return Err(errors::unsupported("a `JSON.stringify` replacer"));
    }
    let indent = match arg(args, 2) {
        Value::Number(n) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let width = to_integer(n).clamp(0.0, 10.0) as usize;
            Some(" ".repeat(width))
        }
        Value::Str(s) => Some(s.chars().take(10).collect()),
        _ => None,
    };
    let text = stringify_bounded(&arg(args, 0), indent.as_deref(), MAX_STRING_LENGTH)?;
    Ok(text.map_or(Value::Undefined, Value::string))
}

fn json_parse(text: &str) -> EvalResult {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|e| errors::invalid_json(&e.to_string()))?;
    Ok(from_json(parsed))
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::object(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}

fn call_object(method: &str, args: &[Value]) -> Option<EvalResult> {
    let target = arg(args, 0);
    if matches!(method, "keys" | "values" | "entries") && target.is_nullish() {
        return Some(Err(errors::not_an_object("undefined or null")));
    }
    let entries = own_entries(&target);
    if let Err(e) = check_array_length(entries.len()) {
        return Some(Err(e));
    }
    let result = match method {
        "keys" => entries.into_iter().map(|(k, _)| Value::string(k)).collect(),
        "values" => entries.into_iter().map(|(_, v)| v).collect(),
        "entries" => entries
            .into_iter()
            .map(|(k, v)| Value::array(vec![Value::string(k), v]))
            .collect(),
        _ => return None,
    };
    Some(Ok(Value::array(result)))
}

/// Enumerable own properties in order: indices for arrays and strings,
/// keys for objects.
fn own_entries(target: &Value) -> Vec<(String, Value)> {
    match target {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::Str(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::string(c.to_string())))
            .collect(),
        Value::Object(object) => object
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

fn call_array(method: &str, args: &[Value]) -> Option<EvalResult> {
    let value = match method {
        "isArray" => Value::Boolean(matches!(arg(args, 0), Value::Array(_))),
        "of" => Value::array(args.to_vec()),
        "from" => match arg(args, 0) {
            Value::Array(items) => Value::array(items.to_vec()),
            Value::Str(s) => {
                if let Err(e) = check_array_length(s.chars().count()) {
                    return Some(Err(e));
                }
                Value::array(s.chars().map(|c| Value::string(c.to_string())).collect())
            }
            Value::Object(object) => {
                // Array-likes: `{ length: n }`.
                let len = object.get("length").map_or(0.0, Value::to_number);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let len = to_integer(len).clamp(0.0, 1_000_000.0) as usize;
                Value::array(
                    (0..len)
                        .map(|i| object.get(&i.to_string()).cloned().unwrap_or(Value::Undefined))
                        .collect(),
                )
            }
            _ => Value::array(Vec::new()),
        },
        _ => return None,
    };
    Some(Ok(value))
}

fn call_number(method: &str, args: &[Value]) -> Option<EvalResult> {
    let n = match arg(args, 0) {
        Value::Number(n) => Some(n),
        _ => None,
    };
    let value = match method {
        "isInteger" => Value::Boolean(n.is_some_and(|n| n.is_finite() && n.fract() == 0.0)),
        "isSafeInteger" => Value::Boolean(
            n.is_some_and(|n| n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_991.0),
        ),
        "isNaN" => Value::Boolean(n.is_some_and(f64::is_nan)),
        "isFinite" => Value::Boolean(n.is_some_and(f64::is_finite)),
        "parseFloat" => return call_global("parseFloat", args),
        "parseInt" => return call_global("parseInt", args),
        _ => return None,
    };
    Some(Ok(value))
}

fn call_string(method: &str, args: &[Value]) -> Option<EvalResult> {
    match method {
        "fromCharCode" => {
            let text: String = args
                .iter()
                .map(|v| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let code = (to_integer(v.to_number()) as i64).rem_euclid(65_536) as u32;
                    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect();
            Some(Ok(Value::string(text)))
        }
        _ => None,
    }
}

/// Argument `i`, or `undefined` when absent.
pub fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Undefined)
}

