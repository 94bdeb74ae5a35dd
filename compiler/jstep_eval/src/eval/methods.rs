//! Methods on arrays, strings and numbers.
//!
//! Strings are indexed by `char`. For text without astral-plane characters
//! this matches JavaScript's UTF-16 indexing.

use std::cmp::Ordering;

use super::builtins::arg;
use crate::errors::{self, EvalError, EvalResult};
use crate::value::limits::{check_array_length, check_string_length, push_bounded};
use crate::value::number::{count, relative_index, to_fixed, to_integer, to_radix_string};
use crate::value::{Heap, Value, MAX_ARRAY_LENGTH, MAX_STRING_LENGTH};

/// Array methods that modify their receiver in place.
pub fn is_mutating(method: &str) -> bool {
    matches!(
        method,
        "push" | "pop" | "shift" | "unshift" | "reverse" | "sort" | "splice" | "fill"
    )
}

/// Methods that take a callback, which cannot be expressed without
/// function values.
fn takes_callback(method: &str) -> bool {
    matches!(
        method,
        "map"
            | "filter"
            | "forEach"
            | "reduce"
            | "reduceRight"
            | "find"
            | "findIndex"
            | "findLast"
            | "findLastIndex"
            | "some"
            | "every"
            | "flatMap"
    )
}

/// Call a mutating array method. Writes go through [`Heap::make_mut`], so
/// other holders of the old array are unaffected.
pub fn call_array_mutating(items: &mut Heap<Vec<Value>>, method: &str, args: &[Value]) -> EvalResult {
    let result = match method {
        "push" => {
            check_array_length(items.len() + args.len())?;
            let list = items.make_mut();
            list.extend_from_slice(args);
            Value::Number(count(list.len()))
        }
        "pop" => items.make_mut().pop().unwrap_or(Value::Undefined),
        "shift" => {
            if items.is_empty() {
                Value::Undefined
            } else {
                items.make_mut().remove(0)
            }
        }
        "unshift" => {
            check_array_length(items.len() + args.len())?;
            let list = items.make_mut();
            list.splice(0..0, args.iter().cloned());
            Value::Number(count(list.len()))
        }
        "reverse" => {
            items.make_mut().reverse();
            Value::Array(items.clone())
        }
        "sort" => {
            if !arg(args, 0).is_nullish() {
                return Err(errors::unsupported("`sort` with a comparator"));
            }
            items.make_mut().sort_by(default_sort_order);
            Value::Array(items.clone())
        }
        "splice" => Value::array(splice(items, args)?),
        "fill" => {
            let list = items.make_mut();
            let len = list.len();
            let start = relative_index(arg(args, 1).to_number(), len);
            let end = end_index(&arg(args, 2), len);
            let value = arg(args, 0);
            for slot in list.iter_mut().take(end).skip(start) {
                *slot = value.clone();
            }
            Value::Array(items.clone())
        }
        _ => return Err(errors::not_a_function(method)),
    };
    Ok(result)
}

/// `sort()` without a comparator: `undefined` last, everything else by
/// string value.
fn default_sort_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Undefined, Value::Undefined) => Ordering::Equal,
        (Value::Undefined, _) => Ordering::Greater,
        (_, Value::Undefined) => Ordering::Less,
        _ => a
            .to_js_string()
            .encode_utf16()
            .cmp(b.to_js_string().encode_utf16()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn splice(items: &mut Heap<Vec<Value>>, args: &[Value]) -> Result<Vec<Value>, EvalError> {
    if args.is_empty() {
        return Ok(Vec::new());
    }
    let len = items.len();
    let start = relative_index(args[0].to_number(), len);
    let delete = if args.len() < 2 {
        len - start
    } else {
        to_integer(args[1].to_number()).clamp(0.0, count(len - start)) as usize
    };
    let inserted = args.get(2..).unwrap_or_default();
    check_array_length(len - delete + inserted.len())?;
    Ok(items
        .make_mut()
        .splice(start..start + delete, inserted.iter().cloned())
        .collect())
}

/// Optional `end` argument: absent means `len`.
fn end_index(end: &Value, len: usize) -> usize {
    match end {
        Value::Undefined => len,
        other => relative_index(other.to_number(), len),
    }
}

/// Call a non-mutating method. `None` if the receiver has no such method.
pub fn call_method(receiver: &Value, method: &str, args: &[Value]) -> Option<EvalResult> {
    match receiver {
        Value::Array(items) => array_method(items, method, args),
        Value::Str(s) => string_method(s, method, args),
        Value::Number(n) => number_method(*n, method, args),
        Value::Boolean(b) => (method == "toString").then(|| Ok(Value::string(b.to_string()))),
        Value::Object(object) => match method {
            "hasOwnProperty" => Some(Ok(Value::Boolean(
                object.contains_key(&arg(args, 0).to_js_string()),
            ))),
            "toString" => Some(Ok(Value::string(receiver.to_js_string()))),
            _ => None,
        },
        Value::Null | Value::Undefined => None,
    }
}

fn array_method(items: &[Value], method: &str, args: &[Value]) -> Option<EvalResult> {
    if takes_callback(method) {
        return Some(Err(errors::unsupported(&format!("`{method}` with a callback"))));
    }
    let len = items.len();
    let value = match method {
        "slice" => {
            let start = relative_index(arg(args, 0).to_number(), len);
            let end = end_index(&arg(args, 1), len).max(start);
            Value::array(items[start..end].to_vec())
        }
        "concat" => {
            let added: usize = args
                .iter()
                .map(|value| value.as_array().map_or(1, <[Value]>::len))
                .sum();
            if let Err(error) = check_array_length(len.saturating_add(added)) {
                return Some(Err(error));
            }
            let mut joined = items.to_vec();
            for value in args {
                match value {
                    Value::Array(more) => joined.extend(more.iter().cloned()),
                    other => joined.push(other.clone()),
                }
            }
            Value::array(joined)
        }
        "join" => {
            let separator = match arg(args, 0) {
                Value::Undefined => ",".to_string(),
                other => other.to_js_string(),
            };
            return Some(join(items, &separator));
        }
        "indexOf" => {
            let needle = arg(args, 0);
            let from = relative_index(arg(args, 1).to_number(), len);
            position(items.iter().skip(from).position(|v| v.strict_eq(&needle)).map(|i| i + from))
        }
        "lastIndexOf" => {
            let needle = arg(args, 0);
            position(items.iter().rposition(|v| v.strict_eq(&needle)))
        }
        "includes" => {
            let needle = arg(args, 0);
            Value::Boolean(items.iter().any(|v| same_value_zero(v, &needle)))
        }
        "at" => at(len, &arg(args, 0)).map_or(Value::Undefined, |i| items[i].clone()),
        "toString" => return Some(join(items, ",")),
        _ => return None,
    };
    Some(Ok(value))
}

/// `join`, bounded by the string length limit.
fn join(items: &[Value], separator: &str) -> EvalResult {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            push_bounded(&mut out, separator)?;
        }
        if !item.is_nullish() {
            item.write_js_string(&mut out)?;
        }
    }
    Ok(Value::string(out))
}

fn string_method(s: &str, method: &str, args: &[Value]) -> Option<EvalResult> {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let text = |range: &[char]| Value::string(range.iter().collect::<String>());

    let value = match method {
        "toUpperCase" => return Some(bounded_string(s.to_uppercase())),
        "toLowerCase" => return Some(bounded_string(s.to_lowercase())),
        "trim" => Value::string(s.trim()),
        "trimStart" => Value::string(s.trim_start()),
        "trimEnd" => Value::string(s.trim_end()),
        "toString" | "valueOf" => Value::string(s),
        "charAt" => {
            let i = to_integer(arg(args, 0).to_number());
            char_at(&chars, i).map_or_else(|| Value::string(""), |c| Value::string(c.to_string()))
        }
        "charCodeAt" => {
            let i = to_integer(arg(args, 0).to_number());
            Value::Number(char_at(&chars, i).map_or(f64::NAN, |c| f64::from(u32::from(c))))
        }
        "at" => at(len, &arg(args, 0)).map_or(Value::Undefined, |i| Value::string(chars[i].to_string())),
        "indexOf" => {
            let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
            let from = clamp_index(arg(args, 1).to_number(), len);
            position(find_chars(&chars, &needle, from))
        }
        "lastIndexOf" => {
            let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
            position(rfind_chars(&chars, &needle))
        }
        "includes" => {
            let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
            let from = clamp_index(arg(args, 1).to_number(), len);
            Value::Boolean(find_chars(&chars, &needle, from).is_some())
        }
        "startsWith" => {
            let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
            let from = clamp_index(arg(args, 1).to_number(), len);
            Value::Boolean(chars[from..].starts_with(&needle))
        }
        "endsWith" => {
            let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
            let end = match arg(args, 1) {
                Value::Undefined => len,
                other => clamp_index(other.to_number(), len),
            };
            Value::Boolean(chars[..end].ends_with(&needle))
        }
        "slice" => {
            let start = relative_index(arg(args, 0).to_number(), len);
            let end = end_index(&arg(args, 1), len).max(start);
            text(&chars[start..end])
        }
        "substring" => {
            let a = clamp_index(arg(args, 0).to_number(), len);
            let b = match arg(args, 1) {
                Value::Undefined => len,
                other => clamp_index(other.to_number(), len),
            };
            text(&chars[a.min(b)..a.max(b)])
        }
        "split" => return Some(split(s, &chars, args)),
        "repeat" => {
            let n = to_integer(arg(args, 0).to_number());
            if n < 0.0 || n.is_infinite() {
                return Some(Err(errors::invalid_count(&Value::Number(n).to_js_string())));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = n as usize;
            if let Err(error) = check_string_length(n.saturating_mul(s.len())) {
                return Some(Err(error));
            }
            Value::string(s.repeat(n))
        }
        "padStart" | "padEnd" => {
            let target = clamp_index(arg(args, 0).to_number(), usize::MAX);
            let fill: Vec<char> = match arg(args, 1) {
                Value::Undefined => vec![' '],
                other => other.to_js_string().chars().collect(),
            };
            if target <= len || fill.is_empty() {
                Value::string(s)
            } else {
                if target > MAX_STRING_LENGTH {
                    return Some(Err(errors::invalid_string_length()));
                }
                let padding: String = fill.iter().cycle().take(target - len).collect();
                let padded = if method == "padStart" {
                    padding + s
                } else {
                    format!("{s}{padding}")
                };
                return Some(bounded_string(padded));
            }
        }
        "concat" => {
            let mut joined = s.to_string();
            for value in args {
                if let Err(error) = value.write_js_string(&mut joined) {
                    return Some(Err(error));
                }
            }
            Value::string(joined)
        }
        "replace" => {
            let pattern = arg(args, 0).to_js_string();
            let replacement = arg(args, 1).to_js_string();
            let hits = usize::from(s.contains(pattern.as_str()));
            if let Err(error) = check_replaced_length(s, &pattern, &replacement, hits) {
                return Some(Err(error));
            }
            Value::string(s.replacen(&pattern, &replacement, 1))
        }
        "replaceAll" => {
            let pattern = arg(args, 0).to_js_string();
            let replacement = arg(args, 1).to_js_string();
            let hits = if pattern.is_empty() {
                len + 1
            } else {
                s.matches(pattern.as_str()).count()
            };
            if let Err(error) = check_replaced_length(s, &pattern, &replacement, hits) {
                return Some(Err(error));
            }
            if pattern.is_empty() {
                // Insert between every character, like JavaScript.
                let mut out = replacement.clone();
                for c in s.chars() {
                    out.push(c);
                    out.push_str(&replacement);
                }
                Value::string(out)
            } else {
                Value::string(s.replace(&pattern, &replacement))
            }
        }
        _ => return None,
    };
    Some(Ok(value))
}

/// Checked [`Value::string`] for results that may outgrow their inputs.
fn bounded_string(s: String) -> EvalResult {
    check_string_length(s.len())?;
    Ok(Value::string(s))
}

/// Length check for replacing `hits` occurrences of `pattern` in `s`.
fn check_replaced_length(
    s: &str,
    pattern: &str,
    replacement: &str,
    hits: usize,
) -> Result<(), EvalError> {
    let removed = hits.saturating_mul(pattern.len());
    let added = hits.saturating_mul(replacement.len());
    check_string_length((s.len() - removed.min(s.len())).saturating_add(added))
}

fn split(s: &str, chars: &[char], args: &[Value]) -> EvalResult {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let limit = match arg(args, 1) {
        Value::Undefined => usize::MAX,
        other => to_integer(other.to_number()).max(0.0) as usize,
    };
    // One past the cap detects an oversized result without building it.
    let take = limit.min(MAX_ARRAY_LENGTH + 1);
    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => std::iter::once(Value::string(s)).take(take).collect(),
        separator => {
            let separator = separator.to_js_string();
            if separator.is_empty() {
                chars.iter().take(take).map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).take(take).map(Value::string).collect()
            }
        }
    };
    check_array_length(parts.len())?;
    Ok(Value::array(parts))
}

fn number_method(n: f64, method: &str, args: &[Value]) -> Option<EvalResult> {
    let result = match method {
        "toFixed" => {
            let digits = to_integer(arg(args, 0).to_number());
            if !(0.0..=100.0).contains(&digits) {
                return Some(Err(errors::invalid_digits("toFixed")));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let digits = digits as usize;
            Ok(Value::string(to_fixed(n, digits)))
        }
        "toString" => {
            let radix = match arg(args, 0) {
                Value::Undefined => 10.0,
                other => to_integer(other.to_number()),
            };
            if !(2.0..=36.0).contains(&radix) {
                return Some(Err(errors::invalid_radix()));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let radix = radix as u32;
            to_radix_string(n, radix)
                .map(Value::string)
                .ok_or_else(|| errors::unsupported("fractional `toString` with a radix"))
        }
        "valueOf" => Ok(Value::Number(n)),
        _ => return None,
    };
    Some(result)
}

/// `-1` for not found, as `indexOf` returns.
fn position(found: Option<usize>) -> Value {
    Value::Number(found.map_or(-1.0, count))
}

/// `includes` equality: like `===` but `NaN` matches `NaN`.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_eq(b),
    }
}

/// Index for `at()`, which counts negative positions from the end.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn at(len: usize, index: &Value) -> Option<usize> {
    let i = to_integer(index.to_number());
    let resolved = if i < 0.0 { count(len) + i } else { i };
    (resolved >= 0.0 && resolved < count(len)).then(|| resolved as usize)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn char_at(chars: &[char], i: f64) -> Option<char> {
    if i < 0.0 || i >= count(chars.len()) {
        None
    } else {
        chars.get(i as usize).copied()
    }
}

/// Clamp a position argument into `0..=len` (`NaN` → 0).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_index(n: f64, len: usize) -> usize {
    let n = to_integer(n);
    if n <= 0.0 {
        0
    } else if n >= count(len) {
        len
    } else {
        n as usize
    }
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    (from..haystack.len())
        .take_while(|i| i + needle.len() <= haystack.len())
        .find(|&i| haystack[i..i + needle.len()] == *needle)
}

fn rfind_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| haystack[i..i + needle.len()] == *needle)
}
