//! Property access and assignment targets.
//!
//! A [`Place`] is resolved once into a root variable plus a list of
//! [`Key`]s, evaluating every index expression exactly once. Compound
//! assignments and mutating method calls then read and write through the
//! same resolved path.

use std::fmt;

use jstep_ir::Place;

use super::Evaluator;
use crate::errors::{self, EvalError, EvalResult};
use crate::scope::{AssignError, Mutability};
use crate::value::limits::check_array_length;
use crate::value::number::{as_index, count};
use crate::Value;

/// One step of a property path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// Property key for an evaluated `[index]` expression. Canonical
    /// integer strings (`"3"`, not `"03"`) are array indices.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match as_index(*n) {
                Some(i) => Key::Index(i),
                None => Key::Name(value.to_js_string()),
            },
            Value::Str(s) => match s.parse::<usize>() {
                Ok(i) if i.to_string() == s.as_str() => Key::Index(i),
                _ => Key::Name(s.to_string()),
            },
            other => Key::Name(other.to_js_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// A place with its index expressions evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPlace {
    pub root: String,
    pub keys: Vec<Key>,
}

/// Read `target[key]`.
pub fn get_key(target: &Value, key: &Key) -> EvalResult {
    match (target, key) {
        (Value::Null | Value::Undefined, _) => {
            Err(errors::cannot_read_properties(target, &key.to_string()))
        }
        (Value::Array(items), Key::Index(i)) => Ok(items.get(*i).cloned().unwrap_or(Value::Undefined)),
        (Value::Array(items), Key::Name(name)) if name == "length" => {
            Ok(Value::Number(count(items.len())))
        }
        (Value::Str(s), Key::Index(i)) => Ok(s
            .chars()
            .nth(*i)
            .map_or(Value::Undefined, |c| Value::string(c.to_string()))),
        (Value::Str(s), Key::Name(name)) if name == "length" => {
            Ok(Value::Number(count(s.chars().count())))
        }
        (Value::Object(object), key) => Ok(object
            .get(&key.to_string())
            .cloned()
            .unwrap_or(Value::Undefined)),
        _ => Ok(Value::Undefined),
    }
}

/// Read `target.name`.
pub fn get_property(target: &Value, name: &str) -> EvalResult {
    get_key(target, &Key::Name(name.to_string()))
}

/// Write `target[key] = value`. Writes to other primitives are ignored, as
/// in sloppy-mode JavaScript.
fn set_key(target: &mut Value, key: &Key, value: Value) -> Result<(), EvalError> {
    if target.is_nullish() {
        return Err(errors::cannot_set_properties(target, &key.to_string()));
    }
    match target {
        Value::Array(items) => match key {
            Key::Index(i) => {
                check_array_length(i.saturating_add(1))?;
                let items = items.make_mut();
                if *i >= items.len() {
                    items.resize(*i + 1, Value::Undefined);
                }
                items[*i] = value;
                Ok(())
            }
            Key::Name(name) if name == "length" => {
                let len = as_index(value.to_number()).ok_or_else(errors::invalid_array_length)?;
                check_array_length(len)?;
                items.make_mut().resize(len, Value::Undefined);
                Ok(())
            }
            // Named properties on arrays are not modelled.
            Key::Name(_) => Ok(()),
        },
        Value::Object(object) => {
            object.make_mut().insert(key.to_string(), value);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Mutable access to an existing element or property.
fn child_mut<'v>(target: &'v mut Value, key: &Key) -> Option<&'v mut Value> {
    match (target, key) {
        (Value::Array(items), Key::Index(i)) => items.make_mut().get_mut(*i),
        (Value::Object(object), key) => object.make_mut().get_mut(&key.to_string()),
        _ => None,
    }
}

impl Evaluator<'_> {
    /// Evaluate the index expressions of `place`.
    pub fn resolve(&mut self, place: &Place) -> Result<ResolvedPlace, EvalError> {
        match place {
            Place::Var(name) => Ok(ResolvedPlace {
                root: name.clone(),
                keys: Vec::new(),
            }),
            Place::Member { object, property } => {
                let mut resolved = self.resolve(object)?;
                resolved.keys.push(Key::Name(property.clone()));
                Ok(resolved)
            }
            Place::Index { object, index } => {
                let mut resolved = self.resolve(object)?;
                let key = self.eval(index)?;
                resolved.keys.push(Key::from_value(&key));
                Ok(resolved)
            }
        }
    }

    /// Current value at a resolved place.
    pub fn read_resolved(&self, place: &ResolvedPlace) -> EvalResult {
        self.read_path(&place.root, &place.keys)
    }

    fn read_path(&self, root: &str, keys: &[Key]) -> EvalResult {
        let mut current = self.lookup(root)?;
        for key in keys {
            current = get_key(&current, key)?;
        }
        Ok(current)
    }

    /// Store `value` at a resolved place. A bare variable is rebound (and
    /// created if undeclared); a path writes into the root's value, which
    /// is allowed even for `const` roots.
    pub fn write_resolved(&mut self, place: &ResolvedPlace, value: Value) -> Result<(), EvalError> {
        let Some((last, parents)) = place.keys.split_last() else {
            return self.assign_var(&place.root, value);
        };

        // Reading the parent first yields JavaScript's error messages for
        // missing intermediate values.
        let parent = self.read_path(&place.root, parents)?;
        if parent.is_nullish() {
            return Err(errors::cannot_set_properties(&parent, &last.to_string()));
        }
        if !matches!(parent, Value::Array(_) | Value::Object(_)) {
            return Ok(());
        }

        let target = self.navigate_mut(&place.root, parents)?;
        set_key(target, last, value)
    }

    /// Mutable access to the value at a resolved place.
    pub(super) fn place_mut(&mut self, place: &ResolvedPlace) -> Result<&mut Value, EvalError> {
        self.navigate_mut(&place.root, &place.keys)
    }

    fn navigate_mut(&mut self, root: &str, keys: &[Key]) -> Result<&mut Value, EvalError> {
        let mut current = self
            .scope
            .value_mut(root)
            .ok_or_else(|| errors::not_defined(root))?;
        for key in keys {
            current = child_mut(current, key)
                .ok_or_else(|| errors::cannot_set_properties(&Value::Undefined, &key.to_string()))?;
        }
        Ok(current)
    }

    /// `name = value`.
    pub fn assign_var(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        match self.scope.assign(name, value.clone()) {
            Ok(()) => Ok(()),
            Err(AssignError::Immutable) => Err(errors::assignment_to_constant()),
            Err(AssignError::Undefined) => {
                // Sloppy-mode assignment to an undeclared name creates it.
                self.scope.define(name, value, Mutability::Mutable);
                Ok(())
            }
        }
    }
}
