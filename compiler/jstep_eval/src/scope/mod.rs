//! Program scope and change detection.
//!
//! The subset has no lexical nesting: one flat map holds every binding for
//! the whole session. Loop and branch bodies re-execute their declarations,
//! so declaring an existing name replaces it rather than failing.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::value::{Value, ValueType};

/// Reserved binding written by `return`. Names starting with `__` are
/// internal and never published.
pub const RETURN_SLOT: &str = "__return__";

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `let` and `var`.
    Mutable,
    /// `const`.
    Immutable,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Error returned by [`Scope::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The binding is `const`.
    Immutable,
    /// No binding with that name exists.
    Undefined,
}

#[derive(Clone, Debug, PartialEq)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// Flat name → value environment.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Binding>,
}

/// Display projection of one binding, published after every step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Whether the value differs from the previous step.
    pub changed: bool,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Create or replace a binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value, mutability: Mutability) {
        self.bindings
            .insert(name.into(), Binding { value, mutability });
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name).map(|b| &b.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn mutability(&self, name: &str) -> Option<Mutability> {
        self.bindings.get(name).map(|b| b.mutability)
    }

    /// Rebind an existing variable.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        let binding = self.bindings.get_mut(name).ok_or(AssignError::Undefined)?;
        if !binding.mutability.is_mutable() {
            return Err(AssignError::Immutable);
        }
        binding.value = value;
        Ok(())
    }

    /// In-place access for element and property writes. A `const` binding
    /// still allows mutating the array or object it holds.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name).map(|b| &mut b.value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Published bindings (internal `__` names excluded), sorted by name.
    pub fn visible(&self) -> Vec<(&str, &Value)> {
        let mut visible: Vec<(&str, &Value)> = self
            .bindings
            .iter()
            .filter(|(name, _)| !is_internal(name))
            .map(|(name, b)| (name.as_str(), &b.value))
            .collect();
        visible.sort_unstable_by(|a, b| a.0.cmp(b.0));
        visible
    }

    /// Compare against the scope before the last step.
    pub fn diff(&self, previous: &Scope) -> Vec<Variable> {
        self.visible()
            .into_iter()
            .map(|(name, value)| Variable {
                name: name.to_string(),
                value: value.clone(),
                value_type: value.value_type(),
                changed: match previous.lookup(name) {
                    Some(old) => !old.structural_eq(value),
                    None => true,
                },
            })
            .collect()
    }
}

fn is_internal(name: &str) -> bool {
    name.starts_with("__")
}
