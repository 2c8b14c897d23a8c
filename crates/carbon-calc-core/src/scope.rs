//! Write-once variable scope
//!
//! A single shared namespace holding input variables, formula results, and
//! any ad-hoc variables added by scope-setup callbacks. Once a name is
//! written it can never be written again; every listed error is terminal for
//! the evaluation that raised it.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// A value bound in the scope: a plain number, or a zero-argument producer
/// resolved to a number on every read.
///
/// Producers are expected to be pure; their results are not memoized.
pub enum ScopeValue {
    Number(f64),
    Producer(Box<dyn Fn() -> f64 + Send>),
}

impl ScopeValue {
    /// Wrap a producer closure as a scope value
    pub fn producer(f: impl Fn() -> f64 + Send + 'static) -> Self {
        ScopeValue::Producer(Box::new(f))
    }

    fn resolve(&self) -> f64 {
        match self {
            ScopeValue::Number(n) => *n,
            ScopeValue::Producer(f) => f(),
        }
    }
}

impl From<f64> for ScopeValue {
    fn from(value: f64) -> Self {
        ScopeValue::Number(value)
    }
}

impl fmt::Debug for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            ScopeValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Mapping from variable name to numeric value, with write-once semantics
///
/// Iteration order is insertion order. The order carries no meaning, but it
/// is deterministic, so snapshots of [`get_all`](VariableScope::get_all) can
/// be compared across runs.
#[derive(Debug, Default)]
pub struct VariableScope {
    bindings: IndexMap<String, ScopeValue>,
}

impl VariableScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a value
    ///
    /// Fails with [`Error::DuplicateVariable`] if the name is already bound,
    /// whether to an input, a formula result, or a setup variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ScopeValue>) -> Result<()> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(Error::DuplicateVariable(name));
        }
        self.bindings.insert(name, value.into());
        Ok(())
    }

    /// Read a bound value, invoking the producer if the binding is lazy
    ///
    /// Fails with [`Error::UnknownVariable`] if the name was never written.
    pub fn get(&self, name: &str) -> Result<f64> {
        self.bindings
            .get(name)
            .map(ScopeValue::resolve)
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    /// Whether the name is currently bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The full name→number mapping, in insertion order
    pub fn get_all(&self) -> IndexMap<String, f64> {
        self.bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.resolve()))
            .collect()
    }

    /// Number of bound names
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the scope holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
