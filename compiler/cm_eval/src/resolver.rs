//! Host name resolution.
//!
//! Patterns reference external names (`Color.RED`, `Point(...)`, mapping
//! keys like `Keys.FORMAT`). The engine never looks at caller scopes; the
//! host passes a [`Resolver`] to every match instead. Only the head of a
//! dotted path is resolved here; the rest is attribute access on the result.

use std::sync::Arc;

use cm_ir::{BuiltinType, ClassRef, Name, Value};
use rustc_hash::FxHashMap;

/// Looks up names referenced by patterns.
///
/// `None` means "not defined"; the matcher decides whether that is a match
/// failure or an error.
pub trait Resolver {
    fn resolve(&self, name: &str) -> Option<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// A name table: the host declares every name its patterns may use.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    names: FxHashMap<Name, Value>,
}

impl Scope {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope pre-populated with the builtin types (`int`, `str`, ...).
    pub fn with_builtins() -> Self {
        let mut scope = Self::new();
        for ty in BuiltinType::ALL {
            scope.insert(ty.name(), Value::builtin(ty));
        }
        scope
    }

    /// Bind `name`, replacing any earlier binding.
    pub fn insert(&mut self, name: &str, value: Value) -> &mut Self {
        self.names.insert(Arc::from(name), value);
        self
    }

    /// Bind a class under its own name.
    pub fn insert_class(&mut self, class: &ClassRef) -> &mut Self {
        self.insert(class.name(), Value::class(Arc::clone(class)))
    }

    /// Builder form of [`Scope::insert`].
    #[must_use]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`Scope::insert_class`].
    #[must_use]
    pub fn with_class(mut self, class: &ClassRef) -> Self {
        self.insert_class(class);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Resolver for Scope {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.names.get(name).cloned()
    }
}

#[cfg(test)]
mod tests;
