//! Host objects: instances of user classes.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::class::ClassRef;
use super::Value;

/// An instance the engine can destructure.
///
/// Implementors expose their class (for instance checks and field
/// resolution) and named attribute access. Missing attributes return `None`;
/// a construction pattern naming such a field fails to match.
pub trait HostObject: fmt::Debug + Send + Sync {
    fn class(&self) -> &ClassRef;

    fn attr(&self, name: &str) -> Option<Value>;
}

/// Attribute-map instance, the stock `HostObject` implementation.
pub struct Record {
    class: ClassRef,
    attrs: FxHashMap<Arc<str>, Value>,
}

impl Record {
    /// Create an instance from explicit `(name, value)` attributes.
    pub fn new<I, S>(class: ClassRef, attrs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let attrs = attrs
            .into_iter()
            .map(|(name, value)| (Arc::from(name.as_ref()), value))
            .collect();
        Record { class, attrs }
    }

    /// Create an instance the way calling the class positionally would:
    /// values are zipped with the class's constructor fields. Surplus
    /// values are dropped; missing ones leave the attribute unset.
    pub fn positional(class: ClassRef, values: Vec<Value>) -> Self {
        let attrs = class
            .constructor_fields()
            .into_iter()
            .zip(values)
            .collect();
        Record { class, attrs }
    }

    /// Set an attribute, returning the instance for chaining.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(Arc::from(name), value);
        self
    }
}

impl HostObject for Record {
    fn class(&self) -> &ClassRef {
        &self.class
    }

    fn attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.attrs.keys().collect();
        names.sort();
        write!(f, "{}(", self.class.name())?;
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={}", self.attrs[name])?;
        }
        write!(f, ")")
    }
}
