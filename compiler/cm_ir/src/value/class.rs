//! User classes: the runtime description of record-like host types.
//!
//! A class tells the engine three things:
//! - its identity (`module.Name`, compared by pointer for instance checks)
//! - its *shape*, the native field list a construction pattern can use
//!   (`Record` fields in declaration order, or `NamedTuple` fields)
//! - an optional explicit `match_args` list that overrides the shape
//!
//! Class-level attributes hold constants such as enum members, so
//! `Color.RED` resolves through `Color`'s attribute table. The table sits
//! behind a lock because members usually reference their own class and can
//! only be attached once the class exists.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Value;

/// Shared handle to a class.
pub type ClassRef = Arc<Class>;

/// A declared record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordField {
    pub name: Arc<str>,
    /// Whether the field is a constructor parameter. Only `init` fields take
    /// part in positional destructuring.
    pub init: bool,
}

impl RecordField {
    /// A regular constructor field.
    pub fn new(name: &str) -> Self {
        RecordField {
            name: Arc::from(name),
            init: true,
        }
    }

    /// A computed field that is not a constructor parameter.
    pub fn computed(name: &str) -> Self {
        RecordField {
            name: Arc::from(name),
            init: false,
        }
    }
}

/// Native field-introspection shape of a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClassShape {
    /// No introspectable fields; only keyword destructuring works unless the
    /// class declares `match_args` or the registry knows about it.
    #[default]
    Plain,
    /// Declared record fields, in constructor order.
    Record(Vec<RecordField>),
    /// Named-tuple style field list.
    NamedTuple(Vec<Arc<str>>),
}

/// A user-defined class.
pub struct Class {
    name: Arc<str>,
    module: Arc<str>,
    shape: ClassShape,
    match_args: Option<Vec<Arc<str>>>,
    base: Option<ClassRef>,
    attrs: RwLock<FxHashMap<Arc<str>, Value>>,
}

impl Class {
    /// Start building a class named `name` in `module`.
    pub fn builder(module: &str, name: &str) -> ClassBuilder {
        ClassBuilder {
            name: Arc::from(name),
            module: Arc::from(module),
            shape: ClassShape::Plain,
            match_args: None,
            base: None,
            attrs: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// `module.Name`, the identifier used by registry overrides.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }

    pub fn shape(&self) -> &ClassShape {
        &self.shape
    }

    /// Explicit positional field order, if the class opted in.
    pub fn match_args(&self) -> Option<&[Arc<str>]> {
        self.match_args.as_deref()
    }

    pub fn base(&self) -> Option<&ClassRef> {
        self.base.as_ref()
    }

    /// Check whether this class is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.base.as_deref();
        }
        false
    }

    /// Attach or replace a class-level attribute.
    ///
    /// An instance of this class stored here (an enum-like member) holds the
    /// class alive through its own class handle; the class is not freed until
    /// [`clear_attrs`](Class::clear_attrs) runs.
    pub fn set_attr(&self, name: &str, value: Value) {
        self.attrs.write().insert(Arc::from(name), value);
    }

    /// Drop every class-level attribute, breaking member-to-class cycles.
    pub fn clear_attrs(&self) {
        self.attrs.write().clear();
    }

    /// Look up a class-level attribute, walking the base chain.
    pub fn lookup_attr(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(value) = class.attrs.read().get(name) {
                return Some(value.clone());
            }
            current = class.base.as_deref();
        }
        None
    }

    /// Field names positional construction should use, in order.
    ///
    /// Explicit `match_args` win; otherwise the shape's constructor fields.
    pub fn constructor_fields(&self) -> Vec<Arc<str>> {
        if let Some(args) = &self.match_args {
            return args.clone();
        }
        match &self.shape {
            ClassShape::Plain => Vec::new(),
            ClassShape::Record(fields) => fields
                .iter()
                .filter(|f| f.init)
                .map(|f| Arc::clone(&f.name))
                .collect(),
            ClassShape::NamedTuple(fields) => fields.clone(),
        }
    }
}

// Attributes are skipped: members of enum-like classes point back at the class.
impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.qualified_name())
            .field("shape", &self.shape)
            .field("match_args", &self.match_args)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Class`].
///
/// Enum-like members are instances of the class they belong to, so they can
/// only be attached after [`build`](ClassBuilder::build) with
/// [`Class::set_attr`]. Doing so forms a reference cycle; call
/// [`Class::clear_attrs`] when the class is retired.
pub struct ClassBuilder {
    name: Arc<str>,
    module: Arc<str>,
    shape: ClassShape,
    match_args: Option<Vec<Arc<str>>>,
    base: Option<ClassRef>,
    attrs: FxHashMap<Arc<str>, Value>,
}

impl ClassBuilder {
    /// Declare record fields; all of them are constructor parameters.
    #[must_use]
    pub fn record<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|name| RecordField::new(name.as_ref()))
            .collect();
        self.record_fields(fields)
    }

    /// Declare record fields with explicit `init` flags.
    #[must_use]
    pub fn record_fields(mut self, fields: Vec<RecordField>) -> Self {
        self.shape = ClassShape::Record(fields);
        self
    }

    /// Declare named-tuple fields.
    #[must_use]
    pub fn named_tuple<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.shape =
            ClassShape::NamedTuple(fields.into_iter().map(|s| Arc::from(s.as_ref())).collect());
        self
    }

    /// Opt in to positional destructuring with an explicit field order.
    #[must_use]
    pub fn match_args<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.match_args = Some(names.into_iter().map(|s| Arc::from(s.as_ref())).collect());
        self
    }

    #[must_use]
    pub fn base(mut self, base: ClassRef) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(Arc::from(name), value);
        self
    }

    pub fn build(self) -> ClassRef {
        Arc::new(Class {
            name: self.name,
            module: self.module,
            shape: self.shape,
            match_args: self.match_args,
            base: self.base,
            attrs: RwLock::new(self.attrs),
        })
    }
}
