//! Runtime values the matcher inspects.
//!
//! # Arc Enforcement
//!
//! Every heap payload lives behind `Heap<T>`, whose constructors are private
//! to this module. Heap-backed values are created through factory methods:
//!
//! ```text
//! let s = Value::string("hello");                      // OK
//! let xs = Value::list(vec![Value::int(1)]);           // OK
//! let s = Value::Str(Heap::new(...));                  // ERROR: Heap::new is pub(super)
//! ```
//!
//! # Equality
//!
//! `PartialEq`/`Hash` are structural and agree with each other, so values
//! can key hash maps (floats compare by bit pattern, objects by identity).
//! Pattern literals use [`Value::equals`] instead, which follows numeric-tower
//! semantics: `1`, `1.0` and `True` are all equal.

mod class;
mod heap;
mod object;
mod types;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

pub use class::{Class, ClassBuilder, ClassRef, ClassShape, RecordField};
pub use heap::Heap;
pub use object::{HostObject, Record};
pub use types::{BuiltinType, TypeRef};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    // Scalars
    None,
    Bool(bool),
    Int(i64),
    Float(f64),

    // Heap types
    Str(Heap<str>),
    Bytes(Heap<[u8]>),
    List(Heap<Vec<Value>>),
    Tuple(Heap<Vec<Value>>),
    Set(Heap<FxHashSet<Value>>),
    /// Dictionary. Keys are arbitrary hashable values.
    Map(Heap<FxHashMap<Value, Value>>),

    /// A type: builtin or user class.
    Type(TypeRef),
    /// An instance of a user class.
    Object(Heap<dyn HostObject>),
    /// A bag of named members, e.g. a module the host exposes to patterns
    /// (`http.OK`).
    Namespace(Heap<FxHashMap<Arc<str>, Value>>),
}

impl Value {
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    // Factory methods

    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Heap::from_arc(Arc::from(s.as_ref())))
    }

    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        Value::Bytes(Heap::from_arc(Arc::from(b.as_ref())))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Heap::new(items.into_iter().collect()))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(Heap::new(entries.into_iter().collect()))
    }

    pub fn object<O: HostObject + 'static>(obj: O) -> Self {
        let obj: Arc<dyn HostObject> = Arc::new(obj);
        Value::Object(Heap::from_arc(obj))
    }

    pub fn class(class: ClassRef) -> Self {
        Value::Type(TypeRef::Class(class))
    }

    pub fn builtin(ty: BuiltinType) -> Self {
        Value::Type(TypeRef::Builtin(ty))
    }

    pub fn namespace<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let members = members
            .into_iter()
            .map(|(name, value)| (Arc::from(name.as_ref()), value))
            .collect();
        Value::Namespace(Heap::new(members))
    }

    // Inspection

    /// Name of the value's type, as shown in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Type(_) => "type",
            Value::Object(obj) => obj.class().name(),
            Value::Namespace(_) => "namespace",
        }
    }

    /// Elements of a sequence-like value (`list` or `tuple`).
    ///
    /// Strings and bytes are deliberately not sequences for matching.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a mapping-like value.
    pub fn as_map(&self) -> Option<&FxHashMap<Value, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The type this value denotes, if it is a type.
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            Value::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Attribute access (`value.name`).
    ///
    /// Objects consult their own attributes, then class attributes; types
    /// consult class attributes; namespaces consult their members.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.attr(name).or_else(|| obj.class().lookup_attr(name)),
            Value::Type(TypeRef::Class(class)) => class.lookup_attr(name),
            Value::Namespace(members) => members.get(name).cloned(),
            _ => None,
        }
    }

    /// Equality as seen by literal and value patterns.
    ///
    /// Numbers compare across `bool`/`int`/`float`; containers compare
    /// element-wise with the same rule. Lists never equal tuples.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| lookup_key(b, k).is_some_and(|w| v.equals(w)))
            }
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Namespace(a), Value::Namespace(b)) => Heap::ptr_eq(a, b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.equals(b),
                _ => false,
            },
        }
    }

    fn as_number(&self) -> Option<Number> {
        match *self {
            Value::Bool(b) => Some(Number::Int(i64::from(b))),
            Value::Int(n) => Some(Number::Int(n)),
            Value::Float(f) => Some(Number::Float(f)),
            _ => None,
        }
    }
}

/// Look up `key` in `map`, falling back to numeric-tower equality so that
/// `1.0` finds an entry keyed by `1`.
pub fn lookup_key<'m>(map: &'m FxHashMap<Value, Value>, key: &Value) -> Option<&'m Value> {
    lookup_entry(map, key).map(|(_, v)| v)
}

/// Like [`lookup_key`], but also returns the key as stored in the map.
pub fn lookup_entry<'m>(
    map: &'m FxHashMap<Value, Value>,
    key: &Value,
) -> Option<(&'m Value, &'m Value)> {
    if let Some(entry) = map.get_key_value(key) {
        return Some(entry);
    }
    key.as_number()?;
    map.iter().find(|(k, _)| k.equals(key))
}

#[derive(Copy, Clone)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Exact comparison; an int never equals a float that only rounds to it.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn equals(self, other: Number) -> bool {
        // 2^63, exactly representable.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Int(i), Number::Float(f)) | (Number::Float(f), Number::Int(i)) => {
                f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Namespace(a), Value::Namespace(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::None => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::List(items) | Value::Tuple(items) => items.hash(state),
            // Unordered containers: length keeps Hash consistent with Eq.
            Value::Set(items) => items.len().hash(state),
            Value::Map(map) => map.len().hash(state),
            Value::Type(ty) => ty.hash(state),
            Value::Object(obj) => obj.addr().hash(state),
            Value::Namespace(ns) => ns.addr().hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_items<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items.iter())?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items.iter())?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => {
                write!(f, "{{")?;
                write_items(f, items.iter())?;
                write!(f, "}}")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Type(ty) => write!(f, "{ty}"),
            Value::Object(obj) => write!(f, "{obj:?}"),
            Value::Namespace(members) => {
                let mut names: Vec<_> = members.keys().collect();
                names.sort();
                write!(f, "namespace(")?;
                for (i, name) in names.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={}", members[name])?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
