//! Type references: builtin container/scalar types and user classes.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::class::ClassRef;
use super::Value;

/// Builtin types known to the engine without any registration.
///
/// Each one decomposes into a single "self" field for construction patterns
/// (`int(x)` binds `x` to the whole integer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Set,
    Dict,
}

impl BuiltinType {
    /// Every builtin type, in a stable order.
    pub const ALL: [BuiltinType; 9] = [
        BuiltinType::Bool,
        BuiltinType::Int,
        BuiltinType::Float,
        BuiltinType::Str,
        BuiltinType::Bytes,
        BuiltinType::List,
        BuiltinType::Tuple,
        BuiltinType::Set,
        BuiltinType::Dict,
    ];

    /// The name hosts use to refer to this type.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Int => "int",
            BuiltinType::Float => "float",
            BuiltinType::Str => "str",
            BuiltinType::Bytes => "bytes",
            BuiltinType::List => "list",
            BuiltinType::Tuple => "tuple",
            BuiltinType::Set => "set",
            BuiltinType::Dict => "dict",
        }
    }

    /// Look up a builtin type by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Instance check. `bool` values are also instances of `int`.
    pub fn is_instance(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (BuiltinType::Bool, Value::Bool(_))
                | (BuiltinType::Int, Value::Int(_) | Value::Bool(_))
                | (BuiltinType::Float, Value::Float(_))
                | (BuiltinType::Str, Value::Str(_))
                | (BuiltinType::Bytes, Value::Bytes(_))
                | (BuiltinType::List, Value::List(_))
                | (BuiltinType::Tuple, Value::Tuple(_))
                | (BuiltinType::Set, Value::Set(_))
                | (BuiltinType::Dict, Value::Map(_))
        )
    }
}

/// A runtime type: the target of a construction pattern.
#[derive(Clone)]
pub enum TypeRef {
    Builtin(BuiltinType),
    Class(ClassRef),
}

impl TypeRef {
    /// Short type name (`int`, `Point`).
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Builtin(ty) => ty.name(),
            TypeRef::Class(class) => class.name(),
        }
    }

    /// Identifier used as the key of registry overrides.
    ///
    /// Builtins use their bare name; classes use `module.Name`.
    pub fn identifier(&self) -> Cow<'_, str> {
        match self {
            TypeRef::Builtin(ty) => Cow::Borrowed(ty.name()),
            TypeRef::Class(class) => Cow::Owned(class.qualified_name()),
        }
    }

    /// Check whether `value` is an instance of this type.
    pub fn is_instance(&self, value: &Value) -> bool {
        match self {
            TypeRef::Builtin(ty) => ty.is_instance(value),
            TypeRef::Class(class) => match value {
                Value::Object(obj) => obj.class().is_subclass_of(class),
                _ => false,
            },
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeRef::Builtin(a), TypeRef::Builtin(b)) => a == b,
            (TypeRef::Class(a), TypeRef::Class(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeRef::Builtin(ty) => ty.hash(state),
            TypeRef::Class(class) => (Arc::as_ptr(class) as usize).hash(state),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.identifier())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.identifier())
    }
}
