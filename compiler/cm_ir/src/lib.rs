//! Casemate IR - shared data model for the casemate pattern engine.
//!
//! # Contents
//!
//! - [`Span`]: byte ranges into pattern text, carried by syntax errors
//! - [`Value`]: runtime values the matcher inspects, with user [`Class`]es
//!   and [`HostObject`] instances
//! - [`Pattern`]: the immutable compiled pattern tree, plus [`Guard`] and
//!   [`CompiledPattern`]
//! - [`HostExpr`]: host-language expression trees accepted by the
//!   expression front-end

pub mod host_expr;
pub mod pattern;
mod span;
pub mod value;

pub use host_expr::{DictEntry, HostExpr};
pub use pattern::{CompiledPattern, DottedPath, Guard, MappingKey, Name, Pattern};
pub use span::Span;
pub use value::{
    BuiltinType, Class, ClassBuilder, ClassRef, ClassShape, Heap, HostObject, Record, RecordField,
    TypeRef, Value,
};
