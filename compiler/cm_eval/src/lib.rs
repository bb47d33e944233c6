//! Casemate Eval - matching compiled patterns against runtime values.
//!
//! # Architecture
//!
//! - [`Matcher`]: recursive evaluation of a [`CompiledPattern`] against a
//!   [`Value`], producing [`Bindings`] or failure
//! - [`FieldRegistry`]: maps a type to the fields construction patterns
//!   destructure
//! - [`Resolver`]: host callback that looks up external names (`Color`,
//!   `http.OK`); [`Scope`] is the stock table implementation
//! - [`GuardEvaluator`]: host callback for `if` guards
//!
//! Match failure is `Ok(None)`. `Err` is reserved for patterns that cannot
//! be evaluated at all (see [`MatchError`]).
//!
//! [`CompiledPattern`]: cm_ir::CompiledPattern
//! [`Value`]: cm_ir::Value

mod errors;
mod guard;
mod matcher;
pub mod registry;
mod resolver;
mod stack;

use cm_ir::{Name, Value};
use rustc_hash::FxHashMap;

pub use errors::{MatchError, NamePosition};
pub use guard::GuardEvaluator;
pub use matcher::{Matcher, UnresolvedNamePolicy};
pub use registry::{FieldDescriptor, FieldRegistry, FieldSource, ResolvedFields};
pub use resolver::{Resolver, Scope};
pub use stack::ensure_sufficient_stack;

/// Names bound by a successful match.
pub type Bindings = FxHashMap<Name, Value>;
