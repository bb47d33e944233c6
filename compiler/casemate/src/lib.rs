//! Casemate - structural pattern matching for host values.
//!
//! Patterns are written in a small language modelled on `match`/`case`
//! patterns:
//!
//! ```text
//! [first, *rest]
//! Point(x=0, y=y) | Point(x=y, y=0)
//! {"action": "move", "to": (x, y), **extra}
//! 'north' | 'south' as direction if direction != last
//! ```
//!
//! An [`Engine`] compiles pattern text once (see [`PatternCache`]) and
//! matches it against a [`Value`], returning the captured [`Bindings`] or
//! `None`. The engine never reads or writes caller state: external names go
//! through a [`Resolver`], guards through a [`GuardEvaluator`].
//!
//! # Crates
//!
//! - `cm_ir`: values, classes and the compiled pattern tree
//! - `cm_lexer`, `cm_parse`: pattern text and host expressions to patterns
//! - `cm_eval`: the matcher and field-resolution registry

mod cache;
mod config;
mod engine;
mod error;

use std::sync::Once;

pub use cache::PatternCache;
pub use config::{EngineConfig, UNRESOLVED_NAMES_ENV};
pub use engine::Engine;
pub use error::EngineError;

pub use cm_eval::{
    registry, Bindings, FieldDescriptor, FieldRegistry, FieldSource, GuardEvaluator, MatchError,
    Matcher, NamePosition, ResolvedFields, Resolver, Scope, UnresolvedNamePolicy,
};
pub use cm_ir::{
    BuiltinType, Class, ClassBuilder, ClassRef, ClassShape, CompiledPattern, DictEntry,
    DottedPath, Guard, HostExpr, HostObject, MappingKey, Pattern, Record, RecordField, TypeRef,
    Value,
};
pub use cm_parse::{SyntaxError, SyntaxErrorKind};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Installs a `tracing-subscriber` registry filtered by `RUST_LOG`. Does
/// nothing unless `RUST_LOG` is set; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
