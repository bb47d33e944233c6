//! Casemate parser - front-ends that compile patterns.
//!
//! Two front-ends produce the same [`Pattern`](cm_ir::Pattern) trees:
//! - pattern text: [`compile`] lexes, parses to a [`cst`] and lowers it
//! - host expressions: [`lower_expr`] and [`lower_case_test`] translate a
//!   [`HostExpr`](cm_ir::HostExpr) into the same CST and lower it with the
//!   same validation
//!
//! All failures are [`SyntaxError`]s carrying the offending text.

pub mod cst;
mod cursor;
mod error;
mod from_expr;
mod grammar;
mod lower;

use cm_ir::CompiledPattern;
use tracing::instrument;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use from_expr::{lower_case_test, lower_expr};
pub use lower::{is_capture_name, lower};

/// Parse pattern text into a concrete syntax tree.
pub fn parse(source: &str) -> Result<cst::PatternText, SyntaxError> {
    let tokens = cm_lexer::lex(source).map_err(|err| SyntaxError::from_lex(err, source))?;
    grammar::parse_tokens(tokens, source)
}

/// Compile pattern text (with optional `if` guard) into a pattern.
#[instrument(level = "trace", skip_all, fields(source = %source))]
pub fn compile(source: &str) -> Result<CompiledPattern, SyntaxError> {
    let text = parse(source)?;
    lower(&text, source)
}
