//! Syntax errors for pattern text and host-expression patterns.

use cm_ir::{Name, Span};
use cm_lexer::{LexError, LexErrorKind};

/// What is wrong with a pattern.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrorKind),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },

    #[error("star pattern outside a sequence")]
    StarOutsideSequence,

    #[error("multiple starred names in sequence pattern")]
    MultipleStars,

    #[error("mapping keys must be literals or dotted names")]
    InvalidMappingKey,

    #[error("`**{0}` must be the last entry of a mapping pattern")]
    RestNotLast(Name),

    #[error("positional patterns follow keyword patterns")]
    PositionalAfterKeyword,

    #[error("`{0}` cannot be bound: capture targets start with a lowercase letter or `_`")]
    InvalidCaptureTarget(Name),

    #[error("name `{0}` bound more than once")]
    DuplicateCapture(Name),

    #[error("alternative patterns bind different names")]
    InconsistentOrBindings,

    #[error("keyword argument `{0}` repeated")]
    RepeatedKeyword(Name),

    #[error("mapping pattern checks duplicate key ({0})")]
    DuplicateMappingKey(String),

    #[error("unsupported expression in pattern position")]
    UnsupportedExpression,

    #[error("case test must have the form `marker @ pattern`")]
    MissingCaseMarker,
}

/// A malformed pattern, with the offending text.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("invalid pattern: {kind} at {span} in `{snippet}`")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    /// The offending source text; the whole source when the span is empty.
    pub snippet: String,
}

impl SyntaxError {
    /// Create an error, cutting the snippet out of `source`.
    pub fn new(kind: SyntaxErrorKind, span: Span, source: &str) -> Self {
        let slice = span.slice(source);
        let snippet = if slice.trim().is_empty() {
            source.trim().to_owned()
        } else {
            slice.to_owned()
        };
        SyntaxError {
            kind,
            span,
            snippet,
        }
    }

    pub(crate) fn from_lex(err: LexError, source: &str) -> Self {
        Self::new(SyntaxErrorKind::Lex(err.kind), err.span, source)
    }
}
