//! Lexer errors.

use cm_ir::Span;

/// What went wrong while tokenizing.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    #[error("non-ASCII character in bytes literal")]
    NonAsciiBytes,

    #[error("integer literal too large")]
    IntOverflow,

    #[error("invalid number literal")]
    InvalidNumber,

    #[error("empty guard after `if`")]
    EmptyGuard,
}

/// A lexer error with its location.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Hash)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}
