//! Cooked tokens handed to the parser.

use std::fmt;
use std::sync::Arc;

use cm_ir::{Name, Span};

/// Token kind with literal payloads already parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    None,
    True,
    False,
    As,

    // Literals
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    Ident(Name),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Star,
    DoubleStar,
    Pipe,
    Eq,
    Dot,
    Minus,

    /// End of the pattern (start of the guard, if any).
    Eof,
}

impl TokenKind {
    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::None => "`None`",
            TokenKind::True => "`True`",
            TokenKind::False => "`False`",
            TokenKind::As => "`as`",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Bytes(_) => "bytes literal",
            TokenKind::Ident(_) => "identifier",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Star => "`*`",
            TokenKind::DoubleStar => "`**`",
            TokenKind::Pipe => "`|`",
            TokenKind::Eq => "`=`",
            TokenKind::Dot => "`.`",
            TokenKind::Minus => "`-`",
            TokenKind::Eof => "end of pattern",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token and its location in the pattern text.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Guard text split off after the `if` keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardText {
    /// Trimmed source of the guard expression.
    pub text: Arc<str>,
    pub span: Span,
}

/// Lexer output: pattern tokens (terminated by `Eof`) and the optional guard.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    pub guard: Option<GuardText>,
}

impl TokenList {
    /// Number of tokens, including the trailing `Eof`.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
