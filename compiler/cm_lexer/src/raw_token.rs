//! Raw tokens recognised by logos, before cooking.

use logos::Logos;

/// Raw token from logos (literal payloads still unparsed).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    #[token("None")]
    None,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("as")]
    As,
    #[token("if")]
    If,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("**")]
    DoubleStar,
    #[token("*")]
    Star,
    #[token("|")]
    Pipe,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,

    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    HexInt,
    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,
    #[regex(r#"b"([^"\\\n]|\\.)*""#)]
    #[regex(r"b'([^'\\\n]|\\.)*'")]
    Bytes,
    /// A quote that never closes on the same line.
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
