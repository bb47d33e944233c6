//! Lexer for casemate pattern text, built on logos.
//!
//! Lexing happens in two layers: logos recognises raw tokens, then each
//! raw token is cooked into a [`TokenKind`] (strings unescaped, numbers
//! parsed). The `if` keyword ends the pattern: everything after it is kept
//! verbatim as guard text and never tokenized.

mod cook;
mod lex_error;
mod raw_token;
mod token;

use std::sync::Arc;

use cm_ir::Span;
use logos::Logos;
use tracing::trace;

pub use lex_error::{LexError, LexErrorKind};
use raw_token::RawToken;
pub use token::{GuardText, Token, TokenKind, TokenList};

/// Tokenize pattern text.
///
/// The returned token list always ends with [`TokenKind::Eof`], positioned
/// at the end of the pattern part of the text.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut guard = None;
    let mut end = source.len();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::from_range(range.clone());
        let slice = lexer.slice();

        let Ok(raw) = result else {
            let ch = slice.chars().next().unwrap_or('\0');
            return Err(LexError::new(LexErrorKind::UnexpectedCharacter(ch), span));
        };

        if raw == RawToken::If {
            guard = Some(split_guard(source, range.start, range.end)?);
            end = range.start;
            break;
        }

        // `-9223372036854775808` has no positive counterpart; fold the sign in.
        if matches!(raw, RawToken::Int | RawToken::HexInt)
            && cook::is_min_magnitude(slice, raw == RawToken::HexInt)
        {
            if let Some(last) = tokens.last_mut().filter(|t| t.kind == TokenKind::Minus) {
                last.kind = TokenKind::Int(i64::MIN);
                last.span = last.span.merge(span);
                continue;
            }
        }

        tokens.push(Token::new(cook(raw, slice, range.start, span)?, span));
    }

    let eof = Span::point(u32::try_from(end).unwrap_or(u32::MAX));
    tokens.push(Token::new(TokenKind::Eof, eof));
    trace!(count = tokens.len(), guarded = guard.is_some(), "lexed pattern");
    Ok(TokenList { tokens, guard })
}

/// Take everything after the `if` keyword as the guard source.
fn split_guard(source: &str, if_start: usize, if_end: usize) -> Result<GuardText, LexError> {
    let rest = &source[if_end..];
    let text = rest.trim();
    if text.is_empty() {
        return Err(LexError::new(
            LexErrorKind::EmptyGuard,
            Span::from_range(if_start..if_end),
        ));
    }
    let leading = rest.len() - rest.trim_start().len();
    let start = if_end + leading;
    Ok(GuardText {
        text: Arc::from(text),
        span: Span::from_range(start..start + text.len()),
    })
}

fn cook(raw: RawToken, slice: &str, offset: usize, span: Span) -> Result<TokenKind, LexError> {
    let kind = match raw {
        RawToken::None => TokenKind::None,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::As => TokenKind::As,
        // Handled by the caller before cooking.
        RawToken::If => TokenKind::Eof,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::DoubleStar => TokenKind::DoubleStar,
        RawToken::Star => TokenKind::Star,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Minus => TokenKind::Minus,
        RawToken::HexInt => TokenKind::Int(cook::parse_hex(slice, span)?),
        RawToken::Int => TokenKind::Int(cook::parse_int(slice, span)?),
        RawToken::Float => TokenKind::Float(cook::parse_float(slice, span)?),
        RawToken::Str => {
            // Strip the quotes.
            let body = &slice[1..slice.len() - 1];
            TokenKind::Str(Arc::from(cook::unescape_str(body, offset + 1)?))
        }
        RawToken::Bytes => {
            // Strip `b` and the quotes.
            let body = &slice[2..slice.len() - 1];
            TokenKind::Bytes(Arc::from(cook::unescape_bytes(body, offset + 2)?))
        }
        RawToken::UnterminatedStr => {
            return Err(LexError::new(LexErrorKind::UnterminatedString, span));
        }
        RawToken::Ident => TokenKind::Ident(Arc::from(slice)),
    };
    Ok(kind)
}
