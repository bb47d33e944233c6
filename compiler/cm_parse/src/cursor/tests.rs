#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;
use cm_lexer::lex;

#[test]
fn advance_sticks_at_eof() {
    let list = lex("a").unwrap();
    let mut cursor = Cursor::new(&list.tokens);
    assert!(matches!(cursor.advance().kind, TokenKind::Ident(_)));
    assert!(cursor.is_at_end());
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_at_end());
    assert_eq!(cursor.previous_span(), Span::new(0, 1));
}

#[test]
fn check_ignores_payload() {
    let list = lex("x = 1").unwrap();
    let mut cursor = Cursor::new(&list.tokens);
    assert!(cursor.check(&TokenKind::Ident("other".into())));
    assert_eq!(cursor.peek_kind(), &TokenKind::Eq);
    assert!(!cursor.eat(&TokenKind::Comma));
    assert!(cursor.eat(&TokenKind::Ident("x".into())));
    assert!(cursor.eat(&TokenKind::Eq));
    assert!(cursor.check(&TokenKind::Int(0)));
}
