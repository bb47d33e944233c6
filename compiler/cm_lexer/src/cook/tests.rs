#![allow(clippy::unwrap_used, reason = "tests unwrap for concise assertions")]

use super::*;

#[test]
fn plain_string_is_copied() {
    assert_eq!(unescape_str("hello", 1).unwrap(), "hello");
}

#[test]
fn common_escapes() {
    assert_eq!(unescape_str(r#"a\n\t\"\'\\"#, 0).unwrap(), "a\n\t\"'\\");
    assert_eq!(unescape_str(r"\x41\u{e9}", 0).unwrap(), "A\u{e9}");
}

#[test]
fn invalid_escape_reports_span() {
    let err = unescape_str(r"ab\q", 1).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
    assert_eq!(err.span, Span::new(3, 5));
}

#[test]
fn malformed_hex_and_unicode_escapes() {
    assert_eq!(
        unescape_str(r"\x4", 0).unwrap_err().kind,
        LexErrorKind::InvalidEscape('x')
    );
    assert_eq!(
        unescape_str(r"\x+f", 0).unwrap_err().kind,
        LexErrorKind::InvalidEscape('x')
    );
    assert_eq!(
        unescape_str(r"\u{zz}", 0).unwrap_err().kind,
        LexErrorKind::InvalidEscape('u')
    );
    assert_eq!(
        unescape_str(r"\u{41", 0).unwrap_err().kind,
        LexErrorKind::InvalidEscape('u')
    );
}

#[test]
fn bytes_literals() {
    assert_eq!(unescape_bytes(r"ab\x00\xff", 0).unwrap(), vec![b'a', b'b', 0, 0xff]);
    assert_eq!(
        unescape_bytes("caf\u{e9}", 0).unwrap_err().kind,
        LexErrorKind::NonAsciiBytes
    );
    assert_eq!(
        unescape_bytes(r"\u{41}", 0).unwrap_err().kind,
        LexErrorKind::InvalidEscape('u')
    );
}

#[test]
fn numbers() {
    let span = Span::DUMMY;
    assert_eq!(parse_int("1_000", span).unwrap(), 1000);
    assert_eq!(parse_hex("0xff", span).unwrap(), 255);
    assert_eq!(parse_float("2.5e-3", span).unwrap(), 0.0025);
    assert_eq!(
        parse_int("99999999999999999999", span).unwrap_err().kind,
        LexErrorKind::IntOverflow
    );
}
