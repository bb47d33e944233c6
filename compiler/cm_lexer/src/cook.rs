//! Cooking: turning raw literal slices into values.
//!
//! String escapes: `\n` `\t` `\r` `\\` `\'` `\"` `\0` `\xHH` `\u{H..}`.
//! Bytes literals accept the same set except `\u{..}`, and must be ASCII.

use cm_ir::Span;

use crate::lex_error::{LexError, LexErrorKind};

/// One step of escape decoding.
enum Unit {
    Char(char),
    Byte(u8),
}

/// Decode the body of a quoted literal, calling `push` for each unit.
///
/// `base` is the byte offset of `body` in the pattern text, used for spans.
fn decode(
    body: &str,
    base: usize,
    allow_unicode: bool,
    mut push: impl FnMut(Unit, Span) -> Result<(), LexError>,
) -> Result<(), LexError> {
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let start = base + i;
        if c != '\\' {
            push(Unit::Char(c), Span::from_range(start..start + c.len_utf8()))?;
            continue;
        }
        let Some((j, esc)) = chars.next() else {
            return Err(LexError::new(
                LexErrorKind::UnterminatedString,
                Span::from_range(start..start + 1),
            ));
        };
        let esc_span = |end: usize| Span::from_range(start..base + end);
        let unit = match esc {
            'n' => Unit::Char('\n'),
            't' => Unit::Char('\t'),
            'r' => Unit::Char('\r'),
            '0' => Unit::Char('\0'),
            '\\' | '\'' | '"' => Unit::Char(esc),
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next().map(|(_, h)| h)).collect();
                let end = j + 1 + hex.len();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 && is_hex(&hex) => Unit::Byte(byte),
                    _ => {
                        return Err(LexError::new(LexErrorKind::InvalidEscape('x'), esc_span(end)))
                    }
                }
            }
            'u' if allow_unicode => {
                let mut digits = String::new();
                let mut end = j + 1;
                let mut closed = false;
                if chars.next_if(|&(_, c)| c == '{').is_some() {
                    end += 1;
                    for (k, d) in chars.by_ref() {
                        end = k + 1;
                        if d == '}' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                }
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| closed && !digits.is_empty() && is_hex(&digits))
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => Unit::Char(ch),
                    None => {
                        return Err(LexError::new(LexErrorKind::InvalidEscape('u'), esc_span(end)))
                    }
                }
            }
            other => {
                return Err(LexError::new(
                    LexErrorKind::InvalidEscape(other),
                    esc_span(j + other.len_utf8()),
                ))
            }
        };
        let end = chars.peek().map_or(body.len(), |&(k, _)| k);
        push(unit, esc_span(end))?;
    }
    Ok(())
}

fn is_hex(digits: &str) -> bool {
    digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Unescape the body of a string literal (between the quotes).
pub(crate) fn unescape_str(body: &str, base: usize) -> Result<String, LexError> {
    if !body.contains('\\') {
        return Ok(body.to_owned());
    }
    let mut out = String::with_capacity(body.len());
    decode(body, base, true, |unit, _| {
        match unit {
            Unit::Char(c) => out.push(c),
            Unit::Byte(b) => out.push(char::from(b)),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Unescape the body of a bytes literal.
pub(crate) fn unescape_bytes(body: &str, base: usize) -> Result<Vec<u8>, LexError> {
    let mut out = Vec::with_capacity(body.len());
    decode(body, base, false, |unit, span| {
        match unit {
            Unit::Char(c) => match u8::try_from(c) {
                Ok(b) if b.is_ascii() => out.push(b),
                _ => return Err(LexError::new(LexErrorKind::NonAsciiBytes, span)),
            },
            Unit::Byte(b) => out.push(b),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Parse a decimal integer with `_` separators.
pub(crate) fn parse_int(slice: &str, span: Span) -> Result<i64, LexError> {
    parse_radix(slice, 10, span)
}

/// Parse a `0x` hex integer with `_` separators.
pub(crate) fn parse_hex(slice: &str, span: Span) -> Result<i64, LexError> {
    parse_radix(&slice[2..], 16, span)
}

/// Whether an integer literal's digits are exactly `i64::MIN.unsigned_abs()`.
pub(crate) fn is_min_magnitude(slice: &str, hex: bool) -> bool {
    let (digits, radix) = if hex { (&slice[2..], 16) } else { (slice, 10) };
    u64::from_str_radix(&digits.replace('_', ""), radix)
        .is_ok_and(|n| n == i64::MIN.unsigned_abs())
}

fn parse_radix(digits: &str, radix: u32, span: Span) -> Result<i64, LexError> {
    let cleaned = digits.replace('_', "");
    i64::from_str_radix(&cleaned, radix).map_err(|_| {
        // The regex only admits digits, so the only failure is overflow.
        LexError::new(LexErrorKind::IntOverflow, span)
    })
}

/// Parse a float literal with `_` separators.
pub(crate) fn parse_float(slice: &str, span: Span) -> Result<f64, LexError> {
    slice
        .replace('_', "")
        .parse::<f64>()
        .map_err(|_| LexError::new(LexErrorKind::InvalidNumber, span))
}

#[cfg(test)]
mod tests;
