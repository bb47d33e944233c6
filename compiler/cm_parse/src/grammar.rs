//! Recursive-descent parser for pattern text.
//!
//! ```text
//! start      := pattern ("if" guard)?
//! pattern    := seq_item "," (seq_item ",")* seq_item? | as_pattern
//! as_pattern := or_pattern ("as" NAME)?
//! or_pattern := closed ("|" closed)*
//! closed     := literal | NAME | dotted_name | group | list | tuple
//!             | mapping | class
//! seq_item   := as_pattern | "*" NAME
//! mapping    := "{" (map_item ",")* ("**" NAME)? ","? "}"
//! map_item   := (literal | dotted_name) ":" as_pattern
//! class      := dotted_name "(" (arg ("," arg)* ","?)? ")"
//! arg        := NAME "=" as_pattern | as_pattern
//! ```

use std::sync::Arc;

use cm_ir::{DottedPath, Name, Span, Value};
use cm_lexer::{LexErrorKind, TokenKind, TokenList};
use tracing::trace;

use crate::cst::{Arg, Brackets, MapItem, Node, NodeKind, PatternText, SeqItem};
use crate::cursor::Cursor;
use crate::error::{SyntaxError, SyntaxErrorKind};

/// Pattern parser over a cooked token list.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList, source: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(&tokens.tokens),
            source,
        }
    }

    fn error(&self, kind: SyntaxErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.source)
    }

    fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let found = self.cursor.current_kind().describe();
        self.error(
            SyntaxErrorKind::UnexpectedToken { expected, found },
            self.cursor.current_span(),
        )
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Span, SyntaxError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn expect_name(&mut self) -> Result<(Name, Span), SyntaxError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.cursor.advance().span;
                Ok((Arc::clone(name), span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse a whole pattern; the token stream must be fully consumed.
    pub(crate) fn parse_top(&mut self) -> Result<Node, SyntaxError> {
        let start = self.cursor.current_span();
        let first = self.parse_seq_item()?;

        let node = if self.cursor.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.cursor.eat(&TokenKind::Comma) {
                if self.cursor.is_at_end() {
                    break;
                }
                items.push(self.parse_seq_item()?);
            }
            let span = start.merge(self.cursor.previous_span());
            Node::new(
                NodeKind::Sequence {
                    brackets: Brackets::Bare,
                    items,
                },
                span,
            )
        } else {
            match first {
                SeqItem::Pattern(node) => node,
                SeqItem::Star(_, span) => {
                    return Err(self.error(SyntaxErrorKind::StarOutsideSequence, span))
                }
            }
        };

        if !self.cursor.is_at_end() {
            return Err(self.unexpected("end of pattern"));
        }
        Ok(node)
    }

    fn parse_seq_item(&mut self) -> Result<SeqItem, SyntaxError> {
        if self.cursor.check(&TokenKind::Star) {
            let star = self.cursor.advance().span;
            let (name, name_span) = self.expect_name()?;
            return Ok(SeqItem::Star(name, star.merge(name_span)));
        }
        Ok(SeqItem::Pattern(self.parse_as()?))
    }

    fn parse_as(&mut self) -> Result<Node, SyntaxError> {
        let pattern = self.parse_or()?;
        if !self.cursor.eat(&TokenKind::As) {
            return Ok(pattern);
        }
        let (name, name_span) = self.expect_name()?;
        let span = pattern.span.merge(name_span);
        Ok(Node::new(
            NodeKind::As {
                pattern: Box::new(pattern),
                name,
                name_span,
            },
            span,
        ))
    }

    fn parse_or(&mut self) -> Result<Node, SyntaxError> {
        let first = self.parse_closed()?;
        if !self.cursor.check(&TokenKind::Pipe) {
            return Ok(first);
        }
        let mut options = vec![first];
        while self.cursor.eat(&TokenKind::Pipe) {
            options.push(self.parse_closed()?);
        }
        let span = options[0].span.merge(self.cursor.previous_span());
        Ok(Node::new(NodeKind::Or(options), span))
    }

    fn parse_closed(&mut self) -> Result<Node, SyntaxError> {
        let start = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Ident(_) => self.parse_name_or_class(),
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBracket => {
                self.cursor.advance();
                let items = self.parse_seq_items(&TokenKind::RBracket)?;
                let end = self.expect(&TokenKind::RBracket)?;
                Ok(Node::new(
                    NodeKind::Sequence {
                        brackets: Brackets::Square,
                        items,
                    },
                    start.merge(end),
                ))
            }
            TokenKind::LBrace => self.parse_mapping(),
            TokenKind::Star => Err(self.error(SyntaxErrorKind::StarOutsideSequence, start)),
            _ => {
                let value = self.parse_literal()?;
                Ok(Node::new(
                    NodeKind::Literal(value),
                    start.merge(self.cursor.previous_span()),
                ))
            }
        }
    }

    /// `None`, `True`, `False`, strings, bytes and (optionally negated) numbers.
    fn parse_literal(&mut self) -> Result<Value, SyntaxError> {
        let value = match self.cursor.current_kind() {
            TokenKind::None => Value::None,
            TokenKind::True => Value::TRUE,
            TokenKind::False => Value::FALSE,
            TokenKind::Int(n) => Value::int(*n),
            TokenKind::Float(f) => Value::float(*f),
            TokenKind::Str(s) => Value::string(&**s),
            TokenKind::Bytes(b) => Value::bytes(&**b),
            TokenKind::Minus => {
                self.cursor.advance();
                return match *self.cursor.current_kind() {
                    TokenKind::Int(n) => {
                        let span = self.cursor.advance().span;
                        n.checked_neg().map(Value::int).ok_or_else(|| {
                            self.error(SyntaxErrorKind::Lex(LexErrorKind::IntOverflow), span)
                        })
                    }
                    TokenKind::Float(f) => {
                        self.cursor.advance();
                        Ok(Value::float(-f))
                    }
                    _ => Err(self.unexpected("number")),
                };
            }
            _ => return Err(self.unexpected("pattern")),
        };
        self.cursor.advance();
        Ok(value)
    }

    fn parse_dotted(&mut self) -> Result<(DottedPath, Span), SyntaxError> {
        let (head, start) = self.expect_name()?;
        let mut path = DottedPath::single(&head);
        let mut end = start;
        while self.cursor.eat(&TokenKind::Dot) {
            let (segment, span) = self.expect_name()?;
            path = path.join(&segment);
            end = span;
        }
        Ok((path, start.merge(end)))
    }

    fn parse_name_or_class(&mut self) -> Result<Node, SyntaxError> {
        let (path, span) = self.parse_dotted()?;
        if self.cursor.check(&TokenKind::LParen) {
            return self.parse_class(path, span);
        }
        let kind = if path.attrs().is_empty() {
            NodeKind::Name(Arc::from(path.head()))
        } else {
            NodeKind::Dotted(path)
        };
        Ok(Node::new(kind, span))
    }

    fn parse_class(&mut self, path: DottedPath, start: Span) -> Result<Node, SyntaxError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        let mut seen_keyword = false;
        while !self.cursor.check(&TokenKind::RParen) {
            let is_keyword = matches!(self.cursor.current_kind(), TokenKind::Ident(_))
                && *self.cursor.peek_kind() == TokenKind::Eq;
            if is_keyword {
                let (name, span) = self.expect_name()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_as()?;
                args.push(Arg::Keyword { name, span, value });
                seen_keyword = true;
            } else {
                let value = self.parse_as()?;
                if seen_keyword {
                    return Err(self.error(SyntaxErrorKind::PositionalAfterKeyword, value.span));
                }
                args.push(Arg::Positional(value));
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RParen)?;
        Ok(Node::new(NodeKind::Class { path, args }, start.merge(end)))
    }

    /// `()`, `(pattern)` or `(item, ...)`.
    fn parse_paren(&mut self) -> Result<Node, SyntaxError> {
        let start = self.expect(&TokenKind::LParen)?;
        if self.cursor.check(&TokenKind::RParen) {
            let end = self.cursor.advance().span;
            return Ok(Node::new(
                NodeKind::Sequence {
                    brackets: Brackets::Paren,
                    items: Vec::new(),
                },
                start.merge(end),
            ));
        }

        let first = self.parse_seq_item()?;
        if self.cursor.eat(&TokenKind::Comma) {
            let mut items = vec![first];
            items.extend(self.parse_seq_items(&TokenKind::RParen)?);
            let end = self.expect(&TokenKind::RParen)?;
            return Ok(Node::new(
                NodeKind::Sequence {
                    brackets: Brackets::Paren,
                    items,
                },
                start.merge(end),
            ));
        }

        let end = self.expect(&TokenKind::RParen)?;
        match first {
            SeqItem::Pattern(inner) => Ok(Node::new(
                NodeKind::Group(Box::new(inner)),
                start.merge(end),
            )),
            SeqItem::Star(_, span) => Err(self.error(SyntaxErrorKind::StarOutsideSequence, span)),
        }
    }

    /// Comma-separated sequence items up to (not including) `close`.
    fn parse_seq_items(&mut self, close: &TokenKind) -> Result<Vec<SeqItem>, SyntaxError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_seq_item()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_mapping(&mut self) -> Result<Node, SyntaxError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        let mut rest = None;
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.check(&TokenKind::DoubleStar) {
                let star = self.cursor.advance().span;
                let (name, name_span) = self.expect_name()?;
                self.cursor.eat(&TokenKind::Comma);
                if !self.cursor.check(&TokenKind::RBrace) {
                    return Err(self.error(
                        SyntaxErrorKind::RestNotLast(name),
                        star.merge(name_span),
                    ));
                }
                rest = Some((name, star.merge(name_span)));
                break;
            }
            let key = self.parse_mapping_key()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_as()?;
            items.push(MapItem { key, value });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RBrace)?;
        Ok(Node::new(NodeKind::Mapping { items, rest }, start.merge(end)))
    }

    fn parse_mapping_key(&mut self) -> Result<Node, SyntaxError> {
        let start = self.cursor.current_span();
        if let TokenKind::Ident(_) = self.cursor.current_kind() {
            let (path, span) = self.parse_dotted()?;
            let kind = if path.attrs().is_empty() {
                NodeKind::Name(Arc::from(path.head()))
            } else {
                NodeKind::Dotted(path)
            };
            return Ok(Node::new(kind, span));
        }
        let value = self.parse_literal()?;
        Ok(Node::new(
            NodeKind::Literal(value),
            start.merge(self.cursor.previous_span()),
        ))
    }
}

/// Parse a cooked token list into a CST.
pub(crate) fn parse_tokens(tokens: TokenList, source: &str) -> Result<PatternText, SyntaxError> {
    let pattern = Parser::new(&tokens, source).parse_top()?;
    trace!(span = %pattern.span, "parsed pattern");
    Ok(PatternText {
        pattern,
        guard: tokens.guard,
    })
}
