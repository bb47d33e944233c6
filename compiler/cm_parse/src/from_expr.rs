//! Host-expression front-end.
//!
//! Hosts that reuse their native expression syntax for patterns pass the
//! parsed expression in. The mapping onto pattern syntax is:
//!
//! | expression          | pattern               |
//! |---------------------|-----------------------|
//! | `a \| b`            | or-pattern            |
//! | `name := p`         | `p as name`           |
//! | `[a, *rest]`, tuple | sequence              |
//! | `{k: v, **rest}`    | mapping               |
//! | `Cls(a, k=v)`       | class pattern         |
//! | `-1`, constants     | literal               |
//!
//! A case test is `marker @ pattern`, optionally followed by
//! `and guard...`; the guard is kept as an expression for the host.

use std::sync::Arc;

use cm_ir::{CompiledPattern, DictEntry, DottedPath, Guard, HostExpr, Pattern, Span, Value};
use tracing::trace;

use crate::cst::{Arg, Brackets, MapItem, Node, NodeKind, SeqItem};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lower::lower_node;

fn node(kind: NodeKind) -> Node {
    Node::new(kind, Span::DUMMY)
}

fn unsupported(kind: SyntaxErrorKind, expr: &HostExpr) -> SyntaxError {
    SyntaxError::new(kind, Span::DUMMY, &expr.to_string())
}

/// `a.b.c` as a dotted path, if `expr` is a chain of plain names.
fn dotted(expr: &HostExpr) -> Option<DottedPath> {
    match expr {
        HostExpr::Name(name) => Some(DottedPath::single(name)),
        HostExpr::Attribute { value, attr } => dotted(value).map(|path| path.join(attr)),
        _ => None,
    }
}

fn literal(value: &Value) -> Option<Value> {
    match value {
        Value::None
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Bytes(_) => Some(value.clone()),
        _ => None,
    }
}

fn to_node(expr: &HostExpr) -> Result<Node, SyntaxError> {
    let kind = match expr {
        HostExpr::Constant(value) => NodeKind::Literal(
            literal(value)
                .ok_or_else(|| unsupported(SyntaxErrorKind::UnsupportedExpression, expr))?,
        ),
        HostExpr::Neg(inner) => {
            let negated = match &**inner {
                HostExpr::Constant(Value::Int(n)) => n.checked_neg().map(Value::int),
                HostExpr::Constant(Value::Float(f)) => Some(Value::float(-f)),
                _ => None,
            };
            NodeKind::Literal(
                negated.ok_or_else(|| unsupported(SyntaxErrorKind::UnsupportedExpression, expr))?,
            )
        }
        HostExpr::Name(name) => NodeKind::Name(Arc::clone(name)),
        HostExpr::Attribute { .. } => NodeKind::Dotted(
            dotted(expr)
                .ok_or_else(|| unsupported(SyntaxErrorKind::UnsupportedExpression, expr))?,
        ),
        HostExpr::Call {
            func,
            args,
            keywords,
        } => {
            let path = dotted(func)
                .ok_or_else(|| unsupported(SyntaxErrorKind::UnsupportedExpression, func))?;
            let mut lowered = Vec::with_capacity(args.len() + keywords.len());
            for arg in args {
                if let HostExpr::Starred(_) = arg {
                    return Err(unsupported(SyntaxErrorKind::StarOutsideSequence, arg));
                }
                lowered.push(Arg::Positional(to_node(arg)?));
            }
            for (name, value) in keywords {
                lowered.push(Arg::Keyword {
                    name: Arc::clone(name),
                    span: Span::DUMMY,
                    value: to_node(value)?,
                });
            }
            NodeKind::Class {
                path,
                args: lowered,
            }
        }
        HostExpr::BitOr(left, right) => {
            NodeKind::Or(vec![to_node(left)?, to_node(right)?])
        }
        HostExpr::Named { target, value } => NodeKind::As {
            pattern: Box::new(to_node(value)?),
            name: Arc::clone(target),
            name_span: Span::DUMMY,
        },
        HostExpr::List(items) => sequence(Brackets::Square, items)?,
        HostExpr::Tuple(items) => sequence(Brackets::Paren, items)?,
        HostExpr::Dict(entries) => mapping(expr, entries)?,
        HostExpr::Starred(_) => {
            return Err(unsupported(SyntaxErrorKind::StarOutsideSequence, expr))
        }
        HostExpr::BoolAnd(_) | HostExpr::MatMul(..) | HostExpr::Opaque(_) => {
            return Err(unsupported(SyntaxErrorKind::UnsupportedExpression, expr))
        }
    };
    Ok(node(kind))
}

fn sequence(brackets: Brackets, items: &[HostExpr]) -> Result<NodeKind, SyntaxError> {
    let items = items
        .iter()
        .map(|item| match item {
            HostExpr::Starred(inner) => match &**inner {
                HostExpr::Name(name) => Ok(SeqItem::Star(Arc::clone(name), Span::DUMMY)),
                _ => Err(unsupported(SyntaxErrorKind::UnsupportedExpression, item)),
            },
            _ => to_node(item).map(SeqItem::Pattern),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NodeKind::Sequence { brackets, items })
}

fn mapping(expr: &HostExpr, entries: &[DictEntry]) -> Result<NodeKind, SyntaxError> {
    let mut items = Vec::with_capacity(entries.len());
    let mut rest = None;
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            DictEntry::Pair(key, value) => items.push(MapItem {
                key: to_node(key)?,
                value: to_node(value)?,
            }),
            DictEntry::Unpack(HostExpr::Name(name)) => {
                if i + 1 != entries.len() {
                    return Err(unsupported(
                        SyntaxErrorKind::RestNotLast(Arc::clone(name)),
                        expr,
                    ));
                }
                rest = Some((Arc::clone(name), Span::DUMMY));
            }
            DictEntry::Unpack(other) => {
                return Err(unsupported(SyntaxErrorKind::UnsupportedExpression, other))
            }
        }
    }
    Ok(NodeKind::Mapping { items, rest })
}

/// Compile a host expression used in pattern position.
pub fn lower_expr(expr: &HostExpr) -> Result<Pattern, SyntaxError> {
    let node = to_node(expr)?;
    lower_node(&node, &expr.to_string())
}

/// Split `marker @ pattern [and guard...]` into pattern and guard.
///
/// `@` binds tighter than `|` in host syntax, so `m @ a | b` arrives as
/// `(m @ a) | b` and is reassociated to `m @ (a | b)`.
fn split_case_test(test: &HostExpr) -> Option<(HostExpr, Option<HostExpr>)> {
    match test {
        HostExpr::MatMul(_, pattern) => Some(((**pattern).clone(), None)),
        HostExpr::BitOr(left, right) => {
            let (pattern, guard) = split_case_test(left)?;
            if guard.is_some() {
                return None;
            }
            Some((pattern.bit_or((**right).clone()), None))
        }
        HostExpr::BoolAnd(operands) => {
            let (first, guards) = operands.split_first()?;
            let (pattern, None) = split_case_test(first)? else {
                return None;
            };
            let guard = match guards {
                [] => None,
                [single] => Some(single.clone()),
                many => Some(HostExpr::BoolAnd(many.to_vec())),
            };
            Some((pattern, guard))
        }
        _ => None,
    }
}

/// Compile the test of a host `if` statement written as a case.
pub fn lower_case_test(test: &HostExpr) -> Result<CompiledPattern, SyntaxError> {
    let Some((pattern, guard)) = split_case_test(test) else {
        return Err(unsupported(SyntaxErrorKind::MissingCaseMarker, test));
    };
    let pattern = lower_expr(&pattern)?;
    trace!(%pattern, guarded = guard.is_some(), "lowered case test");
    Ok(CompiledPattern::new(
        pattern,
        guard.map(|g| Guard::Expr(Arc::new(g))),
    ))
}
