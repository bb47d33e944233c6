//! Host expression trees.
//!
//! Hosts that write patterns with their own expression syntax (for example
//! `case @ Point(x=0, y=y) and y > 0`) hand the engine an already-parsed
//! expression instead of pattern text. `HostExpr` models the subset of
//! expression forms such a host produces; anything the engine never needs to
//! look inside (typically guard operands) travels as `Opaque` text.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// An entry of a dict display.
#[derive(Clone, Debug, PartialEq)]
pub enum DictEntry {
    /// `key: value`
    Pair(HostExpr, HostExpr),
    /// `**expr`
    Unpack(HostExpr),
}

/// A host-language expression.
#[derive(Clone, Debug, PartialEq)]
pub enum HostExpr {
    Constant(Value),
    Name(Arc<str>),
    /// `value.attr`
    Attribute { value: Box<HostExpr>, attr: Arc<str> },
    /// `func(args..., name=value...)`
    Call {
        func: Box<HostExpr>,
        args: Vec<HostExpr>,
        keywords: Vec<(Arc<str>, HostExpr)>,
    },
    /// `left | right`
    BitOr(Box<HostExpr>, Box<HostExpr>),
    /// `target := value`
    Named { target: Arc<str>, value: Box<HostExpr> },
    /// `*expr`
    Starred(Box<HostExpr>),
    List(Vec<HostExpr>),
    Tuple(Vec<HostExpr>),
    Dict(Vec<DictEntry>),
    /// Unary minus.
    Neg(Box<HostExpr>),
    /// `a and b and ...`, flattened.
    BoolAnd(Vec<HostExpr>),
    /// `left @ right`
    MatMul(Box<HostExpr>, Box<HostExpr>),
    /// Source text of an expression the engine does not interpret.
    Opaque(Arc<str>),
}

impl HostExpr {
    pub fn constant(value: impl Into<Value>) -> Self {
        HostExpr::Constant(value.into())
    }

    pub fn name(name: &str) -> Self {
        HostExpr::Name(Arc::from(name))
    }

    pub fn opaque(text: &str) -> Self {
        HostExpr::Opaque(Arc::from(text))
    }

    /// `self.attr`
    #[must_use]
    pub fn attr(self, attr: &str) -> Self {
        HostExpr::Attribute {
            value: Box::new(self),
            attr: Arc::from(attr),
        }
    }

    /// `self(args...)`
    #[must_use]
    pub fn call(self, args: Vec<HostExpr>) -> Self {
        HostExpr::Call {
            func: Box::new(self),
            args,
            keywords: Vec::new(),
        }
    }

    /// `self(args..., name=value...)`
    #[must_use]
    pub fn call_kw(self, args: Vec<HostExpr>, keywords: Vec<(&str, HostExpr)>) -> Self {
        HostExpr::Call {
            func: Box::new(self),
            args,
            keywords: keywords
                .into_iter()
                .map(|(name, value)| (Arc::from(name), value))
                .collect(),
        }
    }

    /// `self | other`
    #[must_use]
    pub fn bit_or(self, other: HostExpr) -> Self {
        HostExpr::BitOr(Box::new(self), Box::new(other))
    }

    /// `name := self`
    #[must_use]
    pub fn named(self, name: &str) -> Self {
        HostExpr::Named {
            target: Arc::from(name),
            value: Box::new(self),
        }
    }

    /// `*self`
    #[must_use]
    pub fn starred(self) -> Self {
        HostExpr::Starred(Box::new(self))
    }

    /// `self @ other`
    #[must_use]
    pub fn mat_mul(self, other: HostExpr) -> Self {
        HostExpr::MatMul(Box::new(self), Box::new(other))
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[HostExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for HostExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostExpr::Constant(value) => write!(f, "{value}"),
            HostExpr::Name(name) => write!(f, "{name}"),
            HostExpr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            HostExpr::Call {
                func,
                args,
                keywords,
            } => {
                write!(f, "{func}(")?;
                write_list(f, args)?;
                for (i, (name, value)) in keywords.iter().enumerate() {
                    if i > 0 || !args.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                write!(f, ")")
            }
            HostExpr::BitOr(left, right) => write!(f, "{left} | {right}"),
            HostExpr::Named { target, value } => write!(f, "({target} := {value})"),
            HostExpr::Starred(inner) => write!(f, "*{inner}"),
            HostExpr::List(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            HostExpr::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            HostExpr::Dict(entries) => {
                write!(f, "{{")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match entry {
                        DictEntry::Pair(key, value) => write!(f, "{key}: {value}")?,
                        DictEntry::Unpack(inner) => write!(f, "**{inner}")?,
                    }
                }
                write!(f, "}}")
            }
            HostExpr::Neg(inner) => write!(f, "-{inner}"),
            HostExpr::BoolAnd(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
            HostExpr::MatMul(left, right) => write!(f, "{left} @ {right}"),
            HostExpr::Opaque(text) => write!(f, "{text}"),
        }
    }
}
