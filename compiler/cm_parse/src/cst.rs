//! Concrete syntax tree for patterns.
//!
//! The CST mirrors the surface grammar: groups, bracket kinds and keyword
//! arguments are kept, and no validation beyond the grammar has happened
//! yet. Both front-ends produce it; [`crate::lower`] turns it into a
//! `Pattern`.

use cm_ir::{DottedPath, Name, Span, Value};
use cm_lexer::GuardText;

/// A parsed pattern text: the pattern and the raw guard.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternText {
    pub pattern: Node,
    pub guard: Option<GuardText>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}

/// Which brackets enclosed a sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Brackets {
    /// `[a, b]`
    Square,
    /// `(a, b)`
    Paren,
    /// `a, b` at the top level
    Bare,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// `None`, `True`, `False`, strings, bytes, numbers (sign applied).
    Literal(Value),
    /// A single identifier.
    Name(Name),
    /// Two or more dot-separated identifiers.
    Dotted(DottedPath),
    /// `( pattern )`
    Group(Box<Node>),
    Sequence {
        brackets: Brackets,
        items: Vec<SeqItem>,
    },
    Mapping {
        items: Vec<MapItem>,
        rest: Option<(Name, Span)>,
    },
    /// `path(args...)`
    Class {
        path: DottedPath,
        args: Vec<Arg>,
    },
    /// `a | b | ...`, at least two options.
    Or(Vec<Node>),
    /// `pattern as name`
    As {
        pattern: Box<Node>,
        name: Name,
        name_span: Span,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SeqItem {
    Pattern(Node),
    /// `*name`
    Star(Name, Span),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapItem {
    pub key: Node,
    pub value: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Positional(Node),
    Keyword { name: Name, span: Span, value: Node },
}
