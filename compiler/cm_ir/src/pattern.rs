//! Compiled pattern tree.
//!
//! A `Pattern` is produced once by a front-end (pattern text or host
//! expression) and is immutable afterwards, so compiled patterns can be
//! cached and shared across threads and matches.
//!
//! `Display` renders a pattern back into pattern text that parses to an
//! equal tree.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::host_expr::HostExpr;
use crate::value::Value;

/// An identifier in a pattern (capture target, keyword, path segment).
pub type Name = Arc<str>;

/// A dotted identifier chain such as `Color.RED` or `http.client.OK`.
///
/// Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DottedPath(SmallVec<[Name; 2]>);

impl DottedPath {
    /// Build a path from its segments. Returns `None` for an empty chain.
    pub fn new<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: SmallVec<[Name; 2]> =
            segments.into_iter().map(|s| Arc::from(s.as_ref())).collect();
        if segments.is_empty() {
            None
        } else {
            Some(DottedPath(segments))
        }
    }

    /// Single-segment path.
    pub fn single(name: &str) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Arc::from(name));
        DottedPath(segments)
    }

    /// Split `a.b.c` on dots. Returns `None` if any segment is empty.
    pub fn parse(text: &str) -> Option<Self> {
        if text.split('.').any(str::is_empty) {
            return None;
        }
        Self::new(text.split('.'))
    }

    /// Leading name, looked up through the host resolver.
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// Attribute names applied after the head, in order.
    pub fn attrs(&self) -> &[Name] {
        &self.0[1..]
    }

    pub fn segments(&self) -> &[Name] {
        &self.0
    }

    /// Append a segment.
    #[must_use]
    pub fn join(mut self, segment: &str) -> Self {
        self.0.push(Arc::from(segment));
        self
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DottedPath({self})")
    }
}

/// Key of a mapping-pattern entry.
#[derive(Clone, Debug, PartialEq)]
pub enum MappingKey {
    Literal(Value),
    /// Resolved through the host at match time.
    Ref(DottedPath),
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingKey::Literal(value) => write!(f, "{value}"),
            MappingKey::Ref(path) => write!(f, "{path}"),
        }
    }
}

/// A compiled pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Always matches; binds the whole value.
    Capture(Name),
    /// Matches when `pattern` does; additionally binds the whole value.
    CaptureAs { pattern: Box<Pattern>, name: Name },
    /// Matches an equal value.
    Literal(Value),
    /// Matches a value equal to the named external constant.
    ValueRef(DottedPath),
    /// First matching alternative wins. Never nested, never empty.
    Or(Vec<Pattern>),
    /// Sequence of exactly this length.
    FixedSequence(Vec<Pattern>),
    /// Sequence with one star segment bound as a list.
    VariableSequence {
        before: Vec<Pattern>,
        star: Name,
        after: Vec<Pattern>,
    },
    /// Mapping containing at least the listed keys.
    Mapping {
        entries: Vec<(MappingKey, Pattern)>,
        rest: Option<Name>,
    },
    /// Instance of `class` whose construction fields match.
    Construction {
        class: DottedPath,
        positional: Vec<Pattern>,
        keywords: Vec<(Name, Pattern)>,
    },
}

impl Pattern {
    pub fn capture(name: &str) -> Self {
        Pattern::Capture(Arc::from(name))
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Pattern::Literal(value.into())
    }

    /// Wrap `self` in a capture-as binding.
    #[must_use]
    pub fn bind_as(self, name: &str) -> Self {
        Pattern::CaptureAs {
            pattern: Box::new(self),
            name: Arc::from(name),
        }
    }

    /// Every name this pattern binds, in evaluation order, duplicates kept.
    ///
    /// For `Or` patterns the names of every alternative are reported.
    pub fn bound_names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, out: &mut Vec<Name>) {
        match self {
            Pattern::Capture(name) => out.push(Arc::clone(name)),
            Pattern::CaptureAs { pattern, name } => {
                pattern.collect_names(out);
                out.push(Arc::clone(name));
            }
            Pattern::Literal(_) | Pattern::ValueRef(_) => {}
            Pattern::Or(options) | Pattern::FixedSequence(options) => {
                for option in options {
                    option.collect_names(out);
                }
            }
            Pattern::VariableSequence {
                before,
                star,
                after,
            } => {
                for p in before {
                    p.collect_names(out);
                }
                out.push(Arc::clone(star));
                for p in after {
                    p.collect_names(out);
                }
            }
            Pattern::Mapping { entries, rest } => {
                for (_, p) in entries {
                    p.collect_names(out);
                }
                if let Some(rest) = rest {
                    out.push(Arc::clone(rest));
                }
            }
            Pattern::Construction {
                positional,
                keywords,
                ..
            } => {
                for p in positional {
                    p.collect_names(out);
                }
                for (_, p) in keywords {
                    p.collect_names(out);
                }
            }
        }
    }

    /// Nesting depth; a leaf pattern has depth 1.
    pub fn depth(&self) -> usize {
        let children: Box<dyn Iterator<Item = &Pattern>> = match self {
            Pattern::Capture(_) | Pattern::Literal(_) | Pattern::ValueRef(_) => {
                Box::new(std::iter::empty())
            }
            Pattern::CaptureAs { pattern, .. } => Box::new(std::iter::once(&**pattern)),
            Pattern::Or(items) | Pattern::FixedSequence(items) => Box::new(items.iter()),
            Pattern::VariableSequence { before, after, .. } => {
                Box::new(before.iter().chain(after.iter()))
            }
            Pattern::Mapping { entries, .. } => Box::new(entries.iter().map(|(_, p)| p)),
            Pattern::Construction {
                positional,
                keywords,
                ..
            } => Box::new(positional.iter().chain(keywords.iter().map(|(_, p)| p))),
        };
        1 + children.map(Pattern::depth).max().unwrap_or(0)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Capture(name) => write!(f, "{name}"),
            Pattern::CaptureAs { pattern, name } => match **pattern {
                Pattern::CaptureAs { .. } => write!(f, "({pattern}) as {name}"),
                _ => write!(f, "{pattern} as {name}"),
            },
            Pattern::Literal(value) => write!(f, "{value}"),
            Pattern::ValueRef(path) => write!(f, "{path}"),
            Pattern::Or(options) => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    // `as` binds looser than `|`
                    if matches!(option, Pattern::CaptureAs { .. }) {
                        write!(f, "({option})")?;
                    } else {
                        write!(f, "{option}")?;
                    }
                }
                Ok(())
            }
            Pattern::FixedSequence(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Pattern::VariableSequence {
                before,
                star,
                after,
            } => {
                write!(f, "[")?;
                for p in before {
                    write!(f, "{p}, ")?;
                }
                write!(f, "*{star}")?;
                for p in after {
                    write!(f, ", {p}")?;
                }
                write!(f, "]")
            }
            Pattern::Mapping { entries, rest } => {
                write!(f, "{{")?;
                for (i, (key, p)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {p}")?;
                }
                if let Some(rest) = rest {
                    if !entries.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "**{rest}")?;
                }
                write!(f, "}}")
            }
            Pattern::Construction {
                class,
                positional,
                keywords,
            } => {
                write!(f, "{class}(")?;
                write_list(f, positional)?;
                for (i, (name, p)) in keywords.iter().enumerate() {
                    if i > 0 || !positional.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={p}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A guard suffix, opaque to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Guard {
    /// Verbatim text after `if` in pattern text.
    Source(Arc<str>),
    /// Guard expression from the host-expression front-end.
    Expr(Arc<HostExpr>),
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Source(text) => write!(f, "{text}"),
            Guard::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

/// A pattern plus its optional guard: the unit the cache stores.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledPattern {
    pub pattern: Pattern,
    pub guard: Option<Guard>,
}

impl CompiledPattern {
    pub fn new(pattern: Pattern, guard: Option<Guard>) -> Self {
        CompiledPattern { pattern, guard }
    }

    /// An unguarded pattern.
    pub fn unguarded(pattern: Pattern) -> Self {
        CompiledPattern {
            pattern,
            guard: None,
        }
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)?;
        if let Some(guard) = &self.guard {
            write!(f, " if {guard}")?;
        }
        Ok(())
    }
}
