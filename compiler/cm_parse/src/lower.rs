//! CST to `Pattern` compilation.
//!
//! Besides translating nodes this pass enforces the rules the grammar alone
//! cannot express:
//! - at most one star per sequence
//! - no name bound twice in one pattern (`_` is exempt)
//! - `as`, `*` and `**` targets are capture names
//! - every alternative of an or-pattern binds the same names
//! - no keyword repeated in a class pattern
//! - no literal key repeated in a mapping pattern
//! - mapping keys are literals or value references
//!
//! Nested or-patterns are flattened: `(a | b) | c` becomes one `Or` with
//! three options.

use std::sync::Arc;

use cm_ir::{CompiledPattern, DottedPath, Guard, MappingKey, Name, Pattern, Span, Value};
use rustc_hash::FxHashSet;

use crate::cst::{Arg, Node, NodeKind, PatternText, SeqItem};
use crate::error::{SyntaxError, SyntaxErrorKind};

/// The wildcard name; it binds, but may repeat.
const WILDCARD: &str = "_";

/// Whether a bare identifier is a capture (lowercase or `_`-prefixed)
/// rather than a reference to an external constant.
pub fn is_capture_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_lowercase() || c == '_')
}

/// Names bound so far, with the span that bound each one.
type Bound = Vec<(Name, Span)>;

struct Lowerer<'a> {
    source: &'a str,
}

impl Lowerer<'_> {
    fn error(&self, kind: SyntaxErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.source)
    }

    fn bind(&self, bound: &mut Bound, name: &Name, span: Span) -> Result<(), SyntaxError> {
        if &**name != WILDCARD && bound.iter().any(|(n, _)| n == name) {
            return Err(self.error(SyntaxErrorKind::DuplicateCapture(Arc::clone(name)), span));
        }
        bound.push((Arc::clone(name), span));
        Ok(())
    }

    /// Bind the target of `as`, `*` or `**`, which must look like a capture.
    fn bind_target(&self, bound: &mut Bound, name: &Name, span: Span) -> Result<(), SyntaxError> {
        if !is_capture_name(name) {
            return Err(self.error(
                SyntaxErrorKind::InvalidCaptureTarget(Arc::clone(name)),
                span,
            ));
        }
        self.bind(bound, name, span)
    }

    fn merge(&self, bound: &mut Bound, more: Bound) -> Result<(), SyntaxError> {
        for (name, span) in more {
            self.bind(bound, &name, span)?;
        }
        Ok(())
    }

    /// Lower a node into `bound`, returning its pattern.
    fn lower_into(&self, node: &Node, bound: &mut Bound) -> Result<Pattern, SyntaxError> {
        let (pattern, names) = self.lower(node)?;
        self.merge(bound, names)?;
        Ok(pattern)
    }

    fn lower(&self, node: &Node) -> Result<(Pattern, Bound), SyntaxError> {
        let mut bound = Bound::new();
        let pattern = match &node.kind {
            NodeKind::Literal(value) => Pattern::Literal(value.clone()),
            NodeKind::Name(name) if is_capture_name(name) => {
                bound.push((Arc::clone(name), node.span));
                Pattern::Capture(Arc::clone(name))
            }
            NodeKind::Name(name) => Pattern::ValueRef(DottedPath::single(name)),
            NodeKind::Dotted(path) => Pattern::ValueRef(path.clone()),
            NodeKind::Group(inner) => return self.lower(inner),
            NodeKind::Sequence { items, .. } => self.lower_sequence(items, &mut bound)?,
            NodeKind::Mapping { items, rest } => {
                let mut entries = Vec::with_capacity(items.len());
                let mut literal_keys: Vec<&Value> = Vec::new();
                for item in items {
                    let key = match &item.key.kind {
                        NodeKind::Literal(value) => {
                            if literal_keys.iter().any(|k| k.equals(value)) {
                                return Err(self.error(
                                    SyntaxErrorKind::DuplicateMappingKey(value.to_string()),
                                    item.key.span,
                                ));
                            }
                            literal_keys.push(value);
                            MappingKey::Literal(value.clone())
                        }
                        NodeKind::Name(name) if !is_capture_name(name) => {
                            MappingKey::Ref(DottedPath::single(name))
                        }
                        NodeKind::Dotted(path) => MappingKey::Ref(path.clone()),
                        _ => {
                            return Err(
                                self.error(SyntaxErrorKind::InvalidMappingKey, item.key.span)
                            )
                        }
                    };
                    entries.push((key, self.lower_into(&item.value, &mut bound)?));
                }
                if let Some((name, span)) = rest {
                    self.bind_target(&mut bound, name, *span)?;
                }
                Pattern::Mapping {
                    entries,
                    rest: rest.as_ref().map(|(name, _)| Arc::clone(name)),
                }
            }
            NodeKind::Class { path, args } => {
                let mut positional = Vec::new();
                let mut keywords: Vec<(Name, Pattern)> = Vec::new();
                for arg in args {
                    match arg {
                        Arg::Positional(value) => {
                            positional.push(self.lower_into(value, &mut bound)?);
                        }
                        Arg::Keyword { name, span, value } => {
                            if keywords.iter().any(|(k, _)| k == name) {
                                return Err(self.error(
                                    SyntaxErrorKind::RepeatedKeyword(Arc::clone(name)),
                                    *span,
                                ));
                            }
                            let pattern = self.lower_into(value, &mut bound)?;
                            keywords.push((Arc::clone(name), pattern));
                        }
                    }
                }
                Pattern::Construction {
                    class: path.clone(),
                    positional,
                    keywords,
                }
            }
            NodeKind::Or(options) => self.lower_or(options, &mut bound)?,
            NodeKind::As {
                pattern,
                name,
                name_span,
            } => {
                let inner = self.lower_into(pattern, &mut bound)?;
                self.bind_target(&mut bound, name, *name_span)?;
                Pattern::CaptureAs {
                    pattern: Box::new(inner),
                    name: Arc::clone(name),
                }
            }
        };
        Ok((pattern, bound))
    }

    fn lower_sequence(&self, items: &[SeqItem], bound: &mut Bound) -> Result<Pattern, SyntaxError> {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut star: Option<Name> = None;
        for item in items {
            match item {
                SeqItem::Pattern(node) => {
                    let pattern = self.lower_into(node, bound)?;
                    if star.is_some() {
                        after.push(pattern);
                    } else {
                        before.push(pattern);
                    }
                }
                SeqItem::Star(name, span) => {
                    if star.is_some() {
                        return Err(self.error(SyntaxErrorKind::MultipleStars, *span));
                    }
                    self.bind_target(bound, name, *span)?;
                    star = Some(Arc::clone(name));
                }
            }
        }
        Ok(match star {
            Some(star) => Pattern::VariableSequence {
                before,
                star,
                after,
            },
            None => Pattern::FixedSequence(before),
        })
    }

    fn lower_or(&self, options: &[Node], bound: &mut Bound) -> Result<Pattern, SyntaxError> {
        let mut lowered = Vec::with_capacity(options.len());
        let mut expected: Option<(FxHashSet<Name>, Bound)> = None;
        for option in options {
            let (pattern, names) = self.lower(option)?;
            let set: FxHashSet<Name> = names
                .iter()
                .map(|(n, _)| Arc::clone(n))
                .filter(|n| &**n != WILDCARD)
                .collect();
            match &expected {
                Some((first, _)) if *first != set => {
                    return Err(self.error(SyntaxErrorKind::InconsistentOrBindings, option.span));
                }
                Some(_) => {}
                None => expected = Some((set, names)),
            }
            match pattern {
                Pattern::Or(inner) => lowered.extend(inner),
                other => lowered.push(other),
            }
        }
        if let Some((_, names)) = expected {
            self.merge(bound, names)?;
        }
        Ok(Pattern::Or(lowered))
    }
}

/// Compile a CST node, checking binding rules. `source` supplies error snippets.
pub(crate) fn lower_node(node: &Node, source: &str) -> Result<Pattern, SyntaxError> {
    let (pattern, _) = Lowerer { source }.lower(node)?;
    Ok(pattern)
}

/// Compile a parsed pattern text, guard included.
pub fn lower(text: &PatternText, source: &str) -> Result<CompiledPattern, SyntaxError> {
    let pattern = lower_node(&text.pattern, source)?;
    let guard = text
        .guard
        .as_ref()
        .map(|guard| Guard::Source(Arc::clone(&guard.text)));
    Ok(CompiledPattern::new(pattern, guard))
}

#[cfg(test)]
mod tests;
