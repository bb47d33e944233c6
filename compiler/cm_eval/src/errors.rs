//! Errors that abort a match.
//!
//! A value that simply does not fit a pattern is not an error: the matcher
//! returns `Ok(None)`. The variants here describe patterns that cannot be
//! evaluated against the current host at all.

use std::fmt;

use cm_ir::Name;

/// Where an unresolved name appeared in the pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NamePosition {
    /// A constant reference such as `Color.RED`.
    Value,
    /// A mapping-pattern key such as `Keys.FORMAT`.
    MappingKey,
    /// The class of a construction pattern.
    Type,
}

impl fmt::Display for NamePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamePosition::Value => "value",
            NamePosition::MappingKey => "mapping key",
            NamePosition::Type => "class",
        })
    }
}

/// A fatal matching error.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error("name `{name}` is not defined ({position} position)")]
    UnresolvedName { name: String, position: NamePosition },

    #[error("`{path}` in a class pattern is not a type (found {found})")]
    NotAType { path: String, found: String },

    #[error(
        "too many positional patterns for {class} (expected at most {expected}, got {given})"
    )]
    TooManyPositional {
        class: String,
        expected: usize,
        given: usize,
    },

    #[error("{class}() got multiple sub-patterns for attribute `{name}`")]
    DuplicateKeyword { class: String, name: Name },

    /// Positional sub-patterns against a type no registry tier knows.
    ///
    /// The class is fixed by the pattern text, so this fails the same way on
    /// every value: register the type's fields (an override, `match_args`, a
    /// record shape or a fallback) or use keyword sub-patterns instead.
    #[error(
        "{class} exposes no construction fields, so it accepts no positional patterns \
         ({given} given); register its fields or use keyword patterns"
    )]
    UnknownConstructionProtocol { class: String, given: usize },

    #[error("pattern has guard `{guard}` but no guard evaluator was supplied")]
    MissingGuardEvaluator { guard: String },

    #[error("guard evaluation failed: {message}")]
    Guard { message: String },
}
