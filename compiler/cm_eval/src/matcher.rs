//! Pattern matching.
//!
//! [`Matcher::match_pattern`] walks a compiled pattern against a value.
//! Evaluation order is observable (resolver calls, guard calls), so it is
//! fixed:
//!
//! - or-patterns try alternatives left to right and stop at the first success
//! - mapping patterns check each key's presence before its value pattern,
//!   in source order
//! - construction patterns check the instance type, then resolve every field,
//!   then match field patterns, stopping at the first failure
//!
//! Bindings accumulate into one map; a failed alternative's partial bindings
//! are discarded.

use std::str::FromStr;

use cm_ir::value::lookup_entry;
use cm_ir::{CompiledPattern, DottedPath, MappingKey, Name, Pattern, TypeRef, Value};
use rustc_hash::FxHashSet;
use tracing::{instrument, trace};

use crate::errors::{MatchError, NamePosition};
use crate::guard::GuardEvaluator;
use crate::registry::FieldRegistry;
use crate::resolver::Resolver;
use crate::stack::ensure_sufficient_stack;
use crate::Bindings;

/// What an undefined constant or mapping-key name does to a match.
///
/// Class names in construction patterns are always fatal when undefined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnresolvedNamePolicy {
    /// The pattern does not match.
    #[default]
    Fail,
    /// The match aborts with [`MatchError::UnresolvedName`].
    Error,
}

impl FromStr for UnresolvedNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(UnresolvedNamePolicy::Fail),
            "error" => Ok(UnresolvedNamePolicy::Error),
            other => Err(format!(
                "unknown unresolved-name policy `{other}` (expected `fail` or `error`)"
            )),
        }
    }
}

/// Matches compiled patterns for one host context.
///
/// Cheap to create; borrows the registry, the resolver and the optional
/// guard evaluator for the duration of the matches.
pub struct Matcher<'a> {
    registry: &'a FieldRegistry,
    resolver: &'a dyn Resolver,
    guards: Option<&'a dyn GuardEvaluator>,
    policy: UnresolvedNamePolicy,
}

impl<'a> Matcher<'a> {
    pub fn new(registry: &'a FieldRegistry, resolver: &'a dyn Resolver) -> Self {
        Matcher {
            registry,
            resolver,
            guards: None,
            policy: UnresolvedNamePolicy::default(),
        }
    }

    /// Evaluate `if` guards with `guards`.
    #[must_use]
    pub fn with_guards(mut self, guards: &'a dyn GuardEvaluator) -> Self {
        self.guards = Some(guards);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UnresolvedNamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Match `value` against a pattern and its guard.
    ///
    /// `Ok(None)` is an ordinary failure; the guard runs only after the
    /// structural match succeeded.
    #[instrument(level = "trace", skip_all, fields(pattern = %compiled))]
    pub fn match_pattern(
        &self,
        compiled: &CompiledPattern,
        value: &Value,
    ) -> Result<Option<Bindings>, MatchError> {
        let Some(bindings) = self.match_tree(&compiled.pattern, value)? else {
            return Ok(None);
        };
        let Some(guard) = &compiled.guard else {
            return Ok(Some(bindings));
        };
        let Some(evaluator) = self.guards else {
            return Err(MatchError::MissingGuardEvaluator {
                guard: guard.to_string(),
            });
        };
        let passed = evaluator
            .evaluate(&bindings, guard)
            .map_err(|message| MatchError::Guard { message })?;
        trace!(passed, "guard evaluated");
        Ok(passed.then_some(bindings))
    }

    /// Match `value` against a bare pattern tree, ignoring guards.
    pub fn match_tree(
        &self,
        pattern: &Pattern,
        value: &Value,
    ) -> Result<Option<Bindings>, MatchError> {
        let mut bindings = Bindings::default();
        let matched = self.try_match(pattern, value, &mut bindings)?;
        trace!(matched, bound = bindings.len(), "pattern evaluated");
        Ok(matched.then_some(bindings))
    }

    fn try_match(
        &self,
        pattern: &Pattern,
        value: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, MatchError> {
        ensure_sufficient_stack(|| self.try_match_inner(pattern, value, bindings))
    }

    fn try_match_inner(
        &self,
        pattern: &Pattern,
        value: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, MatchError> {
        match pattern {
            Pattern::Capture(name) => {
                bind(bindings, name, value.clone());
                Ok(true)
            }

            Pattern::CaptureAs { pattern, name } => {
                if !self.try_match(pattern, value, bindings)? {
                    return Ok(false);
                }
                bind(bindings, name, value.clone());
                Ok(true)
            }

            Pattern::Literal(literal) => Ok(literal_matches(literal, value)),

            Pattern::ValueRef(path) => Ok(self
                .resolve_value(path, NamePosition::Value)?
                .is_some_and(|expected| expected.equals(value))),

            Pattern::Or(options) => {
                for option in options {
                    let mut attempt = Bindings::default();
                    if self.try_match(option, value, &mut attempt)? {
                        bindings.extend(attempt);
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            Pattern::FixedSequence(items) => {
                let Some(values) = value.as_sequence() else {
                    return Ok(false);
                };
                if values.len() != items.len() {
                    return Ok(false);
                }
                self.match_all(items, values, bindings)
            }

            Pattern::VariableSequence {
                before,
                star,
                after,
            } => {
                let Some(values) = value.as_sequence() else {
                    return Ok(false);
                };
                if values.len() < before.len() + after.len() {
                    return Ok(false);
                }
                // The tail starts at `len - after.len()`; with an empty tail
                // that is the end of the sequence, not its start.
                let tail_start = values.len() - after.len();
                if !self.match_all(before, &values[..before.len()], bindings)? {
                    return Ok(false);
                }
                let middle = values[before.len()..tail_start].to_vec();
                bind(bindings, star, Value::list(middle));
                self.match_all(after, &values[tail_start..], bindings)
            }

            Pattern::Mapping { entries, rest } => {
                self.match_mapping(entries, rest.as_ref(), value, bindings)
            }

            Pattern::Construction {
                class,
                positional,
                keywords,
            } => {
                let ty = self.resolve_type(class)?;
                if !ty.is_instance(value) {
                    return Ok(false);
                }
                let fields = self
                    .registry
                    .match_args_and_kwargs(&ty, value, positional, keywords)?;
                let Some(fields) = fields else {
                    trace!(class = %class, "construction field missing");
                    return Ok(false);
                };
                for (pattern, field) in fields {
                    if !self.try_match(pattern, &field, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Match `patterns` pairwise against `values` (same length).
    fn match_all(
        &self,
        patterns: &[Pattern],
        values: &[Value],
        bindings: &mut Bindings,
    ) -> Result<bool, MatchError> {
        for (pattern, value) in patterns.iter().zip(values) {
            if !self.try_match(pattern, value, bindings)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn match_mapping(
        &self,
        entries: &[(MappingKey, Pattern)],
        rest: Option<&Name>,
        value: &Value,
        bindings: &mut Bindings,
    ) -> Result<bool, MatchError> {
        let Some(map) = value.as_map() else {
            return Ok(false);
        };
        let mut seen: FxHashSet<&Value> = FxHashSet::default();
        for (key, pattern) in entries {
            let key = match key {
                MappingKey::Literal(key) => key.clone(),
                MappingKey::Ref(path) => {
                    match self.resolve_value(path, NamePosition::MappingKey)? {
                        Some(key) => key,
                        None => return Ok(false),
                    }
                }
            };
            let Some((stored, item)) = lookup_entry(map, &key) else {
                return Ok(false);
            };
            if !self.try_match(pattern, item, bindings)? {
                return Ok(false);
            }
            seen.insert(stored);
        }
        if let Some(rest) = rest {
            let remaining = map
                .iter()
                .filter(|(k, _)| !seen.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()));
            bind(bindings, rest, Value::map(remaining));
        }
        Ok(true)
    }

    /// Resolve `a.b.c`: the head through the host, the rest as attributes.
    fn lookup(&self, path: &DottedPath) -> Option<Value> {
        let mut current = self.resolver.resolve(path.head())?;
        for attr in path.attrs() {
            current = current.get_attr(attr)?;
        }
        Some(current)
    }

    /// Resolve a value-position path, applying the unresolved-name policy.
    fn resolve_value(
        &self,
        path: &DottedPath,
        position: NamePosition,
    ) -> Result<Option<Value>, MatchError> {
        if let Some(value) = self.lookup(path) {
            return Ok(Some(value));
        }
        match self.policy {
            UnresolvedNamePolicy::Fail => {
                trace!(%path, %position, "unresolved name fails the match");
                Ok(None)
            }
            UnresolvedNamePolicy::Error => Err(MatchError::UnresolvedName {
                name: path.to_string(),
                position,
            }),
        }
    }

    fn resolve_type(&self, path: &DottedPath) -> Result<TypeRef, MatchError> {
        match self.lookup(path) {
            Some(Value::Type(ty)) => Ok(ty),
            Some(other) => Err(MatchError::NotAType {
                path: path.to_string(),
                found: other.type_name().to_owned(),
            }),
            None => Err(MatchError::UnresolvedName {
                name: path.to_string(),
                position: NamePosition::Type,
            }),
        }
    }
}

fn bind(bindings: &mut Bindings, name: &Name, value: Value) {
    bindings.insert(Name::clone(name), value);
}

/// `None`, `True` and `False` literals match by identity, so `True` does not
/// match `1`; other literals use numeric-tower equality.
fn literal_matches(literal: &Value, value: &Value) -> bool {
    match literal {
        Value::None => matches!(value, Value::None),
        Value::Bool(expected) => matches!(value, Value::Bool(actual) if actual == expected),
        _ => literal.equals(value),
    }
}

#[cfg(test)]
mod tests;
