//! Field-Resolution Registry.
//!
//! A construction pattern `Point(x, y=0)` needs to know which fields of a
//! `Point` its positional sub-patterns refer to. The registry answers that
//! per type, trying these tiers in order (first hit wins):
//!
//! 1. overrides registered by type identifier (`module.Name`)
//! 2. builtin types, which all decompose into the value itself
//! 3. the class's explicit `match_args`
//! 4. record classes (constructor fields only)
//! 5. named tuples
//! 6. registered fallbacks, in registration order
//!
//! A type no tier knows has no fields: keyword sub-patterns still work, but
//! any positional one is an error.

use std::fmt;
use std::sync::Arc;

use cm_ir::{ClassShape, Name, Pattern, TypeRef, Value};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::errors::MatchError;

/// Field name that stands for the whole value.
pub const SELF_FIELD: &str = "<self>";

/// How to extract one construction field from an instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldDescriptor {
    /// The instance itself (`int(x)` binds `x` to the integer).
    SelfValue,
    /// A named attribute.
    Named(Name),
}

impl FieldDescriptor {
    /// Parse a field name; [`SELF_FIELD`] becomes [`FieldDescriptor::SelfValue`].
    pub fn from_name(name: &str) -> Self {
        if name == SELF_FIELD {
            FieldDescriptor::SelfValue
        } else {
            FieldDescriptor::Named(Arc::from(name))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::SelfValue => SELF_FIELD,
            FieldDescriptor::Named(name) => name,
        }
    }

    /// Read this field off `value`. `None` if the attribute is missing.
    pub fn extract(&self, value: &Value) -> Option<Value> {
        match self {
            FieldDescriptor::SelfValue => Some(value.clone()),
            FieldDescriptor::Named(name) => value.get_attr(name),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which registry tier produced a field list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldSource {
    Override,
    Builtin,
    MatchArgs,
    Record,
    NamedTuple,
    Fallback,
    Unknown,
}

/// Field list of a type plus where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFields {
    pub source: FieldSource,
    pub fields: Vec<FieldDescriptor>,
}

impl ResolvedFields {
    fn new(source: FieldSource, fields: Vec<FieldDescriptor>) -> Self {
        ResolvedFields { source, fields }
    }

    fn from_names(source: FieldSource, names: &[Name]) -> Self {
        Self::new(
            source,
            names.iter().map(|n| FieldDescriptor::from_name(n)).collect(),
        )
    }
}

type Predicate = dyn Fn(&TypeRef) -> bool + Send + Sync;
type FieldsFn = dyn Fn(&TypeRef) -> Vec<Name> + Send + Sync;

struct Fallback {
    applies: Box<Predicate>,
    fields: Box<FieldsFn>,
}

/// Per-type construction-field lookup, shared across threads.
///
/// Registration is expected at startup but is safe at any time; lookups take
/// a read lock.
#[derive(Default)]
pub struct FieldRegistry {
    overrides: RwLock<FxHashMap<String, Vec<FieldDescriptor>>>,
    fallbacks: RwLock<Vec<Arc<Fallback>>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the field list of the type identified by `type_id`
    /// (`module.Name` for classes, the bare name for builtins).
    ///
    /// Replaces an earlier override for the same type.
    pub fn register_override<I, S>(&self, type_id: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<_> = names
            .into_iter()
            .map(|n| FieldDescriptor::from_name(n.as_ref()))
            .collect();
        debug!(type_id, fields = fields.len(), "registered field override");
        self.overrides.write().insert(type_id.to_owned(), fields);
    }

    /// Teach the registry about a family of types it has no other way to
    /// introspect. `fields` runs only for types `applies` accepts.
    pub fn register_fallback<P, F>(&self, applies: P, fields: F)
    where
        P: Fn(&TypeRef) -> bool + Send + Sync + 'static,
        F: Fn(&TypeRef) -> Vec<Name> + Send + Sync + 'static,
    {
        let mut fallbacks = self.fallbacks.write();
        fallbacks.push(Arc::new(Fallback {
            applies: Box::new(applies),
            fields: Box::new(fields),
        }));
        debug!(count = fallbacks.len(), "registered field fallback");
    }

    /// Ordered construction fields of `ty`.
    pub fn fields_of(&self, ty: &TypeRef) -> ResolvedFields {
        if let Some(fields) = self.overrides.read().get(ty.identifier().as_ref()) {
            return ResolvedFields::new(FieldSource::Override, fields.clone());
        }

        let class = match ty {
            TypeRef::Builtin(_) => {
                return ResolvedFields::new(FieldSource::Builtin, vec![FieldDescriptor::SelfValue])
            }
            TypeRef::Class(class) => class,
        };

        if let Some(names) = class.match_args() {
            return ResolvedFields::from_names(FieldSource::MatchArgs, names);
        }
        match class.shape() {
            ClassShape::Record(fields) => {
                let names: Vec<Name> = fields
                    .iter()
                    .filter(|f| f.init)
                    .map(|f| Arc::clone(&f.name))
                    .collect();
                return ResolvedFields::from_names(FieldSource::Record, &names);
            }
            ClassShape::NamedTuple(names) => {
                return ResolvedFields::from_names(FieldSource::NamedTuple, names);
            }
            ClassShape::Plain => {}
        }

        // Call host code without holding the lock so it may register more.
        let fallbacks = self.fallbacks.read().clone();
        for fallback in fallbacks {
            if (fallback.applies)(ty) {
                return ResolvedFields::from_names(FieldSource::Fallback, &(fallback.fields)(ty));
            }
        }

        ResolvedFields::new(FieldSource::Unknown, Vec::new())
    }

    /// Pair each sub-pattern of a construction pattern with the field value
    /// it must match, positional ones first.
    ///
    /// Returns `Ok(None)` when `value` lacks one of the fields (a match
    /// failure). Too many positional sub-patterns, or a field named both
    /// positionally and by keyword, is an error.
    pub fn match_args_and_kwargs<'p>(
        &self,
        ty: &TypeRef,
        value: &Value,
        positional: &'p [Pattern],
        keywords: &'p [(Name, Pattern)],
    ) -> Result<Option<Vec<(&'p Pattern, Value)>>, MatchError> {
        if positional.is_empty() && keywords.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let resolved = self.fields_of(ty);
        if resolved.fields.len() < positional.len() {
            let class = ty.name().to_owned();
            let err = if resolved.source == FieldSource::Unknown {
                MatchError::UnknownConstructionProtocol {
                    class,
                    given: positional.len(),
                }
            } else {
                MatchError::TooManyPositional {
                    class,
                    expected: resolved.fields.len(),
                    given: positional.len(),
                }
            };
            debug!(%err, "construction pattern rejected");
            return Err(err);
        }

        let mut taken: FxHashSet<&str> = keywords.iter().map(|(name, _)| &**name).collect();
        let mut pairs = Vec::with_capacity(positional.len() + keywords.len());
        for (field, pattern) in resolved.fields.iter().zip(positional) {
            if !taken.insert(field.name()) {
                let err = MatchError::DuplicateKeyword {
                    class: ty.name().to_owned(),
                    name: Arc::from(field.name()),
                };
                debug!(%err, "construction pattern rejected");
                return Err(err);
            }
            pairs.push((field.clone(), pattern));
        }
        pairs.extend(
            keywords
                .iter()
                .map(|(name, pattern)| (FieldDescriptor::from_name(name), pattern)),
        );

        let mut out = Vec::with_capacity(pairs.len());
        for (field, pattern) in pairs {
            let Some(field_value) = field.extract(value) else {
                return Ok(None);
            };
            out.push((pattern, field_value));
        }
        Ok(Some(out))
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("overrides", &*self.overrides.read())
            .field("fallbacks", &self.fallbacks.read().len())
            .finish()
    }
}
