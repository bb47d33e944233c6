//! The engine: pattern cache, field registry and configuration in one place.

use std::sync::Arc;

use cm_eval::{Bindings, FieldRegistry, Matcher, Resolver};
use cm_ir::{CompiledPattern, HostExpr, Value};
use cm_parse::SyntaxError;
use tracing::trace;

use crate::cache::PatternCache;
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Compiles and matches patterns.
///
/// `Engine` is `Send + Sync`; share one per process (or per host
/// embedding) so the cache and registry are shared too.
#[derive(Debug, Default)]
pub struct Engine {
    cache: PatternCache,
    registry: FieldRegistry,
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            cache: PatternCache::new(),
            registry: FieldRegistry::new(),
            config,
        }
    }

    /// An engine configured from the environment (see [`EngineConfig::from_env`]).
    pub fn from_env() -> Self {
        Self::with_config(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Field registry; register overrides and fallbacks here.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Compile pattern text, reusing the cached result for repeated text.
    pub fn compile(&self, text: &str) -> Result<Arc<CompiledPattern>, SyntaxError> {
        self.cache.get_or_compile(text)
    }

    /// Compile a host `marker @ pattern [and guard]` test.
    ///
    /// Host expressions have no source text to key on, so this bypasses the
    /// cache; hosts compile each case once and keep the result.
    pub fn compile_case(&self, test: &HostExpr) -> Result<CompiledPattern, SyntaxError> {
        cm_parse::lower_case_test(test)
    }

    /// A matcher using this engine's registry and configuration.
    ///
    /// Add a guard evaluator with [`Matcher::with_guards`] for guarded
    /// patterns.
    pub fn matcher<'a>(&'a self, resolver: &'a dyn Resolver) -> Matcher<'a> {
        Matcher::new(&self.registry, resolver).with_policy(self.config.unresolved_names)
    }

    /// Compile `text` and match `value` against it.
    pub fn match_text(
        &self,
        text: &str,
        value: &Value,
        resolver: &dyn Resolver,
    ) -> Result<Option<Bindings>, EngineError> {
        let compiled = self.compile(text)?;
        Ok(self.matcher(resolver).match_pattern(&compiled, value)?)
    }

    /// Try `patterns` in order; the index and bindings of the first match.
    pub fn match_first(
        &self,
        value: &Value,
        patterns: &[&str],
        resolver: &dyn Resolver,
    ) -> Result<Option<(usize, Bindings)>, EngineError> {
        self.match_first_with(&self.matcher(resolver), value, patterns)
    }

    /// [`Engine::match_first`] with a caller-built matcher (for guards).
    ///
    /// Every pattern is compiled before any is matched, so a malformed later
    /// case is reported even when an earlier one matches.
    pub fn match_first_with(
        &self,
        matcher: &Matcher<'_>,
        value: &Value,
        patterns: &[&str],
    ) -> Result<Option<(usize, Bindings)>, EngineError> {
        let compiled = patterns
            .iter()
            .map(|text| self.compile(text))
            .collect::<Result<Vec<_>, _>>()?;
        for (index, pattern) in compiled.iter().enumerate() {
            if let Some(bindings) = matcher.match_pattern(pattern, value)? {
                trace!(index, "case matched");
                return Ok(Some((index, bindings)));
            }
        }
        trace!(cases = patterns.len(), "no case matched");
        Ok(None)
    }
}

#[cfg(test)]
mod tests;
