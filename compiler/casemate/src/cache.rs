//! Process-lifetime cache of compiled patterns, keyed by exact source text.
//!
//! Pattern texts come from call sites, so the set of keys is small and
//! fixed; entries are never evicted. Each distinct text is compiled at most
//! once: compilers serialise on an upgradable read lock while plain readers
//! keep going. Texts that fail to compile are not cached.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cm_ir::CompiledPattern;
use cm_parse::SyntaxError;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Memoizes pattern compilation.
#[derive(Default)]
pub struct PatternCache {
    entries: RwLock<FxHashMap<Arc<str>, Arc<CompiledPattern>>>,
    compilations: AtomicUsize,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled form of `text`, compiling it on first use.
    pub fn get_or_compile(&self, text: &str) -> Result<Arc<CompiledPattern>, SyntaxError> {
        // Fast path: already compiled
        if let Some(hit) = self.get(text) {
            trace!(text, "pattern cache hit");
            return Ok(hit);
        }

        // Slow path: one compiler at a time, readers unaffected
        let entries = self.entries.upgradable_read();

        // Double-check after acquiring the upgradable lock
        if let Some(hit) = entries.get(text) {
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(cm_parse::compile(text)?);
        self.compilations.fetch_add(1, Ordering::Relaxed);

        let mut entries = RwLockUpgradableReadGuard::upgrade(entries);
        entries.insert(Arc::from(text), Arc::clone(&compiled));
        trace!(text, cached = entries.len(), "pattern cache miss");
        Ok(compiled)
    }

    /// The cached compiled form of `text`, without compiling.
    pub fn get(&self, text: &str) -> Option<Arc<CompiledPattern>> {
        self.entries.read().get(text).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// How many times pattern text has actually been compiled.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("entries", &self.len())
            .field("compilations", &self.compilations())
            .finish()
    }
}

#[cfg(test)]
mod tests;
