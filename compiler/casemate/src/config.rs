//! Engine configuration.

use cm_eval::UnresolvedNamePolicy;
use tracing::warn;

/// Environment variable read by [`EngineConfig::from_env`]: `fail` or `error`.
pub const UNRESOLVED_NAMES_ENV: &str = "CASEMATE_UNRESOLVED_NAMES";

/// Settings shared by every match an [`crate::Engine`] runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// What an undefined constant or mapping-key name does to a match.
    pub unresolved_names: UnresolvedNamePolicy,
}

impl EngineConfig {
    /// Defaults, overridden by `CASEMATE_UNRESOLVED_NAMES` when set.
    ///
    /// Unrecognised values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(UNRESOLVED_NAMES_ENV) {
            match raw.parse() {
                Ok(policy) => config.unresolved_names = policy,
                Err(err) => warn!(var = UNRESOLVED_NAMES_ENV, %err, "ignoring setting"),
            }
        }
        config
    }

    #[must_use]
    pub fn with_unresolved_names(mut self, policy: UnresolvedNamePolicy) -> Self {
        self.unresolved_names = policy;
        self
    }
}
