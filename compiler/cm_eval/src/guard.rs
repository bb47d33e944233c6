//! Guard evaluation callback.
//!
//! Guards are host code. The engine carries them as opaque [`Guard`] values
//! and calls back into the host once the structural match has succeeded.

use cm_ir::Guard;

use crate::Bindings;

/// Evaluates `if` guards for the host.
///
/// An `Err` aborts the match with [`crate::MatchError::Guard`].
pub trait GuardEvaluator {
    fn evaluate(&self, bindings: &Bindings, guard: &Guard) -> Result<bool, String>;
}

impl<F> GuardEvaluator for F
where
    F: Fn(&Bindings, &Guard) -> Result<bool, String>,
{
    fn evaluate(&self, bindings: &Bindings, guard: &Guard) -> Result<bool, String> {
        self(bindings, guard)
    }
}
