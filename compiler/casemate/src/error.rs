use cm_eval::MatchError;
use cm_parse::SyntaxError;

/// Anything that can go wrong between pattern text and bindings.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Match(#[from] MatchError),
}
