use thiserror::Error;

/// Fatal engine conditions.
///
/// An invariant violation halts the engine: every later
/// [`process_bundle`](crate::ConsensusEngine::process_bundle) call fails
/// with [`Halted`](ConsensusError::Halted) until operator intervention.
/// Per-bundle failures are not errors; they surface as events.
#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("consensus invariant violated: {0}")]
    InvariantViolation(String),

    #[error("engine halted after an invariant violation")]
    Halted,
}
