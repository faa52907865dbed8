use thiserror::Error;

/// Why a submitted transaction was turned away at admission.
///
/// These are synchronous, per-submission outcomes. Anything that happens
/// after a transaction is accepted is reported through the event stream.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RejectReason {
    #[error("transaction id does not match its content hash")]
    IdMismatch,

    #[error("signature does not verify against the sender key")]
    InvalidSignature,

    #[error("(sender, nonce) pair was already accepted")]
    Replay,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("queue is full and the transaction does not outbid the lowest entry")]
    QueueFull,
}
