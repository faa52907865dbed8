//! Admission control: the gate between submitters and the consensus engine.
//!
//! Every transaction passes signature, replay, and sanity checks before it
//! enters a bounded priority queue ordered by fee rate, priority class, and
//! queue age. The block producer drains the top of the queue into bundles.
//!
//! The queue core is synchronous; the node layer wraps it in a mutex with a
//! notify handle for concurrent submitters.

pub mod bundle;
pub mod error;
pub mod queue;
pub mod tx;

pub use bundle::Bundle;
pub use error::RejectReason;
pub use queue::{AdmissionQueue, EvictReason, QueueEvent};
pub use tx::Transaction;
