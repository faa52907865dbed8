//! Fundamental types for the VERTEX consensus engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: transaction and node identifiers, keys, timestamps, status
//! enums, priority classes, and the consensus parameter set.

pub mod hash;
pub mod keys;
pub mod params;
pub mod priority;
pub mod status;
pub mod time;

pub use hash::{NodeId, TxId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::ConsensusParams;
pub use priority::PriorityClass;
pub use status::{NodeStatus, TxStatus};
pub use time::Timestamp;
