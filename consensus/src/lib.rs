//! The consensus engine.
//!
//! One bundle per cycle: select parent tips, sample endorsing validators,
//! insert the node, propagate its endorsement stake to bounded-depth
//! ancestors, promote nodes across the finality thresholds, and detect and
//! resolve forks. The engine owns the DAG store and the validator registry;
//! all mutation happens inside [`ConsensusEngine::process_bundle`], which
//! the node layer calls from a single block-production task.

pub mod engine;
pub mod error;
pub mod event;
pub mod fork;

pub use engine::{ConsensusEngine, CycleOutcome};
pub use error::ConsensusError;
pub use event::EngineEvent;
