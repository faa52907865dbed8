//! Node wiring for the VERTEX engine.
//!
//! Assembles admission control, the validator registry, and the consensus
//! engine behind a concurrency-safe facade: many tasks submit transactions,
//! one block-production task drains bundles and mutates the DAG, and
//! observers follow a broadcast event stream.

pub mod actor;
pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod shutdown;
pub mod submission;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{DagNodeView, Node, ValidatorView};
pub use shutdown::{ShutdownController, ShutdownSignal};
pub use submission::SubmissionQueue;
