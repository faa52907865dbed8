//! Append-only DAG store.
//!
//! Nodes live in a dense arena (`Vec<DagNode>`) with a `NodeId → index` map
//! on the side. The store enforces the structural invariants (parents exist
//! before children, `level = 1 + max(parent levels)`, no cycles) and owns
//! all weight/status mutation. Nothing is ever deleted.

pub mod error;
pub mod node;
pub mod store;

pub use error::{InsertError, UpdateError};
pub use node::DagNode;
pub use store::DagStore;
