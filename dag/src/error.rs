use thiserror::Error;
use vertex_types::{NodeId, NodeStatus};

/// Rejections from [`DagStore::insert`](crate::DagStore::insert).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    #[error("node {0} already exists")]
    DuplicateId(NodeId),

    #[error("parent {parent} not found")]
    UnknownParent { parent: NodeId },

    #[error("inserting {0} would create a cycle")]
    CycleDetected(NodeId),

    #[error("non-genesis node has no parents")]
    EmptyParents,
}

/// Rejections from weight/status mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("node {0} not found")]
    UnknownNode(NodeId),

    #[error("illegal status transition {from:?} -> {to:?}")]
    InvalidTransition { from: NodeStatus, to: NodeStatus },
}
