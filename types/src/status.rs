//! Status enums for DAG nodes and transactions.

use serde::{Deserialize, Serialize};

/// Confirmation status of a DAG node.
///
/// The lifecycle is strictly monotonic: `Pending → Confirmed → Final`.
/// `Orphaned` is a terminal state reachable only from `Pending` when a fork
/// is resolved against the node's branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Inserted into the DAG, accumulating endorsement weight.
    Pending,
    /// Accumulated weight crossed the soft threshold.
    Confirmed,
    /// Accumulated weight crossed the hard threshold. Irreversible.
    Final,
    /// Lost a fork resolution. Terminal, excluded from parent selection.
    Orphaned,
}

impl NodeStatus {
    /// Whether a transition from `self` to `next` respects monotonicity.
    pub fn can_transition_to(&self, next: NodeStatus) -> bool {
        matches!(
            (self, next),
            (NodeStatus::Pending, NodeStatus::Confirmed)
                | (NodeStatus::Pending, NodeStatus::Orphaned)
                | (NodeStatus::Confirmed, NodeStatus::Final)
        )
    }

    /// Whether the node may still be selected as a parent.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, NodeStatus::Orphaned)
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeStatus::Final | NodeStatus::Orphaned)
    }
}

/// Externally visible status of a submitted transaction.
///
/// Extends [`NodeStatus`] with `Unknown` for ids the engine has never seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Final,
    Orphaned,
    Unknown,
}

impl From<NodeStatus> for TxStatus {
    fn from(status: NodeStatus) -> Self {
        match status {
            NodeStatus::Pending => TxStatus::Pending,
            NodeStatus::Confirmed => TxStatus::Confirmed,
            NodeStatus::Final => TxStatus::Final,
            NodeStatus::Orphaned => TxStatus::Orphaned,
        }
    }
}
