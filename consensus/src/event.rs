//! Events surfaced through the node's broadcast stream.

use vertex_admission::{EvictReason, RejectReason};
use vertex_types::{NodeId, NodeStatus, Timestamp, TxId};

/// Everything observers can learn about engine progress.
///
/// Structural and consensus outcomes are never reported synchronously to
/// submitters; they arrive here, from inside the block-production task.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// A node's status changed (finality promotion or orphaning).
    /// Emitted exactly once per transition, in lifecycle order.
    Finality {
        node: NodeId,
        from: NodeStatus,
        to: NodeStatus,
        timestamp: Timestamp,
    },

    /// Two same-level nodes with overlapping parents compete. Emitted once
    /// per pair.
    ForkDetected {
        first: NodeId,
        second: NodeId,
        level: u64,
    },

    /// A submission was turned away at admission.
    TransactionRejected { tx_id: TxId, reason: RejectReason },

    /// An accepted transaction left the queue without reaching a bundle.
    TransactionEvicted { tx_id: TxId, reason: EvictReason },

    /// A bundle hit a structural insertion error and was dropped whole.
    BundleDropped { bundle: NodeId, tx_count: usize },
}
