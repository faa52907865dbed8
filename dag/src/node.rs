//! The DAG node — one accepted bundle and its consensus state.

use serde::{Deserialize, Serialize};
use vertex_types::{NodeId, NodeStatus, PublicKey, Timestamp, TxId};

/// One node of the DAG. Wraps exactly one bundle.
///
/// Structural fields (`id`, `parents`, `transactions`, `endorsers`,
/// `base_weight`, `security_score`, `timestamp`) are fixed at insertion.
/// `level` and `children` are assigned/maintained by the store;
/// `weight` and `status` are mutated only through store methods.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DagNode {
    /// Content hash of the wrapped bundle.
    pub id: NodeId,
    /// Approved parent nodes. Empty only for genesis.
    pub parents: Vec<NodeId>,
    /// Topological depth: `1 + max(parent levels)`, genesis is 0.
    pub level: u64,
    /// Endorsement stake attached at creation.
    pub base_weight: u128,
    /// Accumulated weight: base weight plus contributions from descendants.
    pub weight: u128,
    /// Confirmation status. Monotonic.
    pub status: NodeStatus,
    /// Opaque score attached by the signature verifier in use.
    pub security_score: f64,
    /// Nodes that reference this one as a parent.
    pub children: Vec<NodeId>,
    /// Ids of the transactions the bundle carries, in bundle order.
    pub transactions: Vec<TxId>,
    /// Validators whose stake backs `base_weight`.
    pub endorsers: Vec<PublicKey>,
    /// Creation time.
    pub timestamp: Timestamp,
}

impl DagNode {
    /// Build a node ready for insertion. Level and children are filled in
    /// by the store.
    pub fn new(
        id: NodeId,
        parents: Vec<NodeId>,
        base_weight: u128,
        security_score: f64,
        transactions: Vec<TxId>,
        endorsers: Vec<PublicKey>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            parents,
            level: 0,
            base_weight,
            weight: base_weight,
            status: NodeStatus::Pending,
            security_score,
            children: Vec::new(),
            transactions,
            endorsers,
            timestamp,
        }
    }

    /// Whether this node has no children yet.
    pub fn is_tip(&self) -> bool {
        self.children.is_empty()
    }
}
