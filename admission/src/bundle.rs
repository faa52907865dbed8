//! Bundles — ordered groups of admitted transactions headed for the DAG.

use serde::{Deserialize, Serialize};
use vertex_crypto::hash_bundle;
use vertex_types::{NodeId, PublicKey, TxId};

use crate::tx::Transaction;

/// An ordered batch of transactions drained from the admission queue.
///
/// The bundle id is the Blake2b hash over the ordered transaction ids, so
/// it doubles as the id of the DAG node that will wrap it. Endorsement
/// fields are filled in by the consensus engine after validator sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bundle {
    pub id: NodeId,
    pub transactions: Vec<Transaction>,
    /// Validators sampled to endorse this bundle.
    pub endorsers: Vec<PublicKey>,
    /// Combined active stake of the endorsers.
    pub endorsement_stake: u128,
}

impl Bundle {
    /// Build a bundle from a non-empty ordered transaction list.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let tx_ids: Vec<TxId> = transactions.iter().map(|tx| tx.id).collect();
        Self {
            id: hash_bundle(&tx_ids),
            transactions,
            endorsers: Vec::new(),
            endorsement_stake: 0,
        }
    }

    pub fn tx_ids(&self) -> Vec<TxId> {
        self.transactions.iter().map(|tx| tx.id).collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
