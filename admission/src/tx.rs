//! The signed transaction as submitters hand it to admission control.

use serde::{Deserialize, Serialize};
use vertex_crypto::{hash_transaction, sign_message};
use vertex_types::{NodeId, PriorityClass, PrivateKey, PublicKey, Signature, Timestamp, TxId};

/// One transaction. Immutable once built: the id is the Blake2b hash of
/// every field except the signature, so any mutation invalidates it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Content hash. Derived, never supplied.
    pub id: TxId,
    pub sender: PublicKey,
    pub receiver: PublicKey,
    /// Transferred amount in raw units. Must be non-zero.
    pub amount: u128,
    /// Per-sender replay counter.
    pub nonce: u64,
    /// Offered fee rate in raw units.
    pub fee: u64,
    /// Parent hints. The engine treats these as advisory only.
    pub parents: Vec<NodeId>,
    pub priority: PriorityClass,
    /// Opaque application payload.
    pub metadata: Vec<u8>,
    pub signature: Signature,
    pub created_at: Timestamp,
}

impl Transaction {
    /// Build an unsigned transaction; the id is computed from the content.
    /// Call [`signed`](Self::signed) before submitting.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sender: PublicKey,
        receiver: PublicKey,
        amount: u128,
        nonce: u64,
        fee: u64,
        parents: Vec<NodeId>,
        priority: PriorityClass,
        metadata: Vec<u8>,
        created_at: Timestamp,
    ) -> Self {
        let mut tx = Self {
            id: TxId::ZERO,
            sender,
            receiver,
            amount,
            nonce,
            fee,
            parents,
            priority,
            metadata,
            signature: Signature::ZERO,
            created_at,
        };
        tx.id = tx.content_hash();
        tx
    }

    /// The canonical byte encoding covered by the id and the signature.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.parents.len() * 32 + self.metadata.len());
        bytes.extend_from_slice(self.sender.as_bytes());
        bytes.extend_from_slice(self.receiver.as_bytes());
        bytes.extend_from_slice(&self.amount.to_le_bytes());
        bytes.extend_from_slice(&self.nonce.to_le_bytes());
        bytes.extend_from_slice(&self.fee.to_le_bytes());
        bytes.extend_from_slice(&(self.parents.len() as u64).to_le_bytes());
        for parent in &self.parents {
            bytes.extend_from_slice(parent.as_bytes());
        }
        bytes.push(self.priority as u8);
        bytes.extend_from_slice(&(self.metadata.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&self.metadata);
        bytes.extend_from_slice(&self.created_at.as_secs().to_le_bytes());
        bytes
    }

    fn content_hash(&self) -> TxId {
        hash_transaction(&[&self.signing_bytes()])
    }

    /// Attach an Ed25519 signature over the content.
    pub fn signed(mut self, private: &PrivateKey) -> Self {
        self.signature = sign_message(&self.signing_bytes(), private);
        self
    }

    /// Whether the stored id still matches the content.
    pub fn verify_content_hash(&self) -> bool {
        self.id == self.content_hash()
    }
}
