//! Blake2b hashing for transactions and bundles.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use vertex_types::{NodeId, TxId};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash serialized transaction content to produce its `TxId`.
pub fn hash_transaction(parts: &[&[u8]]) -> TxId {
    TxId::new(blake2b_256_multi(parts))
}

/// Hash an ordered list of transaction ids to produce the bundle's `NodeId`.
pub fn hash_bundle(tx_ids: &[TxId]) -> NodeId {
    let mut hasher = Blake2b256::new();
    for id in tx_ids {
        hasher.update(id.as_bytes());
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    NodeId::new(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello vertex");
        let h2 = blake2b_256(b"hello vertex");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn bundle_hash_is_order_sensitive() {
        let a = TxId::new([1u8; 32]);
        let b = TxId::new([2u8; 32]);
        assert_ne!(hash_bundle(&[a, b]), hash_bundle(&[b, a]));
    }

    #[test]
    fn bundle_hash_nonzero() {
        let id = hash_bundle(&[TxId::new([9u8; 32])]);
        assert!(!id.is_zero());
    }
}
