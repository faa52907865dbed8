//! Cryptographic primitives for the VERTEX engine.
//!
//! - [`hash`] — Blake2b-256 content hashing for transactions and bundles.
//! - [`keys`] — Ed25519 key generation.
//! - [`sign`] — Ed25519 message signing and verification.
//! - [`verifier`] — the pluggable signature-verification capability
//!   consumed by admission control.
//! - [`beacon`] — deterministic hash-keyed randomness for validator
//!   sampling (all nodes converge on the same sample given the same DAG tip).

pub mod beacon;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod verifier;

pub use beacon::SampleBeacon;
pub use hash::{blake2b_256, blake2b_256_multi, hash_bundle, hash_transaction};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use verifier::{AcceptAllVerifier, Ed25519Verifier, SignatureVerifier};
