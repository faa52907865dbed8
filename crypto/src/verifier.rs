//! Pluggable signature verification capability.
//!
//! Admission control never talks to a concrete scheme: it is handed a
//! `dyn SignatureVerifier`. The production implementation is Ed25519;
//! post-quantum schemes slot in behind the same trait.

use vertex_types::{PublicKey, Signature};

/// Verifies a transaction signature against its declared sender key and
/// grades the scheme's security.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` over `message` is valid for `sender`.
    fn verify(&self, message: &[u8], signature: &Signature, sender: &PublicKey) -> bool;

    /// Opaque security score attached to nodes whose bundle this verifier
    /// admitted. Consumers treat it as a label, not a weight.
    fn security_score(&self) -> f64 {
        1.0
    }
}

/// Production verifier backed by Ed25519.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, sender: &PublicKey) -> bool {
        crate::sign::verify_signature(message, signature, sender)
    }
}

/// Nullable verifier that accepts every non-zero signature.
///
/// For tests and dev networks with synthetic keys; never wire into a
/// real deployment.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllVerifier;

impl SignatureVerifier for AcceptAllVerifier {
    fn verify(&self, _message: &[u8], signature: &Signature, _sender: &PublicKey) -> bool {
        !signature.is_zero()
    }

    fn security_score(&self) -> f64 {
        0.0
    }
}
