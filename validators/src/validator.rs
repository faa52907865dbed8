//! Validator identity and per-validator state.

use serde::{Deserialize, Serialize};
use vertex_types::PublicKey;

/// Validators are identified by their public key.
pub type ValidatorId = PublicKey;

/// One registered validator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Validator {
    /// Identity (Ed25519 public key).
    pub id: ValidatorId,
    /// Staked amount in raw units.
    pub stake: u128,
    /// Behavioral reputation, clamped to `[0, 1]`.
    pub reputation: f64,
    /// Geographic/region tag. Informational only — never enters scoring.
    pub region: String,
    /// Whether the validator participates in sampling.
    pub active: bool,
}

impl Validator {
    pub fn new(id: ValidatorId, stake: u128) -> Self {
        Self {
            id,
            stake,
            reputation: 1.0,
            region: String::new(),
            active: true,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_reputation(mut self, reputation: f64) -> Self {
        self.reputation = reputation.clamp(0.0, 1.0);
        self
    }
}
