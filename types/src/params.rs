//! Consensus parameters — every tunable the engine consumes.
//!
//! Thresholds are expressed in basis points (1/10_000) so finality math
//! stays in exact integer arithmetic over stake.

use serde::{Deserialize, Serialize};

/// Basis-point denominator used for all threshold math.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// All tunables consumed by the admission queue, validator registry, DAG
/// store, and consensus engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusParams {
    // ── Finality ─────────────────────────────────────────────────────────
    /// Soft threshold (basis points of total active stake): Pending → Confirmed.
    pub soft_threshold_bps: u32,

    /// Hard threshold (basis points of total active stake): Confirmed → Final.
    pub final_threshold_bps: u32,

    /// Weight gap (basis points of total active stake) a fork winner must
    /// open before the loser is orphaned. Prevents flapping.
    pub fork_hysteresis_bps: u32,

    // ── DAG shape ────────────────────────────────────────────────────────
    /// Fan-in limit: maximum parents per node.
    pub max_parents: usize,

    /// Maximum ancestor depth visited during weight propagation.
    pub max_propagation_depth: usize,

    // ── Bundles ──────────────────────────────────────────────────────────
    /// Maximum transactions per bundle.
    pub max_bundle_size: usize,

    /// Validators sampled to endorse each bundle.
    pub validator_sample_size: usize,

    /// Re-queue rounds a transaction survives (after failed bundle
    /// insertions) before it is dropped.
    pub max_tx_requeues: u32,

    // ── Admission queue ──────────────────────────────────────────────────
    /// Maximum pending transactions held by the admission queue.
    pub queue_capacity: usize,

    /// Seconds a pending transaction may wait before TTL eviction.
    pub queue_ttl_secs: u64,

    /// Seconds of queue age that add 1.0 to the age bonus.
    pub age_bonus_scale_secs: u64,

    /// Upper bound on the age bonus multiplier.
    pub age_bonus_cap: f64,

    /// Floor for the dynamic base fee.
    pub min_base_fee: f64,

    /// Queue fill ratio above which the base fee grows.
    pub congestion_watermark: f64,

    /// Multiplicative base fee growth per congested update.
    pub base_fee_growth: f64,

    /// Multiplicative base fee decay per uncongested update.
    pub base_fee_decay: f64,

    // ── Validator scoring ────────────────────────────────────────────────
    /// Exponent applied to normalized stake in the selection weight.
    /// The exact scoring formula is deliberately configurable.
    pub stake_exponent: f64,

    /// Exponent applied to reputation in the selection weight.
    pub reputation_exponent: f64,

    /// Reputation penalty applied to endorsers of an orphaned bundle.
    pub orphan_penalty: f64,

    /// Reputation reward applied to endorsers of a finalized bundle.
    pub finality_reward: f64,
}

impl ConsensusParams {
    /// Stake required for the Pending → Confirmed promotion.
    pub fn soft_threshold(&self, total_stake: u128) -> u128 {
        total_stake.saturating_mul(self.soft_threshold_bps as u128) / BPS_DENOMINATOR
    }

    /// Stake required for the Confirmed → Final promotion.
    pub fn final_threshold(&self, total_stake: u128) -> u128 {
        total_stake.saturating_mul(self.final_threshold_bps as u128) / BPS_DENOMINATOR
    }

    /// Weight gap required to resolve a fork.
    pub fn hysteresis_margin(&self, total_stake: u128) -> u128 {
        total_stake.saturating_mul(self.fork_hysteresis_bps as u128) / BPS_DENOMINATOR
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            soft_threshold_bps: 5000,  // 50%
            final_threshold_bps: 6700, // 67%
            fork_hysteresis_bps: 500,  // 5%

            max_parents: 4,
            max_propagation_depth: 64,

            max_bundle_size: 128,
            validator_sample_size: 7,
            max_tx_requeues: 3,

            queue_capacity: 10_000,
            queue_ttl_secs: 600,
            age_bonus_scale_secs: 300,
            age_bonus_cap: 2.0,
            min_base_fee: 1.0,
            congestion_watermark: 0.75,
            base_fee_growth: 1.125,
            base_fee_decay: 0.9,

            stake_exponent: 1.0,
            reputation_exponent: 1.0,
            orphan_penalty: 0.1,
            finality_reward: 0.01,
        }
    }
}
