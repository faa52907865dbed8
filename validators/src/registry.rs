//! The validator registry and deterministic sampling.

use std::collections::BTreeMap;

use vertex_crypto::SampleBeacon;
use vertex_types::ConsensusParams;

use crate::error::RegistryError;
use crate::validator::{Validator, ValidatorId};

/// Fixed-point scale for turning f64 selection weights into integer
/// sampling units. Weights are ≤ 1.0, so per-validator units fit u64
/// comfortably even for large sets.
const WEIGHT_UNITS: f64 = 1e9;

/// Holds the validator set and computes selection weights.
///
/// Total active stake is maintained incrementally as validators register,
/// deactivate, or change stake — finality checks read it on every cycle and
/// must not rescan the set.
pub struct ValidatorRegistry {
    /// Keyed and iterated in id order so sampling is deterministic.
    validators: BTreeMap<ValidatorId, Validator>,
    /// Sum of stake across active validators.
    total_active_stake: u128,
    /// Exponent on normalized stake in the selection weight.
    stake_exponent: f64,
    /// Exponent on reputation in the selection weight.
    reputation_exponent: f64,
}

impl ValidatorRegistry {
    pub fn new(params: &ConsensusParams) -> Self {
        Self {
            validators: BTreeMap::new(),
            total_active_stake: 0,
            stake_exponent: params.stake_exponent,
            reputation_exponent: params.reputation_exponent,
        }
    }

    /// Register a new validator. Administrative operation.
    pub fn register(&mut self, validator: Validator) -> Result<(), RegistryError> {
        if validator.stake == 0 {
            return Err(RegistryError::ZeroStake);
        }
        if self.validators.contains_key(&validator.id) {
            return Err(RegistryError::DuplicateValidator(validator.id.to_debug_id()));
        }
        if validator.active {
            self.total_active_stake = self.total_active_stake.saturating_add(validator.stake);
        }
        tracing::debug!(validator = ?validator.id, stake = validator.stake, "validator registered");
        self.validators.insert(validator.id, validator);
        Ok(())
    }

    /// Activate or deactivate a validator. Administrative operation.
    pub fn set_active(&mut self, id: &ValidatorId, active: bool) -> Result<(), RegistryError> {
        let validator = self
            .validators
            .get_mut(id)
            .ok_or_else(|| RegistryError::ValidatorNotFound(id.to_debug_id()))?;
        if validator.active == active {
            return Ok(());
        }
        if active {
            self.total_active_stake = self.total_active_stake.saturating_add(validator.stake);
        } else {
            self.total_active_stake = self.total_active_stake.saturating_sub(validator.stake);
        }
        validator.active = active;
        Ok(())
    }

    pub fn get(&self, id: &ValidatorId) -> Option<&Validator> {
        self.validators.get(id)
    }

    /// Sum of stake across active validators — the "total network weight"
    /// finality thresholds are taken against.
    pub fn total_active_stake(&self) -> u128 {
        self.total_active_stake
    }

    /// Sum of active stake across the given validator ids.
    pub fn endorsement_stake(&self, ids: &[ValidatorId]) -> u128 {
        ids.iter()
            .filter_map(|id| self.validators.get(id))
            .filter(|v| v.active)
            .fold(0u128, |acc, v| acc.saturating_add(v.stake))
    }

    /// Selection weight: `(stake / total_active_stake)^a × reputation^b`.
    ///
    /// The exponents come from [`ConsensusParams`]; the exact scoring
    /// formula is a configuration decision, not a protocol constant.
    /// Inactive or unknown validators weigh zero.
    pub fn selection_weight(&self, id: &ValidatorId) -> f64 {
        let Some(validator) = self.validators.get(id) else {
            return 0.0;
        };
        if !validator.active || self.total_active_stake == 0 {
            return 0.0;
        }
        let normalized_stake = validator.stake as f64 / self.total_active_stake as f64;
        normalized_stake.powf(self.stake_exponent)
            * validator.reputation.powf(self.reputation_exponent)
    }

    /// Deterministic weighted sampling without replacement.
    ///
    /// The beacon is keyed by (tip hash, round), so every node recomputes
    /// the identical sample from the same DAG state. Validators with zero
    /// selection weight (inactive, or reputation 0) are never drawn.
    /// Returns fewer than `k` ids when fewer weighted candidates exist.
    pub fn sample_validators(&self, k: usize, beacon: &mut SampleBeacon) -> Vec<ValidatorId> {
        let mut candidates: Vec<(ValidatorId, u64)> = self
            .validators
            .values()
            .filter(|v| v.active)
            .filter_map(|v| {
                let units = (self.selection_weight(&v.id) * WEIGHT_UNITS).round() as u64;
                (units > 0).then_some((v.id, units))
            })
            .collect();

        let mut total_units: u64 = candidates.iter().map(|(_, u)| u).sum();
        let mut sample = Vec::with_capacity(k.min(candidates.len()));

        while sample.len() < k && total_units > 0 {
            let mut roll = beacon.next_bounded(total_units);
            let mut chosen = None;
            for (i, (_, units)) in candidates.iter().enumerate() {
                if roll < *units {
                    chosen = Some(i);
                    break;
                }
                roll -= *units;
            }
            // The cumulative walk always lands inside the candidate list.
            let index = match chosen {
                Some(i) => i,
                None => break,
            };
            let (id, units) = candidates.remove(index);
            total_units -= units;
            sample.push(id);
        }

        sample
    }

    /// Lower a validator's reputation (e.g. its bundle was orphaned).
    pub fn penalize(&mut self, id: &ValidatorId, amount: f64) -> Result<(), RegistryError> {
        let validator = self
            .validators
            .get_mut(id)
            .ok_or_else(|| RegistryError::ValidatorNotFound(id.to_debug_id()))?;
        validator.reputation = (validator.reputation - amount).clamp(0.0, 1.0);
        tracing::debug!(
            validator = ?id,
            reputation = validator.reputation,
            "validator penalized"
        );
        Ok(())
    }

    /// Raise a validator's reputation (e.g. its bundle finalized).
    pub fn reward(&mut self, id: &ValidatorId, amount: f64) -> Result<(), RegistryError> {
        let validator = self
            .validators
            .get_mut(id)
            .ok_or_else(|| RegistryError::ValidatorNotFound(id.to_debug_id()))?;
        validator.reputation = (validator.reputation + amount).clamp(0.0, 1.0);
        Ok(())
    }

    /// All validators, in id order.
    pub fn validators(&self) -> impl Iterator<Item = &Validator> {
        self.validators.values()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Short hex identifier for error messages.
trait ToDebugId {
    fn to_debug_id(&self) -> String;
}

impl ToDebugId for ValidatorId {
    fn to_debug_id(&self) -> String {
        self.as_bytes()[..4]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}
