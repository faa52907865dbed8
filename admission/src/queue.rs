//! The bounded fee-priority admission queue.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use vertex_crypto::SignatureVerifier;
use vertex_types::{ConsensusParams, PublicKey, Timestamp, TxId};

use crate::bundle::Bundle;
use crate::error::RejectReason;
use crate::tx::Transaction;

/// Why an already-accepted transaction was removed without reaching a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictReason {
    /// Exceeded the queue TTL.
    Expired,
    /// Displaced by a strictly higher-priority newcomer on a full queue.
    Displaced,
    /// Re-queued more times than the configured bound.
    RequeueLimit,
}

/// Asynchronous queue outcomes, surfaced through the node's event stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueEvent {
    Evicted { tx_id: TxId, reason: EvictReason },
}

struct QueueEntry {
    tx: Transaction,
    submitted_at: Timestamp,
}

/// Admission control core: signature/replay gating plus a bounded queue
/// ordered by priority score.
///
/// Score = `(fee / current_base_fee) × class_weight × age_bonus`, with the
/// age bonus linear in queue age and capped. Ties break on submit time,
/// then transaction id, so the drain order is a total order.
///
/// Synchronous and single-threaded; the node layer adds the locking.
pub struct AdmissionQueue {
    params: ConsensusParams,
    verifier: Arc<dyn SignatureVerifier>,
    entries: HashMap<TxId, QueueEntry>,
    /// Accepted `(sender, nonce)` pairs. Grows for the life of the process;
    /// replay rejection must outlive the entries themselves.
    replay: HashSet<(PublicKey, u64)>,
    /// Re-queue rounds per transaction.
    requeues: HashMap<TxId, u32>,
    base_fee: f64,
    events: Vec<QueueEvent>,
}

impl AdmissionQueue {
    pub fn new(params: ConsensusParams, verifier: Arc<dyn SignatureVerifier>) -> Self {
        let base_fee = params.min_base_fee;
        Self {
            params,
            verifier,
            entries: HashMap::new(),
            replay: HashSet::new(),
            requeues: HashMap::new(),
            base_fee,
            events: Vec::new(),
        }
    }

    /// Validate and enqueue a transaction.
    ///
    /// On a full queue the newcomer may displace the current lowest-priority
    /// entry, but only when it scores strictly higher; the displaced entry
    /// is reported as a [`QueueEvent::Evicted`].
    pub fn submit(&mut self, tx: Transaction, now: Timestamp) -> Result<TxId, RejectReason> {
        if tx.amount == 0 {
            return Err(RejectReason::ZeroAmount);
        }
        // The id keys the queue; a forged one could overwrite an accepted
        // entry, so it must match the content before anything else uses it.
        if !tx.verify_content_hash() {
            return Err(RejectReason::IdMismatch);
        }
        if self.replay.contains(&(tx.sender, tx.nonce)) {
            return Err(RejectReason::Replay);
        }
        if !self
            .verifier
            .verify(&tx.signing_bytes(), &tx.signature, &tx.sender)
        {
            return Err(RejectReason::InvalidSignature);
        }

        if self.entries.len() >= self.params.queue_capacity {
            let newcomer_score = self.score(&tx, now, now);
            let Some((victim_id, victim_score)) = self.lowest_entry(now) else {
                return Err(RejectReason::QueueFull);
            };
            if newcomer_score <= victim_score {
                return Err(RejectReason::QueueFull);
            }
            self.entries.remove(&victim_id);
            self.events.push(QueueEvent::Evicted {
                tx_id: victim_id,
                reason: EvictReason::Displaced,
            });
            tracing::debug!(evicted = ?victim_id, "queue full, lowest entry displaced");
        }

        let id = tx.id;
        self.replay.insert((tx.sender, tx.nonce));
        self.entries.insert(id, QueueEntry { tx, submitted_at: now });
        self.update_base_fee();
        Ok(id)
    }

    /// Pop up to `max_size` top-priority transactions into a bundle.
    /// Expired entries are evicted first. Never returns an empty bundle.
    pub fn drain_bundle(&mut self, max_size: usize, now: Timestamp) -> Option<Bundle> {
        self.evict_expired(now);
        let take = max_size.min(self.params.max_bundle_size);
        if self.entries.is_empty() || take == 0 {
            return None;
        }

        let mut ranked = self.ranked_ids(now);
        ranked.truncate(take);
        let transactions: Vec<Transaction> = ranked
            .iter()
            .filter_map(|id| self.entries.remove(id))
            .map(|entry| entry.tx)
            .collect();
        self.update_base_fee();
        Some(Bundle::new(transactions))
    }

    /// Put a failed bundle's transactions back in the queue.
    ///
    /// Transactions past the re-queue bound are dropped with an eviction
    /// event instead. Re-queued entries bypass the capacity check; the
    /// overshoot is transient and bounded by the bundle size.
    pub fn requeue(&mut self, bundle: Bundle, now: Timestamp) {
        for tx in bundle.transactions {
            let rounds = self.requeues.entry(tx.id).or_insert(0);
            *rounds += 1;
            if *rounds > self.params.max_tx_requeues {
                self.events.push(QueueEvent::Evicted {
                    tx_id: tx.id,
                    reason: EvictReason::RequeueLimit,
                });
                tracing::warn!(tx = ?tx.id, rounds = *rounds, "re-queue bound hit, transaction dropped");
                continue;
            }
            let id = tx.id;
            self.entries.insert(id, QueueEntry { tx, submitted_at: now });
        }
        self.update_base_fee();
    }

    /// Current dynamic base fee (floor: `min_base_fee`).
    pub fn current_base_fee(&self) -> f64 {
        self.base_fee
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &TxId) -> bool {
        self.entries.contains_key(id)
    }

    /// Drain accumulated queue events.
    pub fn take_events(&mut self) -> Vec<QueueEvent> {
        std::mem::take(&mut self.events)
    }

    fn score(&self, tx: &Transaction, submitted_at: Timestamp, now: Timestamp) -> f64 {
        let fee_ratio = tx.fee as f64 / self.base_fee;
        let age = submitted_at.elapsed_since(now);
        let age_bonus =
            (1.0 + age as f64 / self.params.age_bonus_scale_secs as f64).min(self.params.age_bonus_cap);
        fee_ratio * tx.priority.weight() * age_bonus
    }

    /// Entry ids in drain order: score desc, submit time asc, id asc.
    fn ranked_ids(&self, now: Timestamp) -> Vec<TxId> {
        let mut ranked: Vec<(f64, Timestamp, TxId)> = self
            .entries
            .values()
            .map(|e| (self.score(&e.tx, e.submitted_at, now), e.submitted_at, e.tx.id))
            .collect();
        ranked.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });
        ranked.into_iter().map(|(_, _, id)| id).collect()
    }

    fn lowest_entry(&self, now: Timestamp) -> Option<(TxId, f64)> {
        let id = *self.ranked_ids(now).last()?;
        let entry = &self.entries[&id];
        Some((id, self.score(&entry.tx, entry.submitted_at, now)))
    }

    fn evict_expired(&mut self, now: Timestamp) {
        let ttl = self.params.queue_ttl_secs;
        let expired: Vec<TxId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.submitted_at.has_expired(ttl, now))
            .map(|(id, _)| *id)
            .collect();
        for id in expired {
            self.entries.remove(&id);
            self.events.push(QueueEvent::Evicted {
                tx_id: id,
                reason: EvictReason::Expired,
            });
            tracing::debug!(tx = ?id, "queue TTL eviction");
        }
    }

    fn update_base_fee(&mut self) {
        let congestion = self.entries.len() as f64 / self.params.queue_capacity as f64;
        if congestion > self.params.congestion_watermark {
            self.base_fee *= self.params.base_fee_growth;
        } else {
            self.base_fee = (self.base_fee * self.params.base_fee_decay).max(self.params.min_base_fee);
        }
    }
}
