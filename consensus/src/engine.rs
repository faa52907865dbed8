//! The per-bundle consensus cycle.

use std::collections::HashMap;
use std::sync::Arc;

use vertex_admission::Bundle;
use vertex_crypto::{blake2b_256, SampleBeacon, SignatureVerifier};
use vertex_dag::{DagNode, DagStore, InsertError};
use vertex_types::{ConsensusParams, NodeId, NodeStatus, Timestamp, TxId};
use vertex_validators::ValidatorRegistry;

use crate::error::ConsensusError;
use crate::event::EngineEvent;
use crate::fork::ForkTracker;

/// What one cycle produced: events for the broadcast stream, and possibly
/// the bundle handed back for re-queueing after an insertion failure.
pub struct CycleOutcome {
    pub events: Vec<EngineEvent>,
    pub requeue: Option<Bundle>,
}

/// Owns the DAG store and validator registry; the single writer of both.
///
/// `process_bundle` runs the full cycle: parent selection, validator
/// sampling, insertion, weight propagation, finality checks, fork handling.
/// A broken level or weight invariant halts the engine permanently.
pub struct ConsensusEngine {
    params: ConsensusParams,
    store: DagStore,
    registry: ValidatorRegistry,
    verifier: Arc<dyn SignatureVerifier>,
    forks: ForkTracker,
    /// Transaction id to the node whose bundle carries it.
    tx_index: HashMap<TxId, NodeId>,
    genesis: NodeId,
    round: u64,
    halted: bool,
}

impl ConsensusEngine {
    /// Build the engine and seed the DAG with its genesis anchor.
    pub fn new(
        params: ConsensusParams,
        registry: ValidatorRegistry,
        verifier: Arc<dyn SignatureVerifier>,
        now: Timestamp,
    ) -> Self {
        let genesis = NodeId::new(blake2b_256(b"vertex.genesis.v1"));
        let mut store = DagStore::new();
        let mut anchor = DagNode::new(genesis, vec![], 0, 0.0, vec![], vec![], now);
        anchor.status = NodeStatus::Final;
        // An empty store accepts exactly one parentless node.
        store
            .insert(anchor)
            .unwrap_or_else(|_| unreachable!("empty store rejects nothing"));
        let mut forks = ForkTracker::new();
        forks.observe(&store, genesis);
        Self {
            params,
            store,
            registry,
            verifier,
            forks,
            tx_index: HashMap::new(),
            genesis,
            round: 0,
            halted: false,
        }
    }

    /// Run one consensus cycle over a drained bundle.
    pub fn process_bundle(
        &mut self,
        mut bundle: Bundle,
        now: Timestamp,
    ) -> Result<CycleOutcome, ConsensusError> {
        if self.halted {
            return Err(ConsensusError::Halted);
        }
        self.round += 1;
        let mut events = Vec::new();
        let node_id = bundle.id;

        let mut refreshed = false;
        let stake = loop {
            let parents = self.select_parents();
            let anchor = parents.first().copied().unwrap_or(self.genesis);
            let mut beacon = SampleBeacon::new(&anchor, self.round);
            let sample = self
                .registry
                .sample_validators(self.params.validator_sample_size, &mut beacon);
            let stake = self.registry.endorsement_stake(&sample);
            bundle.endorsers = sample.clone();
            bundle.endorsement_stake = stake;

            let node = DagNode::new(
                node_id,
                parents,
                stake,
                self.verifier.security_score(),
                bundle.tx_ids(),
                sample,
                now,
            );
            match self.store.insert(node) {
                Ok(()) => break stake,
                Err(InsertError::UnknownParent { parent }) => {
                    tracing::warn!(bundle = ?node_id, parent = ?parent, "unknown parent during insert");
                    if !refreshed {
                        refreshed = true;
                        continue; // one in-cycle retry with fresh tips
                    }
                    // admission counts re-queue rounds per transaction and
                    // drops anything past the bound with an eviction event
                    return Ok(CycleOutcome {
                        events,
                        requeue: Some(bundle),
                    });
                }
                Err(err) => {
                    // Cycle, duplicate, or empty parents cannot come out of
                    // engine-selected tips; fatal for the bundle, no retry.
                    tracing::error!(bundle = ?node_id, error = %err, "structural insert failure, bundle dropped");
                    events.push(EngineEvent::BundleDropped {
                        bundle: node_id,
                        tx_count: bundle.len(),
                    });
                    return Ok(CycleOutcome { events, requeue: None });
                }
            }
        };

        for tx in &bundle.transactions {
            self.tx_index.insert(tx.id, node_id);
        }

        // Propagate the new node's base weight to every bounded-depth ancestor.
        let touched: Vec<NodeId> = self
            .store
            .ancestors_of(&node_id, self.params.max_propagation_depth)
            .collect();
        for ancestor in &touched {
            if let Err(e) = self.store.add_weight(ancestor, stake) {
                return Err(self.halt(e.to_string()));
            }
        }

        let total = self.registry.total_active_stake();
        for id in std::iter::once(node_id).chain(touched) {
            self.check_finality(id, total, now, &mut events)?;
        }

        events.extend(self.forks.observe(&self.store, node_id));
        match self
            .forks
            .resolve(&mut self.store, &mut self.registry, &self.params, now)
        {
            Ok(resolved) => events.extend(resolved),
            Err(ConsensusError::InvariantViolation(msg)) => return Err(self.halt(msg)),
            Err(other) => return Err(other),
        }

        Ok(CycleOutcome {
            events,
            requeue: None,
        })
    }

    /// Promote a node across any thresholds its weight now satisfies.
    /// Each promotion is a distinct, once-only event.
    fn check_finality(
        &mut self,
        id: NodeId,
        total: u128,
        now: Timestamp,
        events: &mut Vec<EngineEvent>,
    ) -> Result<(), ConsensusError> {
        if total == 0 {
            return Ok(());
        }
        let Some(node) = self.store.get(&id) else {
            return Err(self.halt(format!("finality check on missing node {id}")));
        };
        let weight = node.weight;
        let endorsers = node.endorsers.clone();
        let mut status = node.status;

        if status == NodeStatus::Pending && weight >= self.params.soft_threshold(total) {
            if let Err(e) = self.store.set_status(&id, NodeStatus::Confirmed) {
                return Err(self.halt(e.to_string()));
            }
            events.push(EngineEvent::Finality {
                node: id,
                from: NodeStatus::Pending,
                to: NodeStatus::Confirmed,
                timestamp: now,
            });
            status = NodeStatus::Confirmed;
        }

        if status == NodeStatus::Confirmed && weight >= self.params.final_threshold(total) {
            if let Err(e) = self.store.set_status(&id, NodeStatus::Final) {
                return Err(self.halt(e.to_string()));
            }
            events.push(EngineEvent::Finality {
                node: id,
                from: NodeStatus::Confirmed,
                to: NodeStatus::Final,
                timestamp: now,
            });
            for endorser in &endorsers {
                if let Err(e) = self.registry.reward(endorser, self.params.finality_reward) {
                    tracing::warn!(endorser = ?endorser, error = %e, "finality reward skipped");
                }
            }
        }
        Ok(())
    }

    /// Current tips minus orphaned branches, best-first: weight descending,
    /// ties by id. At most the configured fan-in limit. Falls back to the
    /// best selectable node anywhere when every tip is orphaned.
    fn select_parents(&self) -> Vec<NodeId> {
        let mut candidates: Vec<&DagNode> = self
            .store
            .get_tips()
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|n| n.status.is_selectable())
            .collect();
        if candidates.is_empty() {
            candidates = self
                .store
                .nodes()
                .filter(|n| n.status.is_selectable())
                .collect();
        }
        candidates.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
        candidates
            .into_iter()
            .take(self.params.max_parents)
            .map(|n| n.id)
            .collect()
    }

    fn halt(&mut self, msg: String) -> ConsensusError {
        self.halted = true;
        tracing::error!(%msg, "consensus engine halted");
        ConsensusError::InvariantViolation(msg)
    }

    // ── Read-only views for the node facade ─────────────────────────────

    pub fn transaction_status(&self, tx_id: &TxId) -> Option<NodeStatus> {
        self.tx_index
            .get(tx_id)
            .and_then(|node| self.store.get(node))
            .map(|node| node.status)
    }

    pub fn node(&self, id: &NodeId) -> Option<&DagNode> {
        self.store.get(id)
    }

    pub fn tips(&self) -> Vec<NodeId> {
        self.store.get_tips()
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DagStore {
        &self.store
    }

    pub fn genesis(&self) -> NodeId {
        self.genesis
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
