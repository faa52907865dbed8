//! Fork detection and hysteresis-gated resolution.

use std::collections::{HashMap, HashSet};

use vertex_dag::DagStore;
use vertex_types::{ConsensusParams, NodeId, NodeStatus, Timestamp};
use vertex_validators::ValidatorRegistry;

use crate::error::ConsensusError;
use crate::event::EngineEvent;

/// Tracks competing same-level nodes.
///
/// A fork is two nodes at the same level whose parent sets overlap.
/// Levels strictly increase along parent edges, so same-level nodes can
/// never be ancestors of one another; the overlap check is sufficient.
#[derive(Default)]
pub struct ForkTracker {
    /// Node ids grouped by level, in insertion order.
    by_level: HashMap<u64, Vec<NodeId>>,
    /// Pairs already reported, keyed as (min, max).
    reported: HashSet<(NodeId, NodeId)>,
    /// Unresolved forks.
    active: Vec<(NodeId, NodeId)>,
}

fn pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ForkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly inserted node and report any new forks it opens.
    pub fn observe(&mut self, store: &DagStore, id: NodeId) -> Vec<EngineEvent> {
        let Some(node) = store.get(&id) else {
            return Vec::new();
        };
        let level = node.level;
        let parents: HashSet<NodeId> = node.parents.iter().copied().collect();

        let mut events = Vec::new();
        let peers = self.by_level.entry(level).or_default();
        for peer in peers.iter() {
            let Some(peer_node) = store.get(peer) else {
                continue;
            };
            let overlaps = peer_node.parents.iter().any(|p| parents.contains(p));
            if !overlaps {
                continue;
            }
            let key = pair(*peer, id);
            if self.reported.insert(key) {
                self.active.push(key);
                tracing::warn!(first = ?key.0, second = ?key.1, level, "fork detected");
                events.push(EngineEvent::ForkDetected {
                    first: key.0,
                    second: key.1,
                    level,
                });
            }
        }
        peers.push(id);
        events
    }

    /// Resolve tracked forks whose weight gap exceeds the hysteresis margin.
    ///
    /// Only forks with both sides still `Pending` can be resolved; once
    /// either side is promoted the pair is untracked. The lighter branch is
    /// orphaned and its endorsers are penalized.
    pub fn resolve(
        &mut self,
        store: &mut DagStore,
        registry: &mut ValidatorRegistry,
        params: &ConsensusParams,
        now: Timestamp,
    ) -> Result<Vec<EngineEvent>, ConsensusError> {
        let margin = params.hysteresis_margin(registry.total_active_stake());
        let mut events = Vec::new();
        let mut still_active = Vec::new();

        for (a, b) in std::mem::take(&mut self.active) {
            let (Some(node_a), Some(node_b)) = (store.get(&a), store.get(&b)) else {
                return Err(ConsensusError::InvariantViolation(format!(
                    "tracked fork references missing node ({a}, {b})"
                )));
            };
            if node_a.status != NodeStatus::Pending || node_b.status != NodeStatus::Pending {
                continue; // promoted past resolvability, stop tracking
            }
            let (weight_a, weight_b) = (node_a.weight, node_b.weight);
            let gap = weight_a.abs_diff(weight_b);
            if gap <= margin {
                still_active.push((a, b));
                continue;
            }

            let loser = if weight_a < weight_b { a } else { b };
            let endorsers = store
                .get(&loser)
                .map(|n| n.endorsers.clone())
                .unwrap_or_default();
            store
                .set_status(&loser, NodeStatus::Orphaned)
                .map_err(|e| ConsensusError::InvariantViolation(e.to_string()))?;
            for endorser in &endorsers {
                if let Err(e) = registry.penalize(endorser, params.orphan_penalty) {
                    tracing::warn!(endorser = ?endorser, error = %e, "orphan penalty skipped");
                }
            }
            tracing::info!(loser = ?loser, gap, margin, "fork resolved");
            events.push(EngineEvent::Finality {
                node: loser,
                from: NodeStatus::Pending,
                to: NodeStatus::Orphaned,
                timestamp: now,
            });
        }

        self.active = still_active;
        Ok(events)
    }

    /// Number of unresolved forks.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
