//! The block-production task: the only writer of DAG and validator state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};

use vertex_admission::QueueEvent;
use vertex_consensus::{ConsensusEngine, EngineEvent};
use vertex_types::Timestamp;

use crate::shutdown::ShutdownSignal;
use crate::submission::SubmissionQueue;

/// Drains one bundle per cycle and runs it through the consensus engine.
///
/// Cycles fire on a fixed cadence, or early when the queue reports a full
/// bundle waiting. All engine events, plus queue evictions, are forwarded
/// to the broadcast stream.
pub struct BlockProducer {
    pub(crate) queue: Arc<SubmissionQueue>,
    pub(crate) engine: Arc<RwLock<ConsensusEngine>>,
    pub(crate) events: broadcast::Sender<EngineEvent>,
    pub(crate) interval: Duration,
    pub(crate) max_bundle_size: usize,
}

impl BlockProducer {
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    tracing::info!("block producer stopping");
                    break;
                }
                _ = ticker.tick() => {}
                _ = self.queue.bundle_ready() => {}
            }
            if !self.produce_once().await {
                break;
            }
        }
    }

    /// One production cycle. Returns `false` once the engine has halted.
    async fn produce_once(&self) -> bool {
        let now = Timestamp::now();

        for event in self.queue.take_events().await {
            let QueueEvent::Evicted { tx_id, reason } = event;
            let _ = self
                .events
                .send(EngineEvent::TransactionEvicted { tx_id, reason });
        }

        let Some(bundle) = self.queue.drain(self.max_bundle_size, now).await else {
            return true;
        };

        match self.engine.write().await.process_bundle(bundle, now) {
            Ok(outcome) => {
                for event in outcome.events {
                    let _ = self.events.send(event);
                }
                if let Some(bundle) = outcome.requeue {
                    self.queue.requeue(bundle, now).await;
                }
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "block production stopped");
                false
            }
        }
    }
}
