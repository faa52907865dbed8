//! The node facade: concurrent submission, read-only views, event stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use vertex_admission::{AdmissionQueue, RejectReason, Transaction};
use vertex_consensus::{ConsensusEngine, EngineEvent};
use vertex_crypto::SignatureVerifier;
use vertex_types::{NodeId, NodeStatus, Timestamp, TxId, TxStatus};
use vertex_validators::ValidatorRegistry;

use crate::actor::BlockProducer;
use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::shutdown::ShutdownController;
use crate::submission::SubmissionQueue;

/// Read-only projection of a DAG node.
#[derive(Clone, Debug)]
pub struct DagNodeView {
    pub id: NodeId,
    pub parents: Vec<NodeId>,
    pub level: u64,
    pub weight: u128,
    pub status: NodeStatus,
}

/// Read-only projection of a registered validator.
#[derive(Clone, Debug)]
pub struct ValidatorView {
    pub id: vertex_validators::ValidatorId,
    pub stake: u128,
    pub reputation: f64,
    pub active: bool,
}

/// One running VERTEX node.
///
/// Submission is concurrent and never touches the DAG; all DAG and
/// registry mutation happens inside the spawned block-production task.
pub struct Node {
    config: NodeConfig,
    queue: Arc<SubmissionQueue>,
    engine: Arc<RwLock<ConsensusEngine>>,
    events: broadcast::Sender<EngineEvent>,
    shutdown: ShutdownController,
    producer: Option<JoinHandle<()>>,
}

impl Node {
    pub fn new(
        config: NodeConfig,
        registry: ValidatorRegistry,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        let params = config.consensus.clone();
        let queue = Arc::new(SubmissionQueue::new(
            AdmissionQueue::new(params.clone(), Arc::clone(&verifier)),
            params.max_bundle_size,
        ));
        let engine = Arc::new(RwLock::new(ConsensusEngine::new(
            params,
            registry,
            verifier,
            Timestamp::now(),
        )));
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            config,
            queue,
            engine,
            events,
            shutdown: ShutdownController::new(),
            producer: None,
        }
    }

    /// Spawn the block-production task. Idempotent.
    pub fn start(&mut self) {
        if self.producer.is_some() {
            return;
        }
        let producer = BlockProducer {
            queue: Arc::clone(&self.queue),
            engine: Arc::clone(&self.engine),
            events: self.events.clone(),
            interval: Duration::from_millis(self.config.block_interval_ms),
            max_bundle_size: self.config.consensus.max_bundle_size,
        };
        let shutdown = self.shutdown.subscribe();
        self.producer = Some(tokio::spawn(producer.run(shutdown)));
        tracing::info!(
            interval_ms = self.config.block_interval_ms,
            "block production started"
        );
    }

    /// Signal shutdown and wait for the producer to exit.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        let Some(handle) = self.producer.take() else {
            return Err(NodeError::NotRunning);
        };
        self.shutdown.shutdown();
        let _ = handle.await;
        tracing::info!("node stopped");
        Ok(())
    }

    /// For the daemon: awaits SIGINT/SIGTERM and triggers shutdown.
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Validate and queue a transaction. Rejections are returned to the
    /// caller and mirrored onto the event stream.
    pub async fn submit_transaction(&self, tx: Transaction) -> Result<TxId, RejectReason> {
        let tx_id = tx.id;
        match self.queue.submit(tx, Timestamp::now()).await {
            Ok(id) => Ok(id),
            Err(reason) => {
                let _ = self.events.send(EngineEvent::TransactionRejected {
                    tx_id,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    /// Externally visible status of a transaction. Queued transactions are
    /// `Pending` before their bundle lands in the DAG.
    pub async fn transaction_status(&self, tx_id: &TxId) -> TxStatus {
        if let Some(status) = self.engine.read().await.transaction_status(tx_id) {
            return status.into();
        }
        if self.queue.contains(tx_id).await {
            return TxStatus::Pending;
        }
        TxStatus::Unknown
    }

    pub async fn node_view(&self, id: &NodeId) -> Option<DagNodeView> {
        self.engine.read().await.node(id).map(|n| DagNodeView {
            id: n.id,
            parents: n.parents.clone(),
            level: n.level,
            weight: n.weight,
            status: n.status,
        })
    }

    pub async fn tips(&self) -> Vec<NodeId> {
        self.engine.read().await.tips()
    }

    pub async fn validator_set(&self) -> Vec<ValidatorView> {
        self.engine
            .read()
            .await
            .registry()
            .validators()
            .map(|v| ValidatorView {
                id: v.id,
                stake: v.stake,
                reputation: v.reputation,
                active: v.active,
            })
            .collect()
    }

    /// Subscribe to the push event stream: finality, forks, rejections,
    /// evictions, bundle drops.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub async fn is_halted(&self) -> bool {
        self.engine.read().await.is_halted()
    }
}
