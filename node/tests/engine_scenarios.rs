//! End-to-end scenarios across admission, consensus, and the node facade.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use vertex_admission::{AdmissionQueue, Bundle, RejectReason, Transaction};
use vertex_consensus::fork::ForkTracker;
use vertex_consensus::{ConsensusEngine, EngineEvent};
use vertex_crypto::AcceptAllVerifier;
use vertex_dag::{DagNode, DagStore};
use vertex_node::{Node, NodeConfig, SubmissionQueue};
use vertex_types::{
    ConsensusParams, NodeId, NodeStatus, PriorityClass, PublicKey, Signature, Timestamp, TxId,
    TxStatus,
};
use vertex_validators::{Validator, ValidatorRegistry};

fn tx_with_fee(sender: u8, fee: u64) -> Transaction {
    tx_with_fee_and_nonce(sender, fee, 0)
}

fn tx_with_fee_and_nonce(sender: u8, fee: u64, nonce: u64) -> Transaction {
    let mut tx = Transaction::new(
        PublicKey([sender; 32]),
        PublicKey([0xFF; 32]),
        1,
        nonce,
        fee,
        vec![],
        PriorityClass::Standard,
        vec![],
        Timestamp::new(100),
    );
    tx.signature = Signature([1u8; 64]);
    tx
}

fn registry(stakes: &[u128], params: &ConsensusParams) -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new(params);
    for (i, stake) in stakes.iter().enumerate() {
        registry
            .register(Validator::new(PublicKey([i as u8 + 1; 32]), *stake))
            .unwrap();
    }
    registry
}

// Scenario: fees 10, 50, 20 in class Standard at the same timestamp,
// drained with max size 2, come out as [50, 20].
#[tokio::test]
async fn fee_priority_drain_order() {
    let params = ConsensusParams::default();
    let queue = SubmissionQueue::new(
        AdmissionQueue::new(params, Arc::new(AcceptAllVerifier)),
        128,
    );
    let now = Timestamp::new(100);

    let low = queue.submit(tx_with_fee(1, 10), now).await.unwrap();
    let high = queue.submit(tx_with_fee(2, 50), now).await.unwrap();
    let mid = queue.submit(tx_with_fee(3, 20), now).await.unwrap();

    let bundle = queue.drain(2, now).await.unwrap();
    assert_eq!(bundle.tx_ids(), vec![high, mid]);
    assert!(queue.contains(&low).await);
}

// Scenario: genesis plus two children that both pick it as sole parent.
// They are level-1 siblings with overlapping parents, so the pair is
// reported as a fork exactly once; a grandchild referencing both adds
// nothing new, and with equal weight neither branch is orphaned.
#[test]
fn sibling_fork_detected_once() {
    let params = ConsensusParams::default();
    let mut reg = registry(&[500, 500], &params);
    let mut store = DagStore::new();
    let mut tracker = ForkTracker::new();

    let genesis = NodeId::new([0; 32]);
    let a = NodeId::new([1; 32]);
    let b = NodeId::new([2; 32]);
    let grandchild = NodeId::new([3; 32]);

    let make = |id: NodeId, parents: Vec<NodeId>, weight: u128| {
        DagNode::new(id, parents, weight, 1.0, vec![], vec![], Timestamp::new(0))
    };

    store.insert(make(genesis, vec![], 0)).unwrap();
    tracker.observe(&store, genesis);
    store.insert(make(a, vec![genesis], 100)).unwrap();
    store.insert(make(b, vec![genesis], 100)).unwrap();

    assert_eq!(store.get(&a).unwrap().level, 1);
    assert_eq!(store.get(&b).unwrap().level, 1);
    assert!(!store.is_ancestor(&a, &b, 64));
    assert!(!store.is_ancestor(&b, &a, 64));

    assert!(tracker.observe(&store, a).is_empty());
    let events = tracker.observe(&store, b);
    assert_eq!(
        events,
        vec![EngineEvent::ForkDetected {
            first: a,
            second: b,
            level: 1,
        }]
    );

    store.insert(make(grandchild, vec![a, b], 100)).unwrap();
    assert_eq!(store.get(&grandchild).unwrap().level, 2);
    assert!(tracker.observe(&store, grandchild).is_empty());

    // equal weights stay inside the hysteresis margin
    let resolved = tracker
        .resolve(&mut store, &mut reg, &params, Timestamp::new(1))
        .unwrap();
    assert!(resolved.is_empty());
    assert_eq!(store.get(&a).unwrap().status, NodeStatus::Pending);
    assert_eq!(store.get(&b).unwrap().status, NodeStatus::Pending);
}

// Scenario: total stake 100 with the hard threshold at 67%. Nodes become
// Final only once their accumulated weight reaches 67, never before.
#[test]
fn finality_requires_the_hard_threshold() {
    let params = ConsensusParams {
        validator_sample_size: 1,
        ..ConsensusParams::default()
    };
    let reg = registry(&[40, 30, 30], &params);
    let mut engine = ConsensusEngine::new(
        params,
        reg,
        Arc::new(AcceptAllVerifier),
        Timestamp::new(0),
    );

    for nonce in 0..12u64 {
        let tx = tx_with_fee_and_nonce(0xAA, 10, nonce);
        engine
            .process_bundle(Bundle::new(vec![tx]), Timestamp::new(nonce + 1))
            .unwrap();

        for node in engine.store().nodes() {
            if node.id == engine.genesis() {
                continue;
            }
            if node.status == NodeStatus::Final {
                assert!(node.weight >= 67, "finalized at weight {}", node.weight);
            }
            if node.weight < 50 {
                assert_eq!(node.status, NodeStatus::Pending);
            }
        }
    }
    // a chained DAG accumulates weight; the oldest non-genesis node is Final
    let oldest = engine.store().nodes().nth(1).unwrap();
    assert_eq!(oldest.status, NodeStatus::Final);
}

// Full facade: concurrent submission, background production, event stream.
#[tokio::test]
async fn node_facade_end_to_end() {
    let config = NodeConfig {
        block_interval_ms: 20,
        consensus: ConsensusParams {
            validator_sample_size: 1,
            ..ConsensusParams::default()
        },
        ..NodeConfig::default()
    };
    let reg = registry(&[250, 250, 250, 250], &config.consensus);
    let mut node = Node::new(config, reg, Arc::new(AcceptAllVerifier));
    let mut events = node.subscribe();
    node.start();

    let mut submitted: Vec<TxId> = Vec::new();
    for sender in 1..=6u8 {
        let id = node.submit_transaction(tx_with_fee(sender, 10)).await.unwrap();
        submitted.push(id);
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    // chained bundles push early nodes over the soft threshold
    let confirmation = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(EngineEvent::Finality { to, .. }) = events.recv().await {
                if to == NodeStatus::Confirmed || to == NodeStatus::Final {
                    break;
                }
            }
        }
    })
    .await;
    assert!(confirmation.is_ok(), "no finality progress within 5s");

    for id in &submitted {
        assert_ne!(node.transaction_status(id).await, TxStatus::Unknown);
    }
    assert!(!node.tips().await.is_empty());
    assert_eq!(node.validator_set().await.len(), 4);

    // replayed (sender, nonce) is rejected and mirrored to the stream
    let result = node.submit_transaction(tx_with_fee(1, 10)).await;
    assert_eq!(result, Err(RejectReason::Replay));

    node.stop().await.unwrap();
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "block_interval_ms = 250\n[consensus]\nmax_parents = 2\n"
    )
    .unwrap();
    let config = NodeConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.block_interval_ms, 250);
    assert_eq!(config.consensus.max_parents, 2);
    assert_eq!(config.consensus.final_threshold_bps, 6700);
}
