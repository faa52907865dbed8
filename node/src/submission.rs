//! Concurrent wrapper around the admission queue.
//!
//! Many producer tasks submit; one block-production task drains. The core
//! queue is synchronous, so this wraps it in an async mutex and adds a
//! notify handle that wakes the producer early once a full bundle's worth
//! of transactions is waiting.

use tokio::sync::{Mutex, Notify};

use vertex_admission::{AdmissionQueue, Bundle, QueueEvent, RejectReason, Transaction};
use vertex_types::{Timestamp, TxId};

pub struct SubmissionQueue {
    queue: Mutex<AdmissionQueue>,
    bundle_size: usize,
    notify: Notify,
}

impl SubmissionQueue {
    pub fn new(queue: AdmissionQueue, bundle_size: usize) -> Self {
        Self {
            queue: Mutex::new(queue),
            bundle_size,
            notify: Notify::new(),
        }
    }

    /// Validate and enqueue a transaction. Wakes the drainer when a full
    /// bundle is waiting.
    pub async fn submit(&self, tx: Transaction, now: Timestamp) -> Result<TxId, RejectReason> {
        let mut queue = self.queue.lock().await;
        let result = queue.submit(tx, now);
        let full_bundle_ready = queue.len() >= self.bundle_size;
        drop(queue);

        if full_bundle_ready {
            self.notify.notify_one();
        }
        result
    }

    /// Drain the next bundle, if any.
    pub async fn drain(&self, max_size: usize, now: Timestamp) -> Option<Bundle> {
        self.queue.lock().await.drain_bundle(max_size, now)
    }

    /// Put a failed bundle's transactions back.
    pub async fn requeue(&self, bundle: Bundle, now: Timestamp) {
        self.queue.lock().await.requeue(bundle, now);
    }

    /// Collect eviction events accumulated since the last call.
    pub async fn take_events(&self) -> Vec<QueueEvent> {
        self.queue.lock().await.take_events()
    }

    /// Resolves when a full bundle's worth of transactions is queued.
    pub async fn bundle_ready(&self) {
        self.notify.notified().await;
    }

    pub async fn contains(&self, id: &TxId) -> bool {
        self.queue.lock().await.contains(id)
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}
