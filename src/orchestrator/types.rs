//! Shared orchestrator types: run options, live-session handles and
//! callbacks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::warn;
use uuid::Uuid;

use crate::types::{AudioChunk, ProcessedSegment};

#[derive(Debug, Clone, Default)]
pub struct TranscribeOptions {
    pub job_id: Option<Uuid>,
}

pub type DraftCallback = Arc<dyn Fn(ProcessedSegment) + Send + Sync>;
pub type VerifiedCallback = Arc<dyn Fn(ProcessedSegment) + Send + Sync>;

/// Callbacks injected at live-session construction. `on_draft` fires
/// immediately after conversion, before the quote engine runs;
/// `on_verified` fires once the quote engine has resolved. Both carry the
/// same `segment_id`; a verified event is the authoritative replacement
/// for an earlier draft with that id.
#[derive(Clone)]
pub struct LiveCallbacks {
    pub on_draft: DraftCallback,
    pub on_verified: VerifiedCallback,
}

/// Bounded live-submission queue that drops the oldest *unstarted* chunk
/// on overflow rather than rejecting the newest one. A chunk already
/// being transcribed is never in this queue — it has already been
/// popped by the worker loop.
pub(crate) struct LiveQueue {
    inner: Mutex<VecDeque<AudioChunk>>,
    notify: Notify,
    depth: usize,
}

impl LiveQueue {
    pub(crate) fn new(depth: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            depth: depth.max(1),
        }
    }

    pub(crate) async fn push(&self, chunk: AudioChunk) {
        let mut guard = self.inner.lock().await;
        if guard.len() >= self.depth {
            if let Some(dropped) = guard.pop_front() {
                warn!(
                    chunk_index = dropped.chunk_index,
                    "live queue overflow: dropped oldest unstarted chunk"
                );
            }
        }
        guard.push_back(chunk);
        self.notify.notify_one();
    }

    pub(crate) async fn pop(&self) -> Option<AudioChunk> {
        loop {
            {
                let mut guard = self.inner.lock().await;
                if let Some(chunk) = guard.pop_front() {
                    return Some(chunk);
                }
            }
            self.notify.notified().await;
        }
    }
}

/// A handle to a running live transcription session. `submit` enqueues a
/// chunk (subject to backpressure); `close` requests the worker stop after
/// its current chunk and waits for it to finish.
pub struct SessionHandle {
    pub(crate) job_id: Uuid,
    pub(crate) queue: Arc<LiveQueue>,
    pub(crate) cancel: Arc<AtomicBool>,
    pub(crate) worker: tokio::task::JoinHandle<()>,
}

impl SessionHandle {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub async fn submit(&self, chunk: AudioChunk) {
        if self.cancel.load(Ordering::SeqCst) {
            return;
        }
        self.queue.push(chunk).await;
    }

    /// Signals cancellation and waits for the in-flight chunk (if any) to
    /// finish before returning; subsequent queued chunks are dropped.
    pub async fn close(self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.queue.notify.notify_one();
        let _ = self.worker.await;
    }
}
