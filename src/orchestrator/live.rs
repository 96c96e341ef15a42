//! Live (streaming) transcription session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::orchestrator::types::{LiveCallbacks, LiveQueue, SessionHandle};
use crate::orchestrator::Orchestrator;
use crate::types::TranscriptMetrics;

impl Orchestrator {
    /// Starts a live session: a background task pulls chunks off the
    /// bounded queue in submission order, runs each through the pipeline,
    /// and fires `on_draft` then `on_verified` for every chunk. Processing
    /// is strictly sequential per session, which keeps draft-before-
    /// verified and chunk_index ordering trivially correct without an
    /// out-of-order reassembly buffer.
    pub fn start_live_session(self: Arc<Self>, job_id: Uuid, callbacks: LiveCallbacks) -> SessionHandle {
        let queue = Arc::new(LiveQueue::new(self.config.concurrency.live_queue_depth));
        let cancel = Arc::new(AtomicBool::new(false));

        let worker_queue = queue.clone();
        let worker_cancel = cancel.clone();
        let orchestrator = self.clone();
        let worker = tokio::spawn(async move {
            let mut metrics = TranscriptMetrics::default();
            let mut prior_language: Option<String> = None;
            let mut prior_text: Option<String> = None;
            loop {
                if worker_cancel.load(Ordering::SeqCst) {
                    break;
                }
                let Some(chunk) = worker_queue.pop().await else {
                    break;
                };
                if worker_cancel.load(Ordering::SeqCst) {
                    break;
                }

                let draft = orchestrator
                    .process_to_draft(&chunk, prior_language.as_deref(), prior_text.as_deref(), &mut metrics)
                    .await;
                (callbacks.on_draft)(draft.segment.clone());

                let verified = orchestrator.apply_quote_engine(draft, &mut metrics);
                if !verified.language.is_empty() {
                    prior_language = Some(verified.language.clone());
                }
                if !verified.spoken_text.is_empty() {
                    prior_text = Some(verified.spoken_text.clone());
                }
                (callbacks.on_verified)(verified);
            }
        });

        SessionHandle {
            job_id,
            queue,
            cancel,
            worker,
        }
    }
}
