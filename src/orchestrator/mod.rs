//! Drives the chunker, router, ASR fan-out, fusion, script converter, and
//! quote engine into a batch or live transcription run.

pub mod batch;
pub mod live;
pub mod metrics;
pub mod pipeline;
pub mod types;

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::asr::AsrEngine;
use crate::config::PipelineConfig;
use crate::denoise::DenoiseFilter;
use crate::fusion::Fusion;
use crate::router::Router;
use crate::script::ScriptConverter;
use crate::scripture::ScriptureIndex;

pub use types::{LiveCallbacks, SessionHandle, TranscribeOptions};

/// The process-wide, long-lived orchestrator. Owns (or is handed) the
/// three registered ASR engines, the scripture index, and every
/// configured stage; constructed once and shared, never a global
/// singleton.
pub struct Orchestrator {
    pub(crate) config: PipelineConfig,
    pub(crate) router: Router,
    pub(crate) converter: ScriptConverter,
    pub(crate) fusion: Fusion,
    pub(crate) engine_a: Arc<dyn AsrEngine>,
    pub(crate) engine_b: Option<Arc<dyn AsrEngine>>,
    pub(crate) engine_c: Option<Arc<dyn AsrEngine>>,
    pub(crate) scripture_index: Option<ScriptureIndex>,
    pub(crate) denoise_filter: Box<dyn DenoiseFilter>,
    /// Bounds concurrent ASR engine invocations (`asr_parallel_workers`):
    /// engines A, B, C of one chunk run concurrently via `tokio::join!`,
    /// and the same semaphore bounds how many of those calls — across
    /// chunks too, when chunks are themselves pipelined — run at once.
    pub(crate) asr_semaphore: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        engine_a: Arc<dyn AsrEngine>,
        engine_b: Option<Arc<dyn AsrEngine>>,
        engine_c: Option<Arc<dyn AsrEngine>>,
        scripture_index: Option<ScriptureIndex>,
    ) -> Self {
        let denoise_filter = crate::denoise::build_filter(&config.denoise);
        let asr_semaphore = Arc::new(Semaphore::new(config.concurrency.asr_parallel_workers.max(1)));
        Self {
            router: Router::new(config.thresholds),
            converter: ScriptConverter::new(config.thresholds, config.romanization_scheme),
            fusion: Fusion::new(config.thresholds),
            engine_a,
            engine_b,
            engine_c,
            scripture_index,
            denoise_filter,
            asr_semaphore,
            config,
        }
    }
}
