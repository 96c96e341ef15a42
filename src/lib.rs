//! Accuracy-first transcription pipeline for spoken Sikh katha and kirtan:
//! voice-activity chunking, multi-engine ASR with hypothesis fusion,
//! Shahmukhi/Gurmukhi/Roman script conversion, and canonical scripture
//! quote detection and replacement against an immutable SGGS/Dasam Granth
//! corpus. Supports both batch (file) and live (streaming) runs.

pub mod asr;
pub mod audio;
pub mod config;
pub mod denoise;
pub mod error;
pub mod fusion;
pub mod orchestrator;
pub mod quote;
pub mod router;
pub mod script;
pub mod scripture;
pub mod types;

pub use error::PipelineError;
pub use orchestrator::Orchestrator;

/// Installs a global `tracing` subscriber, level-filtered by `LOG_LEVEL`
/// (any `tracing_subscriber::EnvFilter` directive, e.g. `debug` or
/// `gurbani_transcribe=trace,warn`). Defaults to `info` when unset or
/// unparseable. Call once at process startup; a second call is a no-op.
pub fn init_tracing() {
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| tracing_subscriber::EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
