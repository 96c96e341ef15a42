//! Crate-wide error taxonomy.
//!
//! Each component keeps its own narrow error enum (see `audio::AudioError`,
//! `asr::AsrError`, `scripture::ScriptureError`, `script::ConvertError`,
//! `quote::QuoteError`) and converts into `PipelineError` at the
//! orchestrator boundary. Per-chunk failures are captured into the segment
//! (`needs_review`, `errors`) and never surface through this type; only
//! job- or process-fatal conditions do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not decode audio: {message}")]
    AudioDecode { message: String },

    #[error("scripture index unavailable: {message}")]
    ScriptureUnavailable { message: String },

    #[error("ASR engine '{engine_id}' failed: {message}")]
    AsrEngine { engine_id: String, message: String },

    #[error("fusion failed for chunk {chunk_index}: {message}")]
    Fusion { chunk_index: u64, message: String },

    #[error("script conversion failed: {message}")]
    ScriptConversion { message: String },

    #[error("quote matching failed: {message}")]
    QuoteMatch { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl From<crate::audio::AudioError> for PipelineError {
    fn from(e: crate::audio::AudioError) -> Self {
        PipelineError::AudioDecode {
            message: e.to_string(),
        }
    }
}

impl From<crate::scripture::ScriptureError> for PipelineError {
    fn from(e: crate::scripture::ScriptureError) -> Self {
        PipelineError::ScriptureUnavailable {
            message: e.to_string(),
        }
    }
}

impl From<crate::asr::AsrError> for PipelineError {
    fn from(e: crate::asr::AsrError) -> Self {
        PipelineError::AsrEngine {
            engine_id: "unknown".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<crate::script::ConvertError> for PipelineError {
    fn from(e: crate::script::ConvertError) -> Self {
        PipelineError::ScriptConversion {
            message: e.to_string(),
        }
    }
}

impl From<crate::quote::QuoteError> for PipelineError {
    fn from(e: crate::quote::QuoteError) -> Self {
        PipelineError::QuoteMatch {
            message: e.to_string(),
        }
    }
}
