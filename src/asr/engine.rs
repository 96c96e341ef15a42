//! Uniform ASR engine interface. Three concrete engines are registered
//! behind this trait at orchestrator construction: a general-purpose
//! multilingual model (A), an Indic-tuned model (B), and an English-tuned
//! model (C). The orchestrator wraps every call with a per-chunk timeout;
//! a timeout or an `Err` both degrade to an empty [`Hypothesis`], never a
//! job-fatal error.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AudioChunk, Hypothesis};

#[derive(Debug, Error)]
pub enum AsrError {
    #[error("model not loaded: {message}")]
    ModelNotLoaded { message: String },

    #[error("transcription failed: {message}")]
    TranscriptionFailed { message: String },

    #[error("unsupported language hint: {language}")]
    UnsupportedLanguage { language: String },
}

#[async_trait]
pub trait AsrEngine: Send + Sync {
    /// Stable identifier used as `Hypothesis::engine_id` and for fusion
    /// tie-break priority (A > B > C by default).
    fn engine_id(&self) -> &str;

    async fn transcribe(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError>;

    /// Re-decode with a wider beam, used by the fusion re-decode policy.
    /// Default implementation just calls `transcribe` again; engines that
    /// support tunable beam width override this.
    async fn transcribe_wide_beam(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.transcribe(chunk, language_hint).await
    }
}
