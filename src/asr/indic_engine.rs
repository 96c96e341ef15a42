//! Engine B (Indic-tuned): used when the route is punjabi,
//! scripture_quote_likely, or mixed. Wraps the same whisper.cpp backend
//! as engine A but against a Punjabi/Gurmukhi-biased model, and always
//! supplies a Punjabi language hint unless the caller overrides it.

use async_trait::async_trait;

use crate::asr::engine::{AsrEngine, AsrError};
use crate::asr::whisper_engine::WhisperEngine;
use crate::types::{AudioChunk, Hypothesis};

pub struct IndicEngine {
    inner: WhisperEngine,
}

impl IndicEngine {
    pub fn new(inner: WhisperEngine) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AsrEngine for IndicEngine {
    fn engine_id(&self) -> &str {
        self.inner.engine_id()
    }

    async fn transcribe(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.inner
            .transcribe(chunk, language_hint.or(Some("pa")))
            .await
    }

    async fn transcribe_wide_beam(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.inner
            .transcribe_wide_beam(chunk, language_hint.or(Some("pa")))
            .await
    }
}
