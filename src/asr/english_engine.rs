//! Engine C (English-tuned): used when the route is english or mixed.
//! Same shape as [`crate::asr::indic_engine::IndicEngine`], biased toward
//! English instead of Punjabi.

use async_trait::async_trait;

use crate::asr::engine::{AsrEngine, AsrError};
use crate::asr::whisper_engine::WhisperEngine;
use crate::types::{AudioChunk, Hypothesis};

pub struct EnglishEngine {
    inner: WhisperEngine,
}

impl EnglishEngine {
    pub fn new(inner: WhisperEngine) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AsrEngine for EnglishEngine {
    fn engine_id(&self) -> &str {
        self.inner.engine_id()
    }

    async fn transcribe(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.inner
            .transcribe(chunk, language_hint.or(Some("en")))
            .await
    }

    async fn transcribe_wide_beam(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.inner
            .transcribe_wide_beam(chunk, language_hint.or(Some("en")))
            .await
    }
}
