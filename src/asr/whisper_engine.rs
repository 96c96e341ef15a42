//! Engine A (general): a large multilingual Whisper model, always run.
//!
//! Model loading and the inner whisper.cpp call are wrapped behind
//! `whisper-rs`; the exact model architecture and loading strategy are
//! explicitly out of scope for this crate; what is in scope is the
//! uniform [`AsrEngine`] contract, deterministic behavior given the same
//! chunk and model state, and the beam-width knob the fusion re-decode
//! policy needs.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::asr::engine::{AsrEngine, AsrError};
use crate::asr::types::ModelTier;
use crate::types::{AudioChunk, Hypothesis};

pub struct WhisperEngineConfig {
    pub model_path: PathBuf,
    pub tier: ModelTier,
    pub beam_size: i32,
}

pub struct WhisperEngine {
    engine_id: String,
    context: Mutex<WhisperContext>,
    beam_size: i32,
}

impl WhisperEngine {
    pub fn new(engine_id: impl Into<String>, config: WhisperEngineConfig) -> Result<Self, AsrError> {
        let ctx = WhisperContext::new_with_params(
            config.model_path.to_string_lossy().as_ref(),
            WhisperContextParameters::default(),
        )
        .map_err(|e| AsrError::ModelNotLoaded {
            message: format!("failed to load whisper model: {e}"),
        })?;

        Ok(Self {
            engine_id: engine_id.into(),
            context: Mutex::new(ctx),
            beam_size: config.beam_size,
        })
    }

    fn run_inference(
        &self,
        samples: &[f32],
        language_hint: Option<&str>,
        beam_size: i32,
    ) -> Result<(String, f32), AsrError> {
        let ctx = self
            .context
            .lock()
            .map_err(|_| AsrError::TranscriptionFailed {
                message: "whisper context lock poisoned".to_string(),
            })?;
        let mut state = ctx.create_state().map_err(|e| AsrError::TranscriptionFailed {
            message: format!("could not create whisper state: {e}"),
        })?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size,
            patience: -1.0,
        });
        if let Some(lang) = language_hint {
            params.set_language(Some(lang));
        }
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);

        state
            .full(params, samples)
            .map_err(|e| AsrError::TranscriptionFailed {
                message: format!("whisper inference failed: {e}"),
            })?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| AsrError::TranscriptionFailed {
                message: e.to_string(),
            })?;
        let mut text = String::new();
        let mut confidences = Vec::new();
        for i in 0..num_segments {
            if let Ok(seg_text) = state.full_get_segment_text(i) {
                text.push_str(&seg_text);
            }
            if let Ok(prob) = state.full_get_segment_no_speech_prob(i) {
                confidences.push(1.0 - prob);
            }
        }
        let confidence = if confidences.is_empty() {
            0.5
        } else {
            confidences.iter().sum::<f32>() / confidences.len() as f32
        };
        Ok((text.trim().to_string(), confidence))
    }

    fn samples_f32(chunk: &AudioChunk) -> Vec<f32> {
        chunk
            .samples
            .iter()
            .map(|&s| s as f32 / i16::MAX as f32)
            .collect()
    }
}

#[async_trait]
impl AsrEngine for WhisperEngine {
    fn engine_id(&self) -> &str {
        &self.engine_id
    }

    async fn transcribe(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        let samples = Self::samples_f32(chunk);
        let (text, confidence) = self.run_inference(&samples, language_hint, self.beam_size)?;
        Ok(Hypothesis {
            engine_id: self.engine_id.clone(),
            text,
            language_code: language_hint.unwrap_or("auto").to_string(),
            confidence,
            word_timings: None,
        })
    }

    async fn transcribe_wide_beam(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        let samples = Self::samples_f32(chunk);
        let wide_beam = self.beam_size.max(1) * 2;
        let (text, confidence) = self.run_inference(&samples, language_hint, wide_beam)?;
        Ok(Hypothesis {
            engine_id: self.engine_id.clone(),
            text,
            language_code: language_hint.unwrap_or("auto").to_string(),
            confidence,
            word_timings: None,
        })
    }
}
