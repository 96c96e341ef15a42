//! Batch (file) transcription run.

use std::path::Path;
use std::sync::Mutex;

use futures::stream::{self, StreamExt};
use uuid::Uuid;

use crate::audio::vad::EnergyVad;
use crate::audio::{chunker::Chunker, decode, resample};
use crate::error::PipelineError;
use crate::orchestrator::metrics::merge_into;
use crate::orchestrator::types::TranscribeOptions;
use crate::orchestrator::Orchestrator;
use crate::types::{ProcessedSegment, SourceMetadata, TranscriptMetrics, TranscriptResult};

/// Best-effort hints threaded from one chunk's finished segment to the
/// next: the fused language (for routing fallback) and the spoken text
/// (for the scripture cue-phrase rule). Under `chunk_parallel_workers` >
/// 1 a chunk may start before its immediate predecessor finishes, so
/// these are approximate, not a strict hand-off — matching the router's
/// own signals, which are documented as best-effort.
#[derive(Default, Clone)]
struct PriorState {
    language: Option<String>,
    text: Option<String>,
}

impl Orchestrator {
    /// Decodes, optionally denoises, chunks, and runs every chunk through
    /// the pipeline in `chunk_index` order, returning the full transcript.
    /// Fatal conditions (undecodable audio) abort the whole job.
    pub async fn transcribe_file(
        &self,
        audio_path: &Path,
        options: TranscribeOptions,
    ) -> Result<TranscriptResult, PipelineError> {
        let job_id = options.job_id.unwrap_or_else(Uuid::new_v4);

        let mut pcm = decode::decode_file(audio_path)?;
        let source_sample_rate = pcm.sample_rate;
        if pcm.sample_rate != self.config.chunker.sample_rate {
            pcm = resample::resample(&pcm, self.config.chunker.sample_rate);
        }
        self.denoise_filter
            .apply(&mut pcm)
            .map_err(|e| PipelineError::AudioDecode {
                message: format!("denoise stage failed: {e}"),
            })?;

        let duration_sec = pcm.duration_sec();
        let vad = EnergyVad::new(self.config.chunker.vad_aggressiveness)
            .map_err(|e| PipelineError::Config {
                message: e.to_string(),
            })?;
        let chunker = Chunker::new(self.config.chunker);
        let chunks = chunker.chunk(job_id, &pcm, &vad);

        let mut metrics = TranscriptMetrics::default();
        let prior = Mutex::new(PriorState::default());
        let worker_count = self.config.concurrency.chunk_parallel_workers.max(1);

        // Chunks are pipelined up to `chunk_parallel_workers` concurrently,
        // but `buffered` yields results strictly in source order, so final
        // segment ordering still follows `chunk_index` without a separate
        // reassembly buffer.
        let results: Vec<(ProcessedSegment, TranscriptMetrics)> = stream::iter(chunks.iter())
            .map(|chunk| {
                let prior = &prior;
                async move {
                    let PriorState { language, text } = prior.lock().unwrap().clone();
                    let mut chunk_metrics = TranscriptMetrics::default();
                    let draft = self
                        .process_to_draft(chunk, language.as_deref(), text.as_deref(), &mut chunk_metrics)
                        .await;
                    let segment = self.apply_quote_engine(draft, &mut chunk_metrics);

                    let mut guard = prior.lock().unwrap();
                    if !segment.language.is_empty() {
                        guard.language = Some(segment.language.clone());
                    }
                    if !segment.spoken_text.is_empty() {
                        guard.text = Some(segment.spoken_text.clone());
                    }
                    drop(guard);

                    (segment, chunk_metrics)
                }
            })
            .buffered(worker_count)
            .collect()
            .await;

        let mut segments = Vec::with_capacity(results.len());
        for (segment, chunk_metrics) in results {
            merge_into(&mut metrics, chunk_metrics);
            segments.push(segment);
        }
        metrics.chunk_count = chunks.len() as u64;

        Ok(TranscriptResult {
            job_id,
            segments,
            metrics,
            source_metadata: SourceMetadata {
                original_path: Some(audio_path.to_string_lossy().to_string()),
                sample_rate: Some(source_sample_rate),
                duration_sec: Some(duration_sec),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::engine::{AsrEngine, AsrError};
    use crate::config::PipelineConfig;
    use crate::fusion::Fusion;
    use crate::router::Router;
    use crate::script::ScriptConverter;
    use crate::types::{AudioChunk, Hypothesis};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubEngine {
        id: String,
        text: String,
    }

    #[async_trait]
    impl AsrEngine for StubEngine {
        fn engine_id(&self) -> &str {
            &self.id
        }

        async fn transcribe(
            &self,
            _chunk: &AudioChunk,
            _language_hint: Option<&str>,
        ) -> Result<Hypothesis, AsrError> {
            Ok(Hypothesis {
                engine_id: self.id.clone(),
                text: self.text.clone(),
                language_code: "pa".to_string(),
                confidence: 0.9,
                word_timings: None,
            })
        }
    }

    fn orchestrator() -> Orchestrator {
        let config = PipelineConfig::default();
        Orchestrator {
            router: Router::new(config.thresholds),
            converter: ScriptConverter::new(config.thresholds, config.romanization_scheme),
            fusion: Fusion::new(config.thresholds),
            engine_a: Arc::new(StubEngine {
                id: "A".into(),
                text: "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ".into(),
            }),
            engine_b: None,
            engine_c: None,
            scripture_index: None,
            denoise_filter: crate::denoise::build_filter(&config.denoise),
            asr_semaphore: Arc::new(tokio::sync::Semaphore::new(config.concurrency.asr_parallel_workers.max(1))),
            config,
        }
    }

    #[tokio::test]
    async fn draft_pipeline_produces_plain_speech_segment() {
        let orchestrator = orchestrator();
        let chunk = AudioChunk {
            job_id: Uuid::new_v4(),
            chunk_index: 0,
            start_sec: 0.0,
            end_sec: 2.0,
            samples: vec![0i16; 32_000],
            sample_rate: 16_000,
            source_mode: crate::types::SourceMode::Batch,
        };
        let mut metrics = TranscriptMetrics::default();
        let draft = orchestrator.process_to_draft(&chunk, None, None, &mut metrics).await;
        assert_eq!(draft.segment.gurmukhi, "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ");
        assert!(draft.segment.needs_review);

        let segment = orchestrator.apply_quote_engine(draft, &mut metrics);
        assert_eq!(segment.kind, crate::types::SegmentKind::Speech);
        assert!(!segment.needs_review);
    }
}
