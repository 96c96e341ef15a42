//! The per-chunk pipeline shared by batch and live runs: route → ASR
//! fan-out → fusion (with re-decode policy) → script conversion → quote
//! engine. Batch and live differ only in how they drive this and what
//! they do with the resulting segment.

use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::asr::AsrEngine;
use crate::orchestrator::metrics::StageTimer;
use crate::orchestrator::Orchestrator;
use crate::quote::QuoteEngine;
use crate::router::{LanguageHint, RouterInput};
use crate::types::{
    AudioChunk, ConvertedText, Hypothesis, ProcessedSegment, ScriptKind, SegmentKind,
    TranscriptMetrics,
};

/// A draft segment plus the confidence-derived review signal that the
/// quote engine will use to resolve `needs_review` once it has run. The
/// draft itself always carries `needs_review = true` per the live-session
/// contract (§4.8): the verified event is what may confirm or clear it.
pub(crate) struct Draft {
    pub(crate) segment: ProcessedSegment,
    confidence_needs_review: bool,
}

impl Orchestrator {
    fn per_chunk_timeout(&self, chunk: &AudioChunk) -> Duration {
        let secs = chunk.duration_sec() * self.config.concurrency.per_chunk_timeout_realtime_multiple;
        Duration::from_secs_f64(secs.max(1.0))
    }

    async fn run_engine(
        &self,
        engine: &dyn AsrEngine,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
        wide_beam: bool,
    ) -> Hypothesis {
        let _permit = self
            .asr_semaphore
            .acquire()
            .await
            .expect("asr_semaphore is never closed");
        let timeout = self.per_chunk_timeout(chunk);
        let call = if wide_beam {
            engine.transcribe_wide_beam(chunk, language_hint)
        } else {
            engine.transcribe(chunk, language_hint)
        };
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(hypothesis)) => hypothesis,
            Ok(Err(e)) => {
                warn!(engine_id = engine.engine_id(), error = %e, "ASR engine failed");
                Hypothesis::empty(engine.engine_id(), e.to_string())
            }
            Err(_) => {
                warn!(engine_id = engine.engine_id(), "ASR engine timed out");
                Hypothesis::empty(engine.engine_id(), "timed out")
            }
        }
    }

    /// Produces the draft segment: routed, fused (with re-decode applied),
    /// converted, but *before* the quote engine has run. `kind` is always
    /// `Speech`; `needs_review` is forced `true` tentatively per the
    /// live-session contract, carrying the real confidence-derived signal
    /// alongside for `apply_quote_engine` to resolve. `text_hint` is the
    /// prior chunk's fused text, the only text available before this
    /// chunk's own ASR has run, used for the scripture cue-phrase rule.
    pub(crate) async fn process_to_draft(
        &self,
        chunk: &AudioChunk,
        prior_language: Option<&str>,
        text_hint: Option<&str>,
        metrics: &mut TranscriptMetrics,
    ) -> Draft {
        let route_timer = StageTimer::start();
        let route = self.router.route(&RouterInput {
            chunk_duration_sec: chunk.duration_sec(),
            text_hint,
            language_hint: prior_language.map(|lang| LanguageHint {
                language: lang.to_string(),
                confidence: self.config.thresholds.langid_floor,
                second_best: None,
            }),
            prior_language,
        });
        route_timer.record(metrics, "route");

        let asr_timer = StageTimer::start();
        let want_b = self.engine_b.is_some() && route_wants_indic(route.kind);
        let want_c = self.engine_c.is_some() && route_wants_english(route.kind);

        let engine_a_fut = self.run_engine(self.engine_a.as_ref(), chunk, prior_language, false);
        let engine_b_fut = async {
            if want_b {
                let engine_b = self.engine_b.as_ref().expect("checked by want_b");
                Some(self.run_engine(engine_b.as_ref(), chunk, prior_language, false).await)
            } else {
                None
            }
        };
        let engine_c_fut = async {
            if want_c {
                let engine_c = self.engine_c.as_ref().expect("checked by want_c");
                Some(self.run_engine(engine_c.as_ref(), chunk, prior_language, false).await)
            } else {
                None
            }
        };
        let (hyp_a, hyp_b, hyp_c) = tokio::join!(engine_a_fut, engine_b_fut, engine_c_fut);
        let mut hypotheses = vec![hyp_a];
        if let Some(h) = hyp_b {
            hypotheses.push(h);
        }
        if let Some(h) = hyp_c {
            hypotheses.push(h);
        }
        asr_timer.record(metrics, "asr");

        if hypotheses.is_empty() {
            return Draft {
                segment: empty_segment(chunk, route, Vec::new(), "zero hypotheses produced"),
                confidence_needs_review: true,
            };
        }

        let fusion_timer = StageTimer::start();
        let mut fusion_result = self.fusion.fuse(&hypotheses, route.kind);
        if fusion_result.needs_redecode {
            let redecoded = self
                .run_engine(self.engine_a.as_ref(), chunk, prior_language, true)
                .await;
            let mut redecoded_set = hypotheses.clone();
            redecoded_set[0] = redecoded;
            let redecoded_fusion = self.fusion.fuse(&redecoded_set, route.kind);
            if redecoded_fusion.fused_confidence > fusion_result.fused_confidence {
                hypotheses = redecoded_set;
                fusion_result = redecoded_fusion;
                metrics.redecodes_triggered += 1;
            }
        }
        fusion_timer.record(metrics, "fusion");

        let convert_timer = StageTimer::start();
        let converted = match self.converter.convert(&fusion_result.fused_text) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "script conversion failed; passing text through");
                ConvertedText {
                    original_text: fusion_result.fused_text.clone(),
                    original_script: ScriptKind::Empty,
                    gurmukhi: fusion_result.fused_text.clone(),
                    roman: fusion_result.fused_text.clone(),
                    conversion_confidence: 0.0,
                    needs_review: true,
                }
            }
        };
        convert_timer.record(metrics, "convert");

        let confidence_needs_review = fusion_result.needs_redecode
            || self.fusion.needs_review(&fusion_result)
            || converted.needs_review
            || hypotheses.iter().all(|h| h.is_empty());

        let segment = ProcessedSegment {
            segment_id: Uuid::new_v4(),
            chunk_index: chunk.chunk_index,
            start_sec: chunk.start_sec,
            end_sec: chunk.end_sec,
            kind: SegmentKind::Speech,
            spoken_text: fusion_result.fused_text.clone(),
            gurmukhi: converted.gurmukhi,
            roman: converted.roman,
            language: hypotheses[0].language_code.clone(),
            route,
            asr_confidence: fusion_result.fused_confidence,
            script_confidence: converted.conversion_confidence,
            quote_match: None,
            needs_review: true,
            per_engine_hypotheses: fusion_result.per_engine_hypotheses,
            errors: Vec::new(),
        };

        Draft {
            segment,
            confidence_needs_review,
        }
    }

    /// Runs the quote engine over a draft segment and applies the
    /// canonical-replacement decision table, returning the verified
    /// segment. Resolves `needs_review` from the draft's confidence-based
    /// signal first, then lets the quote engine's own outcome override it.
    /// Never fails the job: a matcher fault demotes the segment to plain
    /// speech with `needs_review = true` and is recorded in `errors`.
    pub(crate) fn apply_quote_engine(&self, draft: Draft, metrics: &mut TranscriptMetrics) -> ProcessedSegment {
        let mut segment = draft.segment;
        segment.needs_review = draft.confidence_needs_review;

        let variant_texts: Vec<String> = segment
            .per_engine_hypotheses
            .iter()
            .filter(|h| !h.is_empty())
            .filter_map(|h| match self.converter.convert(&h.text) {
                Ok(c) => Some(c.gurmukhi),
                Err(e) => {
                    warn!(error = %e, "script conversion of a per-engine hypothesis failed; skipping variant");
                    None
                }
            })
            .collect();

        let timer = StageTimer::start();
        let engine = QuoteEngine::new(self.scripture_index.as_ref(), &self.config);
        let outcome = engine.process(segment.route.kind, &segment.gurmukhi, &variant_texts);
        timer.record(metrics, "quote");

        if let Some(fault) = outcome.fault {
            segment.errors.push(fault);
            segment.needs_review = true;
            return segment;
        }

        if let Some(quote_match) = outcome.quote_match {
            metrics.quotes_detected += 1;
            segment.quote_match = Some(quote_match);
        }

        if let (Some(gurmukhi), Some(roman)) = (outcome.replaced_gurmukhi, outcome.replaced_roman) {
            segment.gurmukhi = gurmukhi;
            segment.roman = roman;
            segment.kind = SegmentKind::ScriptureQuote;
            segment.needs_review = false;
            metrics.quotes_replaced += 1;
        } else if outcome.needs_review {
            segment.needs_review = true;
        }

        segment
    }
}

fn route_wants_indic(kind: crate::types::RouteKind) -> bool {
    use crate::types::RouteKind::*;
    matches!(kind, Punjabi | ScriptureQuoteLikely | Mixed)
}

fn route_wants_english(kind: crate::types::RouteKind) -> bool {
    use crate::types::RouteKind::*;
    matches!(kind, English | Mixed)
}

fn empty_segment(
    chunk: &AudioChunk,
    route: crate::types::Route,
    hypotheses: Vec<Hypothesis>,
    reason: &str,
) -> ProcessedSegment {
    ProcessedSegment {
        segment_id: Uuid::new_v4(),
        chunk_index: chunk.chunk_index,
        start_sec: chunk.start_sec,
        end_sec: chunk.end_sec,
        kind: SegmentKind::Speech,
        spoken_text: String::new(),
        gurmukhi: String::new(),
        roman: String::new(),
        language: String::new(),
        route,
        asr_confidence: 0.0,
        script_confidence: 0.0,
        quote_match: None,
        needs_review: true,
        per_engine_hypotheses: hypotheses,
        errors: vec![reason.to_string()],
    }
}
