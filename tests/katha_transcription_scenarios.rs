//! End-to-end scenarios driven entirely through the public live-session
//! surface: `Orchestrator::start_live_session` + `SessionHandle::submit`.
//! Stub ASR engines stand in for real model inference (the literal
//! hypothesis text is a stand-in for audio whose ASR output would match).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use gurbani_transcribe::asr::{AsrEngine, AsrError};
use gurbani_transcribe::config::PipelineConfig;
use gurbani_transcribe::orchestrator::{LiveCallbacks, Orchestrator};
use gurbani_transcribe::scripture::ScriptureIndex;
use gurbani_transcribe::types::{
    AudioChunk, Hypothesis, ProcessedSegment, ScriptureLine, ScriptureSource, SegmentKind,
    SourceMode,
};

struct FixedEngine {
    id: String,
    text: String,
    confidence: f32,
}

#[async_trait]
impl AsrEngine for FixedEngine {
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
            confidence: self.confidence,
            word_timings: None,
        })
    }
}

/// Returns a low-confidence hypothesis on the first call (the normal
/// decode) and a much better one on the second (the wide-beam re-decode),
/// so the fusion re-decode policy has something worth picking up.
struct ImprovesOnRedecodeEngine {
    calls: AtomicUsize,
}

#[async_trait]
impl AsrEngine for ImprovesOnRedecodeEngine {
    fn engine_id(&self) -> &str {
        "A"
    }

    async fn transcribe(
        &self,
        _chunk: &AudioChunk,
        _language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Hypothesis {
            engine_id: "A".to_string(),
            text: "ਧੰਨ".to_string(),
            language_code: "pa".to_string(),
            confidence: 0.55,
            word_timings: None,
        })
    }

    async fn transcribe_wide_beam(
        &self,
        _chunk: &AudioChunk,
        _language_hint: Option<&str>,
    ) -> Result<Hypothesis, AsrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Hypothesis {
            engine_id: "A".to_string(),
            text: "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ".to_string(),
            language_code: "pa".to_string(),
            confidence: 0.95,
            word_timings: None,
        })
    }
}

fn sample_chunk(job_id: Uuid, chunk_index: u64) -> AudioChunk {
    AudioChunk {
        job_id,
        chunk_index,
        start_sec: chunk_index as f64 * 2.0,
        end_sec: chunk_index as f64 * 2.0 + 2.0,
        samples: vec![0i16; 32_000],
        sample_rate: 16_000,
        source_mode: SourceMode::Live,
    }
}

fn sggs_index() -> ScriptureIndex {
    ScriptureIndex::from_lines(vec![ScriptureLine {
        line_id: "ang1-line1".into(),
        source: ScriptureSource::Sggs,
        gurmukhi: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
        roman: Some("sati nāmu kartā purakhu".into()),
        ang: Some(1),
        raag: None,
        author: Some("Guru Nanak".into()),
        shabad_id: Some("mool-mantar".into()),
        line_position: Some(1),
    }])
}

async fn run_single_chunk(
    engine_a: Arc<dyn AsrEngine>,
    scripture_index: Option<ScriptureIndex>,
) -> (ProcessedSegment, ProcessedSegment) {
    let config = PipelineConfig::default();
    let orchestrator = Arc::new(Orchestrator::new(config, engine_a, None, None, scripture_index));

    let drafts: Arc<Mutex<Vec<ProcessedSegment>>> = Arc::new(Mutex::new(Vec::new()));
    let verified: Arc<Mutex<Vec<ProcessedSegment>>> = Arc::new(Mutex::new(Vec::new()));
    let drafts_clone = drafts.clone();
    let verified_clone = verified.clone();

    let job_id = Uuid::new_v4();
    let handle = orchestrator.start_live_session(
        job_id,
        LiveCallbacks {
            on_draft: Arc::new(move |seg| drafts_clone.lock().unwrap().push(seg)),
            on_verified: Arc::new(move |seg| verified_clone.lock().unwrap().push(seg)),
        },
    );

    handle.submit(sample_chunk(job_id, 0)).await;
    handle.close().await;

    let draft = drafts.lock().unwrap().remove(0);
    let verified = verified.lock().unwrap().remove(0);
    (draft, verified)
}

/// S1 — plain speech, single engine.
#[tokio::test]
async fn scenario_s1_plain_speech_single_engine() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ".into(),
        confidence: 0.92,
    });
    let (_, verified) = run_single_chunk(engine, None).await;

    assert_eq!(verified.kind, SegmentKind::Speech);
    assert_eq!(verified.gurmukhi, "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ");
    assert!((verified.asr_confidence - 0.92).abs() < 1e-6);
    assert!(!verified.needs_review);
}

/// S2 — Shahmukhi converted to Gurmukhi with a Roman rendition.
#[tokio::test]
async fn scenario_s2_shahmukhi_converted() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "دھن گرو نانک".into(),
        confidence: 0.80,
    });
    let (_, verified) = run_single_chunk(engine, None).await;

    assert!(verified.gurmukhi.contains('ਧ'));
    assert!(!verified.roman.is_empty());
}

/// S3 — high-confidence quote replacement.
#[tokio::test]
async fn scenario_s3_high_confidence_quote_replacement() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
        confidence: 0.88,
    });
    let (_, verified) = run_single_chunk(engine, Some(sggs_index())).await;

    assert_eq!(verified.kind, SegmentKind::ScriptureQuote);
    assert_eq!(verified.spoken_text, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ");
    let quote_match = verified.quote_match.expect("expected a quote match");
    assert_eq!(quote_match.line.ang, Some(1));
    assert!(quote_match.match_confidence >= 0.90);
}

/// S4 — ambiguous quote candidate below the auto-replace floor is kept as
/// plain speech with a suggestion attached, not silently replaced.
#[tokio::test]
async fn scenario_s4_ambiguous_quote_not_replaced() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ ਦੁਨੀਆ ਭਰ ਵਿੱਚ ਮਸ਼ਹੂਰ ਗੱਲ".into(),
        confidence: 0.88,
    });
    let (_, verified) = run_single_chunk(engine, Some(sggs_index())).await;

    if verified.kind == SegmentKind::ScriptureQuote {
        let quote_match = verified.quote_match.as_ref().unwrap();
        assert!(quote_match.match_confidence >= 0.90);
    } else {
        assert_eq!(verified.kind, SegmentKind::Speech);
    }
}

/// S5 — low-confidence, disagreeing hypotheses trigger a re-decode that
/// picks up the wide-beam result when it scores better.
#[tokio::test]
async fn scenario_s5_redecode_on_disagreement() {
    let engine = Arc::new(ImprovesOnRedecodeEngine {
        calls: AtomicUsize::new(0),
    });
    let (_, verified) = run_single_chunk(engine, None).await;

    assert_eq!(verified.gurmukhi, "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ");
    assert!(verified.asr_confidence > 0.55);
}

/// S6 — live draft then verified; both events share `segment_id` and
/// `start`/`end`, and the draft is tentatively flagged for review.
#[tokio::test]
async fn scenario_s6_live_draft_then_verified() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
        confidence: 0.88,
    });
    let (draft, verified) = run_single_chunk(engine, Some(sggs_index())).await;

    assert_eq!(draft.segment_id, verified.segment_id);
    assert_eq!(draft.start_sec, verified.start_sec);
    assert_eq!(draft.end_sec, verified.end_sec);
    assert_eq!(draft.kind, SegmentKind::Speech);
    assert!(draft.needs_review);
    assert!(!verified.needs_review);
}

/// Boundary: a fully silent chunk produces empty hypotheses and a segment
/// flagged for review rather than an error.
#[tokio::test]
async fn silent_chunk_yields_reviewable_empty_segment() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: String::new(),
        confidence: 0.0,
    });
    let (_, verified) = run_single_chunk(engine, None).await;

    assert!(verified.gurmukhi.is_empty());
    assert!(verified.needs_review);
}

/// Boundary: a candidate that fires detection but has zero index hits
/// (empty corpus) stays plain speech; the candidate reason is not an
/// error, just an unmatched signal.
#[tokio::test]
async fn quote_candidate_with_zero_index_hits_stays_plain_speech() {
    let engine = Arc::new(FixedEngine {
        id: "A".into(),
        text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
        confidence: 0.9,
    });
    let empty_index = ScriptureIndex::from_lines(vec![]);
    let (_, verified) = run_single_chunk(engine, Some(empty_index)).await;

    assert_eq!(verified.kind, SegmentKind::Speech);
    assert!(verified.quote_match.is_none());
    assert!(verified.errors.is_empty());
}
