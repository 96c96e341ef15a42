//! Shared data model for the transcription pipeline.
//!
//! These types flow between stages (chunker → router → ASR → fusion →
//! script converter → quote engine → orchestrator). Every type here is
//! immutable once constructed: a later stage produces a new value rather
//! than mutating one handed to it by an earlier stage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the job's audio is being fed into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMode {
    Batch,
    Live,
}

/// A bounded window of PCM audio belonging to a job.
///
/// Created by the chunker, consumed by the router and ASR engines.
/// Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    pub job_id: Uuid,
    pub chunk_index: u64,
    pub start_sec: f64,
    pub end_sec: f64,
    /// Mono 16 kHz PCM16 samples by convention.
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub source_mode: SourceMode,
}

impl AudioChunk {
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// Which language/domain a chunk has been labeled as, for ASR fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    Punjabi,
    English,
    ScriptureQuoteLikely,
    Mixed,
    Unknown,
}

/// A tagged routing decision attached to a chunk, with the rule that fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub kind: RouteKind,
    pub reason: String,
}

/// One ASR engine's output for one chunk. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub engine_id: String,
    pub text: String,
    pub language_code: String,
    pub confidence: f32,
    pub word_timings: Option<Vec<WordTiming>>,
}

impl Hypothesis {
    /// An empty hypothesis contributed when an engine errors or times out.
    pub fn empty(engine_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            text: String::new(),
            language_code: String::new(),
            confidence: 0.0,
            word_timings: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start_sec: f32,
    pub end_sec: f32,
    pub confidence: Option<f32>,
}

/// Result of combining 1-3 hypotheses for one chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionResult {
    pub fused_text: String,
    pub fused_confidence: f32,
    /// Retained verbatim for audit, never discarded even when fused.
    pub per_engine_hypotheses: Vec<Hypothesis>,
    pub agreement_score: f32,
    pub needs_redecode: bool,
}

/// Dominant script detected in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptKind {
    Gurmukhi,
    Shahmukhi,
    Devanagari,
    Latin,
    Mixed,
    Empty,
}

/// Output of the script converter for a single piece of text. Immutable
/// once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedText {
    pub original_text: String,
    pub original_script: ScriptKind,
    pub gurmukhi: String,
    pub roman: String,
    pub conversion_confidence: f32,
    pub needs_review: bool,
}

/// Canonical entry from the scripture index. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureLine {
    pub line_id: String,
    pub source: ScriptureSource,
    pub gurmukhi: String,
    pub roman: Option<String>,
    pub ang: Option<u32>,
    pub raag: Option<String>,
    pub author: Option<String>,
    pub shabad_id: Option<String>,
    pub line_position: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptureSource {
    Sggs,
    DasamGranth,
    Other(String),
}

impl ScriptureSource {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "sggs" => ScriptureSource::Sggs,
            "dasam_granth" | "dasam" | "dasamgranth" => ScriptureSource::DasamGranth,
            other => ScriptureSource::Other(other.to_string()),
        }
    }
}

/// A chunk flagged as possibly containing a scripture quotation. Transient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteCandidate {
    pub text: String,
    pub detection_confidence: f32,
    pub reasons: Vec<String>,
}

/// A candidate matched against a specific scripture line. Transient; may
/// be promoted into a `ProcessedSegment` on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMatch {
    pub line: ScriptureLine,
    pub match_confidence: f32,
    pub fuzzy_score: f32,
    pub semantic_score: f32,
    pub verifier_passed: bool,
}

/// Whether a segment turned out to be plain speech or an accepted quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Speech,
    ScriptureQuote,
}

/// The terminal per-chunk record. Created by the orchestrator, appended
/// to the transcript, never rewritten afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSegment {
    pub segment_id: Uuid,
    pub chunk_index: u64,
    pub start_sec: f64,
    pub end_sec: f64,
    pub kind: SegmentKind,
    /// Always the original pre-replacement text.
    pub spoken_text: String,
    pub gurmukhi: String,
    pub roman: String,
    pub language: String,
    pub route: Route,
    pub asr_confidence: f32,
    pub script_confidence: f32,
    pub quote_match: Option<QuoteMatch>,
    pub needs_review: bool,
    pub per_engine_hypotheses: Vec<Hypothesis>,
    /// Internal fault trail; never propagated as a job-fatal error.
    pub errors: Vec<String>,
}

/// Aggregate counters and timings over a finished (or in-progress) job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptMetrics {
    pub chunk_count: u64,
    pub quotes_detected: u64,
    pub quotes_replaced: u64,
    pub redecodes_triggered: u64,
    pub stage_latency_ms: std::collections::BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub original_path: Option<String>,
    pub sample_rate: Option<u32>,
    pub duration_sec: Option<f64>,
}

/// Full result of a batch transcription run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub job_id: Uuid,
    pub segments: Vec<ProcessedSegment>,
    pub metrics: TranscriptMetrics,
    pub source_metadata: SourceMetadata,
}
