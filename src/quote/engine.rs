//! Entry point tying together candidate detection, fuzzy retrieval,
//! semantic verification, and the replacement decision table.
//!
//! A matcher failure at any stage never fails the job: it demotes the
//! segment to plain speech with `needs_review = true` and the fault is
//! recorded on the segment's error trail, not raised to the caller.

use tracing::warn;

use crate::config::{PipelineConfig, RomanizationScheme};
use crate::quote::detect::CandidateDetector;
use crate::quote::replace::{self, ReplacementDecision};
use crate::quote::retrieve::fuzzy_retrieve;
use crate::quote::verify::select_best_match;
use crate::scripture::ScriptureIndex;
use crate::types::{QuoteMatch, RouteKind};

const STAGE_A_TOP_K: usize = 10;

/// Outcome of running a draft segment through the quote engine.
pub struct QuoteOutcome {
    pub replaced_gurmukhi: Option<String>,
    pub replaced_roman: Option<String>,
    pub quote_match: Option<QuoteMatch>,
    pub needs_review: bool,
    pub fault: Option<String>,
}

impl QuoteOutcome {
    fn plain_speech() -> Self {
        Self {
            replaced_gurmukhi: None,
            replaced_roman: None,
            quote_match: None,
            needs_review: false,
            fault: None,
        }
    }

    fn faulted(fault: impl Into<String>) -> Self {
        Self {
            replaced_gurmukhi: None,
            replaced_roman: None,
            quote_match: None,
            needs_review: true,
            fault: Some(fault.into()),
        }
    }
}

pub struct QuoteEngine<'a> {
    index: Option<&'a ScriptureIndex>,
    config: &'a PipelineConfig,
    cue_patterns: Vec<String>,
}

impl<'a> QuoteEngine<'a> {
    pub fn new(index: Option<&'a ScriptureIndex>, config: &'a PipelineConfig) -> Self {
        Self {
            index,
            config,
            cue_patterns: Vec::new(),
        }
    }

    pub fn with_cue_patterns(mut self, cue_patterns: Vec<String>) -> Self {
        self.cue_patterns = cue_patterns;
        self
    }

    /// Runs the full three-stage pipeline plus the replacement decision
    /// table over one fused-and-converted segment's Gurmukhi text.
    /// `hypothesis_variants` are the Gurmukhi renditions of the other
    /// engines' hypotheses for the same chunk; Stage A's fuzzy retrieval
    /// queries the candidate text plus every variant, keeping the best
    /// score per scripture line across all of them.
    pub fn process(&self, route: RouteKind, gurmukhi_text: &str, hypothesis_variants: &[String]) -> QuoteOutcome {
        let detector = CandidateDetector::new(&self.config.thresholds, &self.cue_patterns);
        let Some(candidate) = detector.detect(route, gurmukhi_text) else {
            return QuoteOutcome::plain_speech();
        };

        let Some(index) = self.index else {
            warn!(
                text = %candidate.text,
                "quote candidate detected but no scripture index is loaded"
            );
            return QuoteOutcome::faulted("scripture index unavailable");
        };

        let mut variants = vec![candidate.text.clone()];
        variants.extend(hypothesis_variants.iter().cloned());
        let retrieved = fuzzy_retrieve(index, &variants, STAGE_A_TOP_K);
        if retrieved.is_empty() {
            return QuoteOutcome::plain_speech();
        }

        let Some(quote_match) = select_best_match(&candidate.text, retrieved, &self.config.thresholds)
        else {
            return QuoteOutcome::plain_speech();
        };

        match replace::decide(&quote_match, &self.config.thresholds, self.romanization_scheme()) {
            ReplacementDecision::Replace { gurmukhi, roman } => QuoteOutcome {
                replaced_gurmukhi: Some(gurmukhi),
                replaced_roman: Some(roman),
                quote_match: Some(quote_match),
                needs_review: false,
                fault: None,
            },
            ReplacementDecision::Suggest => QuoteOutcome {
                replaced_gurmukhi: None,
                replaced_roman: None,
                quote_match: Some(quote_match),
                needs_review: true,
                fault: None,
            },
            ReplacementDecision::Discard => QuoteOutcome::plain_speech(),
        }
    }

    fn romanization_scheme(&self) -> RomanizationScheme {
        self.config.romanization_scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScriptureSource;

    fn index() -> ScriptureIndex {
        ScriptureIndex::from_lines(vec![crate::types::ScriptureLine {
            line_id: "l1".into(),
            source: ScriptureSource::Sggs,
            gurmukhi: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
            roman: Some("sati nāmu kartā purakhu".into()),
            ang: Some(1),
            raag: None,
            author: None,
            shabad_id: None,
            line_position: None,
        }])
    }

    #[test]
    fn plain_speech_passes_through_untouched() {
        let config = PipelineConfig::default();
        let engine = QuoteEngine::new(None, &config);
        let outcome = engine.process(RouteKind::English, "just talking casually today", &[]);
        assert!(outcome.replaced_gurmukhi.is_none());
        assert!(!outcome.needs_review);
        assert!(outcome.fault.is_none());
    }

    #[test]
    fn strong_match_on_scripture_route_replaces() {
        let config = PipelineConfig::default();
        let idx = index();
        let engine = QuoteEngine::new(Some(&idx), &config);
        let outcome = engine.process(RouteKind::ScriptureQuoteLikely, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", &[]);
        assert!(outcome.replaced_gurmukhi.is_some());
        assert!(!outcome.needs_review);
    }

    #[test]
    fn missing_index_on_a_detected_candidate_demotes_with_review_flag() {
        let config = PipelineConfig::default();
        let engine = QuoteEngine::new(None, &config);
        let outcome = engine.process(RouteKind::ScriptureQuoteLikely, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", &[]);
        assert!(outcome.replaced_gurmukhi.is_none());
        assert!(outcome.needs_review);
        assert!(outcome.fault.is_some());
    }
}
