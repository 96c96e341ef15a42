//! Stage 0: high-recall candidate detection over a single processed
//! segment draft (after conversion, before replacement).

use crate::config::Thresholds;
use crate::types::{QuoteCandidate, RouteKind};

/// A small frozen seed of scripture-register vocabulary used for the
/// vocabulary-density signal. A production deployment would derive this
/// from the corpus itself; the detection shape stays the same.
const SCRIPTURE_VOCAB: &[&str] = &[
    "ਸਤਿ", "ਨਾਮੁ", "ਕਰਤਾ", "ਪੁਰਖੁ", "ਨਿਰਭਉ", "ਨਿਰਵੈਰੁ", "ਅਕਾਲ", "ਮੂਰਤਿ", "ਗੁਰ", "ਪ੍ਰਸਾਦਿ",
];

const SHABAD_FINAL_MARKERS: &[&str] = &["॥", "੨॥", "੧॥"];

pub struct CandidateDetector<'a> {
    thresholds: &'a Thresholds,
    cue_patterns: &'a [String],
}

impl<'a> CandidateDetector<'a> {
    pub fn new(thresholds: &'a Thresholds, cue_patterns: &'a [String]) -> Self {
        Self {
            thresholds,
            cue_patterns,
        }
    }

    /// Returns a candidate if any signal fires; `detection_confidence` is
    /// the maximum of the firing signals' confidences, and `reasons`
    /// lists every signal that fired, in evaluation order.
    pub fn detect(&self, route: RouteKind, gurmukhi_text: &str) -> Option<QuoteCandidate> {
        let mut reasons = Vec::new();
        let mut confidence = 0.0f32;

        if route == RouteKind::ScriptureQuoteLikely {
            reasons.push("route == scripture_quote_likely".to_string());
            confidence = confidence.max(0.6);
        }

        if self.cue_patterns.iter().any(|p| gurmukhi_text.contains(p.as_str())) {
            reasons.push("cue phrase pattern matched".to_string());
            confidence = confidence.max(0.7);
        }

        let tokens: Vec<&str> = gurmukhi_text.split_whitespace().collect();
        if !tokens.is_empty() {
            let scripture_tokens = tokens
                .iter()
                .filter(|t| SCRIPTURE_VOCAB.contains(t))
                .count();
            let ratio = scripture_tokens as f32 / tokens.len() as f32;
            if ratio >= self.thresholds.vocab_ratio_floor {
                reasons.push("vocabulary density above floor".to_string());
                confidence = confidence.max(0.5);
            }
        }

        let len_ok = tokens.len() >= 2 && tokens.len() <= 12;
        let ends_with_marker = SHABAD_FINAL_MARKERS.iter().any(|m| gurmukhi_text.trim_end().ends_with(m));
        if len_ok && ends_with_marker {
            reasons.push("short archaic-structure line with shabad-final marker".to_string());
            confidence = confidence.max(0.4);
        }

        if reasons.is_empty() {
            None
        } else {
            Some(QuoteCandidate {
                text: gurmukhi_text.to_string(),
                detection_confidence: confidence,
                reasons,
            })
        }
    }
}

/// Deduplicates candidates that share the same text, keeping the first
/// (highest-confidence, since callers build the list in priority order).
pub fn dedupe_candidates(candidates: Vec<QuoteCandidate>) -> Vec<QuoteCandidate> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_signal_fires_for_scripture_likely() {
        let thresholds = Thresholds::default();
        let detector = CandidateDetector::new(&thresholds, &[]);
        let candidate = detector
            .detect(RouteKind::ScriptureQuoteLikely, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ")
            .unwrap();
        assert!(candidate.reasons.iter().any(|r| r.contains("route")));
    }

    #[test]
    fn plain_speech_with_no_signals_is_not_a_candidate() {
        let thresholds = Thresholds::default();
        let detector = CandidateDetector::new(&thresholds, &[]);
        assert!(detector.detect(RouteKind::English, "just talking casually today").is_none());
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let a = QuoteCandidate {
            text: "same text".into(),
            detection_confidence: 0.7,
            reasons: vec!["a".into()],
        };
        let b = QuoteCandidate {
            text: "same text".into(),
            detection_confidence: 0.4,
            reasons: vec!["b".into()],
        };
        let result = dedupe_candidates(vec![a, b]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].detection_confidence, 0.7);
    }
}
