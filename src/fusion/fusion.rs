//! Combines 1-3 hypotheses for one chunk into a single [`FusionResult`]
//! and decides whether a re-decode is warranted.

use std::collections::HashMap;

use crate::config::Thresholds;
use crate::fusion::align::{align_tokens, normalize_and_tokenize, word_similarity};
use crate::types::{FusionResult, Hypothesis, RouteKind};

/// Default engine priority for majority-vote tie-breaks: A > B > C.
fn engine_priority(engine_id: &str) -> u8 {
    match engine_id {
        id if id.starts_with('A') => 3,
        id if id.starts_with('B') => 2,
        id if id.starts_with('C') => 1,
        _ => 0,
    }
}

/// Whether a hypothesis's language matches the chunk's route, for the
/// mixed-content edge case (opposite-language hypotheses, both
/// confident): prefer the one matching the route, fall back to A.
fn route_matches_language(route: RouteKind, language_code: &str) -> bool {
    let lc = language_code.to_ascii_lowercase();
    match route {
        RouteKind::Punjabi | RouteKind::ScriptureQuoteLikely => {
            matches!(lc.as_str(), "pa" | "punjabi" | "pan")
        }
        RouteKind::English => matches!(lc.as_str(), "en" | "english" | "eng"),
        RouteKind::Mixed | RouteKind::Unknown => false,
    }
}

/// Tie-break priority used during voting: a hypothesis whose language
/// matches the route outranks everything else; otherwise the default
/// A > B > C engine priority applies.
fn tie_break_priority(hypothesis: &Hypothesis, route: RouteKind) -> u8 {
    if route_matches_language(route, &hypothesis.language_code) {
        u8::MAX
    } else {
        engine_priority(&hypothesis.engine_id)
    }
}

pub struct Fusion {
    thresholds: Thresholds,
}

impl Fusion {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Fuses a non-empty list of hypotheses. Panics are never used here:
    /// callers that have zero hypotheses should construct the
    /// empty/review segment path themselves, not call this. `route` is
    /// used only as a tie-break preference for mixed-content disagreement.
    pub fn fuse(&self, hypotheses: &[Hypothesis], route: RouteKind) -> FusionResult {
        debug_assert!(!hypotheses.is_empty());

        if hypotheses.len() == 1 {
            let h = &hypotheses[0];
            return FusionResult {
                fused_text: h.text.clone(),
                fused_confidence: h.confidence,
                per_engine_hypotheses: hypotheses.to_vec(),
                agreement_score: 1.0,
                needs_redecode: h.confidence < self.thresholds.redecode_floor,
            };
        }

        let agreement = self.agreement_score(hypotheses);
        let fused_text = self.vote(hypotheses, route);
        let mean_conf = hypotheses.iter().map(|h| h.confidence).sum::<f32>() / hypotheses.len() as f32;
        let fused_confidence = mean_conf * (0.5 + 0.5 * agreement);
        let needs_redecode = fused_confidence < self.thresholds.redecode_floor;

        FusionResult {
            fused_text,
            fused_confidence,
            per_engine_hypotheses: hypotheses.to_vec(),
            agreement_score: agreement,
            needs_redecode,
        }
    }

    /// `agreement = mean(pairwise_similarity)`; 1.0 by convention for a
    /// single hypothesis (handled by the early return in `fuse`).
    fn agreement_score(&self, hypotheses: &[Hypothesis]) -> f32 {
        let mut pairs = 0usize;
        let mut total = 0.0f32;
        for i in 0..hypotheses.len() {
            for j in (i + 1)..hypotheses.len() {
                total += word_similarity(&hypotheses[i].text, &hypotheses[j].text);
                pairs += 1;
            }
        }
        if pairs == 0 {
            1.0
        } else {
            total / pairs as f32
        }
    }

    /// Majority vote at each aligned token position; ties break by route
    /// preference (mixed content), then engine priority, then confidence.
    fn vote(&self, hypotheses: &[Hypothesis], route: RouteKind) -> String {
        let sorted: Vec<&Hypothesis> = {
            let mut v: Vec<&Hypothesis> = hypotheses.iter().collect();
            v.sort_by(|a, b| {
                tie_break_priority(b, route)
                    .cmp(&tie_break_priority(a, route))
                    .then(b.confidence.partial_cmp(&a.confidence).unwrap())
            });
            v
        };

        let base_tokens = normalize_and_tokenize(&sorted[0].text);
        let other_token_lists: Vec<Vec<String>> = sorted[1..]
            .iter()
            .map(|h| normalize_and_tokenize(&h.text))
            .collect();

        if other_token_lists.is_empty() {
            return base_tokens.join(" ");
        }

        let mut result = Vec::with_capacity(base_tokens.len());
        let mut alignments: Vec<Vec<(Option<&str>, Option<&str>)>> = other_token_lists
            .iter()
            .map(|tokens| align_tokens(&base_tokens, tokens))
            .collect();

        let positions = alignments.iter().map(|a| a.len()).max().unwrap_or(0);
        for pos in 0..positions {
            let mut votes: HashMap<&str, (usize, u8, f32)> = HashMap::new();
            if let Some(base_tok) = base_tokens.get(pos) {
                let entry = votes.entry(base_tok.as_str()).or_insert((0, tie_break_priority(sorted[0], route), sorted[0].confidence));
                entry.0 += 1;
            }
            for (engine_idx, alignment) in alignments.iter_mut().enumerate() {
                if let Some((_, Some(other_tok))) = alignment.get(pos) {
                    let h = sorted[engine_idx + 1];
                    let entry = votes
                        .entry(*other_tok)
                        .or_insert((0, tie_break_priority(h, route), h.confidence));
                    entry.0 += 1;
                }
            }
            if let Some((winner, _)) = votes
                .into_iter()
                .max_by(|(_, a), (_, b)| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.partial_cmp(&b.2).unwrap()))
            {
                result.push(winner.to_string());
            }
        }
        result.join(" ")
    }

    pub fn needs_review(&self, result: &FusionResult) -> bool {
        result.fused_confidence < self.thresholds.review_floor
            || result.agreement_score < self.thresholds.agreement_floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyp(engine_id: &str, text: &str, confidence: f32) -> Hypothesis {
        hyp_lang(engine_id, text, confidence, "pa")
    }

    fn hyp_lang(engine_id: &str, text: &str, confidence: f32, language_code: &str) -> Hypothesis {
        Hypothesis {
            engine_id: engine_id.to_string(),
            text: text.to_string(),
            language_code: language_code.to_string(),
            confidence,
            word_timings: None,
        }
    }

    #[test]
    fn single_hypothesis_flows_through_unchanged() {
        let fusion = Fusion::new(Thresholds::default());
        let result = fusion.fuse(&[hyp("A", "dhan guru nanak", 0.92)], RouteKind::Unknown);
        assert_eq!(result.fused_confidence, 0.92);
        assert_eq!(result.agreement_score, 1.0);
        assert_eq!(result.fused_text, "dhan guru nanak");
    }

    #[test]
    fn agreeing_hypotheses_yield_high_agreement() {
        let fusion = Fusion::new(Thresholds::default());
        let result = fusion.fuse(
            &[
                hyp("A", "dhan guru nanak dev ji", 0.9),
                hyp("B", "dhan guru nanak dev ji", 0.85),
            ],
            RouteKind::Punjabi,
        );
        assert!(result.agreement_score > 0.9);
        assert!(result.fused_confidence > 0.8);
    }

    #[test]
    fn disagreeing_low_confidence_hypotheses_trigger_redecode() {
        let fusion = Fusion::new(Thresholds::default());
        let result = fusion.fuse(
            &[
                hyp("A", "dhan guru nanak", 0.55),
                hyp("B", "totally unrelated text here", 0.52),
            ],
            RouteKind::Unknown,
        );
        assert!(result.agreement_score < 0.6);
        assert!(result.needs_redecode);
    }

    #[test]
    fn mixed_content_prefers_hypothesis_matching_route_over_engine_priority() {
        let fusion = Fusion::new(Thresholds::default());

        // A (highest default priority) disagrees in language with C; the
        // route says Punjabi, so C's Punjabi hypothesis should win despite
        // A's lower engine priority rank and higher confidence.
        let result = fusion.fuse(
            &[
                hyp_lang("A", "this is english text here", 0.9, "en"),
                hyp_lang("C", "ਇਹ ਪੰਜਾਬੀ ਪਾਠ ਹੈ ਇੱਥੇ", 0.88, "pa"),
            ],
            RouteKind::Punjabi,
        );
        assert_eq!(result.fused_text, "ਇਹ ਪੰਜਾਬੀ ਪਾਠ ਹੈ ਇੱਥੇ");

        // With no hypothesis matching the route's language, default
        // engine priority (A > B > C) still decides.
        let result = fusion.fuse(
            &[
                hyp_lang("A", "dhan guru nanak", 0.9, "pa"),
                hyp_lang("B", "totally different words", 0.88, "pa"),
            ],
            RouteKind::Mixed,
        );
        assert_eq!(result.fused_text, "dhan guru nanak");
    }
}
