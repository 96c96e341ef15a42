//! Stage B (semantic verification) and Stage C (verifier rules).

use std::collections::HashSet;

use crate::config::Thresholds;
use crate::types::{QuoteMatch, ScriptureLine};

/// Function words stripped before content-token overlap is computed.
/// A small frozen stoplist; real deployments would tune this per domain.
const STOPLIST: &[&str] = &["ਹੈ", "ਹਨ", "ਦਾ", "ਦੇ", "ਦੀ", "ਵਿੱਚ", "ਨੂੰ", "ਤੇ", "ਅਤੇ"];

fn content_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|t| !STOPLIST.contains(t))
        .collect()
}

/// Word-level overlap on content tokens. `embedding_cosine`, if provided,
/// replaces the lexical overlap entirely.
pub fn semantic_score(
    spoken: &str,
    canonical: &str,
    embedding_cosine: Option<f32>,
) -> f32 {
    if let Some(cosine) = embedding_cosine {
        return cosine.clamp(0.0, 1.0);
    }

    let spoken_tokens: HashSet<&str> = content_tokens(spoken).into_iter().collect();
    let canonical_tokens: HashSet<&str> = content_tokens(canonical).into_iter().collect();

    if spoken_tokens.is_empty() || canonical_tokens.is_empty() {
        return 0.0;
    }

    let overlap = spoken_tokens.intersection(&canonical_tokens).count();
    let union = spoken_tokens.union(&canonical_tokens).count();
    if union == 0 {
        0.0
    } else {
        overlap as f32 / union as f32
    }
}

pub fn combine(fuzzy: f32, semantic: f32, thresholds: &Thresholds) -> f32 {
    thresholds.w_fuzzy * fuzzy + thresholds.w_semantic * semantic
}

/// Stage C verifier rules. Returns `true` only if every rule passes.
pub fn passes_verifier(
    spoken: &str,
    line: &ScriptureLine,
    combined: f32,
    thresholds: &Thresholds,
) -> bool {
    let spoken_len = spoken.split_whitespace().count();
    let canonical_len = line.gurmukhi.split_whitespace().count();
    if spoken_len == 0 || canonical_len == 0 {
        return false;
    }
    let ratio = spoken_len as f32 / canonical_len as f32;
    if ratio < thresholds.len_ratio_lo || ratio > thresholds.len_ratio_hi {
        return false;
    }

    let spoken_tokens: HashSet<&str> = content_tokens(spoken).into_iter().collect();
    let canonical_tokens: HashSet<&str> = content_tokens(&line.gurmukhi).into_iter().collect();
    if spoken_tokens.intersection(&canonical_tokens).next().is_none() {
        return false;
    }

    combined >= thresholds.verifier_floor
}

/// Runs stages B and C over the retrieved candidates (already fuzzy-
/// scored), returning the single best surviving `QuoteMatch`, if any.
pub fn select_best_match(
    spoken: &str,
    retrieved: Vec<(ScriptureLine, f32)>,
    thresholds: &Thresholds,
) -> Option<QuoteMatch> {
    let mut best: Option<QuoteMatch> = None;

    for (line, fuzzy_score) in retrieved {
        let sem_score = semantic_score(spoken, &line.gurmukhi, None);
        let combined = combine(fuzzy_score, sem_score, thresholds);
        let verifier_passed = passes_verifier(spoken, &line, combined, thresholds);
        if !verifier_passed {
            continue;
        }
        if best.as_ref().map(|m| combined > m.match_confidence).unwrap_or(true) {
            best = Some(QuoteMatch {
                line,
                match_confidence: combined,
                fuzzy_score,
                semantic_score: sem_score,
                verifier_passed,
            });
        }
    }

    best
}
