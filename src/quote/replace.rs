//! Stage 3: the canonical-replacement decision table.

use crate::config::{RomanizationScheme, Thresholds};
use crate::script::romanize::romanize;
use crate::types::QuoteMatch;

pub enum ReplacementDecision {
    /// Replace `gurmukhi`/`roman` with the canonical text; mark the
    /// segment a scripture quote.
    Replace { gurmukhi: String, roman: String },
    /// Keep the segment as plain speech but attach the match for review.
    Suggest,
    /// Discard the match entirely; segment remains untouched.
    Discard,
}

pub fn decide(
    quote_match: &QuoteMatch,
    thresholds: &Thresholds,
    scheme: RomanizationScheme,
) -> ReplacementDecision {
    if quote_match.match_confidence >= thresholds.auto_replace_floor {
        let roman = quote_match
            .line
            .roman
            .clone()
            .unwrap_or_else(|| romanize(&quote_match.line.gurmukhi, scheme));
        ReplacementDecision::Replace {
            gurmukhi: quote_match.line.gurmukhi.clone(),
            roman,
        }
    } else if quote_match.match_confidence >= thresholds.review_floor {
        ReplacementDecision::Suggest
    } else {
        ReplacementDecision::Discard
    }
}
