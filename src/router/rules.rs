//! Rule table for chunk routing.
//!
//! Signals are weighted and tunable via [`crate::config::Thresholds`], but
//! the rule evaluation order itself is fixed: a scripture cue phrase on a
//! short chunk wins outright, then language-classifier confidence, then a
//! same-confidence tie between two languages, else `unknown`. The
//! triggering rule name is retained as `reason` for audit.

use crate::config::Thresholds;
use crate::types::{Route, RouteKind};

/// A fast, best-effort language classification for one chunk. Stands in
/// for an on-audio classifier; callers without one pass `None` alternatives.
#[derive(Debug, Clone)]
pub struct LanguageHint {
    pub language: String,
    pub confidence: f32,
    pub second_best: Option<(String, f32)>,
}

#[derive(Debug, Clone)]
pub struct RouterInput<'a> {
    pub chunk_duration_sec: f64,
    pub text_hint: Option<&'a str>,
    pub language_hint: Option<LanguageHint>,
    pub prior_language: Option<&'a str>,
}

/// Ordered, configurable scripture cue phrases. A real deployment would
/// load these per domain_mode; the defaults cover the common Punjabi/
/// English framing phrases used before quoting scripture in katha.
const DEFAULT_CUE_PHRASES: &[&str] = &[
    "ਜਿਵੇਂ ਕਿ ਫ਼ੁਰਮਾਨ ਹੈ",
    "ਬਾਣੀ ਵਿੱਚ ਆਉਂਦਾ ਹੈ",
    "as it is said",
    "in the bani",
    "guru sahib farmaande hain",
];

pub struct Router {
    thresholds: Thresholds,
    cue_phrases: Vec<String>,
}

impl Router {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            cue_phrases: DEFAULT_CUE_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_cue_phrases(thresholds: Thresholds, cue_phrases: Vec<String>) -> Self {
        Self {
            thresholds,
            cue_phrases,
        }
    }

    pub fn route(&self, input: &RouterInput) -> Route {
        if input.chunk_duration_sec < self.thresholds.scripture_short_sec {
            if let Some(text) = input.text_hint {
                let lower = text.to_lowercase();
                if self
                    .cue_phrases
                    .iter()
                    .any(|p| lower.contains(&p.to_lowercase()) || text.contains(p.as_str()))
                {
                    return Route {
                        kind: RouteKind::ScriptureQuoteLikely,
                        reason: "scripture cue phrase on a short chunk".to_string(),
                    };
                }
            }
        }

        if let Some(hint) = &input.language_hint {
            if hint.confidence >= self.thresholds.langid_floor {
                return Route {
                    kind: language_to_route(&hint.language),
                    reason: format!(
                        "language classifier confidence {:.2} >= langid_floor",
                        hint.confidence
                    ),
                };
            }

            if let Some((_, second_conf)) = &hint.second_best {
                if (hint.confidence - second_conf).abs() <= self.thresholds.langid_tie_delta {
                    return Route {
                        kind: RouteKind::Mixed,
                        reason: "language classifier tie within langid_tie_delta".to_string(),
                    };
                }
            }
        }

        if let Some(prior) = input.prior_language {
            return Route {
                kind: language_to_route(prior),
                reason: "fell back to prior chunk's language".to_string(),
            };
        }

        Route {
            kind: RouteKind::Unknown,
            reason: "no signal met any routing rule".to_string(),
        }
    }
}

fn language_to_route(language: &str) -> RouteKind {
    match language.to_lowercase().as_str() {
        "pa" | "punjabi" | "pan" => RouteKind::Punjabi,
        "en" | "english" | "eng" => RouteKind::English,
        _ => RouteKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn short_chunk_with_cue_phrase_routes_to_scripture() {
        let router = Router::new(thresholds());
        let input = RouterInput {
            chunk_duration_sec: 3.0,
            text_hint: Some("as it is said in the bani"),
            language_hint: None,
            prior_language: None,
        };
        assert_eq!(router.route(&input).kind, RouteKind::ScriptureQuoteLikely);
    }

    #[test]
    fn confident_language_hint_wins() {
        let router = Router::new(thresholds());
        let input = RouterInput {
            chunk_duration_sec: 12.0,
            text_hint: None,
            language_hint: Some(LanguageHint {
                language: "en".into(),
                confidence: 0.9,
                second_best: None,
            }),
            prior_language: None,
        };
        assert_eq!(router.route(&input).kind, RouteKind::English);
    }

    #[test]
    fn tied_languages_route_to_mixed() {
        let router = Router::new(thresholds());
        let input = RouterInput {
            chunk_duration_sec: 12.0,
            text_hint: None,
            language_hint: Some(LanguageHint {
                language: "pa".into(),
                confidence: 0.4,
                second_best: Some(("en".into(), 0.38)),
            }),
            prior_language: None,
        };
        assert_eq!(router.route(&input).kind, RouteKind::Mixed);
    }

    #[test]
    fn no_signal_falls_back_to_unknown() {
        let router = Router::new(thresholds());
        let input = RouterInput {
            chunk_duration_sec: 12.0,
            text_hint: None,
            language_hint: None,
            prior_language: None,
        };
        assert_eq!(router.route(&input).kind, RouteKind::Unknown);
    }
}
