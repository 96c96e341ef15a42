//! In-memory, read-only scripture index: exact retrieval, shabad-context
//! retrieval, and fuzzy/substring search with a tokenized fallback.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::fusion::align::normalized_edit_similarity;
use crate::scripture::store;
use crate::scripture::types::ScriptureError;
use crate::types::ScriptureLine;

struct Data {
    by_id: HashMap<String, ScriptureLine>,
    by_shabad: HashMap<String, Vec<String>>, // shabad_id -> line_ids ordered by position
    trigram_postings: HashMap<String, Vec<String>>, // trigram -> line_ids
    token_postings: HashMap<String, Vec<String>>, // normalized token -> line_ids
}

/// Loaded once and shared; every query below only reads `Arc<Data>`, so
/// concurrent readers never contend on a lock.
#[derive(Clone)]
pub struct ScriptureIndex {
    data: Arc<Data>,
}

fn normalize_query(text: &str) -> String {
    let nfc: String = text.nfc().collect();
    let collapsed: String = nfc.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| !is_decorative_punctuation(*c))
        .collect()
}

fn is_decorative_punctuation(c: char) -> bool {
    matches!(c, '।' | '॥' | ',' | '.' | '!' | '?' | '"' | '\'')
}

fn trigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return vec![text.to_string()];
    }
    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

impl ScriptureIndex {
    /// Loads and indexes the corpus at `path`. A missing file is fatal at
    /// startup rather than degrading to an empty index.
    pub fn open(path: &Path) -> Result<Self, ScriptureError> {
        let lines = store::load(path)?;
        Ok(Self::from_lines(lines))
    }

    pub fn from_lines(lines: Vec<ScriptureLine>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_shabad: HashMap<String, Vec<(u32, String)>> = HashMap::new();
        let mut trigram_postings: HashMap<String, Vec<String>> = HashMap::new();
        let mut token_postings: HashMap<String, Vec<String>> = HashMap::new();

        for line in lines {
            let normalized = normalize_query(&line.gurmukhi);
            for tri in trigrams(&normalized) {
                trigram_postings.entry(tri).or_default().push(line.line_id.clone());
            }
            for token in normalized.split_whitespace() {
                token_postings
                    .entry(token.to_string())
                    .or_default()
                    .push(line.line_id.clone());
            }
            if let Some(shabad_id) = &line.shabad_id {
                by_shabad
                    .entry(shabad_id.clone())
                    .or_default()
                    .push((line.line_position.unwrap_or(0), line.line_id.clone()));
            }
            by_id.insert(line.line_id.clone(), line);
        }

        let by_shabad = by_shabad
            .into_iter()
            .map(|(shabad, mut positioned)| {
                positioned.sort_by_key(|(pos, _)| *pos);
                (shabad, positioned.into_iter().map(|(_, id)| id).collect())
            })
            .collect();

        Self {
            data: Arc::new(Data {
                by_id,
                by_shabad,
                trigram_postings,
                token_postings,
            }),
        }
    }

    pub fn get_line(&self, line_id: &str) -> Option<ScriptureLine> {
        self.data.by_id.get(line_id).cloned()
    }

    /// Lines from the same shabad within `±radius` of `line_id`'s
    /// position, ordered by position.
    pub fn get_context(&self, line_id: &str, radius: usize) -> Vec<ScriptureLine> {
        let Some(line) = self.data.by_id.get(line_id) else {
            return Vec::new();
        };
        let Some(shabad_id) = &line.shabad_id else {
            return Vec::new();
        };
        let Some(ordered_ids) = self.data.by_shabad.get(shabad_id) else {
            return Vec::new();
        };
        let Some(center) = ordered_ids.iter().position(|id| id == line_id) else {
            return Vec::new();
        };
        let lo = center.saturating_sub(radius);
        let hi = (center + radius + 1).min(ordered_ids.len());
        ordered_ids[lo..hi]
            .iter()
            .filter_map(|id| self.data.by_id.get(id).cloned())
            .collect()
    }

    /// Fuzzy/substring search: candidate generation via trigram overlap,
    /// falling back to whole-word token overlap when the n-gram index has
    /// no hits (short queries), scored by normalized edit similarity and
    /// returned as the top `top_k` lines.
    pub fn search_by_text(&self, query_gurmukhi: &str, top_k: usize) -> Vec<ScriptureLine> {
        let normalized = normalize_query(query_gurmukhi);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut candidate_ids: Vec<String> = trigrams(&normalized)
            .iter()
            .filter_map(|tri| self.data.trigram_postings.get(tri))
            .flatten()
            .cloned()
            .collect();

        if candidate_ids.is_empty() {
            candidate_ids = normalized
                .split_whitespace()
                .filter_map(|tok| self.data.token_postings.get(tok))
                .flatten()
                .cloned()
                .collect();
        }

        candidate_ids.sort();
        candidate_ids.dedup();

        let mut scored: Vec<(f32, ScriptureLine)> = candidate_ids
            .into_iter()
            .filter_map(|id| self.data.by_id.get(&id).cloned())
            .map(|line| {
                let score = normalized_edit_similarity(&normalized, &normalize_query(&line.gurmukhi));
                (score, line)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());
        scored.into_iter().take(top_k).map(|(_, line)| line).collect()
    }

    pub fn len(&self) -> usize {
        self.data.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScriptureSource;

    fn sample_lines() -> Vec<ScriptureLine> {
        vec![
            ScriptureLine {
                line_id: "l1".into(),
                source: ScriptureSource::Sggs,
                gurmukhi: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".into(),
                roman: Some("sati nāmu kartā purakhu".into()),
                ang: Some(1),
                raag: None,
                author: Some("Guru Nanak".into()),
                shabad_id: Some("s1".into()),
                line_position: Some(1),
            },
            ScriptureLine {
                line_id: "l2".into(),
                source: ScriptureSource::Sggs,
                gurmukhi: "ਨਿਰਭਉ ਨਿਰਵੈਰੁ".into(),
                roman: None,
                ang: Some(1),
                raag: None,
                author: Some("Guru Nanak".into()),
                shabad_id: Some("s1".into()),
                line_position: Some(2),
            },
        ]
    }

    #[test]
    fn exact_retrieval_by_id() {
        let index = ScriptureIndex::from_lines(sample_lines());
        assert_eq!(index.get_line("l1").unwrap().ang, Some(1));
        assert!(index.get_line("missing").is_none());
    }

    #[test]
    fn fuzzy_search_finds_close_match() {
        let index = ScriptureIndex::from_lines(sample_lines());
        let hits = index.search_by_text("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", 5);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].line_id, "l1");
    }

    #[test]
    fn no_hits_is_a_normal_empty_result() {
        let index = ScriptureIndex::from_lines(sample_lines());
        let hits = index.search_by_text("completely unrelated english text", 5);
        assert!(hits.is_empty());
    }

    #[test]
    fn context_retrieval_respects_radius_and_order() {
        let index = ScriptureIndex::from_lines(sample_lines());
        let ctx = index.get_context("l2", 1);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx[0].line_id, "l1");
        assert_eq!(ctx[1].line_id, "l2");
    }
}
