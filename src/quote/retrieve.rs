//! Stage A: fuzzy retrieval of scripture-line candidates across every
//! available text variant for a quote candidate.

use std::collections::HashMap;

use crate::fusion::align::normalized_edit_similarity;
use crate::scripture::ScriptureIndex;
use crate::types::ScriptureLine;

/// For each variant (fused Gurmukhi plus each engine's Gurmukhi
/// rendition), query the index and keep the maximum fuzzy score per line
/// across all variants.
pub fn fuzzy_retrieve(
    index: &ScriptureIndex,
    variants: &[String],
    top_k: usize,
) -> Vec<(ScriptureLine, f32)> {
    let mut best: HashMap<String, (ScriptureLine, f32)> = HashMap::new();

    for variant in variants {
        if variant.trim().is_empty() {
            continue;
        }
        for line in index.search_by_text(variant, top_k) {
            let score = normalized_edit_similarity(variant, &line.gurmukhi);
            best.entry(line.line_id.clone())
                .and_modify(|(_, existing_score)| {
                    if score > *existing_score {
                        *existing_score = score;
                    }
                })
                .or_insert((line, score));
        }
    }

    let mut results: Vec<(ScriptureLine, f32)> = best.into_values().collect();
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    results
}
