//! Script detection by Unicode codepoint block counting.

use crate::config::Thresholds;
use crate::types::ScriptKind;

fn is_gurmukhi(c: char) -> bool {
    ('\u{0A00}'..='\u{0A7F}').contains(&c)
}

fn is_shahmukhi(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Counts codepoints per script block and returns the dominant script,
/// or `Mixed` when the top two counts are within `script_mix_delta` of
/// each other (as a fraction of total classified codepoints).
pub fn detect_script(text: &str, thresholds: &Thresholds) -> ScriptKind {
    if text.trim().is_empty() {
        return ScriptKind::Empty;
    }

    let mut gurmukhi = 0usize;
    let mut shahmukhi = 0usize;
    let mut devanagari = 0usize;
    let mut latin = 0usize;

    for c in text.chars() {
        if is_gurmukhi(c) {
            gurmukhi += 1;
        } else if is_shahmukhi(c) {
            shahmukhi += 1;
        } else if is_devanagari(c) {
            devanagari += 1;
        } else if is_latin(c) {
            latin += 1;
        }
    }

    let total = gurmukhi + shahmukhi + devanagari + latin;
    if total == 0 {
        return ScriptKind::Empty;
    }

    let mut counts = [
        (ScriptKind::Gurmukhi, gurmukhi),
        (ScriptKind::Shahmukhi, shahmukhi),
        (ScriptKind::Devanagari, devanagari),
        (ScriptKind::Latin, latin),
    ];
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let (top_kind, top_count) = counts[0];
    let (_, second_count) = counts[1];
    if top_count == 0 {
        return ScriptKind::Empty;
    }

    let delta = (top_count as f32 - second_count as f32) / total as f32;
    if second_count > 0 && delta <= thresholds.script_mix_delta {
        ScriptKind::Mixed
    } else {
        top_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_gurmukhi_is_detected() {
        let t = Thresholds::default();
        assert_eq!(detect_script("ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ", &t), ScriptKind::Gurmukhi);
    }

    #[test]
    fn pure_shahmukhi_is_detected() {
        let t = Thresholds::default();
        assert_eq!(detect_script("دھن گرو نانک", &t), ScriptKind::Shahmukhi);
    }

    #[test]
    fn pure_latin_is_detected() {
        let t = Thresholds::default();
        assert_eq!(detect_script("hello world", &t), ScriptKind::Latin);
    }

    #[test]
    fn empty_text_is_empty_script() {
        let t = Thresholds::default();
        assert_eq!(detect_script("   ", &t), ScriptKind::Empty);
    }

    #[test]
    fn balanced_mix_is_mixed() {
        let t = Thresholds::default();
        assert_eq!(detect_script("ਧੰਨ ਗੁਰੂ hello world test", &t), ScriptKind::Mixed);
    }
}
