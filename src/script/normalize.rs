//! Gurmukhi diacritic normalization: tippi/bindi choice, combining-mark
//! canonical ordering, and deduplication of stacked identical marks.
//!
//! Runs after Unicode NFC normalization (the converter's pipeline step 1)
//! and after Shahmukhi→Gurmukhi conversion, on the Gurmukhi text only.

use unicode_normalization::UnicodeNormalization;

const TIPPI: char = '\u{0A70}'; // ੰ
const BINDI: char = '\u{0A02}'; // ਂ
const NUKTA: char = '\u{0A3C}'; // ਼
const ADHAK: char = '\u{0A71}'; // ੱ

/// Vowel signs (dependent matras) that call for bindi rather than tippi
/// when nasalization directly precedes them; tippi is the default
/// elsewhere.
fn is_vowel_sign(c: char) -> bool {
    matches!(
        c,
        '\u{0A3E}'..='\u{0A4C}' // aa matra .. au matra block
    )
}

/// NFC-normalizes, then re-derives nasalization and combining-mark order.
pub fn normalize(text: &str) -> String {
    let nfc: String = text.nfc().collect();
    let chars: Vec<char> = nfc.chars().collect();

    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == TIPPI || c == BINDI {
            // Look ahead: if followed directly by a vowel sign, bindi is
            // correct; otherwise prefer tippi. Also collapse runs of
            // identical nasalization marks into one.
            let mut j = i + 1;
            while j < chars.len() && (chars[j] == TIPPI || chars[j] == BINDI) {
                j += 1;
            }
            let followed_by_vowel = chars.get(j).copied().map(is_vowel_sign).unwrap_or(false);
            out.push(if followed_by_vowel { BINDI } else { TIPPI });
            i = j;
            continue;
        }
        out.push(c);
        i += 1;
    }

    reorder_and_dedupe(&out)
}

/// Canonical order per base consonant cluster: base → nukta → vowel sign
/// → nasalization → adhak. Adjacent marks attached to the same base are
/// collected and re-emitted in that order; a base consonant with no
/// combining marks passes through untouched.
fn reorder_and_dedupe(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let base = chars[i];
        i += 1;
        if !is_combining_mark(base) {
            out.push(base);
        } else {
            // A combining mark with no base (malformed input): pass through.
            out.push(base);
            continue;
        }

        let mut nukta = None;
        let mut vowel = None;
        let mut nasal = None;
        let mut adhak_mark = None;

        while i < chars.len() && is_combining_mark(chars[i]) {
            let c = chars[i];
            if c == NUKTA {
                nukta = Some(c);
            } else if is_vowel_sign(c) {
                vowel = Some(c);
            } else if c == TIPPI || c == BINDI {
                nasal = Some(c);
            } else if c == ADHAK {
                adhak_mark = Some(c);
            }
            i += 1;
        }

        for mark in [nukta, vowel, nasal, adhak_mark].into_iter().flatten() {
            out.push(mark);
        }
    }
    out
}

fn is_combining_mark(c: char) -> bool {
    c == NUKTA || c == ADHAK || c == TIPPI || c == BINDI || is_vowel_sign(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_on_already_normalized_text() {
        let text = "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ";
        assert_eq!(normalize(&normalize(text)), normalize(text));
    }

    #[test]
    fn dedupes_stacked_nasalization_marks() {
        let text = format!("ਗ{TIPPI}{TIPPI}ਰ");
        let result = normalize(&text);
        assert_eq!(result.matches(TIPPI).count() + result.matches(BINDI).count(), 1);
    }

    #[test]
    fn reorders_vowel_before_nasalization() {
        // Construct base + nasal + vowel (wrong order) and confirm the
        // normalizer moves the vowel ahead of the nasalization mark.
        let text = format!("ਗ{TIPPI}\u{0A3E}");
        let result = normalize(&text);
        let chars: Vec<char> = result.chars().collect();
        let vowel_pos = chars.iter().position(|&c| c == '\u{0A3E}').unwrap();
        let nasal_pos = chars
            .iter()
            .position(|&c| c == TIPPI || c == BINDI)
            .unwrap();
        assert!(vowel_pos < nasal_pos);
    }
}
