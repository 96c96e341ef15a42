//! Shahmukhi (Arabic script Punjabi) → Gurmukhi conversion.
//!
//! Two-layer strategy: a frozen whole-word dictionary lookup first, a
//! per-character rule layer for anything the dictionary misses. The
//! fraction of words resolved by dictionary vs rule fallback feeds the
//! conversion confidence the script converter reports.

use std::collections::HashMap;

/// A small frozen seed lexicon covering frequent katha/kirtan vocabulary.
/// A production deployment would load a much larger lexicon file; the
/// shape (whole-word lookup, Gurmukhi value) stays the same.
fn dictionary() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("دھن", "ਧੰਨ"),
        ("گرو", "ਗੁਰੂ"),
        ("نانک", "ਨਾਨਕ"),
        ("ست", "ਸਤਿ"),
        ("نام", "ਨਾਮੁ"),
        ("واہਿਗੁਰੂ", "ਵਾਹਿਗੁਰੂ"),
        ("جی", "ਜੀ"),
        ("سچ", "ਸਚ"),
    ])
}

/// Deterministic consonant mapping (Arabic letter → Gurmukhi consonant).
fn consonant_map() -> HashMap<char, &'static str> {
    HashMap::from([
        ('ب', "ਬ"),
        ('پ', "ਪ"),
        ('ت', "ਤ"),
        ('ٹ', "ਟ"),
        ('ث', "ਸ"),
        ('ج', "ਜ"),
        ('چ', "ਚ"),
        ('ح', "ਹ"),
        ('خ', "ਖ਼"),
        ('د', "ਦ"),
        ('ڈ', "ਡ"),
        ('ذ', "ਜ਼"),
        ('ر', "ਰ"),
        ('ڑ', "ੜ"),
        ('ز', "ਜ਼"),
        ('ژ', "ਜ਼"),
        ('س', "ਸ"),
        ('ش', "ਸ਼"),
        ('ص', "ਸ"),
        ('ض', "ਜ਼"),
        ('ط', "ਤ"),
        ('ظ', "ਜ਼"),
        ('ع', ""),
        ('غ', "ਗ਼"),
        ('ف', "ਫ਼"),
        ('ق', "ਕ"),
        ('ک', "ਕ"),
        ('گ', "ਗ"),
        ('ل', "ਲ"),
        ('م', "ਮ"),
        ('ن', "ਨ"),
        ('ں', "ਂ"), // nasalization; may be upgraded to tippi contextually
        ('ہ', "ਹ"),
        ('ھ', ""),
        ('ء', ""),
    ])
}

/// Vowel glyphs whose Gurmukhi form depends on word-initial vs medial
/// position (independent vs dependent vowel sign).
fn vowel_initial(c: char) -> Option<&'static str> {
    match c {
        'ا' => Some("ਅ"),
        'و' => Some("ਉ"),
        'ی' | 'ے' => Some("ਇ"),
        _ => None,
    }
}

fn vowel_medial(c: char) -> Option<&'static str> {
    match c {
        'ا' => Some("ਾ"),
        'و' => Some("ੂ"),
        'ی' => Some("ੀ"),
        'ے' => Some("ੇ"),
        _ => None,
    }
}

pub struct ShahmukhiConversion {
    pub gurmukhi: String,
    /// Fraction of words resolved via whole-word dictionary lookup.
    pub dictionary_hit_ratio: f32,
}

/// Converts Shahmukhi text word by word. The Arabic sequence is read in
/// its natural (right-to-left reading, left-to-right storage) order, and
/// the resulting Gurmukhi is emitted left-to-right.
pub fn convert(text: &str) -> ShahmukhiConversion {
    let dict = dictionary();
    let consonants = consonant_map();

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return ShahmukhiConversion {
            gurmukhi: String::new(),
            dictionary_hit_ratio: 1.0,
        };
    }

    let mut out_words = Vec::with_capacity(words.len());
    let mut dict_hits = 0usize;

    for word in &words {
        if let Some(&mapped) = dict.get(*word) {
            out_words.push(mapped.to_string());
            dict_hits += 1;
        } else {
            out_words.push(convert_word_by_rule(word, &consonants));
        }
    }

    ShahmukhiConversion {
        gurmukhi: out_words.join(" "),
        dictionary_hit_ratio: dict_hits as f32 / words.len() as f32,
    }
}

fn convert_word_by_rule(word: &str, consonants: &HashMap<char, &'static str>) -> String {
    let mut out = String::new();
    let mut first = true;
    for c in word.chars() {
        if let Some(mapped) = if first { vowel_initial(c) } else { None } {
            out.push_str(mapped);
        } else if let Some(mapped) = vowel_medial(c) {
            out.push_str(mapped);
        } else if c == 'ں' {
            // Nasalization: tippi after an open vowel sign, bindi
            // otherwise, per the diacritic normalization rule applied
            // downstream in `normalize`; default to bindi here and let
            // normalization promote it when appropriate.
            out.push_str("ਂ");
        } else if let Some(&mapped) = consonants.get(&c) {
            out.push_str(mapped);
        } else {
            // Unknown codepoint: pass through rather than discard content.
            out.push(c);
        }
        first = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_words_convert_directly() {
        let result = convert("دھن گرو نانک");
        assert_eq!(result.gurmukhi, "ਧੰਨ ਗੁਰੂ ਨਾਨਕ");
        assert_eq!(result.dictionary_hit_ratio, 1.0);
    }

    #[test]
    fn unknown_word_falls_back_to_rule_layer() {
        let result = convert("xyz123");
        assert!(result.dictionary_hit_ratio < 1.0);
        assert!(!result.gurmukhi.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let result = convert("");
        assert_eq!(result.gurmukhi, "");
        assert_eq!(result.dictionary_hit_ratio, 1.0);
    }
}
