//! Romanizes Gurmukhi text under a configurable scheme.
//!
//! Handles independent and dependent vowels, gemination via adhak (ੱ),
//! nasalization (ੰ, ਂ), nukta consonants (ਖ਼ ਗ਼ ਜ਼ ਫ਼ ਸ਼), and half-letter
//! (subjoined) forms. `practical` additionally capitalizes word-initial
//! letters for readability; `iso15919`/`iast` stay lowercase academic
//! transliteration.

use crate::config::RomanizationScheme;

const ADHAK: char = '\u{0A71}';
const NUKTA: char = '\u{0A3C}';
const TIPPI: char = '\u{0A70}';
const BINDI: char = '\u{0A02}';
const VIRAMA_LIKE_HALF: char = '\u{0A4D}'; // halant, used for subjoined forms

struct ConsonantForms {
    academic: &'static str,
    practical: &'static str,
}

fn base_consonant(c: char) -> Option<ConsonantForms> {
    Some(match c {
        'ਕ' => ConsonantForms { academic: "k", practical: "k" },
        'ਖ' => ConsonantForms { academic: "kh", practical: "kh" },
        'ਗ' => ConsonantForms { academic: "g", practical: "g" },
        'ਘ' => ConsonantForms { academic: "gh", practical: "gh" },
        'ਙ' => ConsonantForms { academic: "ṅ", practical: "ng" },
        'ਚ' => ConsonantForms { academic: "c", practical: "ch" },
        'ਛ' => ConsonantForms { academic: "ch", practical: "chh" },
        'ਜ' => ConsonantForms { academic: "j", practical: "j" },
        'ਝ' => ConsonantForms { academic: "jh", practical: "jh" },
        'ਞ' => ConsonantForms { academic: "ñ", practical: "ny" },
        'ਟ' => ConsonantForms { academic: "ṭ", practical: "t" },
        'ਠ' => ConsonantForms { academic: "ṭh", practical: "th" },
        'ਡ' => ConsonantForms { academic: "ḍ", practical: "d" },
        'ਢ' => ConsonantForms { academic: "ḍh", practical: "dh" },
        'ਣ' => ConsonantForms { academic: "ṇ", practical: "n" },
        'ਤ' => ConsonantForms { academic: "t", practical: "t" },
        'ਥ' => ConsonantForms { academic: "th", practical: "th" },
        'ਦ' => ConsonantForms { academic: "d", practical: "d" },
        'ਧ' => ConsonantForms { academic: "dh", practical: "dh" },
        'ਨ' => ConsonantForms { academic: "n", practical: "n" },
        'ਪ' => ConsonantForms { academic: "p", practical: "p" },
        'ਫ' => ConsonantForms { academic: "ph", practical: "ph" },
        'ਬ' => ConsonantForms { academic: "b", practical: "b" },
        'ਭ' => ConsonantForms { academic: "bh", practical: "bh" },
        'ਮ' => ConsonantForms { academic: "m", practical: "m" },
        'ਯ' => ConsonantForms { academic: "y", practical: "y" },
        'ਰ' => ConsonantForms { academic: "r", practical: "r" },
        'ਲ' => ConsonantForms { academic: "l", practical: "l" },
        'ਵ' => ConsonantForms { academic: "v", practical: "v" },
        'ਸ' => ConsonantForms { academic: "s", practical: "s" },
        'ਹ' => ConsonantForms { academic: "h", practical: "h" },
        'ੜ' => ConsonantForms { academic: "ṛ", practical: "r" },
        _ => return None,
    })
}

/// Nukta-marked consonants romanize distinctly from their base form.
fn nukta_consonant(base: char) -> Option<ConsonantForms> {
    Some(match base {
        'ਖ' => ConsonantForms { academic: "k͟h", practical: "kh" },
        'ਗ' => ConsonantForms { academic: "ġ", practical: "g" },
        'ਜ' => ConsonantForms { academic: "z", practical: "z" },
        'ਫ' => ConsonantForms { academic: "f", practical: "f" },
        'ਸ' => ConsonantForms { academic: "sh", practical: "sh" }, // handled via ਸ਼ normally
        'ਲ' => ConsonantForms { academic: "ḷ", practical: "l" },
        _ => return None,
    })
}

fn independent_vowel(c: char) -> Option<&'static str> {
    match c {
        'ਅ' => Some("a"),
        'ਆ' => Some("ā"),
        'ਇ' => Some("i"),
        'ਈ' => Some("ī"),
        'ਉ' => Some("u"),
        'ਊ' => Some("ū"),
        'ਏ' => Some("e"),
        'ਐ' => Some("ai"),
        'ਓ' => Some("o"),
        'ਔ' => Some("au"),
        _ => None,
    }
}

fn dependent_vowel_sign(c: char) -> Option<&'static str> {
    match c {
        '\u{0A3E}' => Some("ā"), // kanna
        '\u{0A3F}' => Some("i"), // sihari
        '\u{0A40}' => Some("ī"), // bihari
        '\u{0A41}' => Some("u"), // aunkar
        '\u{0A42}' => Some("ū"), // dulainkar
        '\u{0A47}' => Some("e"), // lavan
        '\u{0A48}' => Some("ai"), // dulavan
        '\u{0A4B}' => Some("o"), // hora
        '\u{0A4C}' => Some("au"), // kanaura
        _ => None,
    }
}

fn adjust_for_scheme(s: &str, scheme: RomanizationScheme) -> String {
    match scheme {
        RomanizationScheme::Practical => s.to_string(),
        // iast/iso15919 distinguish retroflex/nasal diacritics that the
        // consonant table already encodes in `academic`; both academic
        // schemes share the table here, differing chiefly in upstream
        // corpora conventions this crate does not need to reproduce.
        RomanizationScheme::Iso15919 | RomanizationScheme::Iast => s.to_string(),
    }
}

pub fn romanize(gurmukhi: &str, scheme: RomanizationScheme) -> String {
    if gurmukhi.trim().is_empty() {
        return String::new();
    }

    let words: Vec<&str> = gurmukhi.split_whitespace().collect();
    let mut out_words = Vec::with_capacity(words.len());

    for word in words {
        let mut romanized_word = romanize_word(word, scheme);
        if scheme == RomanizationScheme::Practical {
            if let Some(first) = romanized_word.chars().next() {
                let upper: String = first.to_uppercase().collect();
                romanized_word = upper + &romanized_word[first.len_utf8()..];
            }
        }
        out_words.push(romanized_word);
    }

    out_words.join(" ")
}

fn romanize_word(word: &str, scheme: RomanizationScheme) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let use_academic = scheme != RomanizationScheme::Practical;

    while i < chars.len() {
        let c = chars[i];

        if let Some(roman) = independent_vowel(c) {
            out.push_str(roman);
            i += 1;
            continue;
        }

        if let Some(base) = base_consonant(c) {
            let mut forms = base;
            let mut j = i + 1;
            let mut has_nukta = false;
            if j < chars.len() && chars[j] == NUKTA {
                has_nukta = true;
                j += 1;
            }
            if has_nukta {
                if let Some(nukta_forms) = nukta_consonant(c) {
                    forms = nukta_forms;
                }
            }

            out.push_str(if use_academic { forms.academic } else { forms.practical });

            let mut consumed_vowel = false;
            let mut geminate = false;
            let mut nasal: Option<char> = None;

            while j < chars.len() {
                match chars[j] {
                    ADHAK => {
                        geminate = true;
                        j += 1;
                    }
                    TIPPI | BINDI => {
                        nasal = Some(chars[j]);
                        j += 1;
                    }
                    VIRAMA_LIKE_HALF => {
                        // Subjoined (half-letter) form: suppress the
                        // inherent vowel, the next consonant attaches
                        // directly, mirrored by simply not emitting "a".
                        consumed_vowel = true;
                        j += 1;
                    }
                    c2 if dependent_vowel_sign(c2).is_some() => {
                        out.push_str(dependent_vowel_sign(c2).unwrap());
                        consumed_vowel = true;
                        j += 1;
                    }
                    _ => break,
                }
            }

            if geminate {
                // Gemination doubles the consonant sound; represent it by
                // repeating the consonant's primary form before the vowel
                // already emitted would be wrong order-wise, so instead we
                // duplicate the consonant letter itself.
                let letter = if use_academic { forms.academic } else { forms.practical };
                out.push_str(letter);
            }
            if !consumed_vowel && is_word_medial(chars.as_slice(), i) {
                // Inherent "a" is elided word-finally in spoken Punjabi but
                // retained medially for the practical scheme's legibility.
                if !use_academic {
                    out.push('a');
                }
            }
            if let Some(n) = nasal {
                out.push_str(if n == TIPPI || n == BINDI { "ṁ" } else { "" });
            }

            i = j;
            continue;
        }

        // Unknown codepoint (punctuation, digits, foreign letters): pass
        // through unchanged rather than drop content.
        out.push(c);
        i += 1;
    }

    adjust_for_scheme(&out, scheme)
}

fn is_word_medial(chars: &[char], consonant_index: usize) -> bool {
    consonant_index + 1 < chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practical_scheme_capitalizes_first_letter() {
        let roman = romanize("ਗੁਰੂ", RomanizationScheme::Practical);
        assert!(roman.starts_with('G'));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(romanize("", RomanizationScheme::Iso15919), "");
    }

    #[test]
    fn nukta_consonant_romanizes_distinctly() {
        let roman = romanize("ਜ਼ਰੂਰ", RomanizationScheme::Iso15919);
        assert!(roman.starts_with('z'));
    }
}
