//! Ties together detection, Shahmukhi conversion, diacritic
//! normalization, and romanization into the `ConvertedText` pipeline.

use unicode_normalization::UnicodeNormalization;

use crate::config::{RomanizationScheme, Thresholds};
use crate::script::detect::detect_script;
use crate::script::normalize::normalize;
use crate::script::romanize::romanize;
use crate::script::shahmukhi;
use crate::script::types::ConvertError;
use crate::types::{ConvertedText, ScriptKind};

pub struct ScriptConverter {
    thresholds: Thresholds,
    scheme: RomanizationScheme,
}

impl ScriptConverter {
    pub fn new(thresholds: Thresholds, scheme: RomanizationScheme) -> Self {
        Self { thresholds, scheme }
    }

    /// Converts one piece of text through the full pipeline: NFC →
    /// detect → (Shahmukhi→Gurmukhi) → normalize → romanize → confidence.
    pub fn convert(&self, text: &str) -> Result<ConvertedText, ConvertError> {
        let nfc: String = text.nfc().collect();

        if nfc.trim().is_empty() {
            return Ok(ConvertedText {
                original_text: text.to_string(),
                original_script: ScriptKind::Empty,
                gurmukhi: String::new(),
                roman: String::new(),
                conversion_confidence: 1.0,
                needs_review: false,
            });
        }

        let original_script = detect_script(&nfc, &self.thresholds);

        let (gurmukhi_raw, dict_ratio) = match original_script {
            ScriptKind::Shahmukhi => {
                let conversion = shahmukhi::convert(&nfc);
                (conversion.gurmukhi, Some(conversion.dictionary_hit_ratio))
            }
            ScriptKind::Latin | ScriptKind::Empty => (nfc.clone(), None),
            ScriptKind::Gurmukhi | ScriptKind::Devanagari | ScriptKind::Mixed => (nfc.clone(), None),
        };

        let gurmukhi = normalize(&gurmukhi_raw);

        let roman = if original_script == ScriptKind::Latin {
            nfc.clone()
        } else {
            romanize(&gurmukhi, self.scheme)
        };

        let detection_confidence = detection_confidence_for(original_script);
        let conversion_confidence = match dict_ratio {
            Some(ratio) => detection_confidence * (0.5 + 0.5 * ratio),
            None => detection_confidence,
        };

        let needs_review = conversion_confidence < self.thresholds.script_review_floor;

        Ok(ConvertedText {
            original_text: text.to_string(),
            original_script,
            gurmukhi,
            roman,
            conversion_confidence,
            needs_review,
        })
    }
}

fn detection_confidence_for(script: ScriptKind) -> f32 {
    match script {
        ScriptKind::Gurmukhi | ScriptKind::Latin => 1.0,
        ScriptKind::Shahmukhi => 0.9,
        ScriptKind::Devanagari => 0.85,
        ScriptKind::Mixed => 0.6,
        ScriptKind::Empty => 1.0,
    }
}
