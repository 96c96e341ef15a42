//! Voice activity detection used by the chunker.
//!
//! Classifies short frames (10-30ms) as speech/non-speech. Aggressiveness
//! is an integer knob in `{0,1,2,3}` the way WebRTC-style VADs expose it;
//! higher aggressiveness raises the energy/spectral-centroid bar a frame
//! must clear to count as speech.

use crate::audio::types::AudioError;

pub trait VadProcessor: Send + Sync {
    /// Returns a speech probability in `[0, 1]` for one frame of samples.
    fn classify_frame(&self, frame: &[f32]) -> f32;

    fn is_speech(&self, frame: &[f32]) -> bool {
        self.classify_frame(frame) >= self.threshold()
    }

    fn threshold(&self) -> f32;
}

/// Energy + spectral-centroid heuristic VAD. Stands in for a model-backed
/// implementation (e.g. Silero) behind the same trait.
pub struct EnergyVad {
    threshold: f32,
}

impl EnergyVad {
    pub fn new(aggressiveness: u8) -> Result<Self, AudioError> {
        if aggressiveness > 3 {
            return Err(AudioError::ProcessingFailed {
                message: format!("vad_aggressiveness must be 0-3, got {aggressiveness}"),
            });
        }
        // Higher aggressiveness requires more energy to call a frame speech,
        // trading recall for fewer false positives on noisy input.
        let threshold = 0.30 + 0.12 * aggressiveness as f32;
        Ok(Self { threshold })
    }

    fn spectral_centroid(&self, frame: &[f32]) -> f32 {
        let mut weighted_sum = 0.0f32;
        let mut magnitude_sum = 0.0f32;
        for (i, &sample) in frame.iter().enumerate() {
            let magnitude = sample.abs();
            weighted_sum += i as f32 * magnitude;
            magnitude_sum += magnitude;
        }
        if magnitude_sum > 0.0 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }
}

impl VadProcessor for EnergyVad {
    fn classify_frame(&self, frame: &[f32]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        let energy: f32 = frame.iter().map(|&x| x * x).sum::<f32>() / frame.len() as f32;
        let centroid = self.spectral_centroid(frame);

        let energy_score: f32 = if energy > 0.002 { 0.65 } else { 0.0 };
        let spectral_score: f32 = if centroid > 2.0 && centroid < (frame.len() as f32 * 0.6) {
            0.35
        } else {
            0.0
        };
        (energy_score + spectral_score).min(1.0)
    }

    fn threshold(&self) -> f32 {
        self.threshold
    }
}
