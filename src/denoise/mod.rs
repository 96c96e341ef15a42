//! Pluggable denoise filter invoked (and toggled) by the orchestrator
//! before chunking. The filter family itself — what "denoising" means —
//! is an external collaborator; this module only fixes the trait boundary
//! and ships one concrete backend plus stubs for the rest.

use rustfft::num_complex::Complex32;
use rustfft::FftPlanner;
use thiserror::Error;

use crate::audio::types::PcmBuffer;
use crate::config::{DenoiseBackend, DenoiseConfig, DenoiseStrength};

#[derive(Debug, Error)]
pub enum DenoiseError {
    #[error("denoise backend '{backend}' is unavailable: {message}")]
    BackendUnavailable { backend: String, message: String },
}

pub trait DenoiseFilter: Send + Sync {
    fn apply(&self, audio: &mut PcmBuffer) -> Result<(), DenoiseError>;
}

pub struct NoOpFilter;

impl DenoiseFilter for NoOpFilter {
    fn apply(&self, _audio: &mut PcmBuffer) -> Result<(), DenoiseError> {
        Ok(())
    }
}

/// FFT-based spectral noise gate: estimates a noise floor from the first
/// window and attenuates bins below it, scaled by `strength`.
pub struct SpectralGateFilter {
    strength: DenoiseStrength,
    window_size: usize,
}

impl SpectralGateFilter {
    pub fn new(strength: DenoiseStrength) -> Self {
        Self {
            strength,
            window_size: 1024,
        }
    }

    fn gate_factor(&self) -> f32 {
        match self.strength {
            DenoiseStrength::Light => 1.5,
            DenoiseStrength::Medium => 2.5,
            DenoiseStrength::Aggressive => 4.0,
        }
    }
}

impl DenoiseFilter for SpectralGateFilter {
    fn apply(&self, audio: &mut PcmBuffer) -> Result<(), DenoiseError> {
        if audio.samples.len() < self.window_size {
            return Ok(());
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(self.window_size);
        let ifft = planner.plan_fft_inverse(self.window_size);
        let gate_factor = self.gate_factor();

        let mut processed = vec![0.0f32; audio.samples.len()];
        let mut pos = 0;
        while pos + self.window_size <= audio.samples.len() {
            let mut buffer: Vec<Complex32> = audio.samples[pos..pos + self.window_size]
                .iter()
                .map(|&s| Complex32::new(s, 0.0))
                .collect();
            fft.process(&mut buffer);

            let magnitudes: Vec<f32> = buffer.iter().map(|c| c.norm()).collect();
            let mut sorted = magnitudes.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let noise_floor = sorted[sorted.len() / 4];
            let threshold = noise_floor * gate_factor;

            for (c, &mag) in buffer.iter_mut().zip(magnitudes.iter()) {
                if mag < threshold {
                    *c *= 0.1;
                }
            }

            ifft.process(&mut buffer);
            let scale = 1.0 / self.window_size as f32;
            for (i, c) in buffer.iter().enumerate() {
                processed[pos + i] = c.re * scale;
            }
            pos += self.window_size;
        }
        for i in pos..audio.samples.len() {
            processed[i] = audio.samples[i];
        }

        audio.samples = processed;
        Ok(())
    }
}

/// Learned backends are out of scope for this crate (§ external
/// collaborators); the config surface is honored but selecting them fails
/// loudly rather than silently falling back to a different backend.
pub struct UnavailableLearnedFilter {
    backend: &'static str,
}

impl DenoiseFilter for UnavailableLearnedFilter {
    fn apply(&self, _audio: &mut PcmBuffer) -> Result<(), DenoiseError> {
        Err(DenoiseError::BackendUnavailable {
            backend: self.backend.to_string(),
            message: "learned denoise backends are not bundled with this crate".to_string(),
        })
    }
}

pub fn build_filter(config: &DenoiseConfig) -> Box<dyn DenoiseFilter> {
    if !config.enabled {
        return Box::new(NoOpFilter);
    }
    match config.backend {
        DenoiseBackend::Spectral => Box::new(SpectralGateFilter::new(config.strength)),
        DenoiseBackend::Learned1 => Box::new(UnavailableLearnedFilter { backend: "learned1" }),
        DenoiseBackend::Learned2 => Box::new(UnavailableLearnedFilter { backend: "learned2" }),
    }
}
