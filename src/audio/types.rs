//! Audio-related type definitions shared across capture, decode, resample,
//! and chunking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audio processing errors. Decode failures are fatal for the job
/// (`PipelineError::AudioDecode`); device errors only matter in live mode.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("unsupported sample rate: {0} (expected {expected})", expected = 16000)]
    UnsupportedSampleRate(u32),

    #[error("could not decode audio file: {message}")]
    DecodeFailed { message: String },

    #[error("audio device disconnected: {device}")]
    DeviceDisconnected { device: String },

    #[error("no input audio device available")]
    NoInputDevice,

    #[error("audio capture permission denied")]
    PermissionDenied,

    #[error("empty audio provided")]
    EmptyAudio,

    #[error("audio processing failed: {message}")]
    ProcessingFailed { message: String },
}

/// Enumerated capture device, independent of the backend that found it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    pub sample_rates: Vec<u32>,
    pub channels: u8,
}

/// A decoded or captured buffer of mono PCM audio prior to chunking.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }

    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect()
    }
}
