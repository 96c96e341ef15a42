//! Live microphone capture feeding the [`crate::audio::chunker::LiveChunker`].
//!
//! Adapted from a cpal-based capture service: enumerate devices, open a
//! default-or-named input stream, and hand frames to the rest of the
//! pipeline over a bounded `mpsc` channel so a slow consumer applies
//! backpressure rather than blocking the audio callback thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tokio::sync::mpsc;

use crate::audio::types::{AudioDevice, AudioError};

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub device_name: Option<String>,
    pub sample_rate: u32,
    pub channel_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            sample_rate: 16_000,
            channel_capacity: 64,
        }
    }
}

/// cpal streams are not `Send` on every platform; the service keeps the
/// stream alive behind the struct and communicates via channel only.
pub struct AudioCaptureService {
    _stream: cpal::Stream,
    pub receiver: mpsc::Receiver<Vec<f32>>,
    pub sample_rate: u32,
    pub channels: u8,
}

unsafe impl Send for AudioCaptureService {}

impl AudioCaptureService {
    pub fn list_devices() -> Result<Vec<AudioDevice>, AudioError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let mut devices = Vec::new();
        let input_devices = host.input_devices().map_err(|e| AudioError::ProcessingFailed {
            message: format!("could not enumerate input devices: {e}"),
        })?;

        for device in input_devices {
            let Ok(name) = device.name() else { continue };
            let Ok(config) = device.default_input_config() else {
                continue;
            };
            devices.push(AudioDevice {
                id: name.clone(),
                is_default: Some(&name) == default_name.as_ref(),
                name,
                sample_rates: vec![config.sample_rate().0],
                channels: config.channels() as u8,
            });
        }
        Ok(devices)
    }

    pub fn start(config: CaptureConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = match &config.device_name {
            Some(name) => host
                .input_devices()
                .ok()
                .and_then(|mut it| it.find(|d| d.name().map(|n| &n == name).unwrap_or(false))),
            None => None,
        }
        .or_else(|| host.default_input_device())
        .ok_or(AudioError::NoInputDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::ProcessingFailed {
                message: format!("no supported input config: {e}"),
            })?;
        let channels = supported.channels() as u8;
        let stream_config: cpal::StreamConfig = supported.config();
        let sample_rate = stream_config.sample_rate.0;

        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _| {
                    // Best-effort send: under backpressure we drop the
                    // oldest unstarted data rather than block the audio
                    // callback thread, matching the live-mode backpressure
                    // policy enforced downstream by the chunk queue.
                    let _ = tx.try_send(data.to_vec());
                },
                move |err| {
                    tracing::warn!(error = %err, "audio input stream error");
                },
                None,
            )
            .map_err(|e| AudioError::ProcessingFailed {
                message: format!("could not build input stream: {e}"),
            })?;

        stream.play().map_err(|e| AudioError::ProcessingFailed {
            message: format!("could not start input stream: {e}"),
        })?;

        Ok(Self {
            _stream: stream,
            receiver: rx,
            sample_rate,
            channels,
        })
    }

    pub fn validate_system() -> Result<(), AudioError> {
        let host = cpal::default_host();
        if host.default_input_device().is_none() {
            return Err(AudioError::NoInputDevice);
        }
        Ok(())
    }
}
