//! Resamples decoded or captured audio to the pipeline's configured rate.
//!
//! Uses `dasp::signal` linear interpolation, consistent with the rest of
//! the audio stack's choice of `dasp` for DSP primitives rather than
//! hand-rolling resampling math.

use dasp::interpolate::linear::Linear;
use dasp::{signal, Signal as DaspSignal};

use crate::audio::types::PcmBuffer;

pub fn resample(input: &PcmBuffer, target_rate: u32) -> PcmBuffer {
    if input.sample_rate == target_rate || input.samples.is_empty() {
        return input.clone();
    }

    let source = signal::from_iter(input.samples.iter().copied());
    let interp = Linear::new(0.0f32, 0.0f32);
    let converted = source.from_hz_to_hz(
        interp,
        input.sample_rate as f64,
        target_rate as f64,
    );

    let target_len =
        (input.samples.len() as f64 * target_rate as f64 / input.sample_rate as f64).ceil() as usize;

    let samples: Vec<f32> = converted.take(target_len).collect();

    PcmBuffer {
        samples,
        sample_rate: target_rate,
    }
}
