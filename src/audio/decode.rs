//! Batch file decoding: turns file bytes into a mono [`PcmBuffer`].
//!
//! Backed by `symphonia` so common container/codec combinations (wav, mp3,
//! flac, ogg/vorbis) are supported without shelling out. Decode failures
//! are mapped to `AudioError::DecodeFailed`, which the orchestrator turns
//! into the job-fatal `PipelineError::AudioDecode`.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::types::{AudioError, PcmBuffer};

pub fn decode_file(path: &Path) -> Result<PcmBuffer, AudioError> {
    let file = File::open(path).map_err(|e| AudioError::DecodeFailed {
        message: format!("could not open {}: {e}", path.display()),
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::DecodeFailed {
            message: format!("unrecognized container for {}: {e}", path.display()),
        })?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::DecodeFailed {
            message: "no decodable audio track found".to_string(),
        })?
        .clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::DecodeFailed {
            message: format!("unsupported codec: {e}"),
        })?;

    let track_id = track.id;
    let source_rate = track.codec_params.sample_rate.unwrap_or(16_000);
    let source_channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1)
        .max(1);

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AudioError::DecodeFailed {
                    message: format!("demux error: {e}"),
                })
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => append_mono(&mut samples, &decoded, source_channels),
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => {
                return Err(AudioError::DecodeFailed {
                    message: format!("decode error: {e}"),
                })
            }
        }
    }

    if samples.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    Ok(PcmBuffer {
        samples,
        sample_rate: source_rate,
    })
}

fn append_mono(out: &mut Vec<f32>, decoded: &AudioBufferRef, channels: usize) {
    macro_rules! mix_down {
        ($buf:expr) => {{
            let frames = $buf.frames();
            for i in 0..frames {
                let mut acc = 0.0f32;
                for ch in 0..channels.min($buf.spec().channels.count()) {
                    acc += $buf.chan(ch)[i] as f32;
                }
                out.push(acc / channels as f32);
            }
        }};
    }

    match decoded {
        AudioBufferRef::F32(buf) => mix_down!(buf),
        AudioBufferRef::S32(buf) => {
            let frames = buf.frames();
            for i in 0..frames {
                let mut acc = 0.0f32;
                for ch in 0..channels.min(buf.spec().channels.count()) {
                    acc += buf.chan(ch)[i] as f32 / i32::MAX as f32;
                }
                out.push(acc / channels as f32);
            }
        }
        AudioBufferRef::S16(buf) => {
            let frames = buf.frames();
            for i in 0..frames {
                let mut acc = 0.0f32;
                for ch in 0..channels.min(buf.spec().channels.count()) {
                    acc += buf.chan(ch)[i] as f32 / i16::MAX as f32;
                }
                out.push(acc / channels as f32);
            }
        }
        _ => {
            // Other sample formats are rare for katha/kirtan recordings;
            // skip rather than abort the whole decode.
        }
    }
}
