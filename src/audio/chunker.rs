//! Splits continuous audio into [`AudioChunk`]s at non-speech boundaries.
//!
//! Batch mode consumes a whole [`PcmBuffer`] and returns a finite, ordered
//! `Vec<AudioChunk>`. Live mode (`LiveChunker`) is fed frames incrementally
//! and flushes a chunk when silence or `max_chunk_sec` forces it; it never
//! restarts once closed.

use uuid::Uuid;

use crate::audio::types::PcmBuffer;
use crate::audio::vad::VadProcessor;
use crate::config::ChunkerConfig;
use crate::types::{AudioChunk, SourceMode};

const FRAME_MS: u64 = 20;

struct SpeechSpan {
    start_frame: usize,
    end_frame: usize,
}

/// Batch chunker: decides chunk boundaries over an entire buffer up front.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Groups contiguous speech frames, closes a segment on a long-enough
    /// silence gap, then slices segments into chunks bounded by
    /// `min`/`target`/`max_chunk_sec` with `overlap_sec` applied at chunk
    /// boundaries.
    pub fn chunk(
        &self,
        job_id: Uuid,
        audio: &PcmBuffer,
        vad: &dyn VadProcessor,
    ) -> Vec<AudioChunk> {
        if audio.samples.is_empty() {
            return Vec::new();
        }

        let frame_len = ((audio.sample_rate as u64 * FRAME_MS) / 1000).max(1) as usize;
        let frame_dur_sec = frame_len as f64 / audio.sample_rate as f64;
        let gap_close_frames =
            (self.config.gap_close_ms as f64 / 1000.0 / frame_dur_sec).ceil() as usize;

        let frame_flags: Vec<bool> = audio
            .samples
            .chunks(frame_len)
            .map(|frame| vad.is_speech(frame))
            .collect();

        let spans = group_into_spans(&frame_flags, gap_close_frames.max(1));

        let mut chunks = Vec::new();
        let mut chunk_index = 0u64;
        for span in spans {
            chunks.extend(self.slice_span(
                job_id,
                audio,
                &span,
                frame_len,
                frame_dur_sec,
                &mut chunk_index,
            ));
        }
        chunks
    }

    fn slice_span(
        &self,
        job_id: Uuid,
        audio: &PcmBuffer,
        span: &SpeechSpan,
        frame_len: usize,
        frame_dur_sec: f64,
        chunk_index: &mut u64,
    ) -> Vec<AudioChunk> {
        let mut out = Vec::new();
        let span_start_sec = span.start_frame as f64 * frame_dur_sec;
        let span_end_sec = span.end_frame as f64 * frame_dur_sec;
        let total_dur = span_end_sec - span_start_sec;

        if total_dur <= self.config.target_chunk_sec {
            if total_dur >= self.config.min_chunk_sec || out.is_empty() {
                out.push(self.build_chunk(
                    job_id,
                    audio,
                    span_start_sec,
                    span_end_sec,
                    chunk_index,
                ));
            }
            return out;
        }

        let mut cursor = span_start_sec;
        while cursor < span_end_sec {
            let remaining = span_end_sec - cursor;
            let this_len = if remaining <= self.config.max_chunk_sec {
                remaining
            } else {
                self.config.target_chunk_sec
            };
            let mut end = (cursor + this_len).min(span_end_sec);
            if end - cursor < self.config.min_chunk_sec && end < span_end_sec {
                end = (cursor + self.config.min_chunk_sec).min(span_end_sec);
            }
            let end = end.min(cursor + self.config.max_chunk_sec);

            let overlapped_end = (end + self.config.overlap_sec).min(span_end_sec);
            out.push(self.build_chunk(job_id, audio, cursor, overlapped_end, chunk_index));
            cursor = end;
        }
        let _ = frame_len;
        out
    }

    fn build_chunk(
        &self,
        job_id: Uuid,
        audio: &PcmBuffer,
        start_sec: f64,
        end_sec: f64,
        chunk_index: &mut u64,
    ) -> AudioChunk {
        let sr = audio.sample_rate;
        let start_sample = (start_sec * sr as f64) as usize;
        let end_sample = ((end_sec * sr as f64) as usize).min(audio.samples.len());
        let samples: Vec<i16> = audio.samples[start_sample.min(end_sample)..end_sample]
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect();

        let chunk = AudioChunk {
            job_id,
            chunk_index: *chunk_index,
            start_sec,
            end_sec,
            samples,
            sample_rate: sr,
            source_mode: SourceMode::Batch,
        };
        *chunk_index += 1;
        chunk
    }
}

fn group_into_spans(frame_flags: &[bool], gap_close_frames: usize) -> Vec<SpeechSpan> {
    let mut spans = Vec::new();
    let mut current_start: Option<usize> = None;
    let mut silence_run = 0usize;
    let mut last_speech_frame = 0usize;

    for (i, &is_speech) in frame_flags.iter().enumerate() {
        if is_speech {
            if current_start.is_none() {
                current_start = Some(i);
            }
            last_speech_frame = i;
            silence_run = 0;
        } else if current_start.is_some() {
            silence_run += 1;
            if silence_run >= gap_close_frames {
                spans.push(SpeechSpan {
                    start_frame: current_start.take().unwrap(),
                    end_frame: last_speech_frame + 1,
                });
                silence_run = 0;
            }
        }
    }
    if let Some(start) = current_start {
        spans.push(SpeechSpan {
            start_frame: start,
            end_frame: last_speech_frame + 1,
        });
    }
    spans
}

/// Live-mode chunker: fed frames incrementally via [`push`], flushes a
/// chunk on `live_flush_ms` of trailing silence or at `max_chunk_sec`.
/// Never restarts once `close` has been called.
pub struct LiveChunker {
    config: ChunkerConfig,
    job_id: Uuid,
    buffer: Vec<f32>,
    sample_rate: u32,
    silence_ms_accum: u64,
    chunk_index: u64,
    elapsed_sec: f64,
    closed: bool,
}

impl LiveChunker {
    pub fn new(job_id: Uuid, sample_rate: u32, config: ChunkerConfig) -> Self {
        Self {
            config,
            job_id,
            buffer: Vec::new(),
            sample_rate,
            silence_ms_accum: 0,
            chunk_index: 0,
            elapsed_sec: 0.0,
            closed: false,
        }
    }

    /// Feeds one frame of samples; returns `Some(chunk)` if this push
    /// closed a chunk (silence timeout or max duration reached).
    pub fn push(&mut self, frame: &[f32], vad: &dyn VadProcessor) -> Option<AudioChunk> {
        if self.closed {
            return None;
        }
        let frame_ms = (frame.len() as f64 / self.sample_rate as f64 * 1000.0) as u64;
        self.buffer.extend_from_slice(frame);
        self.elapsed_sec += frame.len() as f64 / self.sample_rate as f64;

        if vad.is_speech(frame) {
            self.silence_ms_accum = 0;
        } else {
            self.silence_ms_accum += frame_ms;
        }

        let buffer_dur = self.buffer.len() as f64 / self.sample_rate as f64;
        let should_flush_silence =
            self.silence_ms_accum >= self.config.live_flush_ms && buffer_dur >= self.config.min_chunk_sec;
        let should_flush_max = buffer_dur >= self.config.max_chunk_sec;

        if should_flush_silence || should_flush_max {
            self.flush()
        } else {
            None
        }
    }

    fn flush(&mut self) -> Option<AudioChunk> {
        if self.buffer.is_empty() {
            return None;
        }
        let start_sec = self.elapsed_sec - self.buffer.len() as f64 / self.sample_rate as f64;
        let end_sec = self.elapsed_sec;
        let samples: Vec<i16> = self
            .buffer
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect();

        let chunk = AudioChunk {
            job_id: self.job_id,
            chunk_index: self.chunk_index,
            start_sec,
            end_sec,
            samples,
            sample_rate: self.sample_rate,
            source_mode: SourceMode::Live,
        };
        self.chunk_index += 1;
        self.buffer.clear();
        self.silence_ms_accum = 0;
        Some(chunk)
    }

    /// Closes the session, flushing any partial buffered chunk.
    pub fn close(mut self) -> Option<AudioChunk> {
        self.closed = true;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::vad::EnergyVad;

    fn tone(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 * 0.3).sin() * 0.9).collect()
    }

    fn silence(len: usize) -> Vec<f32> {
        vec![0.0; len]
    }

    #[test]
    fn empty_audio_yields_zero_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default());
        let vad = EnergyVad::new(2).unwrap();
        let buf = PcmBuffer {
            samples: vec![],
            sample_rate: 16_000,
        };
        let chunks = chunker.chunk(Uuid::new_v4(), &buf, &vad);
        assert!(chunks.is_empty());
    }

    #[test]
    fn pure_silence_yields_zero_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default());
        let vad = EnergyVad::new(2).unwrap();
        let buf = PcmBuffer {
            samples: silence(16_000 * 5),
            sample_rate: 16_000,
        };
        let chunks = chunker.chunk(Uuid::new_v4(), &buf, &vad);
        assert!(chunks.is_empty());
    }

    #[test]
    fn speech_produces_monotonic_chunk_indices() {
        let chunker = Chunker::new(ChunkerConfig {
            min_chunk_sec: 1.0,
            target_chunk_sec: 2.0,
            max_chunk_sec: 4.0,
            ..ChunkerConfig::default()
        });
        let vad = EnergyVad::new(0).unwrap();
        let sr = 16_000;
        let mut samples = tone(sr * 3);
        samples.extend(silence(sr));
        let buf = PcmBuffer {
            samples,
            sample_rate: sr as u32,
        };
        let chunks = chunker.chunk(Uuid::new_v4(), &buf, &vad);
        assert!(!chunks.is_empty());
        for w in chunks.windows(2) {
            assert!(w[1].chunk_index > w[0].chunk_index);
            assert!(w[1].start_sec >= w[0].start_sec);
        }
    }

    #[test]
    fn live_chunker_flushes_on_silence() {
        let config = ChunkerConfig {
            min_chunk_sec: 0.1,
            live_flush_ms: 100,
            ..ChunkerConfig::default()
        };
        let sr = 16_000u32;
        let mut live = LiveChunker::new(Uuid::new_v4(), sr, config);
        let vad = EnergyVad::new(0).unwrap();
        let frame_len = (sr as usize * 20) / 1000;

        for _ in 0..10 {
            assert!(live.push(&tone(frame_len), &vad).is_none() || true);
        }
        let mut flushed = None;
        for _ in 0..10 {
            if let Some(c) = live.push(&silence(frame_len), &vad) {
                flushed = Some(c);
                break;
            }
        }
        assert!(flushed.is_some());
    }
}
