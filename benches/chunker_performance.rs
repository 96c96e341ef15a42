//! Chunker throughput across input sizes and VAD aggressiveness levels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uuid::Uuid;

use gurbani_transcribe::audio::chunker::Chunker;
use gurbani_transcribe::audio::types::PcmBuffer;
use gurbani_transcribe::audio::vad::EnergyVad;
use gurbani_transcribe::config::ChunkerConfig;

fn tone_with_pauses(sample_rate: usize, seconds: f64) -> Vec<f32> {
    let total = (sample_rate as f64 * seconds) as usize;
    let mut samples = Vec::with_capacity(total);
    let mut t = 0usize;
    while t < total {
        let burst = (sample_rate as f64 * 1.5) as usize;
        for i in 0..burst.min(total - t) {
            samples.push(((i + t) as f32 * 0.2).sin() * 0.8);
        }
        t += burst;
        let pause = (sample_rate as f64 * 0.3) as usize;
        for _ in 0..pause.min(total.saturating_sub(t)) {
            samples.push(0.0);
        }
        t += pause;
    }
    samples
}

fn benchmark_chunk_durations(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunker_by_duration");
    let sample_rate = 16_000usize;

    for seconds in [10.0, 60.0, 300.0] {
        let samples = tone_with_pauses(sample_rate, seconds);
        let buf = PcmBuffer {
            samples,
            sample_rate: sample_rate as u32,
        };
        group.bench_with_input(
            BenchmarkId::new("chunk", format!("{seconds}s")),
            &buf,
            |b, buf| {
                let chunker = Chunker::new(ChunkerConfig::default());
                let vad = EnergyVad::new(2).unwrap();
                b.iter(|| black_box(chunker.chunk(Uuid::new_v4(), buf, &vad)));
            },
        );
    }
    group.finish();
}

fn benchmark_vad_aggressiveness(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunker_by_aggressiveness");
    let buf = PcmBuffer {
        samples: tone_with_pauses(16_000, 60.0),
        sample_rate: 16_000,
    };

    for aggressiveness in 0u8..=3 {
        group.bench_with_input(
            BenchmarkId::new("chunk", aggressiveness),
            &aggressiveness,
            |b, &aggressiveness| {
                let chunker = Chunker::new(ChunkerConfig::default());
                let vad = EnergyVad::new(aggressiveness).unwrap();
                b.iter(|| black_box(chunker.chunk(Uuid::new_v4(), &buf, &vad)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_chunk_durations, benchmark_vad_aggressiveness);
criterion_main!(benches);
