//! Quote engine latency: candidate detection through the full three-stage
//! match against scripture indexes of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gurbani_transcribe::config::PipelineConfig;
use gurbani_transcribe::quote::QuoteEngine;
use gurbani_transcribe::scripture::ScriptureIndex;
use gurbani_transcribe::types::{RouteKind, ScriptureLine, ScriptureSource};

const SAMPLE_LINES: &[&str] = &[
    "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ",
    "ਨਿਰਭਉ ਨਿਰਵੈਰੁ ਅਕਾਲ ਮੂਰਤਿ",
    "ਅਜੂਨੀ ਸੈਭੰ ਗੁਰ ਪ੍ਰਸਾਦਿ",
    "ਧੰਨ ਗੁਰੂ ਨਾਨਕ ਦੇਵ ਜੀ",
    "ਵਾਹਿਗੁਰੂ ਜੀ ਕਾ ਖਾਲਸਾ ਵਾਹਿਗੁਰੂ ਜੀ ਕੀ ਫਤਹਿ",
];

fn build_index(line_count: usize) -> ScriptureIndex {
    let lines = (0..line_count)
        .map(|i| ScriptureLine {
            line_id: format!("l{i}"),
            source: ScriptureSource::Sggs,
            gurmukhi: SAMPLE_LINES[i % SAMPLE_LINES.len()].to_string(),
            roman: None,
            ang: Some((i / 20) as u32 + 1),
            raag: None,
            author: None,
            shabad_id: Some(format!("s{}", i / 8)),
            line_position: Some((i % 8) as u32),
        })
        .collect();
    ScriptureIndex::from_lines(lines)
}

fn benchmark_index_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("quote_engine_by_index_size");
    let config = PipelineConfig::default();

    for line_count in [100usize, 1_000, 10_000] {
        let index = build_index(line_count);
        group.bench_with_input(
            BenchmarkId::new("process", line_count),
            &index,
            |b, index| {
                let engine = QuoteEngine::new(Some(index), &config);
                b.iter(|| {
                    black_box(engine.process(RouteKind::ScriptureQuoteLikely, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", &[]))
                });
            },
        );
    }
    group.finish();
}

fn benchmark_plain_speech_rejection(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let index = build_index(1_000);
    let engine = QuoteEngine::new(Some(&index), &config);

    c.bench_function("quote_engine_plain_speech_fast_path", |b| {
        b.iter(|| black_box(engine.process(RouteKind::English, "just talking casually today", &[])));
    });
}

criterion_group!(benches, benchmark_index_sizes, benchmark_plain_speech_rejection);
criterion_main!(benches);
