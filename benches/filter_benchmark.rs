//! Benchmarks for jaclean filtering performance.
//!
//! Run with: cargo bench
//!
//! Documents are synthesized from a fixed seed so runs are comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jaclean::{
    LanguageModel, NgWordDictionary, NgWordMatcher, Pipeline, PipelineOptions, QualityMetrics,
    Record,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const PHRASES: &[&str] = &[
    "吾輩は猫である",
    "名前はまだ無い",
    "どこで生れたかとんと見当がつかぬ",
    "何でも薄暗いじめじめした所で",
    "ニャーニャー泣いていた事だけは記憶している",
    "人間というものを見た",
    "書生という人間中で一番獰悪な種族であった",
    "しかしその当時は何という考もなかった",
    "フワフワした感じがあったばかりである",
    "今日は良い天気です",
];

/// Creates a synthetic document with the given number of paragraphs.
fn create_test_text(paragraph_count: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut paragraphs = Vec::with_capacity(paragraph_count);
    for _ in 0..paragraph_count {
        let sentences = rng.gen_range(2..6);
        let mut paragraph = String::new();
        for _ in 0..sentences {
            let parts = rng.gen_range(1..4);
            for i in 0..parts {
                if i > 0 {
                    paragraph.push('、');
                }
                paragraph.push_str(PHRASES.choose(&mut rng).copied().unwrap_or_default());
            }
            paragraph.push('。');
        }
        paragraphs.push(paragraph);
    }
    paragraphs.join("\n")
}

/// Benchmark quality metric computation at various sizes.
fn bench_quality_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality_metrics");

    for para_count in [10, 100, 500].iter() {
        let text = create_test_text(*para_count, 42);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &text, |b, text| {
            b.iter(|| QualityMetrics::compute(black_box(text)));
        });
    }

    group.finish();
}

/// Benchmark the longest-match NG-word scan.
fn bench_ngword_scan(c: &mut Criterion) {
    let dictionary = NgWordDictionary::from_words(["人間", "獰悪", "薄暗い", "猫", "見当"]);
    let matcher = NgWordMatcher::new(&dictionary);
    let mut group = c.benchmark_group("ngword_scan");

    for para_count in [10, 100, 500].iter() {
        let text = create_test_text(*para_count, 7);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &text, |b, text| {
            b.iter(|| matcher.stats(black_box(text), text.len()));
        });
    }

    group.finish();
}

/// Benchmark language identification scoring.
fn bench_language_score(c: &mut Criterion) {
    let weights: HashMap<String, f64> = ["の", "は", "た", "です", "である"]
        .iter()
        .map(|s| (s.to_string(), 0.5))
        .collect();
    let model = LanguageModel::from_weights(weights);
    let text = create_test_text(100, 3);

    c.bench_function("language_score", |b| {
        b.iter(|| model.score(black_box(&text)));
    });
}

/// Benchmark sequential and parallel batch annotation.
fn bench_batch_annotation(c: &mut Criterion) {
    let records: Vec<Record> = (0..256)
        .map(|i| Record::new(create_test_text(20, i)))
        .collect();
    let mut group = c.benchmark_group("batch_annotation");

    for (name, options) in [
        ("sequential", PipelineOptions::default().sequential()),
        ("parallel", PipelineOptions::default()),
    ] {
        let pipeline = Pipeline::new(options);
        group.bench_function(name, |b| {
            b.iter(|| pipeline.annotate_batch(black_box(&records)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_quality_metrics,
    bench_ngword_scan,
    bench_language_score,
    bench_batch_annotation,
);
criterion_main!(benches);
