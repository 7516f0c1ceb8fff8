//! Benchmarks for the matching engine.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keymatch::matching::{EngineConfig, MatchingEngine, StrategyVersion};
use keymatch::model::{AttributeValue, InventoryCandidate, Point, ShapeDescriptor, Signature};
use std::hint::black_box;

const BOWS: &[&str] = &["round", "oval", "square", "heart", "circle"];
const MATERIALS: &[&str] = &["brass", "bronze", "steel", "nickel silver"];

fn key(i: usize) -> Signature {
    let wobble = (i % 7) as f64 * 0.01;
    Signature::new()
        .with_attribute("stamped_code", AttributeValue::label(format!("KW{}", i % 40)))
        .with_attribute("cut_count", AttributeValue::Numeric((4 + i % 4) as f64))
        .with_attribute("cut_depths", AttributeValue::label(format!("{:05}", i % 997)))
        .with_attribute("bow_shape", AttributeValue::label(BOWS[i % BOWS.len()]))
        .with_attribute("material", AttributeValue::label(MATERIALS[i % MATERIALS.len()]))
        .with_attribute("bow_text", AttributeValue::text(format!("lot {} shelf {}", i % 13, i % 5)))
        .with_shape(
            ShapeDescriptor::from_moments(vec![0.2 + wobble, 0.01, 0.003]).with_contour(
                (0..16)
                    .map(|p| {
                        let t = p as f64 / 16.0 * std::f64::consts::TAU;
                        Point(t.cos() + wobble, t.sin())
                    })
                    .collect(),
            ),
        )
}

fn inventory(size: usize) -> Vec<InventoryCandidate> {
    (0..size)
        .map(|i| InventoryCandidate::new(format!("key-{i}"), key(i)))
        .collect()
}

fn benchmark_match(c: &mut Criterion) {
    let query = key(123);
    let strategy = StrategyVersion::DEFAULT.strategy();
    let mut group = c.benchmark_group("match_signature");

    for size in [100, 1_000, 10_000] {
        let inventory = inventory(size);
        let sequential = MatchingEngine::new(EngineConfig {
            parallel_threshold: usize::MAX,
            ..EngineConfig::default()
        });
        let parallel = MatchingEngine::default();

        group.bench_with_input(BenchmarkId::new("sequential", size), &inventory, |b, inv| {
            b.iter(|| sequential.match_signature(black_box(&query), black_box(inv), &strategy));
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &inventory, |b, inv| {
            b.iter(|| parallel.match_signature(black_box(&query), black_box(inv), &strategy));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_match);
criterion_main!(benches);
