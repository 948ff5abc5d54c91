use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::aspects::{AspectCalculator, AspectCatalogue, AspectProfile, LabelledLongitude, OrbMode};

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::default();

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| calculator.calculate_aspect(black_box(100.0), black_box(102.0)))
    });
}

fn bench_find_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new(
        AspectCatalogue::for_profile(AspectProfile::Expanded, true),
        OrbMode::Standard,
    );
    let points: Vec<LabelledLongitude> = (0..15)
        .map(|i| LabelledLongitude::new(format!("point_{}", i), (i as f64) * 27.3))
        .collect();

    c.bench_function("find_aspects", |b| {
        b.iter(|| calculator.find_aspects(black_box(&points)))
    });

    c.bench_function("find_cross_aspects", |b| {
        b.iter(|| calculator.find_cross_aspects(black_box(&points), black_box(&points)))
    });
}

criterion_group!(benches, bench_calculate_aspect, bench_find_aspects);
criterion_main!(benches);
