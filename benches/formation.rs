use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hill_formation::{
    lattice, FormationConfig, FormationGenerator, FormationInitializer, FormationSpec, Pattern,
    Scale,
};
use std::hint::black_box;

const MEAN_MOTION: f64 = 0.0011;
const COUNTS: [usize; 3] = [100, 1_000, 10_000];

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("hexagonal", count), &count, |b, &count| {
            b.iter(|| lattice::hexagonal_points(black_box(count)))
        });
        group.bench_with_input(BenchmarkId::new("square", count), &count, |b, &count| {
            b.iter(|| lattice::square_points(black_box(count)))
        });
        group.bench_with_input(BenchmarkId::new("concentric", count), &count, |b, &count| {
            b.iter(|| lattice::concentric_points(black_box(count)))
        });
    }

    group.finish();

    let initializer = FormationInitializer::new(MEAN_MOTION);
    let mut group = c.benchmark_group("formation");

    for pattern in [
        Pattern::PeriodicOrbit,
        Pattern::RandomPeriodic,
        Pattern::HexagonalDisk,
        Pattern::SquareLatticeDisk,
    ] {
        let spec = FormationSpec {
            pattern,
            count: 1_000,
            scale: Scale::Spacing(5.0),
            ..Default::default()
        };

        group.throughput(Throughput::Elements(spec.expected_len() as u64));
        group.bench_function(pattern.name(), |b| {
            b.iter(|| initializer.generate(black_box(&spec)))
        });
    }

    let mut config = FormationConfig::default();
    for pattern in [Pattern::HexagonalDisk, Pattern::ConcentricDisk] {
        let layer = config.add_layer(Some(pattern.name()));
        layer.pattern = pattern;
        layer.satellite_count = 500;
    }
    let generator = FormationGenerator::new(MEAN_MOTION);

    group.throughput(Throughput::Elements(config.total_satellite_count() as u64 + 1));
    group.bench_function("layered config", |b| {
        b.iter(|| generator.generate(black_box(&config)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
