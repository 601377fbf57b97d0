use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use glam::{DQuat, DVec3};
use hill_formation::{
    slerp, InterpolatedState, PlaybackEngine, TrajectoryData, TrajectorySample,
};
use std::hint::black_box;

const POLL_ITERS: u64 = 1024;
const SAMPLES: usize = 10_000;
const SATELLITES: usize = 64;

fn series(offset: f64) -> Vec<TrajectorySample> {
    (0..SAMPLES)
        .map(|i| {
            let time = i as f64;
            TrajectorySample::new(
                time,
                DVec3::new(offset + time.sin(), time.cos(), 0.1 * time),
                DQuat::from_rotation_z(0.01 * time),
            )
        })
        .collect()
}

#[inline(always)]
fn poll_interpolate(samples: &[TrajectorySample]) {
    let step = (SAMPLES - 1) as f64 / POLL_ITERS as f64;
    for i in 0..POLL_ITERS {
        let time = i as f64 * step;
        black_box(InterpolatedState::interpolate(samples, black_box(time)));
    }
}

#[inline(always)]
fn poll_slerp(q1: DQuat, q2: DQuat) {
    let multiplier = 1.0 / POLL_ITERS as f64;
    for i in 0..POLL_ITERS {
        black_box(slerp(q1, q2, black_box(i as f64 * multiplier)));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let samples = series(0.0);

    let mut group = c.benchmark_group("playback");
    group.throughput(Throughput::Elements(POLL_ITERS));

    group.bench_function("interpolate", |b| {
        b.iter(|| poll_interpolate(black_box(&samples)))
    });
    group.bench_function("slerp", |b| {
        b.iter(|| {
            poll_slerp(
                black_box(DQuat::from_rotation_x(0.2)),
                black_box(DQuat::from_rotation_y(1.4)),
            )
        })
    });

    group.finish();

    let satellites = (0..SATELLITES).map(|i| series(i as f64)).collect();
    let data = TrajectoryData::new(satellites).expect("benchmark trajectories are well-formed");

    let mut engine = PlaybackEngine::new();
    engine.load(data);
    engine.set_speed(60.0);
    engine.play();

    let mut group = c.benchmark_group("playback_engine");
    group.throughput(Throughput::Elements(SATELLITES as u64));

    group.bench_function("update", |b| {
        b.iter(|| engine.update(black_box(1.0 / 60.0)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
