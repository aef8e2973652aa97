use criterion::{criterion_group, criterion_main, Criterion};
use drone_follow::{
    AxisPid, FollowConfig, FollowController, LatestCell, TagTelemetryGenerator, TelemetrySnapshot,
};
use std::hint::black_box;

fn benchmark_telemetry_generation(c: &mut Criterion) {
    let mut gen = TagTelemetryGenerator::new(42).with_dropout(0.1, 0.02);
    c.bench_function("telemetry_generate", |b| b.iter(|| gen.generate()));
}

fn benchmark_axis_pid(c: &mut Criterion) {
    let mut pid = AxisPid::new(0.003, 0.0, 0.006);
    c.bench_function("axis_pid_update", |b| {
        b.iter(|| pid.update(black_box(100.0), black_box(85.0), 0.05))
    });
}

fn benchmark_follow_step(c: &mut Criterion) {
    let mut controller = FollowController::from_config(&FollowConfig::default());
    let snapshot = TelemetrySnapshot::tracking(1, 620.0, 430.0, 80.0);
    c.bench_function("follow_step", |b| {
        b.iter(|| controller.step(black_box(Some(&snapshot)), 0.05))
    });
}

fn benchmark_snapshot_cell(c: &mut Criterion) {
    let cell = LatestCell::new();
    let mut gen = TagTelemetryGenerator::new(7);
    c.bench_function("snapshot_store_load", |b| {
        b.iter(|| {
            cell.store(gen.generate());
            black_box(cell.load())
        })
    });
}

criterion_group!(
    benches,
    benchmark_telemetry_generation,
    benchmark_axis_pid,
    benchmark_follow_step,
    benchmark_snapshot_cell
);
criterion_main!(benches);
