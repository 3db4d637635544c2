//! Benchmarks for packet encoding throughput.
//!
//! The encoders run three times per cycle on the hot path, so they should
//! stay comfortably below the pacing interval even at high send frequencies.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use gridcast::config::RevLightConfig;
use gridcast::packets::{car_status, car_telemetry, lap_data};
use gridcast::telemetry::{MIN_BUFFER_LEN, TelemetrySnapshot, offset};
use std::hint::black_box;

fn sample_snapshot() -> TelemetrySnapshot {
    let mut buffer = vec![0u8; MIN_BUFFER_LEN];
    buffer[offset::PIT_FLAG_STATUS] = 4;
    buffer[offset::LAP_NUMBER] = 12;
    buffer[offset::CAR_POSITION] = 3;
    buffer[offset::FUEL..offset::FUEL + 2].copy_from_slice(&512u16.to_le_bytes());
    buffer[offset::SPEED..offset::SPEED + 2].copy_from_slice(&289i16.to_le_bytes());
    buffer[offset::GEAR] = 6;
    buffer[offset::ENGINE_RPM..offset::ENGINE_RPM + 2].copy_from_slice(&15_400u16.to_le_bytes());
    buffer[offset::CURRENT_LAP_TIME_MS..offset::CURRENT_LAP_TIME_MS + 4]
        .copy_from_slice(&48_200u32.to_le_bytes());
    buffer[offset::DELTA_AHEAD_MS..offset::DELTA_AHEAD_MS + 4]
        .copy_from_slice(&3_100u32.to_le_bytes());

    let rev_lights = RevLightConfig { min_rpm: 9000, max_rpm: 17_000, max_percent: 90 };
    TelemetrySnapshot::read(&buffer, &rev_lights).expect("sample buffer is well-formed")
}

fn bench_snapshot_extraction(c: &mut Criterion) {
    let buffer = vec![0u8; MIN_BUFFER_LEN];
    let rev_lights = RevLightConfig { min_rpm: 9000, max_rpm: 17_000, max_percent: 90 };

    let mut group = c.benchmark_group("snapshot_extraction");
    group.throughput(Throughput::Bytes(MIN_BUFFER_LEN as u64));
    group.bench_function("read", |b| {
        b.iter(|| TelemetrySnapshot::read(black_box(&buffer), black_box(&rev_lights)))
    });
    group.finish();
}

fn bench_packet_encoders(c: &mut Criterion) {
    let snapshot = sample_snapshot();

    let mut group = c.benchmark_group("packet_encoding");
    group.bench_function("car_telemetry", |b| {
        b.iter(|| car_telemetry::encode(black_box(&snapshot)))
    });
    group.bench_function("lap_data", |b| {
        b.iter(|| lap_data::encode(black_box(&snapshot), black_box(83_421)))
    });
    group.bench_function("car_status", |b| b.iter(|| car_status::encode(black_box(&snapshot))));
    group.finish();
}

criterion_group!(benches, bench_snapshot_extraction, bench_packet_encoders);
criterion_main!(benches);
