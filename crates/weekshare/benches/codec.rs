use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use weekshare::anchor::WEEK_ANCHOR;
use weekshare::codec::{decode, encode, TimeRange, MAX_RANGES};
use weekshare::segment::segment;
use weekshare::zone::TimeZoneId;

fn full_week() -> Vec<TimeRange> {
    (0..MAX_RANGES as i64)
        .map(|i| {
            let start = WEEK_ANCHOR.add_minutes(i * 30);
            TimeRange::new(start, start.add_minutes(30))
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let ranges = full_week();
    let token = encode("America/Argentina/ComodRivadavia", &ranges);

    c.bench_function("encode_255_ranges", |b| {
        b.iter(|| encode(black_box("America/Argentina/ComodRivadavia"), black_box(&ranges)))
    });

    c.bench_function("decode_255_ranges", |b| {
        b.iter(|| decode(black_box(&token)))
    });
}

fn bench_segment(c: &mut Criterion) {
    let zone = TimeZoneId::resolve("America/New_York");
    let start = WEEK_ANCHOR.add_minutes(90);
    let end = start.add_minutes(6 * 24 * 60);

    c.bench_function("segment_six_days", |b| {
        b.iter(|| segment(black_box(start), black_box(end), zone))
    });
}

criterion_group!(benches, bench_codec, bench_segment);
criterion_main!(benches);
