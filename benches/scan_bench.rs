//! Performance benchmarks for failure classification and card decoding.
//!
//! Both functions run once per settled scan, so they are cheap in absolute
//! terms. These benches exist to catch regressions in the message fallback
//! path, which lowercases and scans the full diagnostic text.
//!
//! # Run Benchmarks
//!
//! ```sh
//! cargo bench --bench scan_bench
//!
//! # Run a single group
//! cargo bench --bench scan_bench -- classify
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tapscan_core::{FailureCode, FailureSignal, RawTag, TagTechnology, classify, decode};

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    let signals = vec![
        ("structured_cancel", FailureSignal::from_code(FailureCode::Cancelled)),
        ("message_cancel", FailureSignal::from_message("UserCancel requested")),
        (
            "message_read_failed",
            FailureSignal::from_message("no tag technology matched"),
        ),
        (
            "message_unknown_long",
            FailureSignal::from_message("x".repeat(512)),
        ),
        ("empty", FailureSignal::default()),
    ];

    for (name, signal) in signals {
        group.bench_with_input(BenchmarkId::new("signal", name), &signal, |b, signal| {
            b.iter(|| black_box(classify(black_box(signal))));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    let tags = vec![
        (
            "felica_mapped",
            RawTag::new().with_idm("0123456789AB").with_system_code("0003"),
        ),
        (
            "felica_unmapped",
            RawTag::new().with_idm("0123456789AB").with_system_code("ZZZZ"),
        ),
        ("generic_id", RawTag::new().with_id("04ABCDEF")),
        ("empty", RawTag::new()),
    ];

    for (name, tag) in tags {
        group.bench_with_input(BenchmarkId::new("tag", name), &tag, |b, tag| {
            b.iter(|| black_box(decode(black_box(tag), TagTechnology::Felica)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_decode);
criterion_main!(benches);
