//! Parse throughput for typical log messages
//!
//! Measures the happy path (full parse with DTBS capture) against the error
//! path (truncated record) so error reporting cost stays off the hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ttc_codec::{encode_dtbs, parse_log_message, LogMessageBuilder};
use ttc_types::{LogTime, OperationType};

fn transaction_record() -> (Vec<u8>, String) {
    let builder = LogMessageBuilder::transaction(OperationType::Finish, 123_456u32)
        .client_id("Kasse-01")
        .process_type("Kassenbeleg-V1")
        .process_data(b"Beleg^75.33_7.99_0.00_0.00_0.00^10.00:Bar".to_vec())
        .signature_counter(987_654u32)
        .log_time(LogTime::UnixTime(1_600_000_000));
    (builder.build(), builder.file_name())
}

fn bench_parse(c: &mut Criterion) {
    let (record, file_name) = transaction_record();
    let mut group = c.benchmark_group("parse_log_message");
    group.throughput(Throughput::Bytes(record.len() as u64));

    group.bench_function("transaction_finish", |b| {
        b.iter(|| parse_log_message(black_box(&record), black_box(&file_name)))
    });

    let truncated = &record[..record.len() / 2];
    group.bench_function("truncated_error_path", |b| {
        b.iter(|| parse_log_message(black_box(truncated), black_box(&file_name)))
    });
    group.finish();
}

fn bench_dtbs(c: &mut Criterion) {
    let (record, file_name) = transaction_record();
    let message = parse_log_message(&record, &file_name).expect("benchmark record parses");

    c.bench_function("encode_dtbs", |b| b.iter(|| encode_dtbs(black_box(&message))));
}

criterion_group!(benches, bench_parse, bench_dtbs);
criterion_main!(benches);
