//! Criterion benchmarks for the inbound line framer and command parser.
//!
//! Measures how long it takes to turn raw transport chunks into parsed
//! commands, for whole lines, byte-at-a-time delivery, and a long partial
//! line that arrives in many small chunks.
//!
//! Run with:
//! ```bash
//! cargo bench --package pinlock-core --bench framer_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pinlock_core::{Command, LineFramer};

// ── Input fixtures ────────────────────────────────────────────────────────────

fn session_script() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"AUTH:4820\r\nAUTH:4821\r\n");
    for _ in 0..50 {
        bytes.extend_from_slice(b"CMD:LOCK\nCMD:UNLOCK:4821\r\nHELLO\n");
    }
    bytes
}

fn drain(framer: &mut LineFramer, chunk: &[u8]) -> usize {
    framer
        .feed(chunk)
        .filter_map(Result::ok)
        .map(|line| Command::parse(&line))
        .filter(Command::is_privileged)
        .count()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_chunk_sizes(c: &mut Criterion) {
    let script = session_script();
    let mut group = c.benchmark_group("frame_and_parse");

    for chunk_size in [1usize, 16, 1024] {
        group.bench_with_input(
            BenchmarkId::new("chunk", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut framer = LineFramer::new();
                    let mut privileged = 0;
                    for chunk in script.chunks(chunk_size) {
                        privileged += drain(&mut framer, black_box(chunk));
                    }
                    privileged
                })
            },
        );
    }
    group.finish();
}

fn bench_long_partial_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_partial_line");

    // 64 KiB arriving in 64-byte chunks before a terminator shows up.
    group.bench_function("64KiB_in_64B_chunks", |b| {
        let chunk = [b'x'; 64];
        b.iter(|| {
            let mut framer = LineFramer::new();
            for _ in 0..1024 {
                drain(&mut framer, black_box(&chunk));
            }
            drain(&mut framer, b"\n")
        })
    });

    group.finish();
}

criterion_group!(benches, bench_chunk_sizes, bench_long_partial_line);
criterion_main!(benches);
