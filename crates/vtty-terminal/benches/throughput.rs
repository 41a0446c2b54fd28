//! Throughput of the emulator on typical command output
//!
//! Run with: cargo bench -p vtty-terminal

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vtty_terminal::{Terminal, VirtualTerminal};

const SIZES: [usize; 2] = [4 * 1024, 64 * 1024];

/// Plain text lines that keep the grid scrolling
fn text_lines(size: usize) -> String {
    "The quick brown fox jumps over the lazy dog.\n"
        .chars()
        .cycle()
        .take(size)
        .collect()
}

/// Colored build output, every line wrapped in SGR
fn colored_output(size: usize) -> String {
    "\x1b[1;32m   Compiling\x1b[0m vtty v0.1.0\r\n"
        .chars()
        .cycle()
        .take(size)
        .collect()
}

/// Progress bar redrawn in place
fn progress_redraw(size: usize) -> String {
    let mut data = String::with_capacity(size);
    let mut pct = 0u32;
    while data.len() < size {
        data.push_str(&format!("\r\x1b[K[{:<20}] {pct:>3}%", "#".repeat((pct / 5) as usize)));
        pct = (pct + 1) % 101;
    }
    data
}

/// Absolute cursor addressing and erases
fn cursor_heavy(size: usize) -> String {
    "\x1b[H\x1b[2J\x1b[5;10Hx\x1b[A\x1b[3C\x1b[1K\x1b[10d\x1b[G"
        .chars()
        .cycle()
        .take(size)
        .collect()
}

fn bench_process(c: &mut Criterion) {
    let inputs: [(&str, fn(usize) -> String); 4] = [
        ("text_lines", text_lines),
        ("colored_output", colored_output),
        ("progress_redraw", progress_redraw),
        ("cursor_heavy", cursor_heavy),
    ];

    let mut group = c.benchmark_group("process");
    for size in SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        for (name, generate) in inputs {
            let data = generate(size);
            group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
                let mut term = Terminal::new(80, 24).unwrap();
                b.iter(|| term.process(black_box(data)));
            });
        }
    }
    group.finish();
}

fn bench_channels(c: &mut Criterion) {
    let stdout = text_lines(32 * 1024);
    let stderr = colored_output(32 * 1024);
    let chunks: Vec<(&[u8], &[u8])> = stdout
        .as_bytes()
        .chunks(512)
        .zip(stderr.as_bytes().chunks(512))
        .collect();

    let mut group = c.benchmark_group("channels");
    group.throughput(Throughput::Bytes((stdout.len() + stderr.len()) as u64));
    group.bench_function("interleaved_512b_chunks", |b| {
        let term = VirtualTerminal::new(80, 24).unwrap();
        b.iter(|| {
            for (primary, secondary) in &chunks {
                term.write_primary(black_box(primary)).unwrap();
                term.write_secondary(black_box(secondary)).unwrap();
            }
        });
    });
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let term = VirtualTerminal::new(200, 60).unwrap();
    term.write_primary(text_lines(64 * 1024)).unwrap();

    c.bench_function("snapshot_200x60", |b| b.iter(|| black_box(term.snapshot())));
    c.bench_function("trimmed_snapshot_200x60", |b| {
        b.iter(|| black_box(term.trimmed_snapshot()))
    });
}

criterion_group!(benches, bench_process, bench_channels, bench_snapshot);
criterion_main!(benches);
