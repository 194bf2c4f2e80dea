//! Benchmarks for UTF-8 validation.
//!
//! Every implementation the running CPU supports is measured side by side
//! with `core::str::from_utf8`.
//!
//! ## Content Types
//!
//! - **ASCII**: Pure 7-bit ASCII content (the all-ASCII fast path)
//! - **2-byte**: Latin Extended, Greek, Cyrillic
//! - **CJK**: 3-byte sequences
//! - **Emoji**: 4-byte sequences
//! - **Mixed**: Realistic mix of ASCII and multi-byte characters
//! - **Error at end**: ASCII with one bad byte in the last position
//!
//! ## Sizes
//!
//! 1KB, 10KB, 100KB, 1MB

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fastutf8::implementation::available_implementations;

const SIZES: [usize; 4] = [1024, 10 * 1024, 100 * 1024, 1024 * 1024];

/// Repeat `unit` up to `size` bytes, padding the tail with ASCII so no
/// sequence is split.
fn repeat_to(unit: &str, pad: u8, size: usize) -> Vec<u8> {
    let unit = unit.as_bytes();
    let mut result = Vec::with_capacity(size);
    while result.len() + unit.len() <= size {
        result.extend_from_slice(unit);
    }
    result.resize(size, pad);
    result
}

fn generate_ascii(size: usize) -> Vec<u8> {
    repeat_to(
        "The quick brown fox jumps over the lazy dog. 0123456789!@#$%^&*()_+-=[]{}|;':\",./<>?\n",
        b' ',
        size,
    )
}

fn generate_2byte(size: usize) -> Vec<u8> {
    repeat_to(
        "éèêëàâäùûüôöîïçñÉÈÊËÀÂÄÙÛÜÔÖÎÏÇÑαβγδεζηθικλμνξοπρστυφχψωАБВГДЕЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ",
        b'L',
        size,
    )
}

fn generate_cjk(size: usize) -> Vec<u8> {
    repeat_to("日本語中文韓國語漢字假名平仮名片仮名ひらがなカタカナ한글조선어", b'X', size)
}

fn generate_emoji(size: usize) -> Vec<u8> {
    repeat_to("🎉🚀💻🔥🌍😀🎯💡🌟🎨🎭🎪🎢🎡🎠🎰🎲🎳🎱🎾🏀🏈🏐🏉🎿🏂", b'E', size)
}

fn generate_mixed(size: usize) -> Vec<u8> {
    repeat_to(
        "Hello, world! Café résumé naïve über. 日本語 中文 한국어. Emoji: 🎉🚀💻. More ASCII text here.\n",
        b'A',
        size,
    )
}

fn generate_with_error_at_end(size: usize) -> Vec<u8> {
    let mut data = generate_ascii(size);
    if let Some(last) = data.last_mut() {
        *last = 0x80;
    }
    data
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{}mb", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{}kb", bytes / 1024)
    } else {
        format!("{}b", bytes)
    }
}

fn bench_corpus(c: &mut Criterion, group_name: &str, generate: fn(usize) -> Vec<u8>) {
    let mut group = c.benchmark_group(group_name);

    for size in SIZES {
        let data = generate(size);
        let size_name = format_size(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("core_str", &size_name), &data, |b, data| {
            b.iter(|| core::str::from_utf8(black_box(data)).is_ok());
        });

        for imp in available_implementations() {
            if !imp.supported_by_runtime_system() {
                continue;
            }
            group.bench_with_input(BenchmarkId::new(imp.name(), &size_name), &data, |b, data| {
                b.iter(|| imp.validate_utf8(black_box(data)));
            });
        }
    }

    group.finish();
}

fn bench_ascii(c: &mut Criterion) {
    bench_corpus(c, "utf8_ascii", generate_ascii);
}

fn bench_2byte(c: &mut Criterion) {
    bench_corpus(c, "utf8_2byte", generate_2byte);
}

fn bench_cjk(c: &mut Criterion) {
    bench_corpus(c, "utf8_cjk", generate_cjk);
}

fn bench_emoji(c: &mut Criterion) {
    bench_corpus(c, "utf8_emoji", generate_emoji);
}

fn bench_mixed(c: &mut Criterion) {
    bench_corpus(c, "utf8_mixed", generate_mixed);
}

fn bench_error_at_end(c: &mut Criterion) {
    bench_corpus(c, "utf8_error_at_end", generate_with_error_at_end);
}

/// Dispatched entry point against a direct call, to show the indirection cost.
fn bench_dispatch_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("utf8_dispatch_64b");
    let data = generate_mixed(64);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("validate_utf8", |b| {
        b.iter(|| fastutf8::validate_utf8(black_box(&data)));
    });
    group.bench_function("fallback_direct", |b| {
        b.iter(|| fastutf8::text::fallback::validate_utf8(black_box(&data)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ascii,
    bench_2byte,
    bench_cjk,
    bench_emoji,
    bench_mixed,
    bench_error_at_end,
    bench_dispatch_overhead,
);

criterion_main!(benches);
