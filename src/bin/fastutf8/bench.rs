//! Throughput comparison across implementations.
//!
//! Times every implementation this CPU supports, plus `core::str::from_utf8`
//! as a baseline, on generated text or on files. Results go to stderr as a
//! table and optionally to a JSONL file, one object per measurement.

use crate::generators::{generate_utf8, Utf8Pattern};
use anyhow::{Context, Result};
use clap::Parser;
use fastutf8::implementation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Compare implementation throughput.
#[derive(Debug, Parser)]
pub struct BenchArgs {
    /// Files to benchmark (generated text if none provided)
    pub files: Vec<PathBuf>,

    /// Pattern for generated text
    #[arg(short, long, value_enum, default_value = "mixed")]
    pub pattern: Utf8Pattern,

    /// Size of generated text (e.g., "1mb", "64kb")
    #[arg(short, long, default_value = "1mb", value_parser = crate::parse_size)]
    pub size: usize,

    /// Random seed for generated text
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Timed runs per implementation (median is reported)
    #[arg(short, long, default_value_t = 5)]
    pub runs: usize,

    /// Untimed warmup runs per implementation
    #[arg(short, long, default_value_t = 1)]
    pub warmup: usize,

    /// Also write results as JSON lines to this file
    #[arg(long)]
    pub jsonl: Option<PathBuf>,
}

/// Benchmark result for a single input and implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub input: String,
    pub implementation: String,
    pub filesize: u64,
    pub valid: bool,
    pub wall_time_ms: f64,
    pub throughput_mib_s: f64,
}

/// Name used for the `core::str::from_utf8` baseline.
const BASELINE: &str = "core::str";

/// Time `f` on `data`, returning the median in milliseconds and the verdict.
fn time_runs(data: &[u8], warmup: usize, runs: usize, f: impl Fn(&[u8]) -> bool) -> (f64, bool) {
    for _ in 0..warmup {
        std::hint::black_box(f(std::hint::black_box(data)));
    }

    let mut times = Vec::with_capacity(runs.max(1));
    let mut valid = false;
    for _ in 0..runs.max(1) {
        let start = Instant::now();
        valid = f(std::hint::black_box(data));
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }
    times.sort_by(|a, b| a.total_cmp(b));
    (times[times.len() / 2], valid)
}

fn throughput_mib_s(bytes: usize, millis: f64) -> f64 {
    if millis <= 0.0 {
        return f64::INFINITY;
    }
    (bytes as f64 / (1024.0 * 1024.0)) / (millis / 1000.0)
}

/// Benchmark one input against the baseline and every supported implementation.
fn benchmark_input(label: &str, data: &[u8], args: &BenchArgs) -> Vec<BenchmarkResult> {
    let make = |name: &str, (millis, valid): (f64, bool)| BenchmarkResult {
        input: label.to_string(),
        implementation: name.to_string(),
        filesize: data.len() as u64,
        valid,
        wall_time_ms: millis,
        throughput_mib_s: throughput_mib_s(data.len(), millis),
    };

    let mut results = vec![make(
        BASELINE,
        time_runs(data, args.warmup, args.runs, |d| {
            core::str::from_utf8(d).is_ok()
        }),
    )];

    for imp in implementation::available_implementations() {
        if !imp.supported_by_runtime_system() {
            tracing::debug!(implementation = imp.name(), "skipping unsupported");
            continue;
        }
        results.push(make(
            imp.name(),
            time_runs(data, args.warmup, args.runs, |d| imp.validate_utf8(d)),
        ));
    }
    results
}

/// Run the bench command. Exits 1 if implementations disagree on any input.
pub fn run(args: BenchArgs) -> Result<i32> {
    let inputs: Vec<(String, Vec<u8>)> = if args.files.is_empty() {
        let label = format!("{}-{}", args.pattern.name(), format_bytes(args.size));
        vec![(label, generate_utf8(args.size, args.pattern, Some(args.seed)))]
    } else {
        args.files
            .iter()
            .map(|path| {
                std::fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
                    .map(|data| (path.display().to_string(), data))
            })
            .collect::<Result<_>>()?
    };

    let mut jsonl_file = args
        .jsonl
        .as_ref()
        .map(|p| File::create(p).with_context(|| format!("Failed to create {}", p.display())))
        .transpose()?;

    eprintln!(
        "{:<28} {:<12} {:>10} {:>12} {:>12}",
        "Input", "Impl", "Size", "Time (ms)", "MiB/s"
    );

    let mut disagreement = false;
    for (label, data) in &inputs {
        let results = benchmark_input(label, data, &args);

        for result in &results {
            eprintln!(
                "{:<28} {:<12} {:>10} {:>12.3} {:>12.1}{}",
                result.input,
                result.implementation,
                format_bytes(data.len()),
                result.wall_time_ms,
                result.throughput_mib_s,
                if result.valid { "" } else { " [INVALID]" }
            );

            if let Some(ref mut f) = jsonl_file {
                serde_json::to_writer(&mut *f, result)?;
                writeln!(f)?;
            }
        }

        if let Some(first) = results.first() {
            for other in &results[1..] {
                if other.valid != first.valid {
                    tracing::error!(
                        input = %label,
                        implementation = %other.implementation,
                        expected = first.valid,
                        "implementation disagrees with baseline"
                    );
                    disagreement = true;
                }
            }
        }
    }

    if let Some(ref mut f) = jsonl_file {
        f.flush()?;
    }

    Ok(if disagreement { 1 } else { 0 })
}

/// Format bytes as human-readable string
fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
