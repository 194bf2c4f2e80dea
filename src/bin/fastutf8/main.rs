//! fastutf8 CLI: validate files, inspect backends, measure throughput.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bench;
mod generators;
mod list;
mod validate;

#[derive(Debug, Parser)]
#[command(name = "fastutf8")]
#[command(about = "SIMD UTF-8 validation toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Log dispatch decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate files (or stdin) as UTF-8
    Validate(validate::ValidateArgs),
    /// List the available implementations
    List(list::ListArgs),
    /// Compare implementation throughput
    Bench(bench::BenchArgs),
}

/// Parse size string like "1mb", "512KB", "2GB", "1024" (case insensitive)
pub(crate) fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_lowercase();

    if let Ok(bytes) = s.parse::<usize>() {
        return Ok(bytes);
    }

    let (num_str, unit) = if let Some(n) = s.strip_suffix("gb") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('b') {
        (n, 1)
    } else {
        return Err(format!(
            "Invalid size format: '{}'. Use format like '1mb', '512KB', or '1024'",
            s
        ));
    };

    let n = num_str
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid number in size: '{}'", s))?;
    n.checked_mul(unit)
        .ok_or_else(|| format!("Size too large: '{}'", s))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Validate(args) => validate::run(args),
        Command::List(args) => list::run(args),
        Command::Bench(args) => bench::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            validate::exit_codes::IO_ERROR
        }
    };
    std::process::exit(code);
}
