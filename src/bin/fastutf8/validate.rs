//! CLI handler for the `validate` command.
//!
//! Failures print a rustc-style diagnostic:
//!
//! ```text
//! error: invalid UTF-8 lead byte (byte 0x80)
//!   --> notes.txt:2:3
//!      |
//!    2 | ab\u{FFFD}cd
//!      |   ^ bytes 0x80-0xBF are continuation bytes
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use fastutf8::implementation::{self, Implementation};
use fastutf8::text::utf8::{validate_utf8_scalar, Utf8Error, Utf8ErrorKind};
use std::fmt::{self, Write as _};
use std::io::Read;
use std::path::PathBuf;

/// Check files (or stdin) for well-formed UTF-8.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Files to check; stdin when empty
    pub files: Vec<PathBuf>,

    /// Validate with this implementation instead of the active one
    #[arg(short, long)]
    pub implementation: Option<String>,

    /// Print nothing; report through the exit code only
    #[arg(short, long)]
    pub quiet: bool,

    /// Always emit ANSI colors
    #[arg(short = 'C', long = "color")]
    pub color: bool,

    /// Never emit ANSI colors
    #[arg(short = 'M', long = "no-color")]
    pub no_color: bool,
}

/// Process exit codes.
pub mod exit_codes {
    /// Every input is well-formed.
    pub const SUCCESS: i32 = 0;
    /// At least one input is malformed.
    pub const INVALID: i32 = 1;
    /// An input could not be read, or the arguments were unusable.
    pub const IO_ERROR: i32 = 2;
}

/// Parts of a diagnostic that get their own color.
#[derive(Debug, Clone, Copy)]
enum Role {
    Error,
    Location,
    Gutter,
    Caret,
    Hint,
}

impl Role {
    fn ansi(self) -> &'static str {
        match self {
            Role::Error => "\x1b[1;31m",
            Role::Location => "\x1b[1;34m",
            Role::Gutter => "\x1b[0;34m",
            Role::Caret => "\x1b[1;32m",
            Role::Hint => "\x1b[0;33m",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn from_args(args: &ValidateArgs) -> Self {
        let enabled = match (args.no_color, args.color) {
            (true, _) => false,
            (false, true) => true,
            (false, false) => atty::is(atty::Stream::Stderr),
        };
        Self { enabled }
    }

    fn paint<T: fmt::Display>(self, role: Role, text: T) -> String {
        if self.enabled {
            format!("{}{}\x1b[0m", role.ansi(), text)
        } else {
            text.to_string()
        }
    }
}

/// Resolve `--implementation`, refusing names this CPU cannot run.
fn select(name: Option<&str>) -> Result<&'static Implementation> {
    let Some(name) = name else {
        return Ok(implementation::active_implementation());
    };
    let Some(imp) = implementation::find(name) else {
        let known: Vec<_> = implementation::available_implementations()
            .iter()
            .map(|imp| imp.name())
            .collect();
        bail!("unknown implementation '{}' (known: {})", name, known.join(", "));
    };
    if !imp.supported_by_runtime_system() {
        bail!(
            "implementation '{}' needs {} which this CPU lacks",
            name,
            imp.required_instruction_sets()
        );
    }
    Ok(imp)
}

/// Outcome of checking one input.
enum Outcome {
    Valid,
    Invalid(Option<Utf8Error>),
}

fn check(imp: &Implementation, input: &[u8]) -> Outcome {
    if imp.validate_utf8(input) {
        return Outcome::Valid;
    }
    // Only the `unsupported` sentinel rejects input the locator accepts.
    Outcome::Invalid(validate_utf8_scalar(input).err())
}

/// Run the validate command.
pub fn run(args: ValidateArgs) -> Result<i32> {
    let palette = Palette::from_args(&args);
    let imp = select(args.implementation.as_deref())?;
    tracing::debug!(implementation = imp.name(), "validating");

    let mut inputs: Vec<(String, Result<Vec<u8>>)> = Vec::new();
    if args.files.is_empty() {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read from stdin")?;
        inputs.push(("<stdin>".to_string(), Ok(buf)));
    } else {
        for path in &args.files {
            let data = std::fs::read(path).with_context(|| path.display().to_string());
            inputs.push((path.to_string_lossy().into_owned(), data));
        }
    }

    let mut code = exit_codes::SUCCESS;
    for (name, data) in inputs {
        let data = match data {
            Ok(data) => data,
            Err(e) => {
                if !args.quiet {
                    eprintln!("{}: {:#}", palette.paint(Role::Error, "error"), e);
                }
                code = exit_codes::IO_ERROR;
                continue;
            }
        };

        match check(imp, &data) {
            Outcome::Valid => {}
            Outcome::Invalid(err) => {
                if !args.quiet {
                    match err {
                        Some(err) => {
                            let diagnostic = Diagnostic {
                                err: &err,
                                input: &data,
                                name: &name,
                            };
                            eprint!("{}", diagnostic.render(palette));
                        }
                        None => eprintln!(
                            "{}: {}: rejected by implementation '{}'",
                            palette.paint(Role::Error, "error"),
                            name,
                            imp.name()
                        ),
                    }
                }
                if code == exit_codes::SUCCESS {
                    code = exit_codes::INVALID;
                }
            }
        }
    }

    Ok(code)
}

/// One located error, ready to render.
struct Diagnostic<'a> {
    err: &'a Utf8Error,
    input: &'a [u8],
    name: &'a str,
}

impl Diagnostic<'_> {
    fn headline(&self) -> String {
        let kind = self.err.kind;
        match (kind, self.input.get(self.err.offset)) {
            (Utf8ErrorKind::InvalidLeadByte | Utf8ErrorKind::InvalidContinuationByte, Some(b)) => {
                format!("{} (byte 0x{:02X})", kind, b)
            }
            (Utf8ErrorKind::TruncatedSequence, _) => format!("{} at end of input", kind),
            _ => kind.to_string(),
        }
    }

    fn render(&self, palette: Palette) -> String {
        let snippet = error_snippet(self.input, self.err.offset, self.err.column);
        let line_no = self.err.line.to_string();
        let width = line_no.len().max(3);
        let gutter = palette.paint(Role::Gutter, "|");
        let pad = " ".repeat(width + 2);

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}: {}", palette.paint(Role::Error, "error"), self.headline());
        let _ = writeln!(
            out,
            "  {}",
            palette.paint(
                Role::Location,
                format_args!("--> {}:{}:{}", self.name, self.err.line, self.err.column)
            )
        );
        let _ = writeln!(out, "{}{}", pad, gutter);
        let _ = writeln!(
            out,
            " {} {} {}",
            palette.paint(Role::Gutter, format_args!("{:>width$}", line_no, width = width)),
            gutter,
            snippet.line_content
        );
        let _ = write!(
            out,
            "{}{} {}{}",
            pad,
            gutter,
            " ".repeat(snippet.caret_offset),
            palette.paint(Role::Caret, "^")
        );
        if let Some(hint) = hint(self.err.kind) {
            let _ = write!(out, " {}", palette.paint(Role::Hint, hint));
        }
        out.push_str("\n\n");
        out
    }
}

fn hint(kind: Utf8ErrorKind) -> Option<&'static str> {
    match kind {
        Utf8ErrorKind::InvalidLeadByte => Some("bytes 0x80-0xBF are continuation bytes"),
        Utf8ErrorKind::InvalidContinuationByte => Some("expected byte 0x80-0xBF"),
        Utf8ErrorKind::OverlongEncoding => Some("use shortest possible encoding"),
        Utf8ErrorKind::SurrogateCodepoint => Some("U+D800-U+DFFF are reserved for UTF-16"),
        Utf8ErrorKind::OutOfRangeCodepoint => Some("maximum is U+10FFFF"),
        Utf8ErrorKind::TruncatedSequence => None,
    }
}

/// The line around an error, ready to print under the location.
#[derive(Debug, PartialEq)]
struct ErrorSnippet {
    line_content: String,
    /// Display columns before the caret.
    caret_offset: usize,
}

const MAX_SNIPPET_BYTES: usize = 80;

/// Extract the line containing `offset`, clipped to a window around it.
///
/// Invalid bytes render as U+FFFD; the caret sits under the first character
/// at or after the error.
fn error_snippet(input: &[u8], offset: usize, column: usize) -> ErrorSnippet {
    let line_start = offset + 1 - column;
    let line_end = input[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(input.len(), |i| offset + i);
    let line = &input[line_start..line_end];
    let error_col = offset - line_start;

    let (start, prefix) = if line.len() <= MAX_SNIPPET_BYTES || error_col < MAX_SNIPPET_BYTES / 2 {
        (0, "")
    } else {
        (error_col - MAX_SNIPPET_BYTES / 2, "...")
    };
    let end = (start + MAX_SNIPPET_BYTES).min(line.len());
    let suffix = if end < line.len() { "..." } else { "" };

    let before = String::from_utf8_lossy(&line[start..error_col]);
    let rest = String::from_utf8_lossy(&line[error_col..end]);
    let before = before.trim_end_matches('\r');
    let rest = rest.trim_end_matches('\r');

    ErrorSnippet {
        line_content: format!("{}{}{}{}", prefix, before, rest, suffix),
        caret_offset: prefix.len() + before.chars().count(),
    }
}
