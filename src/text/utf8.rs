//! UTF-8 validation with detailed error reporting.
//!
//! [`validate_utf8_detailed`] reports:
//! - The exact byte offset of the error
//! - The line number (1-indexed)
//! - The column number (1-indexed, in bytes)
//! - The specific type of UTF-8 violation
//!
//! Valid input is confirmed by the active vector implementation; only input
//! that fails is rescanned byte by byte to locate the first error.
//!
//! ## UTF-8 Encoding Rules
//!
//! UTF-8 is a variable-width encoding that uses 1-4 bytes per character:
//!
//! | Bytes | First byte    | Continuation bytes | Code point range     |
//! |-------|---------------|-------------------|----------------------|
//! | 1     | `0xxxxxxx`    | -                 | U+0000 - U+007F      |
//! | 2     | `110xxxxx`    | `10xxxxxx`        | U+0080 - U+07FF      |
//! | 3     | `1110xxxx`    | `10xxxxxx` × 2    | U+0800 - U+FFFF      |
//! | 4     | `11110xxx`    | `10xxxxxx` × 3    | U+10000 - U+10FFFF   |
//!
//! ## Validation Checks
//!
//! The validator checks for:
//! 1. **Invalid lead bytes**: Bytes 0x80-0xBF appearing where a lead byte is expected
//! 2. **Invalid continuation bytes**: Non-continuation bytes where continuation expected
//! 3. **Overlong encodings**: Using more bytes than necessary (security vulnerability)
//! 4. **Surrogate code points**: U+D800-U+DFFF (reserved for UTF-16)
//! 5. **Out of range**: Code points above U+10FFFF
//! 6. **Truncated sequences**: Multi-byte sequence cut off at end of input

/// Error information for UTF-8 validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf8Error {
    /// The byte offset where the error occurred (0-indexed).
    pub offset: usize,
    /// The line number where the error occurred (1-indexed).
    pub line: usize,
    /// The column (byte position within the line, 1-indexed).
    pub column: usize,
    /// The kind of UTF-8 error.
    pub kind: Utf8ErrorKind,
}

impl Utf8Error {
    /// Build an error at `offset`, deriving line and column from `input`.
    fn at(input: &[u8], offset: usize, kind: Utf8ErrorKind) -> Self {
        let before = &input[..offset];
        let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        Self {
            offset,
            line,
            column: offset - line_start + 1,
            kind,
        }
    }
}

impl core::fmt::Display for Utf8Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at byte {}, line {}, column {}",
            self.kind, self.offset, self.line, self.column
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Utf8Error {}

/// The specific type of UTF-8 validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8ErrorKind {
    /// A byte in the range 0x80-0xBF (or 0xF8-0xFF) appeared where a lead
    /// byte was expected.
    InvalidLeadByte,

    /// A byte outside the range 0x80-0xBF appeared where a continuation byte was expected.
    InvalidContinuationByte,

    /// A character was encoded using more bytes than necessary.
    /// For example, encoding ASCII 'A' (U+0041) as `C1 81` instead of `41`.
    OverlongEncoding,

    /// A surrogate code point (U+D800-U+DFFF) was encoded.
    SurrogateCodepoint,

    /// A code point above U+10FFFF was encoded.
    OutOfRangeCodepoint,

    /// A multi-byte sequence was truncated at the end of input.
    TruncatedSequence,
}

impl core::fmt::Display for Utf8ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLeadByte => write!(f, "invalid UTF-8 lead byte"),
            Self::InvalidContinuationByte => write!(f, "invalid UTF-8 continuation byte"),
            Self::OverlongEncoding => write!(f, "overlong UTF-8 encoding"),
            Self::SurrogateCodepoint => write!(f, "surrogate code point in UTF-8"),
            Self::OutOfRangeCodepoint => write!(f, "code point above U+10FFFF"),
            Self::TruncatedSequence => write!(f, "truncated UTF-8 sequence"),
        }
    }
}

/// Validate `input`, reporting the first error in detail.
///
/// Agrees with [`crate::validate_utf8`] whenever a registered implementation
/// is active.
///
/// When `FASTUTF8_FORCE_IMPLEMENTATION` selects `unsupported`, the fast path
/// never confirms and the scalar locator decides, so well-formed input still
/// returns `Ok(())` even though [`crate::validate_utf8`] rejects it. Callers
/// relying on the override to refuse all input should check
/// [`crate::active_implementation`] or use [`crate::validate_utf8`].
///
/// # Examples
///
/// ```
/// use fastutf8::text::utf8::{validate_utf8_detailed, Utf8ErrorKind};
///
/// assert!(validate_utf8_detailed("émoji: 🎉".as_bytes()).is_ok());
///
/// let err = validate_utf8_detailed(b"ok\n\xED\xA0\x80").unwrap_err();
/// assert_eq!(err.kind, Utf8ErrorKind::SurrogateCodepoint);
/// assert_eq!((err.offset, err.line, err.column), (3, 2, 1));
/// ```
pub fn validate_utf8_detailed(input: &[u8]) -> Result<(), Utf8Error> {
    if crate::validate_utf8(input) {
        return Ok(());
    }
    validate_utf8_scalar(input)
}

/// Locate the first UTF-8 error with a byte-by-byte scan.
///
/// Lead-relative problems (overlong, surrogate, out of range, truncated) are
/// reported at the lead byte; a bad continuation byte is reported at its own
/// offset.
pub fn validate_utf8_scalar(input: &[u8]) -> Result<(), Utf8Error> {
    let len = input.len();
    let mut pos = 0;

    while pos < len {
        let byte = input[pos];
        let fail = |offset, kind| Err(Utf8Error::at(input, offset, kind));

        let seq_len = match byte {
            0x00..=0x7F => {
                pos += 1;
                continue;
            }
            0x80..=0xBF | 0xF8..=0xFF => return fail(pos, Utf8ErrorKind::InvalidLeadByte),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };

        // Continuations first, so a non-continuation byte is reported even
        // when the sequence would also run past the end.
        let mut cp = u32::from(byte) & (0x7F >> seq_len);
        for i in 1..seq_len {
            match input.get(pos + i) {
                None => return fail(pos, Utf8ErrorKind::TruncatedSequence),
                Some(&b) if !is_continuation_byte(b) => {
                    return fail(pos + i, Utf8ErrorKind::InvalidContinuationByte)
                }
                Some(&b) => cp = (cp << 6) | u32::from(b & 0x3F),
            }
        }

        let min = match seq_len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if cp < min {
            return fail(pos, Utf8ErrorKind::OverlongEncoding);
        }
        if (0xD800..=0xDFFF).contains(&cp) {
            return fail(pos, Utf8ErrorKind::SurrogateCodepoint);
        }
        if cp > 0x10_FFFF {
            return fail(pos, Utf8ErrorKind::OutOfRangeCodepoint);
        }

        pos += seq_len;
    }

    Ok(())
}

/// Check if a byte is a valid UTF-8 continuation byte (0x80-0xBF).
#[inline(always)]
fn is_continuation_byte(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// Get the expected sequence length from a lead byte.
/// Returns 0 for invalid lead bytes (continuation bytes or 0xF8+).
#[inline]
pub fn sequence_length(lead_byte: u8) -> usize {
    match lead_byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}
