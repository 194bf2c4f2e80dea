//! # fastutf8
//!
//! SIMD UTF-8 validation with runtime CPU dispatch.
//!
//! One width-generic algorithm (nibble lookup tables plus a 2-/3-byte
//! lookback length check) runs on whichever vector unit the CPU offers:
//! AVX-512, AVX2 or SSE4.2 on x86, NEON on aarch64, and a scalar fallback
//! everywhere else.
//!
//! ## Module Organization
//!
//! - [`simd`] - Vector primitive trait and its backends
//! - [`validate`] - Block reader, byte classifier and checker state machine
//! - [`text`] - Scalar fallback and error-locating validators
//! - [`isa`] - CPU instruction-set detection
//! - [`implementation`] - Backend registry and runtime dispatch
//!
//! ## Quick Start
//!
//! ```
//! // Empty input is valid.
//! assert!(fastutf8::validate_utf8(b""));
//! assert!(fastutf8::validate_utf8("héllo 世界".as_bytes()));
//!
//! // Overlong, surrogate, above U+10FFFF, truncated.
//! assert!(!fastutf8::validate_utf8(&[0xC0, 0x80]));
//! assert!(!fastutf8::validate_utf8(&[0xED, 0xA0, 0x80]));
//! assert!(!fastutf8::validate_utf8(&[0xF4, 0x90, 0x80, 0x80]));
//! assert!(!fastutf8::validate_utf8(&[0xE6, 0x97]));
//!
//! // Where it went wrong.
//! let err = fastutf8::validate_utf8_detailed(b"abc\x80").unwrap_err();
//! assert_eq!(err.offset, 3);
//! ```
//!
//! ## Choosing an implementation
//!
//! ```
//! for imp in fastutf8::available_implementations() {
//!     if imp.supported_by_runtime_system() {
//!         assert!(imp.validate_utf8(b"hello"));
//!     }
//! }
//! println!("using {}", fastutf8::active_implementation().name());
//! ```
//!
//! Set `FASTUTF8_FORCE_IMPLEMENTATION=<name>` to force one. Unknown names,
//! or names this CPU cannot run, select an implementation that rejects all
//! input.
//!
//! ## Features
//!
//! - `std` (default) - runtime CPU detection, the environment override and
//!   `std::error::Error` for [`Utf8Error`]. Without it the crate is `no_std`
//!   and picks backends from compile-time target features.
//! - `cli` - the `fastutf8` binary

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// =============================================================================
// Core modules
// =============================================================================

/// Width-generic vector primitives.
pub mod simd;

/// Vectorised UTF-8 validation.
pub mod validate;

/// Scalar UTF-8 validators.
pub mod text;

/// CPU instruction-set detection.
pub mod isa;

/// Implementation registry and dispatch.
pub mod implementation;

// =============================================================================
// Public re-exports
// =============================================================================

pub use implementation::{
    active_implementation, available_implementations, detect_best_supported, Implementation,
};
pub use isa::{detect_supported_architectures, InstructionSet};
pub use text::utf8::{validate_utf8_detailed, Utf8Error, Utf8ErrorKind};

// =============================================================================
// Entry point
// =============================================================================

/// True iff `input` is well-formed UTF-8 (RFC 3629).
///
/// Uses [`active_implementation`], selected on the first call.
#[inline]
pub fn validate_utf8(input: &[u8]) -> bool {
    let imp = active_implementation();
    // SAFETY: the active implementation is only ever one whose requirements
    // the running CPU meets, or a sentinel that requires nothing.
    unsafe { imp.validate_utf8_unchecked(input) }
}
