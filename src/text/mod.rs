//! Scalar UTF-8 validators.
//!
//! - [`fallback`] - branchy boolean validator, the `fallback` implementation
//!   and the correctness oracle for every vector backend
//! - [`utf8`] - error-locating validator with byte offset, line and column
//!
//! ```
//! use fastutf8::text::utf8::{validate_utf8_detailed, Utf8ErrorKind};
//!
//! assert!(validate_utf8_detailed("日本語".as_bytes()).is_ok());
//!
//! // Bare continuation byte
//! let err = validate_utf8_detailed(&[0x80]).unwrap_err();
//! assert_eq!(err.kind, Utf8ErrorKind::InvalidLeadByte);
//! assert_eq!(err.offset, 0);
//! ```

pub mod fallback;
pub mod utf8;

pub use utf8::{sequence_length, validate_utf8_detailed, Utf8Error, Utf8ErrorKind};
