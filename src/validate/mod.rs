//! Width-generic vectorised UTF-8 validation.
//!
//! The algorithm is written once against [`SimdVector`](crate::simd::SimdVector)
//! and monomorphized per backend by [`crate::implementation`].
//!
//! - [`block`] - 64-byte block reader with a zero-padded tail
//! - [`classify`] - nibble lookup tables and multi-byte length check
//! - [`checker`] - cross-block state machine and `validate_utf8::<V>`
//! - [`legacy`] - older carry-propagation checker, kept for cross-checking
//!
//! ```
//! use fastutf8::simd::portable::Portable;
//! use fastutf8::validate::validate_utf8;
//!
//! // Portable needs no target features.
//! assert!(unsafe { validate_utf8::<Portable>("héllo 世界".as_bytes()) });
//! assert!(!unsafe { validate_utf8::<Portable>(&[0xED, 0xA0, 0x80]) });
//! ```

pub mod block;
pub mod checker;
pub mod classify;
pub mod legacy;

pub use block::{BlockReader, BLOCK_SIZE};
pub use checker::{validate_utf8, Utf8Checker};
pub use legacy::validate_utf8_legacy;
