//! `#[target_feature]` entry points.
//!
//! Each wraps the generic checker for one backend. Because the checker and
//! the vector primitives are `#[inline(always)]`, the whole validation loop
//! is compiled with the backend's features enabled.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::simd::x86::{Avx2, Avx512, Sse42};

#[cfg(target_arch = "aarch64")]
use crate::simd::neon::Neon;

use crate::validate::validate_utf8;

/// # Safety
///
/// The CPU must support AVX-512F, AVX-512BW and AVX-512VBMI.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f,avx512bw,avx512vbmi")]
pub unsafe fn validate_utf8_avx512(input: &[u8]) -> bool {
    unsafe { validate_utf8::<Avx512>(input) }
}

/// # Safety
///
/// The CPU must support AVX2.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
pub unsafe fn validate_utf8_avx2(input: &[u8]) -> bool {
    unsafe { validate_utf8::<Avx2>(input) }
}

/// # Safety
///
/// The CPU must support SSE4.2.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "sse4.2")]
pub unsafe fn validate_utf8_sse42(input: &[u8]) -> bool {
    unsafe { validate_utf8::<Sse42>(input) }
}

/// # Safety
///
/// The CPU must support NEON.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn validate_utf8_neon(input: &[u8]) -> bool {
    unsafe { validate_utf8::<Neon>(input) }
}

/// Scalar validator behind the common entry-point signature.
///
/// # Safety
///
/// Always safe to call.
pub unsafe fn validate_utf8_fallback(input: &[u8]) -> bool {
    crate::text::fallback::validate_utf8(input)
}

/// Entry point of the `unsupported` implementation.
///
/// # Safety
///
/// Always safe to call.
pub unsafe fn validate_utf8_unsupported(_input: &[u8]) -> bool {
    false
}
