//! x86/x86_64 SIMD backends.
//!
//! - [`Sse42`]: 128-bit, byte shuffle from SSSE3 and `ptest` from SSE4.1
//! - [`Avx2`]: 256-bit; cross-lane shifts go through `vperm2i128`
//! - [`Avx512`]: 512-bit; cross-lane shifts use the VBMI byte permute

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::SimdVector;

// ============================================================================
// SSE4.2 (128-bit)
// ============================================================================

/// 16 lanes in an XMM register.
#[derive(Clone, Copy)]
pub struct Sse42(__m128i);

impl SimdVector for Sse42 {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(byte: u8) -> Self {
        unsafe { Sse42(_mm_set1_epi8(byte as i8)) }
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= Self::LANES);
        unsafe { Sse42(_mm_loadu_si128(bytes.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Sse42(_mm_or_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Sse42(_mm_and_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Sse42(_mm_xor_si128(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Sse42(_mm_add_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn saturating_sub(self, other: Self) -> Self {
        unsafe { Sse42(_mm_subs_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn shr4(self) -> Self {
        // No 8-bit shift on x86: shift 16-bit lanes and mask off the
        // bits pulled in from the neighbouring byte.
        unsafe { Sse42(_mm_and_si128(_mm_srli_epi16::<4>(self.0), _mm_set1_epi8(0x0F))) }
    }

    #[inline(always)]
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self {
        unsafe {
            let tbl = _mm_loadu_si128(table.as_ptr() as *const __m128i);
            Sse42(_mm_shuffle_epi8(tbl, self.0))
        }
    }

    #[inline(always)]
    unsafe fn prev1(self, prev: Self) -> Self {
        unsafe { Sse42(_mm_alignr_epi8::<15>(self.0, prev.0)) }
    }

    #[inline(always)]
    unsafe fn prev2(self, prev: Self) -> Self {
        unsafe { Sse42(_mm_alignr_epi8::<14>(self.0, prev.0)) }
    }

    #[inline(always)]
    unsafe fn prev3(self, prev: Self) -> Self {
        unsafe { Sse42(_mm_alignr_epi8::<13>(self.0, prev.0)) }
    }

    #[inline(always)]
    unsafe fn signed_gt(self, other: Self) -> Self {
        unsafe { Sse42(_mm_cmpgt_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn eq(self, other: Self) -> Self {
        unsafe { Sse42(_mm_cmpeq_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn is_ascii(self) -> bool {
        unsafe { _mm_movemask_epi8(self.0) == 0 }
    }

    #[inline(always)]
    unsafe fn any_bit_set(self) -> bool {
        unsafe { _mm_testz_si128(self.0, self.0) == 0 }
    }
}

// ============================================================================
// AVX2 (256-bit)
// ============================================================================

/// 32 lanes in a YMM register.
#[derive(Clone, Copy)]
pub struct Avx2(__m256i);

impl Avx2 {
    /// `[prev.high, self.low]`: the 16 bytes that precede each 128-bit half
    /// of `self` in the stream.
    #[inline(always)]
    unsafe fn preceding_halves(self, prev: Self) -> __m256i {
        unsafe { _mm256_permute2x128_si256::<0x21>(prev.0, self.0) }
    }
}

impl SimdVector for Avx2 {
    const LANES: usize = 32;

    #[inline(always)]
    unsafe fn splat(byte: u8) -> Self {
        unsafe { Avx2(_mm256_set1_epi8(byte as i8)) }
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= Self::LANES);
        unsafe { Avx2(_mm256_loadu_si256(bytes.as_ptr() as *const __m256i)) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_or_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_and_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_xor_si256(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_add_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn saturating_sub(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_subs_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn shr4(self) -> Self {
        unsafe {
            Avx2(_mm256_and_si256(
                _mm256_srli_epi16::<4>(self.0),
                _mm256_set1_epi8(0x0F),
            ))
        }
    }

    #[inline(always)]
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self {
        // vpshufb looks up within each 128-bit half, so the table is
        // broadcast to both halves.
        unsafe {
            let tbl = _mm256_broadcastsi128_si256(_mm_loadu_si128(table.as_ptr() as *const __m128i));
            Avx2(_mm256_shuffle_epi8(tbl, self.0))
        }
    }

    #[inline(always)]
    unsafe fn prev1(self, prev: Self) -> Self {
        unsafe { Avx2(_mm256_alignr_epi8::<15>(self.0, self.preceding_halves(prev))) }
    }

    #[inline(always)]
    unsafe fn prev2(self, prev: Self) -> Self {
        unsafe { Avx2(_mm256_alignr_epi8::<14>(self.0, self.preceding_halves(prev))) }
    }

    #[inline(always)]
    unsafe fn prev3(self, prev: Self) -> Self {
        unsafe { Avx2(_mm256_alignr_epi8::<13>(self.0, self.preceding_halves(prev))) }
    }

    #[inline(always)]
    unsafe fn signed_gt(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_cmpgt_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn eq(self, other: Self) -> Self {
        unsafe { Avx2(_mm256_cmpeq_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn is_ascii(self) -> bool {
        unsafe { _mm256_movemask_epi8(self.0) == 0 }
    }

    #[inline(always)]
    unsafe fn any_bit_set(self) -> bool {
        unsafe { _mm256_testz_si256(self.0, self.0) == 0 }
    }
}

// ============================================================================
// AVX-512 (512-bit)
// ============================================================================

/// Permute indices selecting lane `i - n` of `prev ++ self` for
/// `vpermt2b`/`vpermi2b` with `a = prev`, `b = self`.
const fn shift_indices(n: u8) -> [u8; 64] {
    let mut out = [0u8; 64];
    let mut i = 0;
    while i < 64 {
        out[i] = 64 - n + i as u8;
        i += 1;
    }
    out
}

static PREV1_INDICES: [u8; 64] = shift_indices(1);
static PREV2_INDICES: [u8; 64] = shift_indices(2);
static PREV3_INDICES: [u8; 64] = shift_indices(3);

/// 64 lanes in a ZMM register.
#[derive(Clone, Copy)]
pub struct Avx512(__m512i);

impl Avx512 {
    #[inline(always)]
    unsafe fn shift_in(self, prev: Self, indices: &[u8; 64]) -> Self {
        unsafe {
            let idx = _mm512_loadu_si512(indices.as_ptr().cast());
            Avx512(_mm512_permutex2var_epi8(prev.0, idx, self.0))
        }
    }
}

impl SimdVector for Avx512 {
    const LANES: usize = 64;

    #[inline(always)]
    unsafe fn splat(byte: u8) -> Self {
        unsafe { Avx512(_mm512_set1_epi8(byte as i8)) }
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= Self::LANES);
        unsafe { Avx512(_mm512_loadu_si512(bytes.as_ptr().cast())) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_or_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_and_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_xor_si512(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_add_epi8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn saturating_sub(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_subs_epu8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn shr4(self) -> Self {
        unsafe {
            Avx512(_mm512_and_si512(
                _mm512_srli_epi16::<4>(self.0),
                _mm512_set1_epi8(0x0F),
            ))
        }
    }

    #[inline(always)]
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self {
        unsafe {
            let tbl = _mm512_broadcast_i32x4(_mm_loadu_si128(table.as_ptr() as *const __m128i));
            Avx512(_mm512_shuffle_epi8(tbl, self.0))
        }
    }

    #[inline(always)]
    unsafe fn prev1(self, prev: Self) -> Self {
        unsafe { self.shift_in(prev, &PREV1_INDICES) }
    }

    #[inline(always)]
    unsafe fn prev2(self, prev: Self) -> Self {
        unsafe { self.shift_in(prev, &PREV2_INDICES) }
    }

    #[inline(always)]
    unsafe fn prev3(self, prev: Self) -> Self {
        unsafe { self.shift_in(prev, &PREV3_INDICES) }
    }

    #[inline(always)]
    unsafe fn signed_gt(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_movm_epi8(_mm512_cmpgt_epi8_mask(self.0, other.0))) }
    }

    #[inline(always)]
    unsafe fn eq(self, other: Self) -> Self {
        unsafe { Avx512(_mm512_movm_epi8(_mm512_cmpeq_epi8_mask(self.0, other.0))) }
    }

    #[inline(always)]
    unsafe fn is_ascii(self) -> bool {
        unsafe { _mm512_movepi8_mask(self.0) == 0 }
    }

    #[inline(always)]
    unsafe fn any_bit_set(self) -> bool {
        unsafe { _mm512_test_epi8_mask(self.0, self.0) != 0 }
    }
}
