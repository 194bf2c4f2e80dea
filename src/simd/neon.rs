//! ARM NEON backend (aarch64).
//!
//! NEON has native 8-bit shifts, a 16-entry table lookup (`tbl`) and
//! horizontal max, so every primitive maps to one or two instructions.

use core::arch::aarch64::*;

use super::SimdVector;

/// 16 lanes in a NEON Q register.
#[derive(Clone, Copy)]
pub struct Neon(uint8x16_t);

impl SimdVector for Neon {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(byte: u8) -> Self {
        unsafe { Neon(vdupq_n_u8(byte)) }
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= Self::LANES);
        unsafe { Neon(vld1q_u8(bytes.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        unsafe { Neon(vorrq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        unsafe { Neon(vandq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        unsafe { Neon(veorq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        unsafe { Neon(vaddq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn saturating_sub(self, other: Self) -> Self {
        unsafe { Neon(vqsubq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn shr4(self) -> Self {
        unsafe { Neon(vshrq_n_u8::<4>(self.0)) }
    }

    #[inline(always)]
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self {
        unsafe { Neon(vqtbl1q_u8(vld1q_u8(table.as_ptr()), self.0)) }
    }

    #[inline(always)]
    unsafe fn prev1(self, prev: Self) -> Self {
        unsafe { Neon(vextq_u8::<15>(prev.0, self.0)) }
    }

    #[inline(always)]
    unsafe fn prev2(self, prev: Self) -> Self {
        unsafe { Neon(vextq_u8::<14>(prev.0, self.0)) }
    }

    #[inline(always)]
    unsafe fn prev3(self, prev: Self) -> Self {
        unsafe { Neon(vextq_u8::<13>(prev.0, self.0)) }
    }

    #[inline(always)]
    unsafe fn signed_gt(self, other: Self) -> Self {
        unsafe {
            Neon(vcgtq_s8(
                vreinterpretq_s8_u8(self.0),
                vreinterpretq_s8_u8(other.0),
            ))
        }
    }

    #[inline(always)]
    unsafe fn eq(self, other: Self) -> Self {
        unsafe { Neon(vceqq_u8(self.0, other.0)) }
    }

    #[inline(always)]
    unsafe fn is_ascii(self) -> bool {
        unsafe { vmaxvq_u8(self.0) < 0x80 }
    }

    #[inline(always)]
    unsafe fn any_bit_set(self) -> bool {
        unsafe { vmaxvq_u8(self.0) != 0 }
    }
}
