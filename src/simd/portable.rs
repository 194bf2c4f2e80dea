//! Scalar-emulated 16-lane vector.
//!
//! Implements [`SimdVector`] with plain array arithmetic. It needs no target
//! features, so the generic checker can run (and be tested) on any target.

use super::SimdVector;

/// Sixteen byte lanes held in an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portable(pub [u8; 16]);

impl Portable {
    #[inline(always)]
    fn map(self, f: impl Fn(u8) -> u8) -> Self {
        let mut out = self.0;
        for lane in out.iter_mut() {
            *lane = f(*lane);
        }
        Portable(out)
    }

    #[inline(always)]
    fn zip(self, other: Self, f: impl Fn(u8, u8) -> u8) -> Self {
        let mut out = [0u8; 16];
        for (i, lane) in out.iter_mut().enumerate() {
            *lane = f(self.0[i], other.0[i]);
        }
        Portable(out)
    }

    #[inline(always)]
    fn shift_in<const N: usize>(self, prev: Self) -> Self {
        let mut out = [0u8; 16];
        out[..N].copy_from_slice(&prev.0[16 - N..]);
        out[N..].copy_from_slice(&self.0[..16 - N]);
        Portable(out)
    }
}

fn mask(b: bool) -> u8 {
    if b {
        0xFF
    } else {
        0x00
    }
}

impl SimdVector for Portable {
    const LANES: usize = 16;

    #[inline(always)]
    unsafe fn splat(byte: u8) -> Self {
        Portable([byte; 16])
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8]) -> Self {
        let mut lanes = [0u8; 16];
        lanes.copy_from_slice(&bytes[..16]);
        Portable(lanes)
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
        self.zip(other, |a, b| a | b)
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
        self.zip(other, |a, b| a & b)
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        self.zip(other, |a, b| a ^ b)
    }

    #[inline(always)]
    unsafe fn add(self, other: Self) -> Self {
        self.zip(other, u8::wrapping_add)
    }

    #[inline(always)]
    unsafe fn saturating_sub(self, other: Self) -> Self {
        self.zip(other, u8::saturating_sub)
    }

    #[inline(always)]
    unsafe fn shr4(self) -> Self {
        self.map(|b| b >> 4)
    }

    #[inline(always)]
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self {
        self.map(|b| table[(b & 0x0F) as usize])
    }

    #[inline(always)]
    unsafe fn prev1(self, prev: Self) -> Self {
        self.shift_in::<1>(prev)
    }

    #[inline(always)]
    unsafe fn prev2(self, prev: Self) -> Self {
        self.shift_in::<2>(prev)
    }

    #[inline(always)]
    unsafe fn prev3(self, prev: Self) -> Self {
        self.shift_in::<3>(prev)
    }

    #[inline(always)]
    unsafe fn signed_gt(self, other: Self) -> Self {
        self.zip(other, |a, b| mask((a as i8) > (b as i8)))
    }

    #[inline(always)]
    unsafe fn eq(self, other: Self) -> Self {
        self.zip(other, |a, b| mask(a == b))
    }

    #[inline(always)]
    unsafe fn is_ascii(self) -> bool {
        self.0.iter().all(|&b| b < 0x80)
    }

    #[inline(always)]
    unsafe fn any_bit_set(self) -> bool {
        self.0.iter().any(|&b| b != 0)
    }
}
