//! Width-generic vector primitives.
//!
//! The UTF-8 checker is written once against [`SimdVector`] and instantiated
//! per backend:
//!
//! | Backend            | Lanes | Target features                 |
//! |--------------------|-------|---------------------------------|
//! | [`x86::Sse42`]     | 16    | `sse4.2` (implies SSSE3, SSE4.1) |
//! | [`x86::Avx2`]      | 32    | `avx2`                          |
//! | [`x86::Avx512`]    | 64    | `avx512f,avx512bw,avx512vbmi`   |
//! | [`neon::Neon`]     | 16    | `neon`                          |
//! | [`portable::Portable`] | 16 | none (plain Rust lanes)        |
//!
//! All methods are `unsafe`: calling them on a CPU that lacks the backend's
//! target features is undefined behaviour. Implementations are
//! `#[inline(always)]` so that generic code monomorphized inside a
//! `#[target_feature]` function is compiled with those features enabled.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod neon;

pub mod portable;

/// A batch of byte lanes with the operations the UTF-8 checker needs.
///
/// Lane masks returned by [`signed_gt`](Self::signed_gt) and
/// [`eq`](Self::eq) are `0xFF` for true and `0x00` for false.
pub trait SimdVector: Copy {
    /// Number of 8-bit lanes (16, 32 or 64).
    const LANES: usize;

    /// Vector with every lane set to `byte`.
    unsafe fn splat(byte: u8) -> Self;

    /// Vector with every lane zero.
    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe { Self::splat(0) }
    }

    /// Load the first `LANES` bytes of `bytes`.
    ///
    /// # Safety
    ///
    /// `bytes.len() >= Self::LANES` and the backend's target features are
    /// available.
    unsafe fn load(bytes: &[u8]) -> Self;

    /// Bitwise OR.
    unsafe fn or(self, other: Self) -> Self;

    /// Bitwise AND.
    unsafe fn and(self, other: Self) -> Self;

    /// Bitwise XOR.
    unsafe fn xor(self, other: Self) -> Self;

    /// Wrapping per-lane addition.
    unsafe fn add(self, other: Self) -> Self;

    /// Unsigned saturating per-lane subtraction.
    unsafe fn saturating_sub(self, other: Self) -> Self;

    /// High nibble of every lane (`lane >> 4`).
    unsafe fn shr4(self) -> Self;

    /// Replace every lane by `table[lane]`. Lanes must be in `0..16`.
    unsafe fn lookup_16(self, table: &[u8; 16]) -> Self;

    /// Shift in the last byte of `prev`: lane `i` becomes byte `i - 1` of
    /// `prev ++ self`.
    unsafe fn prev1(self, prev: Self) -> Self;

    /// Like [`prev1`](Self::prev1), shifting by two bytes.
    unsafe fn prev2(self, prev: Self) -> Self;

    /// Like [`prev1`](Self::prev1), shifting by three bytes.
    unsafe fn prev3(self, prev: Self) -> Self;

    /// Per-lane `self > other` comparing lanes as `i8`.
    unsafe fn signed_gt(self, other: Self) -> Self;

    /// Per-lane equality.
    unsafe fn eq(self, other: Self) -> Self;

    /// True when no lane has its top bit set.
    unsafe fn is_ascii(self) -> bool;

    /// True when any bit of any lane is set.
    unsafe fn any_bit_set(self) -> bool;

    /// Load `LANES` bytes from the end of a 64-byte constant.
    ///
    /// Constants that only differ in the final lanes (end-of-block checks)
    /// are stored once, 64 bytes wide, and sliced to the backend's width.
    #[inline(always)]
    unsafe fn load_tail(constant: &[u8; 64]) -> Self {
        unsafe { Self::load(&constant[64 - Self::LANES..]) }
    }
}
