//! Block-to-block UTF-8 state machine.

use super::block::{BlockReader, BLOCK_SIZE};
use super::classify::{check_utf8_bytes, is_incomplete};
use crate::simd::SimdVector;

/// Most vectors a block can hold (64 bytes of 16-lane vectors).
const MAX_CHUNKS: usize = BLOCK_SIZE / 16;

/// Error accumulator plus the carry state needed to classify sequences that
/// straddle a block boundary.
pub struct Utf8Checker<V: SimdVector> {
    /// OR of every error vector seen so far. Never cleared.
    error: V,
    /// Last vector of the most recent non-ASCII block.
    prev_input_block: V,
    /// Nonzero when the most recent non-ASCII block ended mid-sequence.
    prev_incomplete: V,
}

impl<V: SimdVector> Utf8Checker<V> {
    /// Fresh state: no errors, previous block all zero (ASCII, complete).
    ///
    /// # Safety
    ///
    /// The backend's target features must be available.
    #[inline(always)]
    pub unsafe fn new() -> Self {
        unsafe {
            Self {
                error: V::zero(),
                prev_input_block: V::zero(),
                prev_incomplete: V::zero(),
            }
        }
    }

    /// Classify one block.
    ///
    /// # Safety
    ///
    /// The backend's target features must be available.
    #[inline(always)]
    pub unsafe fn check_next_input(&mut self, block: &[u8; BLOCK_SIZE]) {
        unsafe {
            let count = BLOCK_SIZE / V::LANES;
            let mut chunks = [V::zero(); MAX_CHUNKS];
            for (i, chunk) in chunks[..count].iter_mut().enumerate() {
                *chunk = V::load(&block[i * V::LANES..]);
            }

            let mut any = chunks[0];
            for chunk in &chunks[1..count] {
                any = any.or(*chunk);
            }

            if any.is_ascii() {
                // An ASCII block cannot finish a sequence the previous block
                // left open.
                self.error = self.error.or(self.prev_incomplete);
                return;
            }

            let mut prev = self.prev_input_block;
            for &chunk in &chunks[..count] {
                self.error = self.error.or(check_utf8_bytes(chunk, prev));
                prev = chunk;
            }
            self.prev_incomplete = is_incomplete(prev);
            self.prev_input_block = prev;
        }
    }

    /// Flag a sequence left open at the end of input.
    ///
    /// # Safety
    ///
    /// The backend's target features must be available.
    #[inline(always)]
    pub unsafe fn check_eof(&mut self) {
        unsafe {
            self.error = self.error.or(self.prev_incomplete);
        }
    }

    /// True when any error has been recorded.
    ///
    /// # Safety
    ///
    /// The backend's target features must be available.
    #[inline(always)]
    pub unsafe fn errors(&self) -> bool {
        unsafe { self.error.any_bit_set() }
    }
}

/// Validate `input` with the lookup-table checker on backend `V`.
///
/// Full blocks are read in place; the tail is copied into a zero-padded
/// block, which is always processed (even when empty) so the carry state is
/// flushed before [`Utf8Checker::check_eof`].
///
/// # Safety
///
/// The backend's target features must be available. Callers normally reach
/// this through an `#[target_feature]` entry point so the whole checker is
/// compiled with those features.
#[inline(always)]
pub unsafe fn validate_utf8<V: SimdVector>(input: &[u8]) -> bool {
    unsafe {
        let mut checker = Utf8Checker::<V>::new();
        let mut reader = BlockReader::new(input);
        for block in reader.by_ref() {
            checker.check_next_input(block);
        }

        let mut tail = [0u8; BLOCK_SIZE];
        reader.remainder(&mut tail);
        checker.check_next_input(&tail);
        checker.check_eof();
        !checker.errors()
    }
}
