//! Carry-propagation UTF-8 checker.
//!
//! An older vectorised algorithm: every lane gets the sequence length its
//! high nibble implies, those lengths are smeared forward over the following
//! lanes with two saturating shift-and-add rounds, and each lane then checks
//! that it is covered by exactly one sequence. Range problems (overlong,
//! surrogate, above U+10FFFF) are handled by separate comparisons against the
//! previous byte.
//!
//! It is not registered with the dispatcher. It exists to be compared against
//! the lookup-table checker in [`super::checker`].

use crate::simd::SimdVector;

/// Sequence length implied by a high nibble; 0 for continuations.
static CONTINUATION_LENGTHS: [u8; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 2, 2, 3, 4];

/// Smallest allowed lead byte per lead class (signed compare; 0x80 never
/// matches).
static INITIAL_MINS: [u8; 16] = [
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xC2, 0x80, 0xE1, 0xF1,
];

/// Smallest allowed first continuation when the lead is at its class
/// minimum. 0x7F makes every continuation too small for `C0`/`C1`.
static SECOND_MINS: [u8; 16] = [
    0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x7F, 0x7F, 0xA0, 0x90,
];

/// End-of-input limit on carried lengths; only the final lane matters.
static EOF_MAX_CARRIES: [u8; 64] = {
    let mut max = [9; 64];
    max[63] = 1;
    max
};

#[derive(Clone, Copy)]
struct ProcessedBytes<V> {
    raw: V,
    high_nibbles: V,
    carried_continuations: V,
}

impl<V: SimdVector> ProcessedBytes<V> {
    #[inline(always)]
    unsafe fn zero() -> Self {
        unsafe {
            Self {
                raw: V::zero(),
                high_nibbles: V::zero(),
                carried_continuations: V::zero(),
            }
        }
    }
}

#[inline(always)]
unsafe fn carry_continuations<V: SimdVector>(lengths: V, prev_carries: V) -> V {
    unsafe {
        let right1 = lengths.prev1(prev_carries).saturating_sub(V::splat(1));
        let sum = lengths.add(right1);
        let right2 = sum.prev2(prev_carries).saturating_sub(V::splat(2));
        sum.add(right2)
    }
}

/// Every lane must be covered by exactly one sequence: a lead (length > 0)
/// must not be inside a previous sequence, a continuation must be.
#[inline(always)]
unsafe fn check_continuations<V: SimdVector>(lengths: V, carries: V) -> V {
    unsafe {
        let overlap = carries.signed_gt(lengths);
        let is_lead = lengths.signed_gt(V::zero());
        overlap.eq(is_lead)
    }
}

/// After `ED` the next byte is at most `9F`; after `F4`, at most `8F`.
#[inline(always)]
unsafe fn check_first_continuation_max<V: SimdVector>(current: V, off1: V) -> V {
    unsafe {
        let after_ed = off1.eq(V::splat(0xED));
        let after_f4 = off1.eq(V::splat(0xF4));
        let bad_ed = current.signed_gt(V::splat(0x9F)).and(after_ed);
        let bad_f4 = current.signed_gt(V::splat(0x8F)).and(after_f4);
        bad_ed.or(bad_f4)
    }
}

#[inline(always)]
unsafe fn check_overlong<V: SimdVector>(current: V, off1: V, off1_high_nibbles: V) -> V {
    unsafe {
        let initial_under = off1_high_nibbles.lookup_16(&INITIAL_MINS).signed_gt(off1);
        let second_under = off1_high_nibbles.lookup_16(&SECOND_MINS).signed_gt(current);
        initial_under.and(second_under)
    }
}

#[inline(always)]
unsafe fn check_utf8_bytes<V: SimdVector>(
    current: V,
    previous: &ProcessedBytes<V>,
    error: &mut V,
) -> ProcessedBytes<V> {
    unsafe {
        let high_nibbles = current.shr4();
        *error = error.or(current.saturating_sub(V::splat(0xF4)));

        let lengths = high_nibbles.lookup_16(&CONTINUATION_LENGTHS);
        let carried_continuations = carry_continuations(lengths, previous.carried_continuations);
        *error = error.or(check_continuations(lengths, carried_continuations));

        let off1 = current.prev1(previous.raw);
        *error = error.or(check_first_continuation_max(current, off1));

        let off1_high_nibbles = high_nibbles.prev1(previous.high_nibbles);
        *error = error.or(check_overlong(current, off1, off1_high_nibbles));

        ProcessedBytes {
            raw: current,
            high_nibbles,
            carried_continuations,
        }
    }
}

/// Validate `input` with the carry-propagation checker on backend `V`.
///
/// Works one vector at a time rather than in 64-byte blocks. A partial
/// final vector is zero-padded; its padding lanes expose any truncated
/// sequence. When there is no partial vector the carried lengths of the last
/// full one are checked instead.
///
/// # Safety
///
/// The backend's target features must be available.
#[inline(always)]
pub unsafe fn validate_utf8_legacy<V: SimdVector>(input: &[u8]) -> bool {
    unsafe {
        let mut error = V::zero();
        let mut previous = ProcessedBytes::<V>::zero();

        let mut chunks = input.chunks_exact(V::LANES);
        for chunk in chunks.by_ref() {
            previous = check_utf8_bytes(V::load(chunk), &previous, &mut error);
        }

        let tail = chunks.remainder();
        if tail.is_empty() {
            let max = V::load_tail(&EOF_MAX_CARRIES);
            error = error.or(previous.carried_continuations.signed_gt(max));
        } else {
            let mut buffer = [0u8; 64];
            buffer[..tail.len()].copy_from_slice(tail);
            check_utf8_bytes(V::load(&buffer), &previous, &mut error);
        }

        !error.any_bit_set()
    }
}
