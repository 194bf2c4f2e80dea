//! Nibble-table byte classification.
//!
//! Each malformation category owns one bit. Three 16-entry tables are indexed
//! by the high nibble of the previous byte, the low nibble of the previous
//! byte and the high nibble of the current byte; a category survives the
//! AND of the three lookups only when all three nibbles agree that it applies.
//!
//! | Bit | Flag             | Pattern (previous byte, current byte)          |
//! |-----|------------------|------------------------------------------------|
//! | 0   | `TOO_SHORT`      | lead byte followed by ASCII or another lead    |
//! | 1   | `TOO_LONG`       | ASCII followed by a continuation               |
//! | 2   | `OVERLONG_3`     | `E0` followed by `80..=9F`                     |
//! | 3   | `TOO_LARGE`      | `F4` followed by `90..=BF`, or `F5..=FF`       |
//! | 4   | `SURROGATE`      | `ED` followed by `A0..=BF`                     |
//! | 5   | `OVERLONG_2`     | `C0` or `C1` lead                              |
//! | 6   | `TOO_LARGE_1000` | `F5..=FF` followed by `80..=8F`                |
//! | 6   | `OVERLONG_4`     | `F0` followed by `80..=8F`                     |
//! | 7   | `TWO_CONTS`      | continuation followed by continuation          |
//!
//! `TWO_CONTS` is expected for the third and fourth bytes of a sequence.
//! [`check_multibyte_lengths`] XORs it against the positions where a 3- or
//! 4-byte lead two or three bytes back demands a continuation, so both
//! missing and surplus continuations end up set.
//!
//! # Safety
//!
//! Every function here is `unsafe` because it calls [`SimdVector`] methods:
//! the backend's target features must be available.

use crate::simd::SimdVector;

const TOO_SHORT: u8 = 1 << 0;
const TOO_LONG: u8 = 1 << 1;
const OVERLONG_3: u8 = 1 << 2;
const TOO_LARGE: u8 = 1 << 3;
const SURROGATE: u8 = 1 << 4;
const OVERLONG_2: u8 = 1 << 5;
const TOO_LARGE_1000: u8 = 1 << 6;
const OVERLONG_4: u8 = 1 << 6;
const TWO_CONTS: u8 = 1 << 7;
const CARRY: u8 = TOO_SHORT | TOO_LONG | TWO_CONTS;

/// Indexed by `prev1 >> 4`.
static BYTE_1_HIGH: [u8; 16] = [
    // 0_______ ASCII
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    TOO_LONG,
    // 10______ continuation
    TWO_CONTS,
    TWO_CONTS,
    TWO_CONTS,
    TWO_CONTS,
    // 1100____ two-byte lead, C0/C1 possible
    TOO_SHORT | OVERLONG_2,
    // 1101____ two-byte lead
    TOO_SHORT,
    // 1110____ three-byte lead
    TOO_SHORT | OVERLONG_3 | SURROGATE,
    // 1111____ four-byte lead (or invalid F8..FF)
    TOO_SHORT | TOO_LARGE | TOO_LARGE_1000 | OVERLONG_4,
];

/// Indexed by `prev1 & 0x0F`.
static BYTE_1_LOW: [u8; 16] = [
    // ____0000
    CARRY | OVERLONG_3 | OVERLONG_2 | OVERLONG_4,
    // ____0001
    CARRY | OVERLONG_2,
    // ____001_
    CARRY,
    CARRY,
    // ____0100
    CARRY | TOO_LARGE,
    // ____0101
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    // ____011_
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    // ____1___
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    // ____1101
    CARRY | TOO_LARGE | TOO_LARGE_1000 | SURROGATE,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
];

/// Indexed by `input >> 4`.
static BYTE_2_HIGH: [u8; 16] = [
    // 0_______ ASCII
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    // 1000____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | OVERLONG_3 | TOO_LARGE_1000 | OVERLONG_4,
    // 1001____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | OVERLONG_3 | TOO_LARGE,
    // 101_____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | SURROGATE | TOO_LARGE,
    TOO_LONG | OVERLONG_2 | TWO_CONTS | SURROGATE | TOO_LARGE,
    // 11______ lead
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
    TOO_SHORT,
];

/// Per lane, the largest byte that may end a block without leaving a
/// sequence open. Only the last three lanes of any width are constrained.
static INCOMPLETE_MAX: [u8; 64] = {
    let mut max = [0xFF; 64];
    max[61] = 0b1111_0000 - 1;
    max[62] = 0b1110_0000 - 1;
    max[63] = 0b1100_0000 - 1;
    max
};

/// Error bits visible from a single byte of lookback.
#[inline(always)]
pub unsafe fn check_special_cases<V: SimdVector>(input: V, prev1: V) -> V {
    unsafe {
        let byte_1_high = prev1.shr4().lookup_16(&BYTE_1_HIGH);
        let byte_1_low = prev1.and(V::splat(0x0F)).lookup_16(&BYTE_1_LOW);
        let byte_2_high = input.shr4().lookup_16(&BYTE_2_HIGH);
        byte_1_high.and(byte_1_low).and(byte_2_high)
    }
}

/// Top bit set where the lane must be the third or fourth byte of a
/// sequence (a 3- or 4-byte lead two or three lanes back).
#[inline(always)]
pub unsafe fn must_be_2_3_continuation<V: SimdVector>(prev2: V, prev3: V) -> V {
    unsafe {
        let is_third_byte = prev2.saturating_sub(V::splat(0b1110_0000 - 0x80));
        let is_fourth_byte = prev3.saturating_sub(V::splat(0b1111_0000 - 0x80));
        is_third_byte.or(is_fourth_byte).and(V::splat(0x80))
    }
}

/// Reconcile `TWO_CONTS` in `special_cases` against the continuations that
/// 3- and 4-byte leads actually require.
#[inline(always)]
pub unsafe fn check_multibyte_lengths<V: SimdVector>(input: V, prev_input: V, special_cases: V) -> V {
    unsafe {
        let prev2 = input.prev2(prev_input);
        let prev3 = input.prev3(prev_input);
        must_be_2_3_continuation(prev2, prev3).xor(special_cases)
    }
}

/// All error bits for `input`, given the vector that preceded it.
#[inline(always)]
pub unsafe fn check_utf8_bytes<V: SimdVector>(input: V, prev_input: V) -> V {
    unsafe {
        let prev1 = input.prev1(prev_input);
        let special_cases = check_special_cases(input, prev1);
        check_multibyte_lengths(input, prev_input, special_cases)
    }
}

/// Nonzero when `input` ends inside a multi-byte sequence.
#[inline(always)]
pub unsafe fn is_incomplete<V: SimdVector>(input: V) -> V {
    unsafe { input.saturating_sub(V::load_tail(&INCOMPLETE_MAX)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::Portable;

    /// Classify the last `bytes.len()` lanes of a 16-byte chunk preceded by
    /// ASCII.
    fn classify(bytes: &[u8]) -> [u8; 16] {
        let mut lanes = [b' '; 16];
        lanes[16 - bytes.len()..].copy_from_slice(bytes);
        unsafe { check_utf8_bytes(Portable(lanes), Portable([b' '; 16])).0 }
    }

    fn has_error(bytes: &[u8]) -> bool {
        classify(bytes).iter().any(|&b| b != 0)
    }

    mod special_cases {
        use super::*;

        fn flags(prev: u8, cur: u8) -> u8 {
            unsafe { check_special_cases(Portable::splat(cur), Portable::splat(prev)).0[0] }
        }

        #[test]
        fn test_ascii_pairs_are_clean() {
            assert_eq!(flags(b'a', b'b'), 0);
            assert_eq!(flags(0x00, 0x7F), 0);
        }

        #[test]
        fn test_ascii_then_continuation() {
            assert_eq!(flags(b'a', 0x80), TOO_LONG);
        }

        #[test]
        fn test_lead_then_ascii() {
            assert_eq!(flags(0xC3, b'a'), TOO_SHORT);
            assert_eq!(flags(0xE4, b'a'), TOO_SHORT);
            assert_eq!(flags(0xF0, b'a'), TOO_SHORT);
        }

        #[test]
        fn test_lead_then_lead() {
            assert_eq!(flags(0xC3, 0xC3), TOO_SHORT);
        }

        #[test]
        fn test_overlong_2() {
            assert_eq!(flags(0xC0, 0x80) & OVERLONG_2, OVERLONG_2);
            assert_eq!(flags(0xC1, 0xBF) & OVERLONG_2, OVERLONG_2);
            assert_eq!(flags(0xC2, 0x80), 0);
        }

        #[test]
        fn test_overlong_3_and_4() {
            assert_eq!(flags(0xE0, 0x9F), OVERLONG_3);
            assert_eq!(flags(0xE0, 0xA0), 0);
            assert_eq!(flags(0xF0, 0x8F), OVERLONG_4);
            assert_eq!(flags(0xF0, 0x90), 0);
        }

        #[test]
        fn test_surrogate() {
            assert_eq!(flags(0xED, 0xA0), SURROGATE);
            assert_eq!(flags(0xED, 0x9F), 0);
        }

        #[test]
        fn test_too_large() {
            assert_eq!(flags(0xF4, 0x90), TOO_LARGE);
            assert_eq!(flags(0xF4, 0x8F), 0);
            assert_eq!(flags(0xF5, 0x80), TOO_LARGE_1000);
            assert_ne!(flags(0xFF, 0xBF), 0);
        }

        #[test]
        fn test_two_continuations() {
            assert_eq!(flags(0x80, 0x80), TWO_CONTS);
        }
    }

    mod multibyte_lengths {
        use super::*;

        #[test]
        fn test_valid_sequences() {
            assert!(!has_error("é".as_bytes()));
            assert!(!has_error("日".as_bytes()));
            assert!(!has_error("🎉".as_bytes()));
            assert!(!has_error("aé日🎉".as_bytes()));
        }

        #[test]
        fn test_missing_third_byte() {
            assert!(has_error(&[0xE4, 0xBD, b'a']));
        }

        #[test]
        fn test_surplus_continuation() {
            assert!(has_error(&[0xC3, 0xA9, 0x80]));
            assert!(has_error(&[0xE4, 0xBD, 0xA0, 0x80]));
        }

        #[test]
        fn test_four_byte_missing_last() {
            assert!(has_error(&[0xF0, 0x9F, 0x8E, b'a']));
        }
    }

    mod incomplete {
        use super::*;

        fn ends_incomplete(tail: &[u8]) -> bool {
            let mut lanes = [b' '; 16];
            lanes[16 - tail.len()..].copy_from_slice(tail);
            unsafe { is_incomplete(Portable(lanes)).any_bit_set() }
        }

        #[test]
        fn test_complete_endings() {
            assert!(!ends_incomplete(b"abc"));
            assert!(!ends_incomplete("é".as_bytes()));
            assert!(!ends_incomplete("日".as_bytes()));
            assert!(!ends_incomplete("🎉".as_bytes()));
        }

        #[test]
        fn test_open_endings() {
            assert!(ends_incomplete(&[0xC3]));
            assert!(ends_incomplete(&[0xE4, 0xBD]));
            assert!(ends_incomplete(&[0xE4]));
            assert!(ends_incomplete(&[0xF0, 0x9F, 0x8E]));
            assert!(ends_incomplete(&[0xF0]));
        }

        #[test]
        fn test_constant_layout() {
            assert!(INCOMPLETE_MAX[..61].iter().all(|&b| b == 0xFF));
            assert_eq!(&INCOMPLETE_MAX[61..], &[0xEF, 0xDF, 0xBF]);
        }
    }
}
