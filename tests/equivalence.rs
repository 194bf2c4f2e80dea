//! Every validator must agree with `core::str::from_utf8` on every input.

use fastutf8::implementation::available_implementations;
use fastutf8::simd::portable::Portable;
use fastutf8::text::fallback;
use fastutf8::validate::{validate_utf8, validate_utf8_legacy};
use proptest::prelude::*;

/// Assert that all validators return the same verdict as the standard library.
fn assert_all_agree(input: &[u8]) {
    let expected = core::str::from_utf8(input).is_ok();

    assert_eq!(fallback::validate_utf8(input), expected, "fallback on {:02X?}", input);
    // SAFETY: the portable backend needs no target features.
    unsafe {
        assert_eq!(validate_utf8::<Portable>(input), expected, "portable on {:02X?}", input);
        assert_eq!(
            validate_utf8_legacy::<Portable>(input),
            expected,
            "legacy on {:02X?}",
            input
        );
    }
    for imp in available_implementations() {
        if imp.supported_by_runtime_system() {
            assert_eq!(imp.validate_utf8(input), expected, "{} on {:02X?}", imp.name(), input);
        }
    }
    assert_eq!(fastutf8::validate_utf8(input), expected, "dispatched on {:02X?}", input);
    assert_eq!(
        fastutf8::validate_utf8_detailed(input).is_ok(),
        expected,
        "detailed on {:02X?}",
        input
    );
}

/// Bytes at every boundary of the UTF-8 tables.
const ALPHABET: [u8; 19] = [
    0x00, 0x41, 0x7F, 0x80, 0x8F, 0x90, 0x9F, 0xA0, 0xBF, 0xC0, 0xC2, 0xDF, 0xE0, 0xED, 0xEF,
    0xF0, 0xF4, 0xF5, 0xFF,
];

// ============================================================================
// Exhaustive short inputs
// ============================================================================

#[test]
fn test_all_one_byte_inputs() {
    for b in 0..=255u8 {
        assert_all_agree(&[b]);
    }
}

#[test]
fn test_all_two_byte_inputs() {
    for a in 0..=255u8 {
        for b in 0..=255u8 {
            assert_all_agree(&[a, b]);
        }
    }
}

#[test]
fn test_three_byte_alphabet() {
    for &a in &ALPHABET {
        for &b in &ALPHABET {
            for &c in &ALPHABET {
                assert_all_agree(&[a, b, c]);
            }
        }
    }
}

#[test]
fn test_four_byte_alphabet() {
    for &a in &ALPHABET {
        for &b in &ALPHABET {
            for &c in &ALPHABET {
                for &d in &ALPHABET {
                    assert_all_agree(&[a, b, c, d]);
                }
            }
        }
    }
}

#[test]
fn test_three_byte_alphabet_across_boundaries() {
    for pad in [13, 14, 15, 30, 31, 62, 63] {
        let mut input = vec![b'a'; pad + 3];
        for &a in &ALPHABET {
            for &b in &ALPHABET {
                for &c in &ALPHABET {
                    input[pad..].copy_from_slice(&[a, b, c]);
                    assert_all_agree(&input);
                    // Followed by a full ASCII block.
                    let mut longer = input.clone();
                    longer.extend_from_slice(&[b'z'; 64]);
                    assert_all_agree(&longer);
                }
            }
        }
    }
}

#[test]
fn test_every_scalar_value_in_a_block() {
    // Each code point alone, then at the end of a 64-byte block.
    let mut buf = [0u8; 4];
    for c in (0..=0x10FFFFu32).step_by(97).filter_map(char::from_u32) {
        let encoded = c.encode_utf8(&mut buf).as_bytes();
        assert_all_agree(encoded);
        let mut input = vec![b' '; 64 - encoded.len() + 1];
        input.extend_from_slice(encoded);
        assert_all_agree(&input);
    }
}

// ============================================================================
// Randomised inputs
// ============================================================================

/// Mostly-valid text with occasional corruption.
fn mutated_text() -> impl Strategy<Value = Vec<u8>> {
    (
        ".{0,200}",
        prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 0..3),
    )
        .prop_map(|(s, edits)| {
            let mut bytes = s.into_bytes();
            if !bytes.is_empty() {
                for (idx, byte) in edits {
                    let i = idx.index(bytes.len());
                    bytes[i] = byte;
                }
            }
            bytes
        })
}

proptest! {
    #[test]
    fn prop_random_bytes_agree(input in prop::collection::vec(any::<u8>(), 0..300)) {
        assert_all_agree(&input);
    }

    #[test]
    fn prop_valid_strings_accepted(s in ".{0,300}") {
        assert_all_agree(s.as_bytes());
        prop_assert!(fastutf8::validate_utf8(s.as_bytes()));
    }

    #[test]
    fn prop_mutated_text_agrees(input in mutated_text()) {
        assert_all_agree(&input);
    }

    #[test]
    fn prop_truncated_strings_agree(s in ".{1,100}", cut in any::<prop::sample::Index>()) {
        let bytes = s.as_bytes();
        let cut = cut.index(bytes.len() + 1);
        assert_all_agree(&bytes[..cut]);
    }
}
