//! Implementation selection, driven through the pure resolver so no test
//! touches the process environment.

use fastutf8::implementation::{
    available_implementations, best_supported_for, find, resolve_implementation,
    FORCE_IMPLEMENTATION_ENV,
};
use fastutf8::InstructionSet;

#[test]
fn test_registry_shape() {
    let imps = available_implementations();
    assert_eq!(imps.last().unwrap().name(), "fallback");
    assert_eq!(
        imps.iter()
            .filter(|imp| imp.required_instruction_sets().is_empty())
            .count(),
        1
    );
    assert!(imps.iter().all(|imp| imp.name() != "unsupported"));
    assert_eq!(FORCE_IMPLEMENTATION_ENV, "FASTUTF8_FORCE_IMPLEMENTATION");
}

#[test]
fn test_no_features_resolves_to_fallback() {
    assert_eq!(
        resolve_implementation(None, InstructionSet::DEFAULT).name(),
        "fallback"
    );
    assert_eq!(best_supported_for(InstructionSet::DEFAULT).name(), "fallback");
}

#[test]
fn test_forced_fallback_always_honoured() {
    for detected in [
        InstructionSet::DEFAULT,
        InstructionSet::AVX2 | InstructionSet::SSE42,
        InstructionSet::NEON,
    ] {
        assert_eq!(
            resolve_implementation(Some("fallback"), detected).name(),
            "fallback"
        );
    }
}

#[test]
fn test_unknown_name_is_unsupported() {
    for name in ["", "avx3", "FALLBACK", "sse4.2"] {
        let imp = resolve_implementation(Some(name), InstructionSet::DEFAULT);
        assert_eq!(imp.name(), "unsupported", "{:?}", name);
        assert!(!imp.validate_utf8(b""));
        assert!(!imp.validate_utf8(b"ascii"));
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    use super::*;

    #[test]
    fn test_best_by_detected_mask() {
        let all_512 = InstructionSet::AVX512F
            | InstructionSet::AVX512BW
            | InstructionSet::AVX512VBMI
            | InstructionSet::AVX2
            | InstructionSet::SSE42;
        assert_eq!(resolve_implementation(None, all_512).name(), "avx512");
        assert_eq!(
            resolve_implementation(None, InstructionSet::AVX2 | InstructionSet::SSE42).name(),
            "avx2"
        );
        assert_eq!(
            resolve_implementation(None, InstructionSet::SSE42).name(),
            "sse42"
        );
        // AVX512F alone is not enough for the 512-bit kernel.
        assert_eq!(
            resolve_implementation(None, InstructionSet::AVX512F | InstructionSet::SSE42).name(),
            "sse42"
        );
    }

    #[test]
    fn test_forced_without_cpu_support_is_unsupported() {
        let imp = resolve_implementation(Some("avx2"), InstructionSet::SSE42);
        assert_eq!(imp.name(), "unsupported");
        assert!(!imp.validate_utf8(b"hello"));
    }

    #[test]
    fn test_forced_lower_tier_honoured() {
        let detected = InstructionSet::AVX2 | InstructionSet::SSE42;
        assert_eq!(resolve_implementation(Some("sse42"), detected).name(), "sse42");
    }

    #[test]
    fn test_neon_not_registered() {
        assert!(find("neon").is_none());
    }
}

#[cfg(target_arch = "aarch64")]
mod aarch64 {
    use super::*;

    #[test]
    fn test_neon_preferred() {
        assert_eq!(
            resolve_implementation(None, InstructionSet::NEON).name(),
            "neon"
        );
        assert!(find("avx2").is_none());
    }
}

#[test]
fn test_active_is_stable() {
    let first = fastutf8::active_implementation();
    let second = fastutf8::active_implementation();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_concurrent_first_use_agrees() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| fastutf8::active_implementation().name()))
        .collect();
    let names: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(names.windows(2).all(|w| w[0] == w[1]));
}
