//! Implementation registry and runtime dispatch.
//!
//! Every backend is described by a static [`Implementation`]. The registry
//! is ordered from most to least capable and always ends with `fallback`,
//! which requires nothing, so selection cannot fail.
//!
//! The active implementation is chosen on first use and cached in an atomic
//! pointer. Threads that race on the first call compute the same answer from
//! the same CPU and store the same pointer.
//!
//! Setting `FASTUTF8_FORCE_IMPLEMENTATION` (read once, requires `std`)
//! overrides detection. An unknown name, or a name this CPU cannot run,
//! selects `unsupported`, which rejects every input.

mod kernels;

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU32, Ordering};

use crate::isa::{detect_supported_architectures, InstructionSet};

/// Environment variable that forces an implementation by name.
pub const FORCE_IMPLEMENTATION_ENV: &str = "FASTUTF8_FORCE_IMPLEMENTATION";

/// A UTF-8 validation backend.
pub struct Implementation {
    name: &'static str,
    description: &'static str,
    required_instruction_sets: InstructionSet,
    validate: unsafe fn(&[u8]) -> bool,
}

impl Implementation {
    /// Short identifier, as accepted by [`find`] and the environment
    /// override.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable description.
    #[inline]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Extensions the CPU must have to run this implementation.
    #[inline]
    pub fn required_instruction_sets(&self) -> InstructionSet {
        self.required_instruction_sets
    }

    /// True when the running CPU has every required extension.
    pub fn supported_by_runtime_system(&self) -> bool {
        runtime_instruction_sets().contains(self.required_instruction_sets)
    }

    /// Validate `input` with this implementation.
    ///
    /// Returns `false` without touching the input when the CPU cannot run
    /// it.
    pub fn validate_utf8(&self, input: &[u8]) -> bool {
        if !self.supported_by_runtime_system() {
            return false;
        }
        // SAFETY: support checked above.
        unsafe { (self.validate)(input) }
    }

    /// Validate `input` without checking CPU support.
    ///
    /// # Safety
    ///
    /// [`supported_by_runtime_system`](Self::supported_by_runtime_system)
    /// must be true.
    #[inline]
    pub unsafe fn validate_utf8_unchecked(&self, input: &[u8]) -> bool {
        unsafe { (self.validate)(input) }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("required_instruction_sets", &self.required_instruction_sets)
            .finish()
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static AVX512: Implementation = Implementation {
    name: "avx512",
    description: "Intel/AMD AVX-512 (F, BW, VBMI)",
    required_instruction_sets: InstructionSet::AVX512F
        .union(InstructionSet::AVX512BW)
        .union(InstructionSet::AVX512VBMI),
    validate: kernels::validate_utf8_avx512,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static AVX2: Implementation = Implementation {
    name: "avx2",
    description: "Intel/AMD AVX2",
    required_instruction_sets: InstructionSet::AVX2,
    validate: kernels::validate_utf8_avx2,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static SSE42: Implementation = Implementation {
    name: "sse42",
    description: "Intel/AMD SSE4.2",
    required_instruction_sets: InstructionSet::SSE42,
    validate: kernels::validate_utf8_sse42,
};

#[cfg(target_arch = "aarch64")]
static NEON: Implementation = Implementation {
    name: "neon",
    description: "ARM NEON",
    required_instruction_sets: InstructionSet::NEON,
    validate: kernels::validate_utf8_neon,
};

static FALLBACK: Implementation = Implementation {
    name: "fallback",
    description: "Generic fallback implementation",
    required_instruction_sets: InstructionSet::DEFAULT,
    validate: kernels::validate_utf8_fallback,
};

/// Selected when a forced name cannot be honoured. Rejects every input.
pub static UNSUPPORTED: Implementation = Implementation {
    name: "unsupported",
    description: "Unsupported CPU (no detected SIMD instructions)",
    required_instruction_sets: InstructionSet::DEFAULT,
    validate: kernels::validate_utf8_unsupported,
};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
static IMPLEMENTATIONS: [&Implementation; 4] = [&AVX512, &AVX2, &SSE42, &FALLBACK];

#[cfg(target_arch = "aarch64")]
static IMPLEMENTATIONS: [&Implementation; 2] = [&NEON, &FALLBACK];

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
static IMPLEMENTATIONS: [&Implementation; 1] = [&FALLBACK];

/// Implementations compiled for this target, most capable first.
///
/// Includes entries the running CPU may not support; see
/// [`Implementation::supported_by_runtime_system`].
pub fn available_implementations() -> &'static [&'static Implementation] {
    &IMPLEMENTATIONS
}

/// Look up a registered implementation by name.
pub fn find(name: &str) -> Option<&'static Implementation> {
    IMPLEMENTATIONS.iter().copied().find(|imp| imp.name == name)
}

/// The most capable registered implementation whose requirements are a
/// subset of `detected`.
pub fn best_supported_for(detected: InstructionSet) -> &'static Implementation {
    IMPLEMENTATIONS
        .iter()
        .copied()
        .find(|imp| detected.contains(imp.required_instruction_sets))
        .unwrap_or(&FALLBACK)
}

/// The most capable implementation the running CPU supports.
pub fn detect_best_supported() -> &'static Implementation {
    best_supported_for(runtime_instruction_sets())
}

/// Decide which implementation to use given an optional forced name and the
/// detected instruction sets.
///
/// Pure: no environment access and no caching.
pub fn resolve_implementation(
    forced: Option<&str>,
    detected: InstructionSet,
) -> &'static Implementation {
    let Some(name) = forced else {
        return best_supported_for(detected);
    };

    match find(name) {
        Some(imp) if detected.contains(imp.required_instruction_sets) => imp,
        Some(imp) => {
            tracing::warn!(
                implementation = name,
                required = %imp.required_instruction_sets,
                detected = %detected,
                "forced UTF-8 implementation is not supported by this CPU; rejecting all input"
            );
            &UNSUPPORTED
        }
        None => {
            tracing::warn!(
                implementation = name,
                "unknown forced UTF-8 implementation; rejecting all input"
            );
            &UNSUPPORTED
        }
    }
}

#[cfg(any(test, feature = "std"))]
fn select_implementation() -> &'static Implementation {
    let forced = match std::env::var(FORCE_IMPLEMENTATION_ENV) {
        Ok(name) => Some(name),
        Err(std::env::VarError::NotPresent) => None,
        // Cannot match any registered name.
        Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    };
    let detected = runtime_instruction_sets();
    let chosen = resolve_implementation(forced.as_deref(), detected);
    tracing::debug!(
        implementation = chosen.name,
        forced = forced.is_some(),
        detected = %detected,
        "selected UTF-8 implementation"
    );
    chosen
}

#[cfg(not(any(test, feature = "std")))]
fn select_implementation() -> &'static Implementation {
    let detected = runtime_instruction_sets();
    let chosen = resolve_implementation(None, detected);
    tracing::debug!(
        implementation = chosen.name,
        detected = %detected,
        "selected UTF-8 implementation"
    );
    chosen
}

/// Set alongside the detected flags once detection has run.
const DETECTED_READY: u32 = 1 << 31;

static DETECTED: AtomicU32 = AtomicU32::new(0);

/// [`detect_supported_architectures`], run once per process.
fn runtime_instruction_sets() -> InstructionSet {
    let cached = DETECTED.load(Ordering::Relaxed);
    if cached & DETECTED_READY != 0 {
        return InstructionSet::from_bits(cached & !DETECTED_READY);
    }
    let detected = detect_supported_architectures();
    DETECTED.store(detected.bits() | DETECTED_READY, Ordering::Relaxed);
    detected
}

static ACTIVE: AtomicPtr<Implementation> = AtomicPtr::new(core::ptr::null_mut());

/// The implementation [`crate::validate_utf8`] uses, selected on first call.
pub fn active_implementation() -> &'static Implementation {
    let current = ACTIVE.load(Ordering::Acquire);
    // SAFETY: only ever null or a pointer to one of the statics above.
    if let Some(imp) = unsafe { current.cast_const().as_ref() } {
        return imp;
    }

    let chosen = select_implementation();
    ACTIVE.store(
        chosen as *const Implementation as *mut Implementation,
        Ordering::Release,
    );
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[(&[u8], bool)] = &[
        (b"", true),
        (b"plain ascii", true),
        ("héllo 世界".as_bytes(), true),
        (&[0xF4, 0x8F, 0xBF, 0xBF], true),
        (&[0xC0, 0x80], false),
        (&[0xED, 0xA0, 0x80], false),
        (&[0xF4, 0x90, 0x80, 0x80], false),
        (&[0xE6, 0x97], false),
    ];

    mod registry {
        use super::*;

        #[test]
        fn test_fallback_is_last_and_requires_nothing() {
            let list = available_implementations();
            let last = list.last().copied().unwrap();
            assert_eq!(last.name(), "fallback");
            assert!(last.required_instruction_sets().is_empty());
            assert!(last.supported_by_runtime_system());
        }

        #[test]
        fn test_exactly_one_entry_requires_nothing() {
            let free = available_implementations()
                .iter()
                .filter(|imp| imp.required_instruction_sets().is_empty())
                .count();
            assert_eq!(free, 1);
        }

        #[test]
        fn test_names_are_unique_and_findable() {
            for imp in available_implementations() {
                let found = find(imp.name()).unwrap();
                assert!(core::ptr::eq(found, *imp));
            }
            assert!(find("unsupported").is_none());
            assert!(find("").is_none());
            assert!(find("AVX2").is_none());
        }

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        #[test]
        fn test_x86_order() {
            let names: Vec<_> = available_implementations()
                .iter()
                .map(|imp| imp.name())
                .collect();
            assert_eq!(names, ["avx512", "avx2", "sse42", "fallback"]);
        }

        #[test]
        fn test_debug_omits_entry_point() {
            let text = format!("{:?}", FALLBACK);
            assert!(text.contains("fallback"));
            assert!(!text.contains("validate"));
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn test_no_features_selects_fallback() {
            let imp = resolve_implementation(None, InstructionSet::DEFAULT);
            assert_eq!(imp.name(), "fallback");
        }

        #[test]
        fn test_best_matches_first_supported() {
            let all = InstructionSet::from_bits(u32::MAX);
            assert!(core::ptr::eq(
                resolve_implementation(None, all),
                available_implementations()[0]
            ));
        }

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        #[test]
        fn test_avx2_without_avx512_selects_avx2() {
            let detected = InstructionSet::AVX2 | InstructionSet::SSE42 | InstructionSet::AVX512F;
            assert_eq!(resolve_implementation(None, detected).name(), "avx2");
        }

        #[test]
        fn test_forced_fallback() {
            let detected = detect_supported_architectures();
            let imp = resolve_implementation(Some("fallback"), detected);
            assert_eq!(imp.name(), "fallback");
        }

        #[test]
        fn test_forced_unknown_is_unsupported() {
            let detected = detect_supported_architectures();
            for name in ["nope", "", "Fallback", "unsupported"] {
                let imp = resolve_implementation(Some(name), detected);
                assert!(core::ptr::eq(imp, &UNSUPPORTED), "{:?}", name);
            }
        }

        #[test]
        fn test_forced_but_missing_features_is_unsupported() {
            for imp in available_implementations() {
                if imp.required_instruction_sets().is_empty() {
                    continue;
                }
                let chosen = resolve_implementation(Some(imp.name()), InstructionSet::DEFAULT);
                assert!(core::ptr::eq(chosen, &UNSUPPORTED), "{}", imp.name());
            }
        }

        #[test]
        fn test_detection_is_cached() {
            assert_eq!(runtime_instruction_sets(), detect_supported_architectures());
            assert_eq!(runtime_instruction_sets(), detect_supported_architectures());
            assert_eq!(DETECTED.load(Ordering::Relaxed) & DETECTED_READY, DETECTED_READY);
        }

        #[test]
        fn test_active_is_cached() {
            let first = active_implementation();
            let second = active_implementation();
            assert!(core::ptr::eq(first, second));
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn test_unsupported_rejects_everything() {
            for (input, _) in SAMPLES {
                assert!(!UNSUPPORTED.validate_utf8(input));
            }
        }

        #[test]
        fn test_supported_implementations_agree_on_samples() {
            for imp in available_implementations() {
                if !imp.supported_by_runtime_system() {
                    continue;
                }
                for (input, expected) in SAMPLES {
                    assert_eq!(
                        imp.validate_utf8(input),
                        *expected,
                        "{} on {:02X?}",
                        imp.name(),
                        input
                    );
                }
            }
        }

        #[test]
        fn test_unsupported_cpu_fails_closed() {
            for imp in available_implementations() {
                if !imp.supported_by_runtime_system() {
                    assert!(!imp.validate_utf8(b"ascii"));
                }
            }
        }
    }
}
