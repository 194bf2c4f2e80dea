//! CPU instruction-set detection.

use core::fmt;

/// Bitmask of instruction-set extensions.
///
/// Flags are independent bits; `DEFAULT` (empty) is what every CPU has.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstructionSet(u32);

impl InstructionSet {
    /// No extensions.
    pub const DEFAULT: Self = Self(0);
    pub const NEON: Self = Self(1 << 0);
    pub const AVX2: Self = Self(1 << 2);
    pub const SSE42: Self = Self(1 << 3);
    pub const PCLMULQDQ: Self = Self(1 << 4);
    pub const BMI1: Self = Self(1 << 5);
    pub const BMI2: Self = Self(1 << 6);
    pub const ALTIVEC: Self = Self(1 << 7);
    pub const AVX512F: Self = Self(1 << 8);
    pub const AVX512DQ: Self = Self(1 << 9);
    pub const AVX512IFMA: Self = Self(1 << 10);
    pub const AVX512CD: Self = Self(1 << 11);
    pub const AVX512BW: Self = Self(1 << 12);
    pub const AVX512VL: Self = Self(1 << 13);
    pub const AVX512VBMI: Self = Self(1 << 14);
    pub const AVX512VBMI2: Self = Self(1 << 15);

    const NAMES: [(Self, &'static str); 15] = [
        (Self::NEON, "neon"),
        (Self::AVX2, "avx2"),
        (Self::SSE42, "sse42"),
        (Self::PCLMULQDQ, "pclmulqdq"),
        (Self::BMI1, "bmi1"),
        (Self::BMI2, "bmi2"),
        (Self::ALTIVEC, "altivec"),
        (Self::AVX512F, "avx512f"),
        (Self::AVX512DQ, "avx512dq"),
        (Self::AVX512IFMA, "avx512ifma"),
        (Self::AVX512CD, "avx512cd"),
        (Self::AVX512BW, "avx512bw"),
        (Self::AVX512VL, "avx512vl"),
        (Self::AVX512VBMI, "avx512vbmi"),
        (Self::AVX512VBMI2, "avx512vbmi2"),
    ];

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask from raw bits. Unknown bits are kept.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every flag in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lower-case names of the set flags, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl core::ops::BitOr for InstructionSet {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl core::ops::BitOrAssign for InstructionSet {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for InstructionSet {
    /// `avx2+sse42`, or `default` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("default");
        }
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstructionSet({})", self)
    }
}

/// Instruction sets the running CPU supports.
///
/// With `std`, x86 and aarch64 are queried at runtime. Without it, only the
/// features the crate was compiled for are reported.
pub fn detect_supported_architectures() -> InstructionSet {
    let mut detected = InstructionSet::DEFAULT;

    #[cfg(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        any(test, feature = "std")
    ))]
    {
        let probes = [
            (is_x86_feature_detected!("sse4.2"), InstructionSet::SSE42),
            (is_x86_feature_detected!("avx2"), InstructionSet::AVX2),
            (is_x86_feature_detected!("pclmulqdq"), InstructionSet::PCLMULQDQ),
            (is_x86_feature_detected!("bmi1"), InstructionSet::BMI1),
            (is_x86_feature_detected!("bmi2"), InstructionSet::BMI2),
            (is_x86_feature_detected!("avx512f"), InstructionSet::AVX512F),
            (is_x86_feature_detected!("avx512dq"), InstructionSet::AVX512DQ),
            (is_x86_feature_detected!("avx512ifma"), InstructionSet::AVX512IFMA),
            (is_x86_feature_detected!("avx512cd"), InstructionSet::AVX512CD),
            (is_x86_feature_detected!("avx512bw"), InstructionSet::AVX512BW),
            (is_x86_feature_detected!("avx512vl"), InstructionSet::AVX512VL),
            (is_x86_feature_detected!("avx512vbmi"), InstructionSet::AVX512VBMI),
            (is_x86_feature_detected!("avx512vbmi2"), InstructionSet::AVX512VBMI2),
        ];
        for (present, flag) in probes {
            if present {
                detected |= flag;
            }
        }
    }

    #[cfg(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        not(any(test, feature = "std"))
    ))]
    {
        let probes = [
            (cfg!(target_feature = "sse4.2"), InstructionSet::SSE42),
            (cfg!(target_feature = "avx2"), InstructionSet::AVX2),
            (cfg!(target_feature = "pclmulqdq"), InstructionSet::PCLMULQDQ),
            (cfg!(target_feature = "bmi1"), InstructionSet::BMI1),
            (cfg!(target_feature = "bmi2"), InstructionSet::BMI2),
            (cfg!(target_feature = "avx512f"), InstructionSet::AVX512F),
            (cfg!(target_feature = "avx512dq"), InstructionSet::AVX512DQ),
            (cfg!(target_feature = "avx512ifma"), InstructionSet::AVX512IFMA),
            (cfg!(target_feature = "avx512cd"), InstructionSet::AVX512CD),
            (cfg!(target_feature = "avx512bw"), InstructionSet::AVX512BW),
            (cfg!(target_feature = "avx512vl"), InstructionSet::AVX512VL),
            (cfg!(target_feature = "avx512vbmi"), InstructionSet::AVX512VBMI),
            (cfg!(target_feature = "avx512vbmi2"), InstructionSet::AVX512VBMI2),
        ];
        for (present, flag) in probes {
            if present {
                detected |= flag;
            }
        }
    }

    #[cfg(all(target_arch = "aarch64", any(test, feature = "std")))]
    if std::arch::is_aarch64_feature_detected!("neon") {
        detected |= InstructionSet::NEON;
    }

    #[cfg(all(target_arch = "aarch64", not(any(test, feature = "std"))))]
    if cfg!(target_feature = "neon") {
        detected |= InstructionSet::NEON;
    }

    #[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
    if cfg!(target_feature = "altivec") {
        detected |= InstructionSet::ALTIVEC;
    }

    detected
}
