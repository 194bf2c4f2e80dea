//! UTF-8 text generators for benchmarking.
//!
//! Each pattern stresses a different mix of sequence lengths. Output is
//! always valid UTF-8 of exactly the requested size; with a seed it is
//! reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pattern types for UTF-8 text generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Utf8Pattern {
    /// Pure ASCII prose
    Ascii,
    /// Latin text with accents (mostly 1-byte, some 2-byte)
    Latin,
    /// Chinese/Japanese/Korean (3-byte sequences)
    Cjk,
    /// Emoji (4-byte sequences)
    Emoji,
    /// Realistic prose with occasional non-ASCII of every length
    Mixed,
    /// No ASCII at all; 2-, 3- and 4-byte characters interleaved
    Pathological,
}

impl Utf8Pattern {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin => "latin",
            Self::Cjk => "cjk",
            Self::Emoji => "emoji",
            Self::Mixed => "mixed",
            Self::Pathological => "pathological",
        }
    }

    fn words(self) -> &'static [&'static str] {
        match self {
            Self::Ascii => &[
                "The quick brown fox jumps over the lazy dog.",
                "Pack my box with five dozen liquor jugs.",
                "How vexingly quick daft zebras jump!",
                "Sphinx of black quartz, judge my vow.",
                "fn main() { println!(\"hello\"); }",
                "2024-01-15T10:23:45Z INFO request served in 12ms",
            ],
            Self::Latin => &[
                "café", "résumé", "naïve", "über", "fiancée", "façade", "jalapeño", "mañana",
                "Ångström", "smörgåsbord", "Müller", "Größe", "Zürich", "Ærø", "Łódź", "Kraków",
                "the", "and", "with",
            ],
            Self::Cjk => &[
                "日本語", "中国語", "漢字", "東京", "北京", "上海", "你好", "谢谢", "欢迎",
                "안녕하세요", "감사합니다", "こんにちは", "ありがとう", "すみません",
            ],
            Self::Emoji => &[
                "😀", "😃", "😄", "😁", "🤣", "😂", "🙂", "😉", "😊", "🥰", "🎉", "🎊", "🎈", "🚀",
                "🌍", "🌎", "💻", "💾", "🔥", "💧", "🌊", "🌟",
            ],
            Self::Mixed => &[
                "The quick brown fox jumps over the lazy dog.",
                "Hello, world! This is a test message.",
                "Café au lait with crème brûlée is très délicieux.",
                "Great job! 🎉 Keep up the good work! 💪",
                "Meeting at 東京 station at 3pm tomorrow.",
                "Price: €50.00 or £42.00 or ¥6,000",
                "Math: α + β = γ, ∑(x²) = n",
            ],
            Self::Pathological => &[
                "é", "ß", "ж", "λ", "日", "本", "語", "€", "😀", "🚀", "𝄞", "𐍈",
            ],
        }
    }

    fn separator(self) -> Option<u8> {
        match self {
            Self::Cjk | Self::Emoji | Self::Pathological => None,
            _ => Some(b' '),
        }
    }
}

/// Generate exactly `target_size` bytes of valid UTF-8.
///
/// Without a seed, words are taken in a fixed rotation.
pub fn generate_utf8(target_size: usize, pattern: Utf8Pattern, seed: Option<u64>) -> Vec<u8> {
    let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
    let words = pattern.words();
    let mut result = Vec::with_capacity(target_size);
    let mut line_len = 0;
    let mut i = 0;

    loop {
        let idx = rng
            .as_mut()
            .map(|r| r.gen_range(0..words.len()))
            .unwrap_or(i % words.len());
        i += 1;
        let word = words[idx].as_bytes();

        let sep = if line_len > 0 && line_len + word.len() >= 80 {
            line_len = 0;
            Some(b'\n')
        } else if line_len > 0 {
            pattern.separator()
        } else {
            None
        };

        let needed = word.len() + usize::from(sep.is_some());
        if result.len() + needed > target_size {
            break;
        }
        if let Some(sep) = sep {
            result.push(sep);
            line_len += 1;
        }
        result.extend_from_slice(word);
        line_len += word.len();
    }

    // Pad with ASCII so the size is exact and no sequence is split.
    result.resize(target_size, b' ');
    result
}
