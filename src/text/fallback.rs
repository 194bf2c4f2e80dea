//! Branchy byte-at-a-time UTF-8 validator.
//!
//! Used as the `fallback` implementation and as the reference every vector
//! backend is tested against.

const ASCII_MASK: u128 = u128::from_le_bytes([0x80; 16]);

/// True iff `input` is well-formed UTF-8.
///
/// # Examples
///
/// ```
/// use fastutf8::text::fallback::validate_utf8;
///
/// assert!(validate_utf8("héllo 世界".as_bytes()));
/// assert!(!validate_utf8(&[0xC0, 0x80]));
/// ```
pub fn validate_utf8(input: &[u8]) -> bool {
    let len = input.len();
    let mut pos = 0;

    while pos < len {
        // Skip 16 ASCII bytes at a time.
        if let Some(chunk) = input[pos..].first_chunk::<16>() {
            if u128::from_le_bytes(*chunk) & ASCII_MASK == 0 {
                pos += 16;
                continue;
            }
        }

        let lead = input[pos];
        if lead < 0x80 {
            pos += 1;
            continue;
        }

        let (width, min) = match lead {
            0xC0..=0xDF => (2, 0x80),
            0xE0..=0xEF => (3, 0x800),
            0xF0..=0xF7 => (4, 0x1_0000),
            _ => return false,
        };
        let Some(seq) = input.get(pos..pos + width) else {
            return false;
        };

        let mut code_point = u32::from(lead) & (0x7F >> width);
        for &byte in &seq[1..] {
            if byte & 0xC0 != 0x80 {
                return false;
            }
            code_point = (code_point << 6) | u32::from(byte & 0x3F);
        }

        if code_point < min || code_point > 0x10_FFFF || (0xD800..=0xDFFF).contains(&code_point) {
            return false;
        }
        pos += width;
    }

    true
}
