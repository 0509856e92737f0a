//! UTF-8 ↔ UTF-32 conversion: a minimal reference implementation of the
//! "text decoder" external collaborator named in SPEC_FULL.md §6.

use crate::error::{IndexError, Result};

/// Decodes `text` into its sequence of Unicode scalar values.
pub fn utf8_to_codepoints(text: &str) -> Vec<u32> {
    text.chars().map(|c| c as u32).collect()
}

/// Re-encodes a slice of code points back into UTF-8 bytes.
///
/// Fails only if a code point is not a valid Unicode scalar value, which
/// cannot happen for a slice carved out of [`utf8_to_codepoints`]'s output,
/// but this function is a boundary crossing (callers may hand it an
/// arbitrary N-gram window) so it is checked rather than assumed.
pub fn codepoints_to_utf8(codepoints: &[u32]) -> Result<Vec<u8>> {
    let mut s = String::with_capacity(codepoints.len());
    for &cp in codepoints {
        let c = char::from_u32(cp)
            .ok_or_else(|| IndexError::InvalidData(format!("{cp:#x} is not a valid code point")))?;
        s.push(c);
    }
    Ok(s.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let text = "hello world";
        let cps = utf8_to_codepoints(text);
        let back = codepoints_to_utf8(&cps).unwrap();
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn test_round_trip_cjk() {
        let text = "你好世界";
        let cps = utf8_to_codepoints(text);
        assert_eq!(cps.len(), 4);
        let back = codepoints_to_utf8(&cps).unwrap();
        assert_eq!(back, text.as_bytes());
    }

    #[test]
    fn test_invalid_codepoint_rejected() {
        // 0xD800 is a surrogate half, not a valid scalar value.
        assert!(codepoints_to_utf8(&[0xD800]).is_err());
    }
}
