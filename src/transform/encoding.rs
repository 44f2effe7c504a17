//! Byte-preserving text decoding.

use std::fmt;

/// How a file's bytes were turned into text.
///
/// UTF-8 is tried first. Anything else is read as Latin-1, which maps every
/// byte to exactly one char, so a decode/encode round trip reproduces the
/// original bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Decodes bytes, falling back to Latin-1 when they are not UTF-8.
    pub fn decode(bytes: &[u8]) -> (String, Self) {
        match std::str::from_utf8(bytes) {
            Ok(text) => (text.to_string(), Self::Utf8),
            Err(_) => (bytes.iter().map(|&b| b as char).collect(), Self::Latin1),
        }
    }

    /// Encodes text back to bytes.
    ///
    /// Returns `None` if a char has no Latin-1 representation.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            Self::Utf8 => Some(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => f.write_str("utf-8"),
            Self::Latin1 => f.write_str("latin-1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_primary() {
        let (text, enc) = TextEncoding::decode("héllo".as_bytes());
        assert_eq!(enc, TextEncoding::Utf8);
        assert_eq!(text, "héllo");
    }

    #[test]
    fn test_latin1_round_trips_every_byte() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let (text, enc) = TextEncoding::decode(&bytes);

        assert_eq!(enc, TextEncoding::Latin1);
        assert_eq!(enc.encode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        assert!(TextEncoding::Latin1.encode("\u{4e2d}").is_none());
        assert!(TextEncoding::Utf8.encode("\u{4e2d}").is_some());
    }
}
