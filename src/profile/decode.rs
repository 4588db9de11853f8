//! Settings document decoding.
//!
//! Windows Terminal writes UTF-8, but settings files edited by hand or written
//! by installers show up as UTF-16 or legacy code pages too.

use crate::error::ProfileError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Decode settings bytes to text.
///
/// Order: byte order mark, BOM-less UTF-16 (a JSON document never starts
/// with a NUL byte), strict UTF-8, then a statistical guess.
pub fn decode_document(bytes: &[u8]) -> Result<String, ProfileError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    if let [first, second, ..] = bytes {
        if *first != 0 && *second == 0 {
            return decode_with(UTF_16LE, bytes);
        }
        if *first == 0 && *second != 0 {
            return decode_with(UTF_16BE, bytes);
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    log::debug!("Settings document is not UTF-8, guessed {}", encoding.name());
    decode_with(encoding, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, ProfileError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(ProfileError::Decode {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_plain_utf8() {
        assert_eq!(decode_document("{\"a\": \"é\"}".as_bytes()).unwrap(), "{\"a\": \"é\"}");
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"{}");
        assert_eq!(decode_document(&bytes).unwrap(), "{}");
    }

    #[test]
    fn test_utf16le_with_and_without_bom() {
        let mut with_bom = vec![0xFF, 0xFE];
        with_bom.extend(utf16le("{\"n\": \"Ü\"}"));
        assert_eq!(decode_document(&with_bom).unwrap(), "{\"n\": \"Ü\"}");
        assert_eq!(decode_document(&utf16le("{}")).unwrap(), "{}");
    }

    #[test]
    fn test_utf16be_without_bom() {
        let bytes: Vec<u8> = "[]".encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        assert_eq!(decode_document(&bytes).unwrap(), "[]");
    }

    #[test]
    fn test_legacy_code_page() {
        // "Entwicklung für Café" in windows-1252
        let mut bytes = b"{\"name\": \"Entwicklung f".to_vec();
        bytes.push(0xFC);
        bytes.extend_from_slice(b"r Caf");
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\"}");
        let text = decode_document(&bytes).unwrap();
        assert!(text.starts_with("{\"name\": \"Entwicklung f"));
        assert!(text.ends_with("\"}"));
    }

    #[test]
    fn test_malformed_utf16_is_decode_error() {
        // BOM followed by an unpaired high surrogate.
        let bytes = [0xFF, 0xFE, 0x00, 0xD8];
        assert!(matches!(
            decode_document(&bytes),
            Err(ProfileError::Decode { encoding: "UTF-16LE" })
        ));
    }
}
