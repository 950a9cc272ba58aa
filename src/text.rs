// Text transcoding between UTF-8 and the wire encodings SMPP short messages
// use: UCS-2 (big-endian, data_coding 8) and GB18030 (data_coding 15).
//
// Grounded on `encoding_rs`, the same crate the wider Rust ecosystem reaches
// for whenever it needs a non-UTF-8 legacy encoding; GSM 7-bit packing is out
// of scope (ASCII short messages are passed through as raw bytes instead).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    #[error("UCS-2 byte length {0} is not a multiple of 2")]
    OddUcs2Length(usize),

    #[error("input contains a character unrepresentable in GB18030")]
    UnrepresentableInGb18030,
}

/// Encodes a UTF-8 string to big-endian UCS-2 (UTF-16 code units, no BOM,
/// no surrogate pairs beyond the BMP truncated individually as UTF-16 would).
pub fn utf8_to_ucs2(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 2);
    for unit in input.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// Decodes big-endian UCS-2 bytes back to a UTF-8 `String`.
pub fn ucs2_to_utf8(bytes: &[u8]) -> Result<String, TextError> {
    if bytes.len() % 2 != 0 {
        return Err(TextError::OddUcs2Length(bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| TextError::InvalidUtf8)
}

/// Encodes a UTF-8 string to GB18030.
pub fn utf8_to_gb18030(input: &str) -> Result<Vec<u8>, TextError> {
    let (bytes, _, had_errors) = encoding_rs::GB18030.encode(input);
    if had_errors {
        return Err(TextError::UnrepresentableInGb18030);
    }
    Ok(bytes.into_owned())
}

/// Decodes GB18030 bytes back to a UTF-8 `String`.
pub fn gb18030_to_utf8(bytes: &[u8]) -> Result<String, TextError> {
    let (text, _, had_errors) = encoding_rs::GB18030.decode(bytes);
    if had_errors {
        return Err(TextError::InvalidUtf8);
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ucs2_roundtrip_ascii() {
        let encoded = utf8_to_ucs2("hello");
        assert_eq!(
            encoded,
            vec![0x00, b'h', 0x00, b'e', 0x00, b'l', 0x00, b'l', 0x00, b'o']
        );
        assert_eq!(ucs2_to_utf8(&encoded).unwrap(), "hello");
    }

    #[test]
    fn ucs2_roundtrip_non_ascii() {
        let text = "你好世界";
        let encoded = utf8_to_ucs2(text);
        assert_eq!(encoded.len(), text.chars().count() * 2);
        assert_eq!(ucs2_to_utf8(&encoded).unwrap(), text);
    }

    #[test]
    fn ucs2_rejects_odd_length() {
        assert!(matches!(
            ucs2_to_utf8(&[0x00]),
            Err(TextError::OddUcs2Length(1))
        ));
    }

    #[test]
    fn gb18030_roundtrip() {
        let text = "你好，世界";
        let encoded = utf8_to_gb18030(text).unwrap();
        assert_eq!(gb18030_to_utf8(&encoded).unwrap(), text);
    }

    #[test]
    fn gb18030_roundtrip_ascii() {
        let encoded = utf8_to_gb18030("hello").unwrap();
        assert_eq!(encoded, b"hello");
    }
}
