//! WinAnsi (Windows-1252) text encoding for the standard PDF fonts

use encoding_rs::{EncoderResult, UTF_16BE, WINDOWS_1252};

/// Byte written for characters the encoding cannot represent
const REPLACEMENT: u8 = b'?';

/// Encode `text` for a font using `WinAnsiEncoding`
///
/// Characters outside the encoding become `?`; tabs become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let text = text.replace('\t', " ");
    let mut encoder = WINDOWS_1252.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut input = text.as_str();

    loop {
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(input, &mut out, true);
        input = &input[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::Unmappable(_) => out.push(REPLACEMENT),
            EncoderResult::OutputFull => out.reserve(input.len().max(1)),
        }
    }

    out
}

/// Decode single-byte WinAnsi text, used when a font has no usable encoding
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Decode a PDF text string that starts with the UTF-16BE byte order mark
pub fn decode_utf16_be(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(&[0xFE, 0xFF])?;
    let (text, had_errors) = UTF_16BE.decode_without_bom_handling(body);
    (!had_errors).then(|| text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_passes_through() {
        assert_eq!(encode_win_ansi("Café Noël"), b"Caf\xe9 No\xebl".to_vec());
    }

    #[test]
    fn test_extras_and_unmappable() {
        assert_eq!(encode_win_ansi("€5 – ok"), vec![0x80, b'5', b' ', 0x96, b' ', b'o', b'k']);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\tb✓c"), b"a b?c".to_vec());
    }

    #[test]
    fn test_decode_reverses_encode() {
        let text = "Aantal: 2 – €12,50 naïef";
        assert_eq!(decode_win_ansi(&encode_win_ansi(text)), text);
    }

    #[test]
    fn test_utf16_needs_byte_order_mark() {
        assert_eq!(
            decode_utf16_be(&[0xFE, 0xFF, 0x00, 0x52, 0x00, 0xE9, 0x00, 0x66]),
            Some("Réf".to_string())
        );
        assert_eq!(decode_utf16_be(b"Ref"), None);
    }
}
