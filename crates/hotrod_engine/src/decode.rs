use encoding_rs::UTF_8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("contents are not valid UTF-8")]
    InvalidUtf8,
}

/// Decode raw bytes as UTF-8 without replacement characters.
///
/// A leading BOM is kept so file contents reach the UI byte-for-byte; callers
/// that parse the text use [`strip_bom`].
pub fn decode_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(DecodeError::InvalidUtf8)
}

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
