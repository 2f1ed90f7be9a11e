//! Base64 transcoding of UTF-8 text.
//!
//! This module provides:
//! - [`encode`] / [`decode`]: text ↔ standard padded Base64 (RFC 4648 §4)
//! - [`encode_bytes`] / [`decode_bytes`]: the same alphabet over raw bytes,
//!   used by the ciphers for their transport encoding
//!
//! Decoding is strict: non-alphabet characters, missing or misplaced `=`,
//! impossible lengths and non-zero trailing bits are all rejected. Only
//! leading and trailing ASCII whitespace is tolerated.

use crate::error::CodecError;
use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};

/// Encode the UTF-8 bytes of `text` as padded standard Base64.
#[must_use]
pub fn encode(text: &str) -> String {
    encode_bytes(text.as_bytes())
}

/// Decode padded standard Base64 and interpret the bytes as UTF-8.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed Base64 and
/// [`CodecError::Encoding`] if the decoded bytes are not UTF-8.
pub fn decode(text: &str) -> Result<String, CodecError> {
    let bytes = decode_bytes(text)?;
    String::from_utf8(bytes).map_err(|_| CodecError::Encoding)
}

/// Encode raw bytes as padded standard Base64.
#[must_use]
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode padded standard Base64 into raw bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] with a message naming the fault.
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, CodecError> {
    let after_leading = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let leading = text.len().saturating_sub(after_leading.len());
    let trimmed = after_leading.trim_end_matches(|c: char| c.is_ascii_whitespace());
    STANDARD
        .decode(trimmed)
        .map_err(|e| CodecError::Decode(describe(&e, leading)))
}

/// Human-readable description of a Base64 fault. Offsets refer to the
/// caller's original (untrimmed) input.
fn describe(err: &DecodeError, leading: usize) -> String {
    match err {
        DecodeError::InvalidByte(offset, b'=') => {
            format!(
                "invalid Base64 padding at offset {}",
                offset.saturating_add(leading)
            )
        }
        DecodeError::InvalidByte(offset, _) => format!(
            "invalid Base64 character at offset {}",
            offset.saturating_add(leading)
        ),
        DecodeError::InvalidLength(_) => "invalid Base64 length".to_string(),
        DecodeError::InvalidLastSymbol(offset, _) => format!(
            "invalid Base64 trailing bits at offset {}",
            offset.saturating_add(leading)
        ),
        DecodeError::InvalidPadding => "invalid Base64 padding".to_string(),
    }
}
