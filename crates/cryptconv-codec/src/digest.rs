//! One-way digests of UTF-8 text, rendered as lowercase hex.
//!
//! This module provides:
//! - [`DigestAlgorithm`]: the closed set of algorithms this deployment serves
//! - [`digest`]: hash text with a parsed algorithm
//! - [`digest_named`]: parse an algorithm name, then hash
//!
//! Names are matched case-insensitively with `-` and `_` ignored, so
//! `SHA-256`, `sha_256` and `sha256` all select [`DigestAlgorithm::Sha256`].

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt;
use std::str::FromStr;

/// Supported digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlgorithm {
    /// MD5 (RFC 1321). Broken for collision resistance; kept for checksums.
    Md5,
    /// SHA-1 (FIPS 180-4). Broken for collision resistance.
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    #[serde(rename = "sha3-224")]
    Sha3_224,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "sha3-384")]
    Sha3_384,
    #[serde(rename = "sha3-512")]
    Sha3_512,
    /// BLAKE3 with the default 32-byte output.
    Blake3,
}

impl DigestAlgorithm {
    /// Every supported algorithm, in the order advertised to clients.
    pub const ALL: [Self; 11] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake3,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
            Self::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha3_256 | Self::Blake3 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "sha3224" => Ok(Self::Sha3_224),
            "sha3256" => Ok(Self::Sha3_256),
            "sha3384" => Ok(Self::Sha3_384),
            "sha3512" => Ok(Self::Sha3_512),
            "blake3" => Ok(Self::Blake3),
            _ => Err(CodecError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Hash the UTF-8 bytes of `text` and return the lowercase hex digest.
#[must_use]
pub fn digest(text: &str, algorithm: DigestAlgorithm) -> String {
    let data = text.as_bytes();
    match algorithm {
        DigestAlgorithm::Md5 => hex_digest::<md5::Md5>(data),
        DigestAlgorithm::Sha1 => hex_digest::<sha1::Sha1>(data),
        DigestAlgorithm::Sha224 => hex_digest::<sha2::Sha224>(data),
        DigestAlgorithm::Sha256 => hex_digest::<sha2::Sha256>(data),
        DigestAlgorithm::Sha384 => hex_digest::<sha2::Sha384>(data),
        DigestAlgorithm::Sha512 => hex_digest::<sha2::Sha512>(data),
        DigestAlgorithm::Sha3_224 => hex_digest::<sha3::Sha3_224>(data),
        DigestAlgorithm::Sha3_256 => hex_digest::<sha3::Sha3_256>(data),
        DigestAlgorithm::Sha3_384 => hex_digest::<sha3::Sha3_384>(data),
        DigestAlgorithm::Sha3_512 => hex_digest::<sha3::Sha3_512>(data),
        DigestAlgorithm::Blake3 => blake3::hash(data).to_hex().to_string(),
    }
}

/// Parse `algorithm` and hash `text` with it.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedAlgorithm`] if the name is not one of
/// [`DigestAlgorithm::ALL`].
pub fn digest_named(text: &str, algorithm: &str) -> Result<String, CodecError> {
    let algorithm: DigestAlgorithm = algorithm.parse()?;
    Ok(digest(text, algorithm))
}

fn hex_digest<D: Digest>(data: &[u8]) -> String {
    hex::encode(D::digest(data))
}
