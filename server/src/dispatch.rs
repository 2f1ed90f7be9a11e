//! Request Dispatcher: validate a conversion request, then route it to a codec.
//!
//! Validation always completes before any codec runs, so a request with a
//! missing key never pays for Argon2 or RSA work. Order of checks:
//!
//! 1. `type` (missing or unknown → `unsupported conversion type`)
//! 2. `action` (ignored for `hash`)
//! 3. `text` (required, may be empty)
//! 4. the one key field `(type, action)` needs; other key fields are ignored

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use cryptconv_codec::{encoding, hybrid, symmetric, Argon2idParams, CodecError, DigestAlgorithm};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ConvertError;

/// Longest user-supplied name echoed back in an error message.
const MAX_ECHO_CHARS: usize = 32;

/// Conversion types accepted in the `type` field.
pub const CONVERSION_TYPES: [&str; 4] = ["base64", "hash", "aes", "aes_rsa"];

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /convert`.
///
/// Every field is optional on the wire so that absent values are reported
/// by [`dispatch`] with a field-specific message. All strings are zeroized
/// when the request is dropped.
#[derive(Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ConversionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub action: Option<String>,
    pub text: Option<String>,
    pub algorithm: Option<String>,
    pub key: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("ConversionRequest")
            .field("kind", &self.kind)
            .field("action", &self.action)
            .field("text", &masked(&self.text))
            .field("algorithm", &self.algorithm)
            .field("key", &masked(&self.key))
            .field("public_key", &self.public_key.as_ref().map(|_| "<pem>"))
            .field("private_key", &masked(&self.private_key))
            .finish()
    }
}

impl ConversionRequest {
    /// Canonical type name for logs, or `"unknown"`. Never echoes raw input.
    #[must_use]
    pub fn type_label(&self) -> &'static str {
        self.kind
            .as_deref()
            .and_then(|k| CONVERSION_TYPES.iter().find(|t| **t == k))
            .copied()
            .unwrap_or("unknown")
    }

    /// Canonical action name for logs: `"-"` when absent or not applicable,
    /// `"unknown"` when unrecognised.
    #[must_use]
    pub fn action_label(&self) -> &'static str {
        if self.kind.as_deref() == Some("hash") {
            return "-";
        }
        match self.action.as_deref() {
            None => "-",
            Some("encode") => "encode",
            Some("decode") => "decode",
            Some("encrypt") => "encrypt",
            Some("decrypt") => "decrypt",
            Some(_) => "unknown",
        }
    }
}

/// Response body: exactly one of `{"result": ...}` or `{"error": ...}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionResult {
    Result(String),
    Error(String),
}

impl fmt::Debug for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Result(_) => f.write_str("Result(***)"),
            Self::Error(msg) => f.debug_tuple("Error").field(msg).finish(),
        }
    }
}

impl From<Result<String, ConvertError>> for ConversionResult {
    fn from(outcome: Result<String, ConvertError>) -> Self {
        match outcome {
            Ok(value) => Self::Result(value),
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

/// Codec parameters fixed at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodecSettings {
    /// Argon2id cost used when encrypting. Decryption reads the cost from
    /// the ciphertext and refuses anything above `kdf.decrypt_ceiling()`.
    pub kdf: Argon2idParams,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A fully validated request, borrowing its strings from the
/// [`ConversionRequest`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum Conversion<'a> {
    Base64Encode { text: &'a str },
    Base64Decode { text: &'a str },
    Hash { text: &'a str, algorithm: &'a str },
    AesEncrypt { text: &'a str, key: &'a str },
    AesDecrypt { text: &'a str, key: &'a str },
    RsaEncrypt { text: &'a str, public_key: &'a str },
    RsaDecrypt { text: &'a str, private_key: &'a str },
}

#[derive(Clone, Copy)]
enum Kind {
    Base64,
    Hash,
    Aes,
    AesRsa,
}

impl Kind {
    const fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Hash => "hash",
            Self::Aes => "aes",
            Self::AesRsa => "aes_rsa",
        }
    }
}

fn missing(field: &str) -> ConvertError {
    ConvertError::Validation(format!("missing required field: {field}"))
}

/// First [`MAX_ECHO_CHARS`] characters of a user-supplied name.
fn truncated(name: &str) -> String {
    name.chars().take(MAX_ECHO_CHARS).collect()
}

/// A key-like field: present and non-empty.
fn non_empty<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ConvertError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

impl<'a> Conversion<'a> {
    fn from_request(request: &'a ConversionRequest) -> Result<Self, ConvertError> {
        let kind = match request.kind.as_deref() {
            Some("base64") => Kind::Base64,
            Some("hash") => Kind::Hash,
            Some("aes") => Kind::Aes,
            Some("aes_rsa") => Kind::AesRsa,
            _ => return Err(ConvertError::UnsupportedType),
        };

        let action = match kind {
            Kind::Hash => "",
            _ => non_empty(request.action.as_deref(), "action")?,
        };
        let unsupported_action = || {
            ConvertError::Validation(format!(
                "unsupported action '{}' for type '{}'",
                truncated(action),
                kind.name()
            ))
        };
        match (kind, action) {
            (Kind::Hash, _)
            | (Kind::Base64, "encode" | "decode")
            | (Kind::Aes | Kind::AesRsa, "encrypt" | "decrypt") => {}
            _ => return Err(unsupported_action()),
        }

        let text = request.text.as_deref().ok_or_else(|| missing("text"))?;

        let conversion = match (kind, action) {
            (Kind::Base64, "encode") => Self::Base64Encode { text },
            (Kind::Base64, _) => Self::Base64Decode { text },
            (Kind::Hash, _) => Self::Hash {
                text,
                algorithm: non_empty(request.algorithm.as_deref(), "algorithm")?,
            },
            (Kind::Aes, "encrypt") => Self::AesEncrypt {
                text,
                key: non_empty(request.key.as_deref(), "key")?,
            },
            (Kind::Aes, _) => Self::AesDecrypt {
                text,
                key: non_empty(request.key.as_deref(), "key")?,
            },
            (Kind::AesRsa, "encrypt") => Self::RsaEncrypt {
                text,
                public_key: non_empty(request.public_key.as_deref(), "public_key")?,
            },
            (Kind::AesRsa, _) => Self::RsaDecrypt {
                text,
                private_key: non_empty(request.private_key.as_deref(), "private_key")?,
            },
        };
        Ok(conversion)
    }

    fn run(self, settings: &CodecSettings) -> Result<String, ConvertError> {
        let output = match self {
            Self::Base64Encode { text } => encoding::encode(text),
            Self::Base64Decode { text } => encoding::decode(text)?,
            Self::Hash { text, algorithm } => {
                let algorithm: DigestAlgorithm = algorithm
                    .parse()
                    .map_err(|_| CodecError::UnsupportedAlgorithm(truncated(algorithm)))?;
                cryptconv_codec::digest(text, algorithm)
            }
            Self::AesEncrypt { text, key } => symmetric::encrypt_text(text, key, &settings.kdf)?,
            Self::AesDecrypt { text, key } => {
                symmetric::decrypt_text_within(text, key, &settings.kdf.decrypt_ceiling())?
            }
            Self::RsaEncrypt { text, public_key } => hybrid::encrypt_text(text, public_key)?,
            Self::RsaDecrypt { text, private_key } => hybrid::decrypt_text(text, private_key)?,
        };
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate and run one conversion.
///
/// # Errors
///
/// Returns [`ConvertError`] for validation failures, codec failures, and
/// [`ConvertError::Internal`] if a codec panics.
pub fn convert(
    request: &ConversionRequest,
    settings: &CodecSettings,
) -> Result<String, ConvertError> {
    let conversion = Conversion::from_request(request)?;
    panic::catch_unwind(AssertUnwindSafe(|| conversion.run(settings)))
        .unwrap_or(Err(ConvertError::Internal("conversion panicked")))
}

/// Validate and run one conversion, folding any failure into
/// [`ConversionResult::Error`].
#[must_use]
pub fn dispatch(request: &ConversionRequest, settings: &CodecSettings) -> ConversionResult {
    convert(request, settings).into()
}
