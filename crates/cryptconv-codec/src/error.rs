//! Codec error types for `cryptconv-codec`.
//!
//! Every message is safe to return to a caller: no plaintext, key bytes,
//! or library internals are ever formatted into a variant.

use thiserror::Error;

/// Errors produced by the conversion codecs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not valid standard (padded) Base64.
    #[error("{0}")]
    Decode(String),

    /// Decoded bytes are not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8 text")]
    Encoding,

    /// Digest algorithm name is not in the supported set.
    #[error("unsupported hash algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    /// AES layer failure: malformed blob, wrong key, or tampered data.
    ///
    /// Authentication failures always carry the same reason so that
    /// callers cannot distinguish wrong-key from tampering.
    #[error("decryption failed: {0}")]
    Decryption(&'static str),

    /// The supplied PEM could not be used as an RSA public key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    /// The supplied PEM could not be used as an RSA private key.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(&'static str),

    /// RSA-OAEP unwrap of the envelope key failed.
    #[error("key unwrap failed: private key does not match or wrapped key is corrupted")]
    UnwrapFailure,

    /// Key derivation failed (Argon2id parameter validation, memory allocation).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failure (invalid key length, RNG or cipher failure).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Secure memory allocation or CSPRNG failure.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}

impl CodecError {
    /// Returns `true` when the error was caused by the caller's input rather
    /// than by a fault inside the service.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Self::KeyDerivation(_) | Self::Encryption(_) | Self::SecureMemory(_)
        )
    }
}
