//! AES-256-GCM encryption of text under a passphrase.
//!
//! This module provides:
//! - [`encrypt_text`] / [`decrypt_text`]: passphrase ciphertexts as Base64
//! - [`encrypt`] / [`decrypt`]: raw-key AES-256-GCM over bytes, shared with
//!   the hybrid cipher
//! - [`SealedData`]: nonce + ciphertext + tag container
//!
//! # Passphrase ciphertext layout
//!
//! ```text
//! version (1) | m_cost (u32 LE) | t_cost (u32 LE) | p_cost (u32 LE) | salt (16) | nonce (12) | ciphertext | tag (16)
//! ```
//!
//! The first 29 bytes (version, KDF parameters, salt) are authenticated as
//! AAD, so editing the parameters or salt is detected like any other
//! tampering. Salt and nonce are fresh CSPRNG output on every call.

use crate::encoding;
use crate::error::CodecError;
use crate::kdf::{self, Argon2idParams, PARAMS_LEN, SALT_LEN};
use crate::memory::SecretBuffer;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Current passphrase ciphertext version byte.
pub const FORMAT_VERSION: u8 = 1;

/// Version + KDF parameters + salt.
pub const HEADER_LEN: usize = 1 + PARAMS_LEN + SALT_LEN;

/// Minimum sealed length: nonce + empty ciphertext + tag.
const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

/// Minimum passphrase ciphertext length: header + sealed data for empty text.
pub const MIN_BLOB_LEN: usize = HEADER_LEN + MIN_SEALED_LEN;

// Decryption failure reasons. Authentication failures share one reason so
// wrong-key and tampering are indistinguishable to the caller.
pub(crate) const NOT_BASE64: &str = "ciphertext is not valid Base64";
pub(crate) const TOO_SHORT: &str = "ciphertext too short";
pub(crate) const BAD_VERSION: &str = "unsupported ciphertext version";
const BAD_KDF_PARAMS: &str = "unsupported key derivation parameters";
pub(crate) const AUTH_FAILED: &str = "wrong key or corrupted data";

// ---------------------------------------------------------------------------
// SealedData
// ---------------------------------------------------------------------------

/// Authenticated ciphertext: `nonce (12) || ciphertext || tag (16)`.
#[must_use = "encrypted data must be returned to the caller"]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedData {
    /// 96-bit random nonce, unique per encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// 128-bit authentication tag.
    pub tag: [u8; TAG_LEN],
}

impl SealedData {
    /// Serialize to `nonce || ciphertext || tag`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    /// Length of [`SealedData::to_bytes`] output.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        MIN_SEALED_LEN.saturating_add(self.ciphertext.len())
    }

    /// Parse `nonce || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Decryption` if fewer than 28 bytes are supplied.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < MIN_SEALED_LEN {
            return Err(CodecError::Decryption(TOO_SHORT));
        }

        let (nonce_bytes, rest) = bytes.split_at(NONCE_LEN);
        let ct_len = rest
            .len()
            .checked_sub(TAG_LEN)
            .ok_or(CodecError::Decryption(TOO_SHORT))?;
        let (ciphertext, tag_bytes) = rest.split_at(ct_len);

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(tag_bytes);

        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }
}

// ---------------------------------------------------------------------------
// Raw-key AES-256-GCM
// ---------------------------------------------------------------------------

fn aes_key(key: &[u8]) -> Result<aead::LessSafeKey, CodecError> {
    if key.len() != KEY_LEN {
        return Err(CodecError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CodecError::Encryption("failed to create AES-256-GCM key".into()))?;
    Ok(aead::LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under a 32-byte key with a fresh random nonce.
///
/// `aad` is authenticated but not encrypted and must be supplied again
/// to [`decrypt`].
///
/// # Errors
///
/// Returns `CodecError::Encryption` if the key is not 32 bytes or sealing
/// fails, and `CodecError::SecureMemory` if the RNG fails.
pub fn encrypt(plaintext: &[u8], key: &[u8], aad: &[u8]) -> Result<SealedData, CodecError> {
    let key = aes_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CodecError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
    let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    let Ok(tag) = key.seal_in_place_separate_tag(nonce, aead::Aad::from(aad), &mut in_out) else {
        in_out.zeroize();
        return Err(CodecError::Encryption("AES-256-GCM encryption failed".into()));
    };

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_ref());

    Ok(SealedData {
        nonce: nonce_bytes,
        ciphertext: in_out,
        tag: tag_bytes,
    })
}

/// Authenticate and decrypt [`SealedData`].
///
/// # Errors
///
/// Returns `CodecError::Encryption` if the key is not 32 bytes, and
/// `CodecError::Decryption` if the tag does not verify (wrong key, wrong
/// AAD, or modified data).
pub fn decrypt(sealed: &SealedData, key: &[u8], aad: &[u8]) -> Result<SecretBuffer, CodecError> {
    let key = aes_key(key)?;
    let nonce = aead::Nonce::assume_unique_for_key(sealed.nonce);

    let mut ct_tag = Vec::with_capacity(sealed.ciphertext.len().saturating_add(TAG_LEN));
    ct_tag.extend_from_slice(&sealed.ciphertext);
    ct_tag.extend_from_slice(&sealed.tag);

    let result = match key.open_in_place(nonce, aead::Aad::from(aad), &mut ct_tag) {
        Ok(plaintext) => SecretBuffer::new(plaintext),
        Err(_) => Err(CodecError::Decryption(AUTH_FAILED)),
    };
    ct_tag.zeroize();
    result
}

// ---------------------------------------------------------------------------
// Passphrase ciphertexts
// ---------------------------------------------------------------------------

fn header(params: &Argon2idParams, salt: &[u8; SALT_LEN]) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0] = FORMAT_VERSION;
    out[1..=PARAMS_LEN].copy_from_slice(&params.to_bytes());
    out[PARAMS_LEN.saturating_add(1)..].copy_from_slice(salt);
    out
}

/// Encrypt `text` under `passphrase` and return the Base64 ciphertext.
///
/// The key is derived with Argon2id using `params` and a fresh 16-byte salt.
///
/// # Errors
///
/// Returns `CodecError::KeyDerivation` if `params` are out of bounds, and
/// `CodecError::SecureMemory`/`CodecError::Encryption` for internal faults.
pub fn encrypt_text(
    text: &str,
    passphrase: &str,
    params: &Argon2idParams,
) -> Result<String, CodecError> {
    params.validate()?;

    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| CodecError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;

    let header = header(params, &salt);
    let key = kdf::derive(passphrase.as_bytes(), &salt, params)?;
    let sealed = encrypt(text.as_bytes(), key.expose(), &header)?;

    let mut blob = Vec::with_capacity(HEADER_LEN.saturating_add(sealed.encoded_len()));
    blob.extend_from_slice(&header);
    blob.extend_from_slice(&sealed.to_bytes());
    Ok(encoding::encode_bytes(&blob))
}

/// Decrypt a Base64 ciphertext produced by [`encrypt_text`] at no more than
/// the ceiling for the default cost ([`Argon2idParams::decrypt_ceiling`]).
///
/// # Errors
///
/// See [`decrypt_text_within`].
pub fn decrypt_text(text: &str, passphrase: &str) -> Result<String, CodecError> {
    decrypt_text_within(text, passphrase, &Argon2idParams::default().decrypt_ceiling())
}

/// Decrypt a Base64 ciphertext produced by [`encrypt_text`], refusing
/// embedded KDF parameters above `ceiling`.
///
/// # Errors
///
/// Returns `CodecError::Decryption` when the input is not Base64, is
/// shorter than [`MIN_BLOB_LEN`], has an unknown version byte, embeds
/// out-of-bounds or over-ceiling KDF parameters, fails authentication, or
/// decrypts to something other than UTF-8. Parameters are checked before
/// Argon2 runs.
pub fn decrypt_text_within(
    text: &str,
    passphrase: &str,
    ceiling: &Argon2idParams,
) -> Result<String, CodecError> {
    let blob = encoding::decode_bytes(text).map_err(|_| CodecError::Decryption(NOT_BASE64))?;
    if blob.len() < MIN_BLOB_LEN {
        return Err(CodecError::Decryption(TOO_SHORT));
    }

    let (header, sealed_bytes) = blob.split_at(HEADER_LEN);
    if header[0] != FORMAT_VERSION {
        return Err(CodecError::Decryption(BAD_VERSION));
    }

    let mut params_bytes = [0u8; PARAMS_LEN];
    params_bytes.copy_from_slice(&header[1..=PARAMS_LEN]);
    let params = Argon2idParams::from_bytes(&params_bytes);
    params
        .validate_within(ceiling)
        .map_err(|_| CodecError::Decryption(BAD_KDF_PARAMS))?;

    let salt = &header[PARAMS_LEN.saturating_add(1)..];
    let sealed = SealedData::from_bytes(sealed_bytes)?;
    let key = kdf::derive(passphrase.as_bytes(), salt, &params)?;
    let plaintext = decrypt(&sealed, key.expose(), header)?;

    plaintext.to_utf8().ok_or(CodecError::Decryption(AUTH_FAILED))
}
