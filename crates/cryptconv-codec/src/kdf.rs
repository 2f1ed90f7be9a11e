//! Argon2id passphrase key derivation.
//!
//! This module provides:
//! - [`derive`]: derive a 256-bit AES key from a passphrase + salt
//! - [`Argon2idParams`]: the cost parameters, embedded in every symmetric
//!   ciphertext so that decryption does not depend on server configuration
//!
//! # Bounds
//!
//! Parameters read back from a ciphertext are attacker-controlled. Before
//! any derivation runs they are checked against [`MAX_M_COST`],
//! [`MAX_T_COST`] and [`MAX_P_COST`], and then against a decrypt ceiling
//! ([`Argon2idParams::decrypt_ceiling`]) tied to the configured encrypt cost.
//! A crafted blob can therefore cost at most a few times an ordinary one.

use crate::error::CodecError;
use crate::memory::SecretBuffer;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Output length of the KDF in bytes (AES-256 key).
pub const OUTPUT_LEN: usize = 32;

/// Salt length written by this crate.
pub const SALT_LEN: usize = 16;

/// Encoded length of [`Argon2idParams`] (three little-endian `u32`s).
pub const PARAMS_LEN: usize = 12;

/// Upper bound on memory cost: 256 MiB, in KiB.
pub const MAX_M_COST: u32 = 262_144;

/// Upper bound on iterations.
pub const MAX_T_COST: u32 = 16;

/// Upper bound on lanes.
pub const MAX_P_COST: u32 = 16;

/// How far above the configured encrypt cost a ciphertext may ask
/// decryption to go, per parameter.
pub const DECRYPT_COST_FACTOR: u32 = 4;

/// Argon2id cost parameters.
///
/// Field units follow the `argon2` crate:
/// - `m_cost`: memory in KiB
/// - `t_cost`: iterations
/// - `p_cost`: lanes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2idParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for Argon2idParams {
    /// 19 MiB, 2 iterations, 1 lane (OWASP's Argon2id baseline).
    fn default() -> Self {
        Self {
            m_cost: 19_456,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl Argon2idParams {
    /// Check the parameters against argon2's minimums and this crate's maximums.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::KeyDerivation` naming the offending parameter.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.p_cost == 0 || self.p_cost > MAX_P_COST {
            return Err(CodecError::KeyDerivation(format!(
                "parallelism must be within 1..={MAX_P_COST} (got {})",
                self.p_cost
            )));
        }
        if self.t_cost == 0 || self.t_cost > MAX_T_COST {
            return Err(CodecError::KeyDerivation(format!(
                "iterations must be within 1..={MAX_T_COST} (got {})",
                self.t_cost
            )));
        }
        let min_m_cost = self.p_cost.saturating_mul(8);
        if self.m_cost < min_m_cost || self.m_cost > MAX_M_COST {
            return Err(CodecError::KeyDerivation(format!(
                "memory cost must be within {min_m_cost}..={MAX_M_COST} KiB (got {})",
                self.m_cost
            )));
        }
        Ok(())
    }

    /// Largest parameters decryption will run for ciphertexts written at
    /// `self`.
    ///
    /// Each cost is [`DECRYPT_COST_FACTOR`] times `self`, never below the
    /// default baseline and never above the absolute maximums.
    #[must_use]
    pub fn decrypt_ceiling(&self) -> Self {
        let baseline = Self::default();
        let scaled = |cost: u32, floor: u32, max: u32| {
            cost.saturating_mul(DECRYPT_COST_FACTOR).clamp(floor, max)
        };
        Self {
            m_cost: scaled(self.m_cost, baseline.m_cost, MAX_M_COST),
            t_cost: scaled(self.t_cost, baseline.t_cost, MAX_T_COST),
            p_cost: scaled(self.p_cost, baseline.p_cost, MAX_P_COST),
        }
    }

    /// [`Argon2idParams::validate`], then require every cost to be at most
    /// the matching cost in `ceiling`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::KeyDerivation` naming the offending parameter.
    pub fn validate_within(&self, ceiling: &Self) -> Result<(), CodecError> {
        self.validate()?;
        let over = [
            ("memory cost", self.m_cost, ceiling.m_cost),
            ("iterations", self.t_cost, ceiling.t_cost),
            ("parallelism", self.p_cost, ceiling.p_cost),
        ]
        .into_iter()
        .find(|&(_, value, limit)| value > limit);
        match over {
            Some((name, value, limit)) => Err(CodecError::KeyDerivation(format!(
                "{name} {value} exceeds the decrypt ceiling of {limit}"
            ))),
            None => Ok(()),
        }
    }

    /// Encode as `m_cost || t_cost || p_cost`, each `u32` little-endian.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PARAMS_LEN] {
        let mut out = [0u8; PARAMS_LEN];
        out[..4].copy_from_slice(&self.m_cost.to_le_bytes());
        out[4..8].copy_from_slice(&self.t_cost.to_le_bytes());
        out[8..].copy_from_slice(&self.p_cost.to_le_bytes());
        out
    }

    /// Decode the layout written by [`Argon2idParams::to_bytes`].
    ///
    /// No bounds are checked here; call [`Argon2idParams::validate`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8; PARAMS_LEN]) -> Self {
        let word = |i: usize| {
            let mut w = [0u8; 4];
            w.copy_from_slice(&bytes[i..i.saturating_add(4)]);
            u32::from_le_bytes(w)
        };
        Self {
            m_cost: word(0),
            t_cost: word(4),
            p_cost: word(8),
        }
    }
}

/// Derive a 256-bit key from `password` and `salt` with Argon2id v1.3.
///
/// Any passphrase length is accepted, including empty; the server rejects
/// empty keys before reaching this point.
///
/// # Errors
///
/// Returns `CodecError::KeyDerivation` if:
/// - the salt is not [`SALT_LEN`] bytes
/// - the parameters fail [`Argon2idParams::validate`]
/// - argon2 itself fails (e.g. memory allocation)
pub fn derive(
    password: &[u8],
    salt: &[u8],
    params: &Argon2idParams,
) -> Result<SecretBuffer, CodecError> {
    if salt.len() != SALT_LEN {
        return Err(CodecError::KeyDerivation(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    params.validate()?;

    let argon2_params = argon2::Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(OUTPUT_LEN),
    )
    .map_err(|e| CodecError::KeyDerivation(format!("invalid argon2 params: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; OUTPUT_LEN];
    let derived = argon2.hash_password_into(password, salt, &mut output);
    if let Err(e) = derived {
        output.zeroize();
        return Err(CodecError::KeyDerivation(format!(
            "argon2id derivation failed: {e}"
        )));
    }

    let result = SecretBuffer::new(&output);
    output.zeroize();
    result
}
