//! Runtime configuration: CLI flags with `CRYPTCONV_*` environment fallbacks.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use cryptconv_codec::{Argon2idParams, CodecError};
use thiserror::Error;

use crate::dispatch::CodecSettings;

/// Largest accepted `--max-concurrent-conversions`.
pub const MAX_CONCURRENT_CONVERSIONS: usize = 1024;

/// Invalid configuration detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--max-body-bytes must be at least 1")]
    ZeroBodyLimit,

    #[error("--request-timeout-secs must be at least 1")]
    ZeroTimeout,

    #[error("--max-concurrent-conversions must be within 1..=1024")]
    ConcurrencyOutOfRange,

    #[error("invalid KDF settings: {0}")]
    Kdf(#[from] CodecError),
}

/// Stateless Base64, digest and encryption conversions over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "cryptconv", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "CRYPTCONV_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Default log filter (`RUST_LOG` takes precedence).
    #[arg(long, env = "CRYPTCONV_LOG", default_value = "info")]
    pub log: String,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "CRYPTCONV_MAX_BODY_BYTES", default_value_t = 1_048_576)]
    pub max_body_bytes: usize,

    /// Seconds a conversion may run before the caller gets a 503.
    #[arg(long, env = "CRYPTCONV_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Conversions allowed on blocking workers at once; further requests
    /// wait for a slot within their timeout.
    #[arg(long, env = "CRYPTCONV_MAX_CONCURRENT_CONVERSIONS", default_value_t = 8)]
    pub max_concurrent_conversions: usize,

    /// Argon2id memory cost for AES encryption, in KiB.
    #[arg(long, env = "CRYPTCONV_KDF_MEMORY_KIB", default_value_t = 19_456)]
    pub kdf_memory_kib: u32,

    /// Argon2id iterations for AES encryption.
    #[arg(long, env = "CRYPTCONV_KDF_ITERATIONS", default_value_t = 2)]
    pub kdf_iterations: u32,

    /// Argon2id lanes for AES encryption.
    #[arg(long, env = "CRYPTCONV_KDF_PARALLELISM", default_value_t = 1)]
    pub kdf_parallelism: u32,
}

impl Config {
    /// Argon2id parameters used when encrypting.
    #[must_use]
    pub const fn kdf_params(&self) -> Argon2idParams {
        Argon2idParams {
            m_cost: self.kdf_memory_kib,
            t_cost: self.kdf_iterations,
            p_cost: self.kdf_parallelism,
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the server cannot run with.
    ///
    /// KDF parameters are held to the same bounds that decryption enforces,
    /// so the server never writes a ciphertext it would refuse to read.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<CodecSettings, ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if !(1..=MAX_CONCURRENT_CONVERSIONS).contains(&self.max_concurrent_conversions) {
            return Err(ConfigError::ConcurrencyOutOfRange);
        }
        let kdf = self.kdf_params();
        kdf.validate()?;
        Ok(CodecSettings { kdf })
    }
}
