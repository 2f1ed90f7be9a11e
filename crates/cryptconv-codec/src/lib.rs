//! `cryptconv-codec`: pure text conversion codecs for cryptconv.
//!
//! No network, no async, no HTTP types. Every operation takes text (plus a
//! key or algorithm name) and returns text or a [`CodecError`]; the server
//! crate decides how those map onto responses.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod encoding;

pub mod digest;

pub mod kdf;
pub mod symmetric;

pub mod hybrid;

pub use digest::{digest, digest_named, DigestAlgorithm};
pub use error::CodecError;
pub use hybrid::{parse_private_key, parse_public_key, Envelope};
pub use kdf::Argon2idParams;
pub use memory::{disable_core_dumps, LockedRegion, SecretBuffer, SecretBytes};
pub use symmetric::{decrypt, encrypt, SealedData};
