//! Ciphertexts produced outside this crate (OpenSSL-backed Argon2id,
//! AES-GCM and RSA-OAEP) in the documented wire formats. Decrypting them
//! pins the byte layout, not just self-consistency.

use cryptconv_codec::error::CodecError;
use cryptconv_codec::{hybrid, symmetric};

const PASSPHRASE_VECTOR: &str = include_str!("../fixtures/passphrase_vector.b64");
const ALICE_ENVELOPE: &str = include_str!("../fixtures/alice_envelope.b64");
const ALICE_PRIVATE: &str = include_str!("../fixtures/alice_private.pem");
const ALICE_PRIVATE_PKCS1: &str = include_str!("../fixtures/alice_private_pkcs1.pem");
const BOB_PRIVATE: &str = include_str!("../fixtures/bob_private.pem");

#[test]
fn passphrase_vector_decrypts() {
    assert_eq!(
        symmetric::decrypt_text(PASSPHRASE_VECTOR, "correct horse").expect("vector opens"),
        "passphrase vector: \u{2713}"
    );
}

#[test]
fn passphrase_vector_header_carries_its_kdf_params() {
    let blob = cryptconv_codec::encoding::decode_bytes(PASSPHRASE_VECTOR).expect("Base64");
    assert_eq!(blob[0], symmetric::FORMAT_VERSION);
    // m_cost = 64, t_cost = 1, p_cost = 1
    assert_eq!(&blob[1..13], &[64, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn passphrase_vector_rejects_wrong_passphrase() {
    assert!(matches!(
        symmetric::decrypt_text(PASSPHRASE_VECTOR, "Correct horse"),
        Err(CodecError::Decryption(_))
    ));
}

#[test]
fn envelope_vector_decrypts_with_either_pem_encoding() {
    for pem in [ALICE_PRIVATE, ALICE_PRIVATE_PKCS1] {
        assert_eq!(
            hybrid::decrypt_text(ALICE_ENVELOPE, pem).expect("vector opens"),
            "envelope vector: h\u{e9}llo"
        );
    }
}

#[test]
fn envelope_vector_is_an_unwrap_failure_for_bob() {
    assert_eq!(
        hybrid::decrypt_text(ALICE_ENVELOPE, BOB_PRIVATE),
        Err(CodecError::UnwrapFailure)
    );
}
