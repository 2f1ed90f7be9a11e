//! Failure messages are returned to remote callers, so they must never
//! contain the text, passphrase or key material that caused them.

use cryptconv_codec::kdf::Argon2idParams;
use cryptconv_codec::{encoding, hybrid, symmetric};

const ALICE_PUBLIC: &str = include_str!("../fixtures/alice_public.pem");
const ALICE_PRIVATE: &str = include_str!("../fixtures/alice_private.pem");
const BOB_PRIVATE: &str = include_str!("../fixtures/bob_private.pem");

const FAST: Argon2idParams = Argon2idParams {
    m_cost: 64,
    t_cost: 1,
    p_cost: 1,
};

const PLAINTEXT: &str = "top-secret-plaintext";
const PASSPHRASE: &str = "correct-horse-battery";

#[test]
fn wrong_passphrase_error_does_not_echo_inputs() {
    let ct = symmetric::encrypt_text(PLAINTEXT, PASSPHRASE, &FAST).expect("encrypt");
    let msg = symmetric::decrypt_text(&ct, "wrong-passphrase-xyz")
        .expect_err("wrong passphrase")
        .to_string();
    assert!(!msg.contains("wrong-passphrase-xyz"));
    assert!(!msg.contains(PASSPHRASE));
    assert!(!msg.contains(PLAINTEXT));
    assert!(!msg.contains(&ct));
}

#[test]
fn unwrap_failure_does_not_echo_private_key() {
    let ct = hybrid::encrypt_text(PLAINTEXT, ALICE_PUBLIC).expect("encrypt");
    let msg = hybrid::decrypt_text(&ct, BOB_PRIVATE)
        .expect_err("wrong key")
        .to_string();
    for line in BOB_PRIVATE.lines().filter(|l| !l.starts_with("-----")) {
        assert!(!msg.contains(line));
    }
}

#[test]
fn malformed_private_key_error_does_not_echo_it() {
    let broken = ALICE_PRIVATE.replacen("MII", "XXX", 1);
    let msg = hybrid::parse_private_key(&broken)
        .expect_err("corrupted key")
        .to_string();
    assert!(msg.starts_with("invalid private key: "));
    assert!(!msg.contains("XXX"));
    assert!(msg.len() < 120);
}

#[test]
fn decode_error_reports_position_not_content() {
    let msg = encoding::decode("c2VjcmV0!!!!")
        .expect_err("bad base64")
        .to_string();
    assert_eq!(msg, "invalid Base64 character at offset 8");
}
