//! RSA-OAEP envelopes across key encodings and key pairs.

use cryptconv_codec::error::CodecError;
use cryptconv_codec::hybrid::{decrypt_text, encrypt_text, parse_public_key, MIN_MODULUS_BITS};
use rsa::traits::PublicKeyParts;

const ALICE_PUBLIC: &str = include_str!("../fixtures/alice_public.pem");
const ALICE_PUBLIC_PKCS1: &str = include_str!("../fixtures/alice_public_pkcs1.pem");
const ALICE_PRIVATE: &str = include_str!("../fixtures/alice_private.pem");
const ALICE_PRIVATE_PKCS1: &str = include_str!("../fixtures/alice_private_pkcs1.pem");
const BOB_PUBLIC: &str = include_str!("../fixtures/bob_public.pem");
const BOB_PRIVATE: &str = include_str!("../fixtures/bob_private.pem");
const WEAK_PUBLIC: &str = include_str!("../fixtures/weak_1024_public.pem");

#[test]
fn spki_and_pkcs1_encodings_are_interchangeable() {
    for public in [ALICE_PUBLIC, ALICE_PUBLIC_PKCS1] {
        let ct = encrypt_text("interchangeable", public).expect("encrypt");
        for private in [ALICE_PRIVATE, ALICE_PRIVATE_PKCS1] {
            assert_eq!(decrypt_text(&ct, private).expect("decrypt"), "interchangeable");
        }
    }
}

#[test]
fn keys_parse_to_the_same_modulus() {
    let spki = parse_public_key(ALICE_PUBLIC).expect("spki");
    let pkcs1 = parse_public_key(ALICE_PUBLIC_PKCS1).expect("pkcs1");
    assert_eq!(spki.n(), pkcs1.n());
    assert!(spki.size() * 8 >= MIN_MODULUS_BITS);
}

#[test]
fn envelopes_are_bound_to_their_key_pair() {
    let for_bob = encrypt_text("for bob", BOB_PUBLIC).expect("encrypt");
    assert_eq!(decrypt_text(&for_bob, BOB_PRIVATE).expect("decrypt"), "for bob");
    assert_eq!(decrypt_text(&for_bob, ALICE_PRIVATE), Err(CodecError::UnwrapFailure));
}

#[test]
fn weak_keys_are_refused() {
    assert!(matches!(
        encrypt_text("x", WEAK_PUBLIC),
        Err(CodecError::InvalidPublicKey(_))
    ));
}

#[test]
fn unicode_and_large_text_roundtrip() {
    let text = "h\u{e9}llo \u{2713} \u{1F510} ".repeat(2048);
    let ct = encrypt_text(&text, ALICE_PUBLIC).expect("encrypt");
    assert_eq!(decrypt_text(&ct, ALICE_PRIVATE).expect("decrypt"), text);
}

#[test]
fn malformed_ciphertexts_are_decryption_errors() {
    for input in ["", "not base64 at all", "AQ==", "AgAAAAA="] {
        assert!(
            matches!(decrypt_text(input, ALICE_PRIVATE), Err(CodecError::Decryption(_))),
            "{input:?}"
        );
    }
}
