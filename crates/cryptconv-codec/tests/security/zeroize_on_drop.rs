//! Secret containers: wipe-on-drop wiring and masked formatting.

use cryptconv_codec::kdf::{derive, Argon2idParams};
use cryptconv_codec::memory::{SecretBuffer, SecretBytes};
use zeroize::Zeroize;

const FAST: Argon2idParams = Argon2idParams {
    m_cost: 64,
    t_cost: 1,
    p_cost: 1,
};

#[test]
fn secret_containers_need_drop() {
    assert!(std::mem::needs_drop::<SecretBuffer>());
    assert!(std::mem::needs_drop::<SecretBytes<32>>());
}

#[test]
fn secret_bytes_zeroize_clears_in_place() {
    let mut key = SecretBytes::<32>::new([0xAB; 32]);
    assert_eq!(key.expose()[0], 0xAB);
    key.zeroize();
    assert!(key.expose().iter().all(|&b| b == 0));
}

#[test]
fn random_keys_are_not_all_zero_and_differ() {
    let a = SecretBytes::<32>::random().expect("random should succeed");
    let b = SecretBytes::<32>::random().expect("random should succeed");
    assert!(a.expose().iter().any(|&b| b != 0));
    assert_ne!(a.expose(), b.expose());
}

#[test]
fn secret_formatting_is_masked() {
    let buf = SecretBuffer::new(b"hunter2").expect("allocation should succeed");
    assert_eq!(format!("{buf:?}"), "SecretBuffer(***)");
    assert_eq!(format!("{buf}"), "SecretBuffer(***)");
    assert!(!format!("{buf:#?}").contains("hunter2"));

    let key = SecretBytes::<16>::new([0x41; 16]);
    assert_eq!(format!("{key:?}"), "SecretBytes<16>(***)");
}

#[test]
fn derived_keys_are_masked_secret_buffers() {
    let key = derive(b"passphrase", b"0123456789abcdef", &FAST).expect("derive should succeed");
    assert_eq!(format!("{key:?}"), "SecretBuffer(***)");
    assert_eq!(key.len(), 32);
}
