//! NIST SP 800-38D AES-256-GCM vectors (GCMEncryptExtIV256.rsp), checked
//! through the crate's own `SealedData` + `decrypt` path so that the nonce,
//! ciphertext and tag field order is pinned as well as the cipher.

use cryptconv_codec::symmetric::{decrypt, encrypt, SealedData, KEY_LEN, NONCE_LEN, TAG_LEN};
use ring::aead;

struct GcmVector {
    key: &'static str,
    iv: &'static str,
    pt: &'static str,
    aad: &'static str,
    ct: &'static str,
    tag: &'static str,
}

/// Test Case 14: zero key, zero IV, one zero block, no AAD.
const CASE_14: GcmVector = GcmVector {
    key: "0000000000000000000000000000000000000000000000000000000000000000",
    iv: "000000000000000000000000",
    pt: "00000000000000000000000000000000",
    aad: "",
    ct: "cea7403d4d606b6e074ec5d3baf39d18",
    tag: "d0d1c8a799996bf0265b98b5d48ab919",
};

/// Test Case 16: 60-byte plaintext with 20 bytes of AAD.
const CASE_16: GcmVector = GcmVector {
    key: "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308",
    iv: "cafebabefacedbaddecaf888",
    pt: "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72\
         1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39",
    aad: "feedfacedeadbeeffeedfacedeadbeefabaddad2",
    ct: "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa\
         8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662",
    tag: "76fc6ece0f4e1768cddf8853bb2d551b",
};

fn h(s: &str) -> Vec<u8> {
    hex::decode(s).expect("vector is valid hex")
}

fn sealed_from(v: &GcmVector) -> SealedData {
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&h(v.iv));
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&h(v.tag));
    SealedData {
        nonce,
        ciphertext: h(v.ct),
        tag,
    }
}

fn check_open(v: &GcmVector) {
    let plain = decrypt(&sealed_from(v), &h(v.key), &h(v.aad)).expect("NIST vector must open");
    assert_eq!(plain.expose(), h(v.pt).as_slice());
}

fn check_seal(v: &GcmVector) {
    let key = aead::LessSafeKey::new(
        aead::UnboundKey::new(&aead::AES_256_GCM, &h(v.key)).expect("key should be valid"),
    );
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&h(v.iv));
    let aad = h(v.aad);
    let mut in_out = h(v.pt);
    let tag = key
        .seal_in_place_separate_tag(
            aead::Nonce::assume_unique_for_key(nonce),
            aead::Aad::from(aad.as_slice()),
            &mut in_out,
        )
        .expect("seal should succeed");
    assert_eq!(hex::encode(&in_out), v.ct);
    assert_eq!(hex::encode(tag.as_ref()), v.tag);
}

#[test]
fn nist_case_14_seal_and_open() {
    check_seal(&CASE_14);
    check_open(&CASE_14);
}

#[test]
fn nist_case_16_seal_and_open() {
    check_seal(&CASE_16);
    check_open(&CASE_16);
}

#[test]
fn nist_case_16_rejects_modified_aad() {
    let mut aad = h(CASE_16.aad);
    aad[0] ^= 1;
    assert!(decrypt(&sealed_from(&CASE_16), &h(CASE_16.key), &aad).is_err());
}

#[test]
fn wire_format_is_nonce_ciphertext_tag() {
    let key = [0x55u8; KEY_LEN];
    let plaintext = b"wire format check";

    let sealed = encrypt(plaintext, &key, &[]).expect("encrypt should succeed");
    let wire = sealed.to_bytes();
    assert_eq!(wire.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
    assert_eq!(&wire[..NONCE_LEN], &sealed.nonce);
    assert_eq!(&wire[wire.len() - TAG_LEN..], &sealed.tag);

    let restored = SealedData::from_bytes(&wire).expect("from_bytes should succeed");
    let decrypted = decrypt(&restored, &key, &[]).expect("decrypt should succeed");
    assert_eq!(decrypted.expose(), plaintext);
}
