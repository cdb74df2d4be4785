//! Shared test utilities for the hash160-lanes workspace.
//!
//! Reference digests come from the RustCrypto `sha2` and `ripemd` crates and
//! public keys from `secp256k1`, so lane engine output can be checked against
//! independent implementations.

use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

/// Scalar SHA-256.
pub fn reference_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Scalar RIPEMD-160.
pub fn reference_ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Scalar RIPEMD160(SHA256(data)).
pub fn reference_hash160(data: &[u8]) -> [u8; 20] {
    reference_ripemd160(&reference_sha256(data))
}

/// Lower-case hex encoding.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes hex, panicking on malformed input.
pub fn from_hex(text: &str) -> Vec<u8> {
    hex::decode(text).unwrap_or_else(|err| panic!("invalid hex fixture {text:?}: {err}"))
}

/// A secp256k1 key in both public encodings.
#[derive(Clone, Copy, Debug)]
pub struct KeyPair {
    /// Big-endian private scalar.
    pub secret: [u8; 32],
    /// 33-byte compressed public key.
    pub compressed: [u8; 33],
    /// 65-byte uncompressed public key.
    pub uncompressed: [u8; 65],
}

/// Keys for the private scalars `1..=count`. Index 0 is the generator point.
pub fn sample_keys(count: usize) -> Vec<KeyPair> {
    let secp = Secp256k1::new();
    (1..=count as u64)
        .map(|scalar| {
            let mut secret = [0u8; 32];
            secret[24..].copy_from_slice(&scalar.to_be_bytes());
            let key = SecretKey::from_slice(&secret).expect("small scalars are valid");
            let public = PublicKey::from_secret_key(&secp, &key);
            KeyPair {
                secret,
                compressed: public.serialize(),
                uncompressed: public.serialize_uncompressed(),
            }
        })
        .collect()
}

/// Deterministic message of `len` bytes that differs per `seed`.
pub fn pattern_message(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(167).wrapping_add(seed.wrapping_mul(29)) ^ (i >> 8) as u8)
        .collect()
}
