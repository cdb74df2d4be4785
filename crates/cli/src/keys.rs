//! Sequential secp256k1 key generation.
//!
//! Private keys are 256-bit big-endian counters. Every scalar in a run must
//! be a valid secret key; running past the curve order stops generation.

use hash160_simd::{CompressedKey, LANES, UncompressedKey};
use secp256k1::{PublicKey, Secp256k1, SecretKey, SignOnly};
use thiserror::Error;

/// 32-byte big-endian private scalar.
pub type PrivateKey = [u8; 32];

/// Private key used when `--start-key` is absent.
pub const DEFAULT_START_KEY: PrivateKey = {
    let mut key = [0u8; 32];
    key[31] = 1;
    key
};

/// Key generation failures.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum KeyError {
    /// The counter reached a value that is not a valid secret key.
    #[error("private key {} is outside the secp256k1 scalar range", hex::encode(.0))]
    InvalidScalar(PrivateKey),
    /// Adding the batch offset overflowed 256 bits.
    #[error("key range starting at {} overflows 256 bits", hex::encode(.0))]
    Overflow(PrivateKey),
}

/// Parses a `--start-key` argument: 1 to 64 hex digits, left-padded with zeros.
pub fn parse_start_key(text: &str) -> Result<PrivateKey, String> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() > 64 {
        return Err(format!("expected 1 to 64 hex digits, got {}", digits.len()));
    }
    let padded = format!("{digits:0>64}");
    let mut key = [0u8; 32];
    hex::decode_to_slice(&padded, &mut key).map_err(|error| error.to_string())?;
    SecretKey::from_slice(&key).map_err(|_| "not a valid secp256k1 private key".to_owned())?;
    Ok(key)
}

/// `key + offset` as 256-bit big-endian integers, `None` on overflow.
pub fn add_offset(key: &PrivateKey, offset: u64) -> Option<PrivateKey> {
    let mut out = *key;
    let mut carry = u128::from(offset);
    for byte in out.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = u128::from(*byte) + (carry & 0xff);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    (carry == 0).then_some(out)
}

/// One private key with both public serialisations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPair {
    /// Private scalar.
    pub secret: PrivateKey,
    /// 33-byte SEC1 compressed public key.
    pub compressed: CompressedKey,
    /// 65-byte SEC1 uncompressed public key.
    pub uncompressed: UncompressedKey,
}

/// Keys for one lane batch, lane `i` holding the `i`-th consecutive scalar.
#[derive(Clone, Debug)]
pub struct KeyBatch {
    /// Private scalars.
    pub secrets: [PrivateKey; LANES],
    /// Compressed public keys.
    pub compressed: [CompressedKey; LANES],
    /// Uncompressed public keys.
    pub uncompressed: [UncompressedKey; LANES],
}

/// Generator of consecutive key pairs.
pub struct KeyStream {
    secp: Secp256k1<SignOnly>,
    next: Option<PrivateKey>,
}

impl KeyStream {
    /// Starts at `start`.
    pub fn new(start: PrivateKey) -> Self {
        Self {
            secp: Secp256k1::signing_only(),
            next: Some(start),
        }
    }

    /// Starts `offset` keys after `start`.
    pub fn starting_at(start: &PrivateKey, offset: u64) -> Result<Self, KeyError> {
        add_offset(start, offset)
            .map(Self::new)
            .ok_or(KeyError::Overflow(*start))
    }

    /// Derives the current key pair and advances the counter.
    pub fn next_pair(&mut self) -> Result<KeyPair, KeyError> {
        let secret = self.next.ok_or(KeyError::Overflow([0xff; 32]))?;
        let secret_key =
            SecretKey::from_slice(&secret).map_err(|_| KeyError::InvalidScalar(secret))?;
        let public = PublicKey::from_secret_key(&self.secp, &secret_key);
        self.next = add_offset(&secret, 1);
        Ok(KeyPair {
            secret,
            compressed: public.serialize(),
            uncompressed: public.serialize_uncompressed(),
        })
    }

    /// Derives the next [`LANES`] consecutive key pairs.
    pub fn next_batch(&mut self) -> Result<KeyBatch, KeyError> {
        let mut batch = KeyBatch {
            secrets: [[0; 32]; LANES],
            compressed: [[0; 33]; LANES],
            uncompressed: [[0; 65]; LANES],
        };
        for lane in 0..LANES {
            let pair = self.next_pair()?;
            logging::trace_keys!(lane, secret = %hex::encode(pair.secret), "derived key");
            batch.secrets[lane] = pair.secret;
            batch.compressed[lane] = pair.compressed;
            batch.uncompressed[lane] = pair.uncompressed;
        }
        Ok(batch)
    }
}
