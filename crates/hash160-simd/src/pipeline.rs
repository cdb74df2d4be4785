//! HASH160 = RIPEMD160(SHA256(message)) across `N` lanes.
//!
//! The two fixed public-key encodings get dedicated paths that reuse the
//! pipeline's block buffers: a 33-byte compressed key pads into one SHA-256
//! block, a 65-byte uncompressed key into two. Every 32-byte SHA-256 digest
//! then becomes a RIPEMD-160 tail, which always fits one padding block.

use std::array;
use std::fmt;

use crate::LANES;
use crate::dispatcher::Backend;
use crate::error::LaneError;
use crate::padding::{self, BLOCK_LEN, Block, pad_message, padded_block_count};
use crate::ripemd160::{self, LaneBatchRipemd160, Ripemd160Digest};
use crate::sha256::{LaneBatchSha256, Sha256Digest};

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_KEY_LEN: usize = 33;

/// Length of a SEC1 uncompressed public key.
pub const UNCOMPRESSED_KEY_LEN: usize = 65;

/// Width of a HASH160 digest.
pub const HASH160_LEN: usize = ripemd160::DIGEST_LEN;

/// One HASH160 digest.
pub type Hash160 = [u8; HASH160_LEN];

/// A compressed public key (`0x02`/`0x03` prefix followed by X).
pub type CompressedKey = [u8; COMPRESSED_KEY_LEN];

/// An uncompressed public key (`0x04` prefix followed by X and Y).
pub type UncompressedKey = [u8; UNCOMPRESSED_KEY_LEN];

/// Public-key serialisation fed to the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    /// 33-byte compressed encoding.
    Compressed,
    /// 65-byte uncompressed encoding.
    Uncompressed,
}

impl KeyFormat {
    /// Encoded length in bytes.
    pub const fn encoded_len(self) -> usize {
        match self {
            Self::Compressed => COMPRESSED_KEY_LEN,
            Self::Uncompressed => UNCOMPRESSED_KEY_LEN,
        }
    }

    /// SHA-256 blocks the padded encoding occupies.
    pub const fn sha256_blocks(self) -> usize {
        padded_block_count(self.encoded_len())
    }

    /// Format matching an encoded length, if any.
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            COMPRESSED_KEY_LEN => Some(Self::Compressed),
            UNCOMPRESSED_KEY_LEN => Some(Self::Uncompressed),
            _ => None,
        }
    }

    /// Lower-case label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compressed => "compressed",
            Self::Uncompressed => "uncompressed",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SHA-256 and RIPEMD-160 lane engines plus reusable block buffers.
#[derive(Clone, Debug)]
pub struct Hash160Pipeline<const N: usize = LANES> {
    sha: LaneBatchSha256<N>,
    ripemd: LaneBatchRipemd160<N>,
    first: [Block; N],
    second: [Block; N],
}

impl<const N: usize> Hash160Pipeline<N> {
    /// Creates a pipeline on the best backend for `N` lanes.
    pub fn new() -> Self {
        Self {
            sha: LaneBatchSha256::new(),
            ripemd: LaneBatchRipemd160::new(),
            first: [[0; BLOCK_LEN]; N],
            second: [[0; BLOCK_LEN]; N],
        }
    }

    /// Creates a pipeline whose engines both run on `backend`.
    pub fn with_backend(backend: Backend) -> Result<Self, LaneError> {
        Ok(Self {
            sha: LaneBatchSha256::with_backend(backend)?,
            ripemd: LaneBatchRipemd160::with_backend(backend)?,
            first: [[0; BLOCK_LEN]; N],
            second: [[0; BLOCK_LEN]; N],
        })
    }

    /// Backend executing both hashes.
    pub const fn backend(&self) -> Backend {
        self.sha.backend()
    }

    /// HASH160 of `N` compressed public keys, one SHA-256 block each.
    pub fn hash_compressed(&mut self, keys: &[CompressedKey; N]) -> [Hash160; N] {
        for (block, key) in self.first.iter_mut().zip(keys) {
            padding::write_padded(key, block);
        }
        self.sha.init();
        self.sha.update_block(&self.first);
        let digests = self.sha.finalize();
        self.ripemd_of_digests(&digests)
    }

    /// HASH160 of `N` uncompressed public keys, two SHA-256 blocks each.
    pub fn hash_uncompressed(&mut self, keys: &[UncompressedKey; N]) -> [Hash160; N] {
        for ((first, second), key) in self.first.iter_mut().zip(&mut self.second).zip(keys) {
            padding::write_padded_pair(key, first, second);
        }
        self.sha.init();
        self.sha.update_block(&self.first);
        self.sha.update_block(&self.second);
        let digests = self.sha.finalize();
        self.ripemd_of_digests(&digests)
    }

    /// HASH160 of `N` arbitrary messages that share one SHA-256 block count.
    pub fn hash_lanes(&mut self, messages: &[&[u8]; N]) -> Result<[Hash160; N], LaneError> {
        let digests = sha256_lanes(&mut self.sha, messages)?;
        Ok(self.ripemd_of_digests(&digests))
    }

    fn ripemd_of_digests(&mut self, digests: &[Sha256Digest; N]) -> [Hash160; N] {
        self.ripemd.init_with_tails(digests);
        self.ripemd.finalize()
    }
}

impl<const N: usize> Default for Hash160Pipeline<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn uniform_count<const N: usize>(counts: &[usize; N]) -> Result<usize, LaneError> {
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);
    if min == max {
        Ok(min)
    } else {
        Err(LaneError::MixedBlockCounts { min, max })
    }
}

fn block_at(message: &[u8], index: usize) -> Block {
    let mut block = [0u8; BLOCK_LEN];
    block.copy_from_slice(&message[index * BLOCK_LEN..(index + 1) * BLOCK_LEN]);
    block
}

/// SHA-256 of `N` messages on one engine. All lanes must pad to the same block count.
pub fn sha256_lanes<const N: usize>(
    engine: &mut LaneBatchSha256<N>,
    messages: &[&[u8]; N],
) -> Result<[Sha256Digest; N], LaneError> {
    let counts: [usize; N] = array::from_fn(|lane| padded_block_count(messages[lane].len()));
    let blocks = uniform_count(&counts)?;
    let padded: Vec<Vec<Block>> = messages.iter().map(|message| pad_message(message)).collect();

    engine.init();
    for index in 0..blocks {
        let row: [Block; N] = array::from_fn(|lane| padded[lane][index]);
        engine.update_block(&row);
    }
    Ok(engine.finalize())
}

/// RIPEMD-160 of `N` messages on one engine.
///
/// All lanes must contain the same number of full 64-byte blocks; the
/// remaining tails may differ in length.
pub fn ripemd160_lanes<const N: usize>(
    engine: &mut LaneBatchRipemd160<N>,
    messages: &[&[u8]; N],
) -> Result<[Ripemd160Digest; N], LaneError> {
    let counts: [usize; N] = array::from_fn(|lane| messages[lane].len() / BLOCK_LEN);
    let full = uniform_count(&counts)?;

    engine.init();
    for index in 0..full {
        let row: [Block; N] = array::from_fn(|lane| block_at(messages[lane], index));
        engine.update_full_blocks(&row)?;
    }
    for (lane, message) in messages.iter().enumerate() {
        engine.set_tail(lane, &message[full * BLOCK_LEN..])?;
    }
    Ok(engine.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{reference_hash160, reference_ripemd160, reference_sha256, sample_keys, to_hex};

    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn g_compressed() -> CompressedKey {
        test_support::from_hex(G_COMPRESSED).try_into().unwrap()
    }

    #[test]
    fn generator_point_compressed() {
        let mut pipeline = Hash160Pipeline::<8>::new();
        for digest in pipeline.hash_compressed(&[g_compressed(); 8]) {
            assert_eq!(to_hex(&digest), "751e76e8199196d454941c45d1b3a323f1433bd6");
        }
    }

    #[test]
    fn generator_point_uncompressed() {
        let key = sample_keys(1)[0].uncompressed;
        let mut pipeline = Hash160Pipeline::<8>::new();
        let digests = pipeline.hash_uncompressed(&[key; 8]);
        assert_eq!(to_hex(&digests[3]), "91b24bf9f5288532960ac687abb035127b1d28a5");
    }

    #[test]
    fn distinct_keys_land_in_their_lanes() {
        let keys = sample_keys(8);
        let compressed: [CompressedKey; 8] = array::from_fn(|i| keys[i].compressed);
        let uncompressed: [UncompressedKey; 8] = array::from_fn(|i| keys[i].uncompressed);

        let mut pipeline = Hash160Pipeline::<8>::new();
        let c = pipeline.hash_compressed(&compressed);
        let u = pipeline.hash_uncompressed(&uncompressed);
        for lane in 0..8 {
            assert_eq!(c[lane], reference_hash160(&compressed[lane]), "compressed lane {lane}");
            assert_eq!(u[lane], reference_hash160(&uncompressed[lane]), "uncompressed lane {lane}");
        }
    }

    #[test]
    fn key_format_geometry() {
        assert_eq!(KeyFormat::Compressed.sha256_blocks(), 1);
        assert_eq!(KeyFormat::Uncompressed.sha256_blocks(), 2);
        assert_eq!(KeyFormat::from_len(33), Some(KeyFormat::Compressed));
        assert_eq!(KeyFormat::from_len(65), Some(KeyFormat::Uncompressed));
        assert_eq!(KeyFormat::from_len(64), None);
        assert_eq!(KeyFormat::Uncompressed.to_string(), "uncompressed");
    }

    #[test]
    fn hash_lanes_matches_dedicated_paths() {
        let keys = sample_keys(8);
        let mut pipeline = Hash160Pipeline::<8>::new();

        let compressed: [CompressedKey; 8] = array::from_fn(|i| keys[i].compressed);
        let messages: [&[u8]; 8] = array::from_fn(|i| compressed[i].as_slice());
        assert_eq!(pipeline.hash_lanes(&messages).unwrap(), pipeline.hash_compressed(&compressed));
    }

    #[test]
    fn hash_lanes_rejects_mixed_block_counts() {
        let mut pipeline = Hash160Pipeline::<2>::new();
        let err = pipeline.hash_lanes(&[&[0u8; 33], &[0u8; 65]]).unwrap_err();
        assert_eq!(err, LaneError::MixedBlockCounts { min: 1, max: 2 });
    }

    #[test]
    fn sha256_lanes_over_three_blocks() {
        let message = [0x61u8; 150];
        let mut engine = LaneBatchSha256::<4>::new();
        let digests = sha256_lanes(&mut engine, &[&message; 4]).unwrap();
        assert_eq!(digests[2], reference_sha256(&message));
    }

    #[test]
    fn ripemd160_lanes_mixes_tails_after_full_blocks() {
        let a = [1u8; 64 + 3];
        let b = [2u8; 64 + 60];
        let c = [3u8; 64];
        let mut engine = LaneBatchRipemd160::<3>::new();
        let digests = ripemd160_lanes(&mut engine, &[&a, &b, &c]).unwrap();
        assert_eq!(digests[0], reference_ripemd160(&a));
        assert_eq!(digests[1], reference_ripemd160(&b));
        assert_eq!(digests[2], reference_ripemd160(&c));
    }

    #[test]
    fn ripemd160_lanes_rejects_uneven_full_blocks() {
        let mut engine = LaneBatchRipemd160::<2>::new();
        let err = ripemd160_lanes(&mut engine, &[&[0u8; 10], &[0u8; 70]]).unwrap_err();
        assert_eq!(err, LaneError::MixedBlockCounts { min: 0, max: 1 });
    }

    #[test]
    fn pinned_backends_agree() {
        let Ok(mut simd) = Hash160Pipeline::<8>::with_backend(Backend::Avx2) else {
            eprintln!("AVX2 not available, skipping test");
            return;
        };
        let mut portable = Hash160Pipeline::<8>::with_backend(Backend::Portable).unwrap();
        assert_eq!(portable.backend(), Backend::Portable);

        let keys = sample_keys(8);
        let uncompressed: [UncompressedKey; 8] = array::from_fn(|i| keys[i].uncompressed);
        assert_eq!(simd.hash_uncompressed(&uncompressed), portable.hash_uncompressed(&uncompressed));
    }
}
