//! Lane-parallel SHA-256, RIPEMD-160 and HASH160.
//!
//! This crate hashes many independent short messages at once by packing
//! word `k` of eight messages into one 256-bit register, so every round of
//! the compression advances all eight lanes. The main consumer is bulk
//! HASH160 (`RIPEMD160(SHA256(pubkey))`) over secp256k1 public keys, but the
//! engines accept any message.
//!
//! # Layers
//!
//! - [`transpose`]: lane-major bytes to word-major lanes and back.
//! - [`LaneBatchSha256`]: block transform over caller-padded blocks
//!   (see [`padding`]).
//! - [`LaneBatchRipemd160`]: self-padding engine with per-lane tails.
//! - [`Hash160Pipeline`]: both engines chained for 33- and 65-byte keys.
//! - [`hash160_batch`] and, with the `rayon` feature, [`par_hash160_batch`]:
//!   any number of inputs of any length.
//!
//! The AVX2 backend is selected at run time when the CPU supports it and the
//! lane count is eight; everything else runs on a portable backend with the
//! same results.
//!
//! # Example
//!
//! ```
//! use hash160_simd::{Hash160Pipeline, hash160, hash160_batch};
//!
//! // Single message
//! let digest = hash160(b"hello world");
//!
//! // Batch of mixed lengths, results in input order
//! let inputs = [b"input1".as_slice(), b"a longer second input", b""];
//! let digests = hash160_batch(&inputs).unwrap();
//! assert_eq!(digests.len(), 3);
//!
//! // Eight compressed public keys at once
//! let mut pipeline = Hash160Pipeline::<8>::new();
//! let keys = [[0x02u8; 33]; 8];
//! let lanes = pipeline.hash_compressed(&keys);
//! assert!(lanes.iter().all(|d| d == &lanes[0]));
//! # let _ = digest;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod batch;
mod dispatcher;
mod error;
pub mod padding;
pub mod pipeline;
pub mod ripemd160;
pub mod sha256;
mod simd;
mod traits;
pub mod transpose;

#[cfg(feature = "rayon")]
#[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
mod rayon_support;

/// Lanes per batch: one 256-bit register of 32-bit words.
pub const LANES: usize = 8;

pub use batch::{hash160, hash160_batch, hash160_batch_with};
pub use dispatcher::{Backend, Dispatcher};
pub use error::{LaneError, ParseBackendError};
pub use padding::Block;
pub use pipeline::{
    CompressedKey, Hash160, Hash160Pipeline, KeyFormat, UncompressedKey, ripemd160_lanes,
    sha256_lanes,
};
pub use ripemd160::{LaneBatchRipemd160, Ripemd160Digest};
pub use sha256::{LaneBatchSha256, Sha256Digest};
pub use traits::{BlockTransform, SelfPaddingHasher};
pub use transpose::WordOrder;

#[cfg(feature = "rayon")]
pub use rayon_support::{
    PARALLEL_CHUNK, ParallelHash160, par_hash_compressed, par_hash_uncompressed,
    par_hash160_batch, par_hash160_batch_lanes,
};

/// Get the backend an 8-lane engine selects on this machine.
///
/// Useful for logging or diagnostics.
pub fn active_backend() -> Backend {
    dispatcher::global().backend()
}
