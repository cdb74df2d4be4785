//! Rayon integration for parallel HASH160.
//!
//! Each rayon task owns its own [`Hash160Pipeline`]; lane engines are never
//! shared between threads.

use rayon::prelude::*;

use crate::batch::hash160_batch_with;
use crate::error::LaneError;
use crate::pipeline::{CompressedKey, Hash160, Hash160Pipeline, UncompressedKey};
use crate::{LANES, hash160_batch};

/// Inputs handed to one rayon task. A multiple of the lane width.
pub const PARALLEL_CHUNK: usize = LANES * 128;

/// Extension trait for parallel HASH160.
///
/// # Example
///
/// ```
/// use rayon::prelude::*;
/// use hash160_simd::ParallelHash160;
///
/// let data: Vec<Vec<u8>> = vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()];
/// let digests = data.par_iter().hash160().unwrap();
/// assert_eq!(digests.len(), 3);
/// ```
pub trait ParallelHash160<T> {
    /// Collects the iterator and hashes it in lane batches.
    fn hash160(self) -> Result<Vec<Hash160>, LaneError>;
}

impl<I, T> ParallelHash160<T> for I
where
    I: ParallelIterator<Item = T>,
    T: AsRef<[u8]> + Send + Sync,
{
    fn hash160(self) -> Result<Vec<Hash160>, LaneError> {
        let items: Vec<T> = self.collect();
        par_hash160_batch(&items)
    }
}

/// HASH160 of every input, split across the rayon pool, in input order.
pub fn par_hash160_batch<T: AsRef<[u8]> + Sync>(inputs: &[T]) -> Result<Vec<Hash160>, LaneError> {
    let parts = inputs
        .par_chunks(PARALLEL_CHUNK)
        .map(hash160_batch)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.into_iter().flatten().collect())
}

/// HASH160 of compressed keys; `keys.len()` need not be a multiple of the lane width.
pub fn par_hash_compressed(keys: &[CompressedKey]) -> Vec<Hash160> {
    keys.par_chunks(PARALLEL_CHUNK)
        .flat_map_iter(|chunk| {
            let mut pipeline = Hash160Pipeline::<LANES>::new();
            hash_fixed(chunk, |batch| pipeline.hash_compressed(batch))
        })
        .collect()
}

/// HASH160 of uncompressed keys; `keys.len()` need not be a multiple of the lane width.
pub fn par_hash_uncompressed(keys: &[UncompressedKey]) -> Vec<Hash160> {
    keys.par_chunks(PARALLEL_CHUNK)
        .flat_map_iter(|chunk| {
            let mut pipeline = Hash160Pipeline::<LANES>::new();
            hash_fixed(chunk, |batch| pipeline.hash_uncompressed(batch))
        })
        .collect()
}

/// Runs `hash` over lane-sized batches of fixed-size keys, topping up the last one.
fn hash_fixed<K: Copy, F>(keys: &[K], mut hash: F) -> Vec<Hash160>
where
    F: FnMut(&[K; LANES]) -> [Hash160; LANES],
{
    let mut out = Vec::with_capacity(keys.len());
    for batch in keys.chunks(LANES) {
        let last = batch.len() - 1;
        let lanes: [K; LANES] = std::array::from_fn(|lane| batch[lane.min(last)]);
        out.extend_from_slice(&hash(&lanes)[..batch.len()]);
    }
    out
}

/// Parallel form of [`hash160_batch_with`] with one `N`-lane pipeline per task.
pub fn par_hash160_batch_lanes<const N: usize, T: AsRef<[u8]> + Sync>(
    inputs: &[T],
) -> Result<Vec<Hash160>, LaneError> {
    let parts = inputs
        .par_chunks(N * 128)
        .map(|chunk| hash160_batch_with(&mut Hash160Pipeline::<N>::new(), chunk))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.into_iter().flatten().collect())
}
