//! Batch HASH160 over inputs of any count and length.
//!
//! Inputs are grouped by SHA-256 block count so every lane of a batch does
//! the same work. Short final groups are topped up with copies of their own
//! last input; those extra lanes are hashed and dropped.

use std::array;
use std::collections::BTreeMap;

use crate::LANES;
use crate::error::LaneError;
use crate::padding::{pad_message, padded_block_count};
use crate::pipeline::{Hash160, Hash160Pipeline};
use crate::ripemd160::LaneBatchRipemd160;
use crate::sha256::LaneBatchSha256;

/// HASH160 of every input, in input order, on a fresh default-width pipeline.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len())))]
pub fn hash160_batch<T: AsRef<[u8]>>(inputs: &[T]) -> Result<Vec<Hash160>, LaneError> {
    let mut pipeline = Hash160Pipeline::<LANES>::new();
    hash160_batch_with(&mut pipeline, inputs)
}

/// HASH160 of every input using a caller-owned pipeline.
pub fn hash160_batch_with<const N: usize, T: AsRef<[u8]>>(
    pipeline: &mut Hash160Pipeline<N>,
    inputs: &[T],
) -> Result<Vec<Hash160>, LaneError> {
    let mut out = vec![[0u8; 20]; inputs.len()];
    if inputs.is_empty() {
        return Ok(out);
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, input) in inputs.iter().enumerate() {
        groups
            .entry(padded_block_count(input.as_ref().len()))
            .or_default()
            .push(index);
    }

    for indices in groups.values() {
        for chunk in indices.chunks(N) {
            let last = chunk.len() - 1;
            let messages: [&[u8]; N] = array::from_fn(|lane| inputs[chunk[lane.min(last)]].as_ref());
            let digests = pipeline.hash_lanes(&messages)?;
            for (&index, digest) in chunk.iter().zip(digests) {
                out[index] = digest;
            }
        }
    }

    Ok(out)
}

/// HASH160 of a single message.
pub fn hash160(data: &[u8]) -> Hash160 {
    let mut sha = LaneBatchSha256::<1>::new();
    for block in pad_message(data) {
        sha.update_block(&[block]);
    }
    let mut ripemd = LaneBatchRipemd160::<1>::new();
    ripemd.init_with_tails(&sha.finalize());
    let [digest] = ripemd.finalize();
    digest
}
