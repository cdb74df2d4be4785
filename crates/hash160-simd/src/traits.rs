//! Engine traits shared by the lane hashers.
//!
//! The two hashes expose different contracts: SHA-256 transforms blocks the
//! caller already padded, while RIPEMD-160 pads its own per-lane tails. Code
//! that only needs one contract can be written against these traits.

use crate::error::LaneError;
use crate::padding::Block;

/// A lane engine that compresses caller-padded blocks.
pub trait BlockTransform<const N: usize> {
    /// Digest produced per lane.
    type Digest: Copy + Default;

    /// Resets every lane to the initial hash values.
    fn init(&mut self);

    /// Compresses one padded block per lane.
    fn update_block(&mut self, blocks: &[Block; N]);

    /// Writes every lane's digest without changing the state.
    fn finalize_into(&self, out: &mut [Self::Digest; N]);

    /// Hashes one row of padded blocks per message block and returns the digests.
    fn digest_rows(&mut self, rows: &[[Block; N]]) -> [Self::Digest; N] {
        self.init();
        for blocks in rows {
            self.update_block(blocks);
        }
        let mut out = [Self::Digest::default(); N];
        self.finalize_into(&mut out);
        out
    }
}

/// A lane engine that absorbs full blocks and pads each lane's tail itself.
pub trait SelfPaddingHasher<const N: usize> {
    /// Digest produced per lane.
    type Digest: Copy + Default;

    /// Resets state, counters and tails.
    fn init(&mut self);

    /// Absorbs one full block per lane.
    fn update_full_blocks(&mut self, blocks: &[Block; N]) -> Result<(), LaneError>;

    /// Stages the final partial block of `lane`.
    fn set_tail(&mut self, lane: usize, tail: &[u8]) -> Result<(), LaneError>;

    /// Pads every tail and writes the digests.
    fn finalize_into(&mut self, out: &mut [Self::Digest; N]);
}
