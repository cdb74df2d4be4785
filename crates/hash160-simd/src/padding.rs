//! Merkle-Damgård padding for 64-byte block hashes.
//!
//! SHA-256 appends a `0x80` marker, zero fill, and the message length in bits
//! as a big-endian `u64` so the total is a multiple of 64 bytes. The SHA-256
//! lane engine only transforms blocks, so callers build padded blocks with the
//! helpers here. RIPEMD-160 pads itself inside its engine (little-endian
//! length) and does not use this module.

use crate::error::LaneError;

/// Size of one compression block in bytes.
pub const BLOCK_LEN: usize = 64;

/// One 64-byte message block.
pub type Block = [u8; BLOCK_LEN];

/// Width of the trailing bit-length field.
pub const LENGTH_FIELD_LEN: usize = 8;

/// Longest message that pads into a single block.
pub const MAX_SINGLE_BLOCK_LEN: usize = BLOCK_LEN - LENGTH_FIELD_LEN - 1;

/// Shortest message that needs two padded blocks.
pub const MIN_TWO_BLOCK_LEN: usize = MAX_SINGLE_BLOCK_LEN + 1;

/// Longest message that pads into two blocks.
pub const MAX_TWO_BLOCK_LEN: usize = 2 * BLOCK_LEN - LENGTH_FIELD_LEN - 1;

/// Padding marker byte.
pub(crate) const PAD_MARKER: u8 = 0x80;

/// Number of 64-byte blocks a message of `len` bytes occupies after padding.
pub const fn padded_block_count(len: usize) -> usize {
    (len + 1 + LENGTH_FIELD_LEN).div_ceil(BLOCK_LEN)
}

/// Pads a message of at most 55 bytes into one SHA-256 block.
pub fn pad_single_block(message: &[u8]) -> Result<Block, LaneError> {
    if message.len() > MAX_SINGLE_BLOCK_LEN {
        return Err(LaneError::MessageTooLong {
            len: message.len(),
            max: MAX_SINGLE_BLOCK_LEN,
        });
    }

    let mut block = [0u8; BLOCK_LEN];
    write_padded(message, &mut block);
    Ok(block)
}

/// Pads a message of 56..=119 bytes into exactly two SHA-256 blocks.
pub fn pad_two_blocks(message: &[u8]) -> Result<[Block; 2], LaneError> {
    let len = message.len();
    if !(MIN_TWO_BLOCK_LEN..=MAX_TWO_BLOCK_LEN).contains(&len) {
        return Err(LaneError::MessageLength {
            len,
            min: MIN_TWO_BLOCK_LEN,
            max: MAX_TWO_BLOCK_LEN,
        });
    }

    let mut blocks = [[0u8; BLOCK_LEN]; 2];
    let (first, second) = blocks.split_at_mut(1);
    write_padded_pair(message, &mut first[0], &mut second[0]);
    Ok(blocks)
}

/// Pads a message of any length into its SHA-256 block sequence.
pub fn pad_message(message: &[u8]) -> Vec<Block> {
    let count = padded_block_count(message.len());
    let mut bytes = vec![0u8; count * BLOCK_LEN];
    bytes[..message.len()].copy_from_slice(message);
    bytes[message.len()] = PAD_MARKER;
    let bit_len = (message.len() as u64).wrapping_mul(8);
    bytes[count * BLOCK_LEN - LENGTH_FIELD_LEN..].copy_from_slice(&bit_len.to_be_bytes());

    bytes
        .chunks_exact(BLOCK_LEN)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            block
        })
        .collect()
}

/// Writes `message` plus padding into a single block. `message.len() <= 55`.
pub(crate) fn write_padded(message: &[u8], block: &mut Block) {
    let len = message.len();
    block[..len].copy_from_slice(message);
    block[len] = PAD_MARKER;
    block[len + 1..BLOCK_LEN - LENGTH_FIELD_LEN].fill(0);
    block[BLOCK_LEN - LENGTH_FIELD_LEN..].copy_from_slice(&bit_length(len).to_be_bytes());
}

/// Writes a 56..=119 byte message plus padding across two blocks.
pub(crate) fn write_padded_pair(message: &[u8], first: &mut Block, second: &mut Block) {
    let len = message.len();
    let head = len.min(BLOCK_LEN);
    first[..head].copy_from_slice(&message[..head]);
    second.fill(0);

    if len < BLOCK_LEN {
        first[len] = PAD_MARKER;
        first[len + 1..].fill(0);
    } else {
        let rest = len - BLOCK_LEN;
        second[..rest].copy_from_slice(&message[BLOCK_LEN..]);
        second[rest] = PAD_MARKER;
    }
    second[BLOCK_LEN - LENGTH_FIELD_LEN..].copy_from_slice(&bit_length(len).to_be_bytes());
}

const fn bit_length(len: usize) -> u64 {
    (len as u64) * 8
}
