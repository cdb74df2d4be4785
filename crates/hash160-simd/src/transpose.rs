//! Conversion between per-lane byte blocks and word-major lane layout.
//!
//! The engines keep "word k of every lane" together so one vector operation
//! advances all lanes. Inputs arrive lane-major (one 64-byte block per lane)
//! and digests leave lane-major again; these helpers move between the two
//! layouts while applying the byte order each hash expects. The AVX2 backend
//! performs the same reshaping in registers (see `simd::avx2`) and is checked
//! against these routines.

use crate::padding::Block;

/// Byte order of the 32-bit words inside a block or digest.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WordOrder {
    /// SHA-256 reads and writes words big-endian.
    BigEndian,
    /// RIPEMD-160 reads and writes words little-endian.
    LittleEndian,
}

impl WordOrder {
    #[inline(always)]
    pub(crate) const fn read(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::BigEndian => u32::from_be_bytes(bytes),
            Self::LittleEndian => u32::from_le_bytes(bytes),
        }
    }

    #[inline(always)]
    pub(crate) const fn write(self, word: u32) -> [u8; 4] {
        match self {
            Self::BigEndian => word.to_be_bytes(),
            Self::LittleEndian => word.to_le_bytes(),
        }
    }
}

/// Reshapes `N` lane blocks into sixteen word rows: `rows[k][lane]` is word
/// `k` of `blocks[lane]`.
pub fn transpose_blocks<const N: usize>(blocks: &[Block; N], order: WordOrder) -> [[u32; N]; 16] {
    let mut rows = [[0u32; N]; 16];
    transpose_blocks_into(blocks, order, &mut rows);
    rows
}

/// In-place form of [`transpose_blocks`].
pub fn transpose_blocks_into<const N: usize>(
    blocks: &[Block; N],
    order: WordOrder,
    rows: &mut [[u32; N]; 16],
) {
    for (lane, block) in blocks.iter().enumerate() {
        for (row, chunk) in rows.iter_mut().zip(block.chunks_exact(4)) {
            row[lane] = order.read([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
    }
}

/// Reshapes `W` word rows back into `N` lane byte strings of `D = 4 * W` bytes.
pub fn untranspose_words<const N: usize, const W: usize, const D: usize>(
    rows: &[[u32; N]; W],
    order: WordOrder,
) -> [[u8; D]; N] {
    let mut out = [[0u8; D]; N];
    untranspose_words_into(rows, order, &mut out);
    out
}

/// In-place form of [`untranspose_words`].
pub fn untranspose_words_into<const N: usize, const W: usize, const D: usize>(
    rows: &[[u32; N]; W],
    order: WordOrder,
    out: &mut [[u8; D]; N],
) {
    const { assert!(D == 4 * W, "digest width must be four bytes per word") };

    for (lane, bytes) in out.iter_mut().enumerate() {
        for (row, chunk) in rows.iter().zip(bytes.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&order.write(row[lane]));
        }
    }
}
