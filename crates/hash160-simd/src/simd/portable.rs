//! Portable lane vectors and the kernels built on them.

use std::array;

use super::LaneWord;
use crate::padding::Block;
use crate::transpose::{WordOrder, transpose_blocks_into, untranspose_words_into};
use crate::{ripemd160, sha256};

/// `N` lanes held in a plain array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(32))]
pub(crate) struct Portable<const N: usize>(pub(crate) [u32; N]);

impl<const N: usize> Portable<N> {
    #[inline(always)]
    fn zip(self, rhs: Self, op: impl Fn(u32, u32) -> u32) -> Self {
        Self(array::from_fn(|i| op(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn map(self, op: impl Fn(u32) -> u32) -> Self {
        Self(array::from_fn(|i| op(self.0[i])))
    }
}

impl<const N: usize> LaneWord for Portable<N> {
    #[inline(always)]
    fn splat(value: u32) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, u32::wrapping_add)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a ^ b)
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a & b)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a | b)
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| !a & b)
    }

    #[inline(always)]
    fn not(self) -> Self {
        self.map(|a| !a)
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        self.map(|a| a << n)
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        self.map(|a| a >> n)
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        self.map(|a| a.rotate_left(n))
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        self.map(|a| a.rotate_right(n))
    }

    #[inline(always)]
    fn blend(mask: Self, on: Self, off: Self) -> Self {
        Self(array::from_fn(|i| {
            (on.0[i] & mask.0[i]) | (off.0[i] & !mask.0[i])
        }))
    }
}

fn load_rows<const N: usize, const W: usize>(rows: &[[u32; N]; W]) -> [Portable<N>; W] {
    array::from_fn(|k| Portable(rows[k]))
}

fn store_rows<const N: usize, const W: usize>(vectors: &[Portable<N>; W], rows: &mut [[u32; N]; W]) {
    for (row, vector) in rows.iter_mut().zip(vectors) {
        *row = vector.0;
    }
}

fn message_words<const N: usize>(blocks: &[Block; N], order: WordOrder) -> [Portable<N>; 16] {
    let mut rows = [[0u32; N]; 16];
    transpose_blocks_into(blocks, order, &mut rows);
    load_rows(&rows)
}

/// One SHA-256 compression of every lane.
pub(crate) fn sha256_compress<const N: usize>(state: &mut [[u32; N]; 8], blocks: &[Block; N]) {
    let words = message_words(blocks, WordOrder::BigEndian);
    let mut vectors = load_rows(state);
    sha256::compress(&mut vectors, &words);
    store_rows(&vectors, state);
}

/// Big-endian digests of the SHA-256 lane state.
pub(crate) fn sha256_digests<const N: usize>(state: &[[u32; N]; 8], out: &mut [[u8; 32]; N]) {
    untranspose_words_into(state, WordOrder::BigEndian, out);
}

/// One RIPEMD-160 compression; lanes whose `mask` word is zero keep their state.
pub(crate) fn ripemd160_compress<const N: usize>(
    state: &mut [[u32; N]; 5],
    blocks: &[Block; N],
    mask: Option<&[u32; N]>,
) {
    let words = message_words(blocks, WordOrder::LittleEndian);
    let mut vectors = load_rows(state);
    match mask {
        Some(mask) => ripemd160::compress_masked(&mut vectors, &words, Portable(*mask)),
        None => ripemd160::compress(&mut vectors, &words),
    }
    store_rows(&vectors, state);
}

/// Little-endian digests of the RIPEMD-160 lane state.
pub(crate) fn ripemd160_digests<const N: usize>(state: &[[u32; N]; 5], out: &mut [[u8; 20]; N]) {
    untranspose_words_into(state, WordOrder::LittleEndian, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    type V4 = Portable<4>;

    #[test]
    fn arithmetic_wraps_per_lane() {
        let a = V4::splat(u32::MAX);
        let b = Portable([1, 2, 3, 4]);
        assert_eq!(a.add(b).0, [0, 1, 2, 3]);
    }

    #[test]
    fn rotations_match_scalar() {
        let v = Portable([0x8000_0001, 0x1234_5678, 0, u32::MAX]);
        for n in 1..32 {
            assert_eq!(v.rotl(n).0, v.0.map(|x| x.rotate_left(n)));
            assert_eq!(v.rotr(n).0, v.0.map(|x| x.rotate_right(n)));
        }
    }

    #[test]
    fn default_rotate_agrees_with_override() {
        let v = Portable([0xDEAD_BEEF, 1, 2, 3]);
        let via_shifts = v.shl(7).or(v.shr(25));
        assert_eq!(v.rotl(7), via_shifts);
    }

    #[test]
    fn andnot_uses_x86_operand_order() {
        let a = Portable([0b1100, 0, u32::MAX, 0]);
        let b = Portable([0b1010, 5, 7, u32::MAX]);
        assert_eq!(a.andnot(b).0, [0b0010, 5, 0, u32::MAX]);
    }

    #[test]
    fn blend_selects_by_mask() {
        let mask = Portable([u32::MAX, 0, u32::MAX, 0]);
        let on = V4::splat(1);
        let off = V4::splat(2);
        assert_eq!(V4::blend(mask, on, off).0, [1, 2, 1, 2]);
    }
}
