//! AVX2 8-lane kernels.
//!
//! Each YMM register holds one 32-bit word position for eight independent
//! messages. Blocks are loaded lane-major with unaligned 256-bit loads and
//! turned word-major by an in-register 8x8 transpose; SHA-256 additionally
//! byte-swaps every word.
//!
//! Every function here requires AVX2 at run time and a lane count of 8.
//! Engines only select this backend after [`Backend::is_available`] and
//! [`Backend::supports_lanes`] both succeeded.
//!
//! [`Backend::is_available`]: crate::Backend::is_available
//! [`Backend::supports_lanes`]: crate::Backend::supports_lanes

#![allow(unsafe_code)]

use std::arch::x86_64::*;

use super::LaneWord;
use crate::padding::Block;
use crate::transpose::WordOrder;
use crate::{LANES, ripemd160, sha256};

/// Eight lane words in one register.
#[derive(Clone, Copy)]
pub(crate) struct Avx2Word(__m256i);

// The methods are only reached from `#[target_feature(enable = "avx2")]`
// kernels below, into which they are force-inlined.
impl LaneWord for Avx2Word {
    #[inline(always)]
    fn splat(value: u32) -> Self {
        Self(unsafe { _mm256_set1_epi32(value as i32) })
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_add_epi32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_xor_si256(self.0, rhs.0) })
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_and_si256(self.0, rhs.0) })
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_or_si256(self.0, rhs.0) })
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_andnot_si256(self.0, rhs.0) })
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { _mm256_xor_si256(self.0, _mm256_set1_epi32(-1)) })
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        Self(unsafe { _mm256_sll_epi32(self.0, _mm_cvtsi32_si128(n as i32)) })
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        Self(unsafe { _mm256_srl_epi32(self.0, _mm_cvtsi32_si128(n as i32)) })
    }

    #[inline(always)]
    fn blend(mask: Self, on: Self, off: Self) -> Self {
        Self(unsafe { _mm256_blendv_epi8(off.0, on.0, mask.0) })
    }
}

/// Transposes an 8x8 matrix of 32-bit words held in eight registers.
///
/// Applying it twice returns the original rows.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn transpose8x8(rows: &mut [__m256i; 8]) {
    let [r0, r1, r2, r3, r4, r5, r6, r7] = *rows;

    let t0 = _mm256_unpacklo_epi32(r0, r1);
    let t1 = _mm256_unpackhi_epi32(r0, r1);
    let t2 = _mm256_unpacklo_epi32(r2, r3);
    let t3 = _mm256_unpackhi_epi32(r2, r3);
    let t4 = _mm256_unpacklo_epi32(r4, r5);
    let t5 = _mm256_unpackhi_epi32(r4, r5);
    let t6 = _mm256_unpacklo_epi32(r6, r7);
    let t7 = _mm256_unpackhi_epi32(r6, r7);

    let u0 = _mm256_unpacklo_epi64(t0, t2);
    let u1 = _mm256_unpackhi_epi64(t0, t2);
    let u2 = _mm256_unpacklo_epi64(t1, t3);
    let u3 = _mm256_unpackhi_epi64(t1, t3);
    let u4 = _mm256_unpacklo_epi64(t4, t6);
    let u5 = _mm256_unpackhi_epi64(t4, t6);
    let u6 = _mm256_unpacklo_epi64(t5, t7);
    let u7 = _mm256_unpackhi_epi64(t5, t7);

    *rows = [
        _mm256_permute2x128_si256(u0, u4, 0x20),
        _mm256_permute2x128_si256(u1, u5, 0x20),
        _mm256_permute2x128_si256(u2, u6, 0x20),
        _mm256_permute2x128_si256(u3, u7, 0x20),
        _mm256_permute2x128_si256(u0, u4, 0x31),
        _mm256_permute2x128_si256(u1, u5, 0x31),
        _mm256_permute2x128_si256(u2, u6, 0x31),
        _mm256_permute2x128_si256(u3, u7, 0x31),
    ];
}

/// Reverses the bytes of every 32-bit word.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn bswap_words(x: __m256i) -> __m256i {
    let mask = _mm256_set_epi32(
        0x0c0d0e0f, 0x08090a0b, 0x04050607, 0x00010203, 0x0c0d0e0f, 0x08090a0b, 0x04050607,
        0x00010203,
    );
    _mm256_shuffle_epi8(x, mask)
}

/// Loads sixteen message-word vectors from eight lane blocks.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load_message<const N: usize>(blocks: &[Block; N], order: WordOrder) -> [Avx2Word; 16] {
    debug_assert_eq!(N, LANES);
    let mut words = [Avx2Word(_mm256_setzero_si256()); 16];

    for half in 0..2 {
        let mut rows = [_mm256_setzero_si256(); 8];
        for (lane, row) in rows.iter_mut().enumerate() {
            let ptr = blocks[lane][half * 32..].as_ptr().cast::<__m256i>();
            *row = unsafe { _mm256_loadu_si256(ptr) };
        }
        unsafe { transpose8x8(&mut rows) };
        for (k, row) in rows.into_iter().enumerate() {
            let row = match order {
                WordOrder::BigEndian => unsafe { bswap_words(row) },
                WordOrder::LittleEndian => row,
            };
            words[half * 8 + k] = Avx2Word(row);
        }
    }

    words
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load_rows<const N: usize, const W: usize>(rows: &[[u32; N]; W]) -> [Avx2Word; W] {
    let mut vectors = [Avx2Word(_mm256_setzero_si256()); W];
    for (vector, row) in vectors.iter_mut().zip(rows) {
        *vector = Avx2Word(unsafe { _mm256_loadu_si256(row.as_ptr().cast()) });
    }
    vectors
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn store_rows<const N: usize, const W: usize>(vectors: &[Avx2Word; W], rows: &mut [[u32; N]; W]) {
    for (row, vector) in rows.iter_mut().zip(vectors) {
        unsafe { _mm256_storeu_si256(row.as_mut_ptr().cast(), vector.0) };
    }
}

/// One SHA-256 compression of all eight lanes.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn sha256_compress<const N: usize>(state: &mut [[u32; N]; 8], blocks: &[Block; N]) {
    assert_eq!(N, LANES, "the AVX2 backend drives exactly eight lanes");
    unsafe {
        let words = load_message(blocks, WordOrder::BigEndian);
        let mut vectors = load_rows(state);
        sha256::compress(&mut vectors, &words);
        store_rows(&vectors, state);
    }
}

/// Untransposes and byte-swaps the SHA-256 state into eight 32-byte digests.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn sha256_digests<const N: usize>(state: &[[u32; N]; 8], out: &mut [[u8; 32]; N]) {
    assert_eq!(N, LANES, "the AVX2 backend drives exactly eight lanes");
    unsafe {
        let mut rows = [_mm256_setzero_si256(); 8];
        for (reg, row) in rows.iter_mut().zip(state) {
            *reg = _mm256_loadu_si256(row.as_ptr().cast());
        }
        transpose8x8(&mut rows);
        for (digest, row) in out.iter_mut().zip(rows) {
            _mm256_storeu_si256(digest.as_mut_ptr().cast(), bswap_words(row));
        }
    }
}

/// One RIPEMD-160 compression; lanes whose `mask` word is zero keep their state.
///
/// # Safety
///
/// The CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ripemd160_compress<const N: usize>(
    state: &mut [[u32; N]; 5],
    blocks: &[Block; N],
    mask: Option<&[u32; N]>,
) {
    assert_eq!(N, LANES, "the AVX2 backend drives exactly eight lanes");
    unsafe {
        let words = load_message(blocks, WordOrder::LittleEndian);
        let mut vectors = load_rows(state);
        match mask {
            Some(mask) => {
                let mask = Avx2Word(_mm256_loadu_si256(mask.as_ptr().cast()));
                ripemd160::compress_masked(&mut vectors, &words, mask);
            }
            None => ripemd160::compress(&mut vectors, &words),
        }
        store_rows(&vectors, state);
    }
}
