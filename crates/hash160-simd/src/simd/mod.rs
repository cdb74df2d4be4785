//! Lane vector abstraction shared by the hash round functions.
//!
//! A [`LaneWord`] holds the same 32-bit word position for every lane. The
//! SHA-256 and RIPEMD-160 compressions are written once against this trait
//! and instantiated for [`portable::Portable`] and, on x86_64, for the AVX2
//! register wrapper in [`avx2`].

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;
pub(crate) mod portable;

use crate::dispatcher::Backend;
use crate::padding::Block;

/// One vector of 32-bit lane words. All arithmetic wraps modulo 2^32.
pub(crate) trait LaneWord: Copy {
    /// Broadcasts `value` into every lane.
    fn splat(value: u32) -> Self;
    fn add(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    /// `!self & rhs`, matching the x86 `andnot` operand order.
    fn andnot(self, rhs: Self) -> Self;
    fn not(self) -> Self;
    /// Logical shift left; `n` in `1..32`.
    fn shl(self, n: u32) -> Self;
    /// Logical shift right; `n` in `1..32`.
    fn shr(self, n: u32) -> Self;

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        self.shl(n).or(self.shr(32 - n))
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        self.shr(n).or(self.shl(32 - n))
    }

    /// Per lane: `on` where `mask` is all ones, `off` where it is zero.
    fn blend(mask: Self, on: Self, off: Self) -> Self;
}

/// Lane mask word for "lane takes the new value".
pub(crate) const fn lane_mask(active: bool) -> u32 {
    if active { u32::MAX } else { 0 }
}

// Backend routing. Engines only hold `Backend::Avx2` after
// `Backend::is_available` and `Backend::supports_lanes(N)` succeeded, which is
// the contract of every `avx2` kernel.

#[allow(unsafe_code)]
pub(crate) fn sha256_compress<const N: usize>(
    backend: Backend,
    state: &mut [[u32; N]; 8],
    blocks: &[Block; N],
) {
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::sha256_compress(state, blocks) },
        _ => portable::sha256_compress(state, blocks),
    }
}

#[allow(unsafe_code)]
pub(crate) fn sha256_digests<const N: usize>(
    backend: Backend,
    state: &[[u32; N]; 8],
    out: &mut [[u8; 32]; N],
) {
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::sha256_digests(state, out) },
        _ => portable::sha256_digests(state, out),
    }
}

#[allow(unsafe_code)]
pub(crate) fn ripemd160_compress<const N: usize>(
    backend: Backend,
    state: &mut [[u32; N]; 5],
    blocks: &[Block; N],
    mask: Option<&[u32; N]>,
) {
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => unsafe { avx2::ripemd160_compress(state, blocks, mask) },
        _ => portable::ripemd160_compress(state, blocks, mask),
    }
}
