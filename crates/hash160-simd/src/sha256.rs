//! SHA-256 over `N` lanes, block transform only.
//!
//! The engine holds eight chaining words per lane and compresses one
//! caller-padded 64-byte block per lane at a time. It never pads: build
//! blocks with [`crate::padding`]. Digests are produced by
//! [`LaneBatchSha256::finalize`], which converts the state to big-endian
//! bytes without modifying it.

use crate::LANES;
use crate::dispatcher::Backend;
use crate::error::LaneError;
use crate::padding::Block;
use crate::simd::{self, LaneWord};
use crate::traits::BlockTransform;

/// SHA-256 digest width in bytes.
pub const DIGEST_LEN: usize = 32;

/// One SHA-256 digest.
pub type Sha256Digest = [u8; DIGEST_LEN];

pub(crate) const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[inline(always)]
fn ch<V: LaneWord>(x: V, y: V, z: V) -> V {
    x.and(y).xor(x.andnot(z))
}

#[inline(always)]
fn maj<V: LaneWord>(x: V, y: V, z: V) -> V {
    x.and(y).xor(x.and(z)).xor(y.and(z))
}

#[inline(always)]
fn big_sigma0<V: LaneWord>(x: V) -> V {
    x.rotr(2).xor(x.rotr(13)).xor(x.rotr(22))
}

#[inline(always)]
fn big_sigma1<V: LaneWord>(x: V) -> V {
    x.rotr(6).xor(x.rotr(11)).xor(x.rotr(25))
}

#[inline(always)]
fn small_sigma0<V: LaneWord>(x: V) -> V {
    x.rotr(7).xor(x.rotr(18)).xor(x.shr(3))
}

#[inline(always)]
fn small_sigma1<V: LaneWord>(x: V) -> V {
    x.rotr(17).xor(x.rotr(19)).xor(x.shr(10))
}

/// Compresses one word-major block into the lane state.
#[inline(always)]
pub(crate) fn compress<V: LaneWord>(state: &mut [V; 8], block: &[V; 16]) {
    let mut w = [V::splat(0); 64];
    w[..16].copy_from_slice(block);
    for t in 16..64 {
        w[t] = small_sigma1(w[t - 2])
            .add(w[t - 7])
            .add(small_sigma0(w[t - 15]))
            .add(w[t - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for (&k, &wt) in K.iter().zip(&w) {
        let t1 = h
            .add(big_sigma1(e))
            .add(ch(e, f, g))
            .add(V::splat(k))
            .add(wt);
        let t2 = big_sigma0(a).add(maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.add(t2);
    }

    for (word, round) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word = word.add(round);
    }
}

/// Eight-word SHA-256 chaining state for `N` independent lanes.
///
/// `state[k][lane]` is chaining word `k` of `lane`.
#[derive(Clone, Debug)]
#[repr(C, align(64))]
pub struct LaneBatchSha256<const N: usize = LANES> {
    state: [[u32; N]; 8],
    backend: Backend,
}

impl<const N: usize> LaneBatchSha256<N> {
    const NONEMPTY: () = assert!(N > 0, "an engine needs at least one lane");

    /// Creates an initialized engine on the best backend for `N` lanes.
    pub fn new() -> Self {
        let () = Self::NONEMPTY;
        Self {
            state: IV.map(|word| [word; N]),
            backend: Backend::for_lanes(N),
        }
    }

    /// Creates an initialized engine pinned to `backend`.
    pub fn with_backend(backend: Backend) -> Result<Self, LaneError> {
        if !backend.supports_lanes(N) || !backend.is_available() {
            return Err(LaneError::BackendUnavailable { backend, lanes: N });
        }
        let mut engine = Self::new();
        engine.backend = backend;
        Ok(engine)
    }

    /// Backend executing the compressions.
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Resets every lane to the SHA-256 initial hash values.
    pub fn init(&mut self) {
        self.state = IV.map(|word| [word; N]);
    }

    /// Compresses one padded block per lane into the running state.
    pub fn update_block(&mut self, blocks: &[Block; N]) {
        simd::sha256_compress(self.backend, &mut self.state, blocks);
    }

    /// Compresses a sequence of block rows, one row per message block.
    pub fn update_blocks(&mut self, rows: &[[Block; N]]) {
        for blocks in rows {
            self.update_block(blocks);
        }
    }

    /// Writes the big-endian digest of every lane into `out`.
    ///
    /// The state is left untouched, so repeated calls agree.
    pub fn finalize_into(&self, out: &mut [Sha256Digest; N]) {
        simd::sha256_digests(self.backend, &self.state, out);
    }

    /// Returns the digest of every lane.
    pub fn finalize(&self) -> [Sha256Digest; N] {
        let mut out = [[0u8; DIGEST_LEN]; N];
        self.finalize_into(&mut out);
        out
    }

    /// Lane-major view of the chaining state.
    pub const fn state_words(&self) -> &[[u32; N]; 8] {
        &self.state
    }
}

impl<const N: usize> Default for LaneBatchSha256<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BlockTransform<N> for LaneBatchSha256<N> {
    type Digest = Sha256Digest;

    fn init(&mut self) {
        Self::init(self);
    }

    fn update_block(&mut self, blocks: &[Block; N]) {
        Self::update_block(self, blocks);
    }

    fn finalize_into(&self, out: &mut [Self::Digest; N]) {
        Self::finalize_into(self, out);
    }
}
