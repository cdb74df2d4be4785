//! RIPEMD-160 over `N` lanes with built-in padding.
//!
//! Unlike the SHA-256 engine this one owns its Merkle-Damgård padding. Full
//! blocks are absorbed with [`LaneBatchRipemd160::update_full_blocks`]; each
//! lane's final partial block (its tail, 0..=63 bytes) is staged with
//! [`LaneBatchRipemd160::set_tail`] and padded on finalize with `0x80`, zero
//! fill and the little-endian bit length.
//!
//! Lanes may carry tails of different lengths. A tail of 56 bytes or more
//! spills the length field into a second padding block; that block is run
//! for every lane, but only lanes that need it adopt the result.

use crate::LANES;
use crate::dispatcher::Backend;
use crate::error::LaneError;
use crate::padding::{BLOCK_LEN, Block, LENGTH_FIELD_LEN, PAD_MARKER};
use crate::simd::{self, LaneWord, lane_mask, portable};
use crate::traits::SelfPaddingHasher;

/// RIPEMD-160 digest width in bytes.
pub const DIGEST_LEN: usize = 20;

/// One RIPEMD-160 digest.
pub type Ripemd160Digest = [u8; DIGEST_LEN];

pub(crate) const IV: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

const K_LEFT: [u32; 5] = [0x00000000, 0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC, 0xA953FD4E];
const K_RIGHT: [u32; 5] = [0x50A28BE6, 0x5C4DD124, 0x6D703EF3, 0x7A6D76E9, 0x00000000];

const R_LEFT: [usize; 80] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, //
    7, 4, 13, 1, 10, 6, 15, 3, 12, 0, 9, 5, 2, 14, 11, 8, //
    3, 10, 14, 4, 9, 15, 8, 1, 2, 7, 0, 6, 13, 11, 5, 12, //
    1, 9, 11, 10, 0, 8, 12, 4, 13, 3, 7, 15, 14, 5, 6, 2, //
    4, 0, 5, 9, 7, 12, 2, 10, 14, 1, 3, 8, 11, 6, 15, 13,
];

const R_RIGHT: [usize; 80] = [
    5, 14, 7, 0, 9, 2, 11, 4, 13, 6, 15, 8, 1, 10, 3, 12, //
    6, 11, 3, 7, 0, 13, 5, 10, 14, 15, 8, 12, 4, 9, 1, 2, //
    15, 5, 1, 3, 7, 14, 6, 9, 11, 8, 12, 2, 10, 0, 4, 13, //
    8, 6, 4, 1, 3, 11, 15, 0, 5, 12, 2, 13, 9, 7, 10, 14, //
    12, 15, 10, 4, 1, 5, 8, 7, 6, 2, 13, 14, 0, 3, 9, 11,
];

const S_LEFT: [u32; 80] = [
    11, 14, 15, 12, 5, 8, 7, 9, 11, 13, 14, 15, 6, 7, 9, 8, //
    7, 6, 8, 13, 11, 9, 7, 15, 7, 12, 15, 9, 11, 7, 13, 12, //
    11, 13, 6, 7, 14, 9, 13, 15, 14, 8, 13, 6, 5, 12, 7, 5, //
    11, 12, 14, 15, 14, 15, 9, 8, 9, 14, 5, 6, 8, 6, 5, 12, //
    9, 15, 5, 11, 6, 8, 13, 12, 5, 12, 13, 14, 11, 8, 5, 6,
];

const S_RIGHT: [u32; 80] = [
    8, 9, 9, 11, 13, 15, 15, 5, 7, 7, 8, 11, 14, 14, 12, 6, //
    9, 13, 15, 7, 12, 8, 9, 11, 7, 7, 12, 7, 6, 15, 13, 11, //
    9, 7, 15, 11, 8, 6, 6, 14, 12, 13, 5, 14, 13, 13, 7, 5, //
    15, 5, 8, 11, 14, 14, 6, 14, 6, 9, 12, 9, 12, 5, 15, 8, //
    8, 5, 12, 9, 12, 5, 14, 6, 8, 13, 6, 5, 15, 13, 11, 11,
];

/// Boolean function for `round` (0..5). The right line runs them in reverse.
#[inline(always)]
fn boolean<V: LaneWord>(round: usize, x: V, y: V, z: V) -> V {
    match round {
        0 => x.xor(y).xor(z),
        1 => x.and(y).or(x.andnot(z)),
        2 => x.or(y.not()).xor(z),
        3 => x.and(z).or(z.andnot(y)),
        _ => x.xor(y.or(z.not())),
    }
}

/// Compresses one word-major block into the lane state.
#[inline(always)]
pub(crate) fn compress<V: LaneWord>(state: &mut [V; 5], x: &[V; 16]) {
    let [h0, h1, h2, h3, h4] = *state;
    let (mut al, mut bl, mut cl, mut dl, mut el) = (h0, h1, h2, h3, h4);
    let (mut ar, mut br, mut cr, mut dr, mut er) = (h0, h1, h2, h3, h4);

    for round in 0..5 {
        let kl = V::splat(K_LEFT[round]);
        let kr = V::splat(K_RIGHT[round]);
        for j in round * 16..round * 16 + 16 {
            let t = al
                .add(boolean(round, bl, cl, dl))
                .add(x[R_LEFT[j]])
                .add(kl)
                .rotl(S_LEFT[j])
                .add(el);
            al = el;
            el = dl;
            dl = cl.rotl(10);
            cl = bl;
            bl = t;

            let t = ar
                .add(boolean(4 - round, br, cr, dr))
                .add(x[R_RIGHT[j]])
                .add(kr)
                .rotl(S_RIGHT[j])
                .add(er);
            ar = er;
            er = dr;
            dr = cr.rotl(10);
            cr = br;
            br = t;
        }
    }

    *state = [
        h1.add(cl).add(dr),
        h2.add(dl).add(er),
        h3.add(el).add(ar),
        h4.add(al).add(br),
        h0.add(bl).add(cr),
    ];
}

/// Compresses `x` but keeps the previous state in lanes where `mask` is zero.
#[inline(always)]
pub(crate) fn compress_masked<V: LaneWord>(state: &mut [V; 5], x: &[V; 16], mask: V) {
    let mut next = *state;
    compress(&mut next, x);
    for (word, updated) in state.iter_mut().zip(next) {
        *word = V::blend(mask, updated, *word);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Accumulating,
    Finalized,
}

/// RIPEMD-160 state, bit counters and pending tails for `N` lanes.
#[derive(Clone, Debug)]
#[repr(C, align(64))]
pub struct LaneBatchRipemd160<const N: usize = LANES> {
    state: [[u32; N]; 5],
    total_bits: [u64; N],
    tails: [Block; N],
    tail_lens: [usize; N],
    phase: Phase,
    backend: Backend,
}

impl<const N: usize> LaneBatchRipemd160<N> {
    const NONEMPTY: () = assert!(N > 0, "an engine needs at least one lane");

    /// Creates an initialized engine on the best backend for `N` lanes.
    pub fn new() -> Self {
        let () = Self::NONEMPTY;
        Self {
            state: IV.map(|word| [word; N]),
            total_bits: [0; N],
            tails: [[0; BLOCK_LEN]; N],
            tail_lens: [0; N],
            phase: Phase::Accumulating,
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

    /// Resets state, counters and tails so a new message can be absorbed.
    pub fn init(&mut self) {
        self.state = IV.map(|word| [word; N]);
        self.total_bits = [0; N];
        self.tail_lens = [0; N];
        self.phase = Phase::Accumulating;
    }

    /// Re-initializes and stages one equal-length tail per lane.
    ///
    /// Infallible counterpart of [`Self::init`] followed by [`Self::set_tail`]
    /// for every lane; `D` is checked at compile time.
    pub fn init_with_tails<const D: usize>(&mut self, tails: &[[u8; D]; N]) {
        const { assert!(D < BLOCK_LEN, "a tail must be shorter than one block") };
        self.init();
        for (buffer, tail) in self.tails.iter_mut().zip(tails) {
            buffer[..D].copy_from_slice(tail);
        }
        self.tail_lens = [D; N];
    }

    /// Absorbs one full 64-byte block per lane and advances each counter by 512 bits.
    pub fn update_full_blocks(&mut self, blocks: &[Block; N]) -> Result<(), LaneError> {
        self.ensure_accumulating()?;
        self.compress(blocks, None);
        for bits in &mut self.total_bits {
            *bits = bits.wrapping_add((BLOCK_LEN * 8) as u64);
        }
        Ok(())
    }

    /// Stages `tail` as the final partial block of `lane`.
    pub fn set_tail(&mut self, lane: usize, tail: &[u8]) -> Result<(), LaneError> {
        self.check_lane(lane)?;
        self.ensure_accumulating()?;
        if tail.len() >= BLOCK_LEN {
            return Err(LaneError::TailTooLong { len: tail.len() });
        }
        self.tails[lane][..tail.len()].copy_from_slice(tail);
        self.tail_lens[lane] = tail.len();
        Ok(())
    }

    /// Mutable access to the tail buffer of `lane`; pair with [`Self::set_tail_len`].
    pub fn tail_mut(&mut self, lane: usize) -> Result<&mut Block, LaneError> {
        self.check_lane(lane)?;
        self.ensure_accumulating()?;
        Ok(&mut self.tails[lane])
    }

    /// Declares how many bytes of the tail buffer of `lane` are message data.
    pub fn set_tail_len(&mut self, lane: usize, len: usize) -> Result<(), LaneError> {
        self.check_lane(lane)?;
        self.ensure_accumulating()?;
        if len >= BLOCK_LEN {
            return Err(LaneError::TailTooLong { len });
        }
        self.tail_lens[lane] = len;
        Ok(())
    }

    /// Pending tail length of `lane`, or `None` when out of range.
    pub fn tail_len(&self, lane: usize) -> Option<usize> {
        self.tail_lens.get(lane).copied()
    }

    /// Bits absorbed through full blocks for `lane`, tail excluded.
    pub fn total_bits(&self, lane: usize) -> Option<u64> {
        self.total_bits.get(lane).copied()
    }

    /// Whether [`Self::finalize_into`] ran since the last [`Self::init`].
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Pads every lane's tail and writes the little-endian digests into `out`.
    ///
    /// Runs on a copy of the chaining state, so calling it again before
    /// [`Self::init`] yields the same digests.
    pub fn finalize_into(&mut self, out: &mut [Ripemd160Digest; N]) {
        let mut first = [[0u8; BLOCK_LEN]; N];
        let mut second = [[0u8; BLOCK_LEN]; N];
        let mut second_mask = [0u32; N];

        for lane in 0..N {
            let len = self.tail_lens[lane];
            let bits = self.total_bits[lane].wrapping_add((len * 8) as u64);
            let block = &mut first[lane];
            block[..len].copy_from_slice(&self.tails[lane][..len]);
            block[len] = PAD_MARKER;

            let spills = len + 1 > BLOCK_LEN - LENGTH_FIELD_LEN;
            second_mask[lane] = lane_mask(spills);
            let target = if spills { &mut second[lane] } else { block };
            target[BLOCK_LEN - LENGTH_FIELD_LEN..].copy_from_slice(&bits.to_le_bytes());
        }

        let saved = self.state;
        self.compress(&first, None);
        if second_mask.iter().any(|&m| m != 0) {
            self.compress(&second, Some(&second_mask));
        }
        portable::ripemd160_digests(&self.state, out);
        self.state = saved;
        self.phase = Phase::Finalized;
    }

    /// Returns the digest of every lane. See [`Self::finalize_into`].
    pub fn finalize(&mut self) -> [Ripemd160Digest; N] {
        let mut out = [[0u8; DIGEST_LEN]; N];
        self.finalize_into(&mut out);
        out
    }

    fn compress(&mut self, blocks: &[Block; N], mask: Option<&[u32; N]>) {
        simd::ripemd160_compress(self.backend, &mut self.state, blocks, mask);
    }

    const fn check_lane(&self, lane: usize) -> Result<(), LaneError> {
        if lane < N {
            Ok(())
        } else {
            Err(LaneError::LaneOutOfRange { lane, lanes: N })
        }
    }

    fn ensure_accumulating(&self) -> Result<(), LaneError> {
        match self.phase {
            Phase::Accumulating => Ok(()),
            Phase::Finalized => Err(LaneError::AlreadyFinalized),
        }
    }
}

impl<const N: usize> Default for LaneBatchRipemd160<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SelfPaddingHasher<N> for LaneBatchRipemd160<N> {
    type Digest = Ripemd160Digest;

    fn init(&mut self) {
        Self::init(self);
    }

    fn update_full_blocks(&mut self, blocks: &[Block; N]) -> Result<(), LaneError> {
        Self::update_full_blocks(self, blocks)
    }

    fn set_tail(&mut self, lane: usize, tail: &[u8]) -> Result<(), LaneError> {
        Self::set_tail(self, lane, tail)
    }

    fn finalize_into(&mut self, out: &mut [Self::Digest; N]) {
        Self::finalize_into(self, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn digest_all_lanes<const N: usize>(message: &[u8]) -> [Ripemd160Digest; N] {
        let mut engine = LaneBatchRipemd160::<N>::new();
        let mut chunks = message.chunks_exact(BLOCK_LEN);
        for chunk in chunks.by_ref() {
            let block: Block = chunk.try_into().unwrap();
            engine.update_full_blocks(&[block; N]).unwrap();
        }
        for lane in 0..N {
            engine.set_tail(lane, chunks.remainder()).unwrap();
        }
        engine.finalize()
    }

    #[test]
    fn known_answers_on_every_lane() {
        let cases: [(&[u8], &str); 4] = [
            (b"", "9c1185a5c5e9fc54612808977ee8f548b2258d31"),
            (b"abc", "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"),
            (b"message digest", "5d0689ef49d2fae572b881b123a85ffa21595f36"),
            (
                b"12345678901234567890123456789012345678901234567890123456789012345678901234567890",
                "9b752e45573d4b39f4dbd3323cab82bf63326bfb",
            ),
        ];
        for (message, expected) in cases {
            for digest in digest_all_lanes::<8>(message) {
                assert_eq!(hex(&digest), expected);
            }
            assert_eq!(hex(&digest_all_lanes::<3>(message)[2]), expected);
        }
    }

    #[test]
    fn tail_of_56_bytes_spills_into_second_block() {
        let message = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
        assert_eq!(message.len(), 56);
        let digests = digest_all_lanes::<8>(message);
        assert_eq!(hex(&digests[5]), "12a053384a9c0c88e405a06c27dcf49ada62eb2b");
    }

    #[test]
    fn mixed_tail_lengths_match_uniform_batches() {
        let lens = [0usize, 20, 55, 56, 63, 32, 1, 60];
        let mut mixed = LaneBatchRipemd160::<8>::new();
        for (lane, &len) in lens.iter().enumerate() {
            mixed.set_tail(lane, &[lane as u8; 64][..len]).unwrap();
        }
        let mixed = mixed.finalize();

        for (lane, &len) in lens.iter().enumerate() {
            let uniform = digest_all_lanes::<8>(&[lane as u8; 64][..len]);
            assert_eq!(mixed[lane], uniform[0], "lane {lane} with a {len}-byte tail");
        }
    }

    #[test]
    fn bit_counter_tracks_full_blocks() {
        let mut engine = LaneBatchRipemd160::<8>::new();
        engine.update_full_blocks(&[[0; 64]; 8]).unwrap();
        engine.update_full_blocks(&[[0; 64]; 8]).unwrap();
        assert_eq!(engine.total_bits(3), Some(1024));
        assert_eq!(engine.total_bits(8), None);
        engine.init();
        assert_eq!(engine.total_bits(3), Some(0));
    }

    #[test]
    fn tail_buffer_api_matches_set_tail() {
        let mut via_buffer = LaneBatchRipemd160::<8>::new();
        let mut via_copy = LaneBatchRipemd160::<8>::new();
        for lane in 0..8 {
            via_buffer.tail_mut(lane).unwrap()[..3].copy_from_slice(b"abc");
            via_buffer.set_tail_len(lane, 3).unwrap();
            via_copy.set_tail(lane, b"abc").unwrap();
        }
        assert_eq!(via_buffer.tail_len(0), Some(3));
        assert_eq!(via_buffer.finalize(), via_copy.finalize());
    }

    #[test]
    fn contract_violations_are_reported() {
        let mut engine = LaneBatchRipemd160::<8>::new();
        assert_eq!(
            engine.set_tail(8, b"x"),
            Err(LaneError::LaneOutOfRange { lane: 8, lanes: 8 })
        );
        assert_eq!(engine.set_tail(0, &[0; 64]), Err(LaneError::TailTooLong { len: 64 }));
        assert_eq!(engine.set_tail_len(0, 64), Err(LaneError::TailTooLong { len: 64 }));
        assert!(engine.tail_mut(9).is_err());
    }

    #[test]
    fn finalize_is_terminal_until_init() {
        let mut engine = LaneBatchRipemd160::<8>::new();
        engine.set_tail(0, b"abc").unwrap();
        let first = engine.finalize();
        assert!(engine.is_finalized());
        assert_eq!(engine.finalize(), first);
        assert_eq!(engine.update_full_blocks(&[[0; 64]; 8]), Err(LaneError::AlreadyFinalized));
        assert_eq!(engine.set_tail(0, b"x"), Err(LaneError::AlreadyFinalized));

        engine.init();
        assert!(!engine.is_finalized());
        assert!(engine.set_tail(0, b"abc").is_ok());
    }

    #[test]
    fn backends_agree_on_mixed_tails() {
        let Ok(mut simd) = LaneBatchRipemd160::<8>::with_backend(Backend::Avx2) else {
            eprintln!("AVX2 not available, skipping test");
            return;
        };
        let mut portable = LaneBatchRipemd160::<8>::with_backend(Backend::Portable).unwrap();
        let block: [Block; 8] = std::array::from_fn(|lane| [lane as u8; 64]);
        for engine in [&mut simd, &mut portable] {
            engine.update_full_blocks(&block).unwrap();
            for lane in 0..8 {
                engine.set_tail(lane, &[0xA5; 64][..lane * 8]).unwrap();
            }
        }
        assert_eq!(simd.finalize(), portable.finalize());
    }
}
