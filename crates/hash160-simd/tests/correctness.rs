//! Correctness tests for the hash160-simd public API.

use std::array;

use hash160_simd::padding::{pad_message, pad_single_block, pad_two_blocks};
use hash160_simd::{
    Backend, BlockTransform, CompressedKey, Hash160Pipeline, LaneBatchRipemd160, LaneBatchSha256,
    LaneError, SelfPaddingHasher, UncompressedKey, active_backend, hash160, hash160_batch,
    ripemd160_lanes, sha256_lanes,
};
use test_support::{
    pattern_message, reference_hash160, reference_ripemd160, reference_sha256, sample_keys, to_hex,
};

#[test]
fn sha256_known_answers_in_all_lanes() {
    let mut engine = LaneBatchSha256::<8>::new();
    engine.update_block(&[pad_single_block(b"").unwrap(); 8]);
    for digest in engine.finalize() {
        assert_eq!(
            to_hex(&digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    engine.init();
    engine.update_block(&[pad_single_block(b"abc").unwrap(); 8]);
    for digest in engine.finalize() {
        assert_eq!(
            to_hex(&digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

#[test]
fn sha256_of_compressed_generator() {
    let key = sample_keys(1)[0].compressed;
    let mut engine = LaneBatchSha256::<8>::new();
    engine.update_block(&[pad_single_block(&key).unwrap(); 8]);
    assert_eq!(
        to_hex(&engine.finalize()[6]),
        "0f715baf5d4c2ed329785cef29e562f73488c8a2bb9dbc5700b361d54b9b0554"
    );
}

#[test]
fn sha256_boundary_lengths() {
    for len in [0usize, 3, 33, 55, 56, 63, 64, 65, 119, 127, 128] {
        let messages: [Vec<u8>; 8] = array::from_fn(|lane| pattern_message(len, lane as u8));
        let refs: [&[u8]; 8] = array::from_fn(|lane| messages[lane].as_slice());
        let mut engine = LaneBatchSha256::<8>::new();
        let digests = sha256_lanes(&mut engine, &refs).unwrap();
        for (lane, digest) in digests.iter().enumerate() {
            assert_eq!(digest, &reference_sha256(&messages[lane]), "len {len} lane {lane}");
        }
    }
}

#[test]
fn sha256_two_block_helper_matches_general_padding() {
    for len in 56..=119 {
        let message = pattern_message(len, 3);
        assert_eq!(pad_two_blocks(&message).unwrap().to_vec(), pad_message(&message));
    }
}

#[test]
fn ripemd160_known_answers_in_all_lanes() {
    let mut engine = LaneBatchRipemd160::<8>::new();
    engine.finalize();
    engine.init();
    let empty = engine.finalize();
    assert!(empty.iter().all(|d| to_hex(d) == "9c1185a5c5e9fc54612808977ee8f548b2258d31"));

    engine.init();
    for lane in 0..8 {
        engine.set_tail(lane, b"abc").unwrap();
    }
    assert!(
        engine
            .finalize()
            .iter()
            .all(|d| to_hex(d) == "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc")
    );
}

#[test]
fn ripemd160_tail_boundaries() {
    for tail in [0usize, 1, 55, 56, 63] {
        for full in 0..3 {
            let len = full * 64 + tail;
            let messages: [Vec<u8>; 8] = array::from_fn(|lane| pattern_message(len, lane as u8 + 40));
            let refs: [&[u8]; 8] = array::from_fn(|lane| messages[lane].as_slice());
            let mut engine = LaneBatchRipemd160::<8>::new();
            let digests = ripemd160_lanes(&mut engine, &refs).unwrap();
            for (lane, digest) in digests.iter().enumerate() {
                assert_eq!(
                    digest,
                    &reference_ripemd160(&messages[lane]),
                    "{full} full blocks, {tail}-byte tail, lane {lane}"
                );
            }
        }
    }
}

#[test]
fn ripemd160_mixed_tails_single_batch() {
    let lens = [0usize, 55, 56, 63, 10, 62, 32, 57];
    let messages: [Vec<u8>; 8] = array::from_fn(|lane| pattern_message(64 + lens[lane], lane as u8));
    let refs: [&[u8]; 8] = array::from_fn(|lane| messages[lane].as_slice());
    let mut engine = LaneBatchRipemd160::<8>::new();
    let digests = ripemd160_lanes(&mut engine, &refs).unwrap();
    for (lane, digest) in digests.iter().enumerate() {
        assert_eq!(digest, &reference_ripemd160(&messages[lane]), "lane {lane}");
    }
}

#[test]
fn hash160_of_sixty_four_keys_both_encodings() {
    let keys = sample_keys(64);
    let mut pipeline = Hash160Pipeline::<8>::new();

    for batch in keys.chunks_exact(8) {
        let compressed: [CompressedKey; 8] = array::from_fn(|i| batch[i].compressed);
        let uncompressed: [UncompressedKey; 8] = array::from_fn(|i| batch[i].uncompressed);

        let c = pipeline.hash_compressed(&compressed);
        let u = pipeline.hash_uncompressed(&uncompressed);
        for lane in 0..8 {
            assert_eq!(c[lane], reference_hash160(&compressed[lane]));
            assert_eq!(u[lane], reference_hash160(&uncompressed[lane]));
        }
    }
}

#[test]
fn generator_point_hash160() {
    let key = sample_keys(1)[0];
    let mut pipeline = Hash160Pipeline::<8>::new();
    assert_eq!(
        to_hex(&pipeline.hash_compressed(&[key.compressed; 8])[0]),
        "751e76e8199196d454941c45d1b3a323f1433bd6"
    );
    assert_eq!(to_hex(&hash160(&key.compressed)), "751e76e8199196d454941c45d1b3a323f1433bd6");
}

#[test]
fn lanes_are_independent_of_position() {
    let keys = sample_keys(8);
    let compressed: [CompressedKey; 8] = array::from_fn(|i| keys[i].compressed);
    let reversed: [CompressedKey; 8] = array::from_fn(|i| keys[7 - i].compressed);

    let mut pipeline = Hash160Pipeline::<8>::new();
    let forward = pipeline.hash_compressed(&compressed);
    let backward = pipeline.hash_compressed(&reversed);
    for lane in 0..8 {
        assert_eq!(forward[lane], backward[7 - lane]);
    }
}

#[test]
fn repeated_finalize_is_stable() {
    let mut sha = LaneBatchSha256::<8>::new();
    sha.update_block(&[pad_single_block(b"stable").unwrap(); 8]);
    assert_eq!(sha.finalize(), sha.finalize());

    let mut ripemd = LaneBatchRipemd160::<8>::new();
    ripemd.set_tail(2, b"stable").unwrap();
    let first = ripemd.finalize();
    assert_eq!(ripemd.finalize(), first);
}

#[test]
fn trait_objects_drive_both_engines() {
    fn run_transform<E: BlockTransform<8, Digest = [u8; 32]>>(engine: &mut E, message: &[u8]) -> [u8; 32] {
        let rows: Vec<[[u8; 64]; 8]> = pad_message(message).into_iter().map(|b| [b; 8]).collect();
        engine.digest_rows(&rows)[0]
    }

    fn run_padding<E: SelfPaddingHasher<8, Digest = [u8; 20]>>(engine: &mut E, tail: &[u8]) -> [u8; 20] {
        engine.init();
        for lane in 0..8 {
            engine.set_tail(lane, tail).unwrap();
        }
        let mut out = [[0u8; 20]; 8];
        engine.finalize_into(&mut out);
        out[4]
    }

    let mut sha = LaneBatchSha256::<8>::new();
    assert_eq!(run_transform(&mut sha, b"trait"), reference_sha256(b"trait"));

    let mut ripemd = LaneBatchRipemd160::<8>::new();
    assert_eq!(run_padding(&mut ripemd, b"trait"), reference_ripemd160(b"trait"));
}

#[test]
fn batch_api_handles_every_length_class() {
    let inputs: Vec<Vec<u8>> = (0..200).map(|len| pattern_message(len, len as u8)).collect();
    let digests = hash160_batch(&inputs).unwrap();
    for (input, digest) in inputs.iter().zip(&digests) {
        assert_eq!(digest, &reference_hash160(input), "length {}", input.len());
    }
}

#[test]
fn explicit_backends_agree_with_detected_one() {
    let keys = sample_keys(8);
    let compressed: [CompressedKey; 8] = array::from_fn(|i| keys[i].compressed);

    let mut detected = Hash160Pipeline::<8>::new();
    assert_eq!(detected.backend(), active_backend());
    let mut portable = Hash160Pipeline::<8>::with_backend(Backend::Portable).unwrap();
    assert_eq!(detected.hash_compressed(&compressed), portable.hash_compressed(&compressed));

    match Hash160Pipeline::<8>::with_backend(Backend::Avx2) {
        Ok(mut simd) => {
            assert_eq!(simd.hash_compressed(&compressed), portable.hash_compressed(&compressed));
        }
        Err(err) => {
            assert!(matches!(err, LaneError::BackendUnavailable { .. }));
            eprintln!("AVX2 not available, skipping comparison");
        }
    }
}
