//! Cross-checks lane results against the `sha2` and `ripemd` crates.

use hash160_simd::{Hash160, KeyFormat, LANES};
use ripemd::Ripemd160;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::keys::PrivateKey;

/// HASH160 computed one message at a time by the reference crates.
pub fn reference_hash160(data: &[u8]) -> Hash160 {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// Lane results of one batch for a single key format.
#[derive(Clone, Copy, Debug)]
pub struct FormatResults<'a> {
    /// Encoding the results belong to.
    pub format: KeyFormat,
    /// Serialised keys, one per lane.
    pub keys: [&'a [u8]; LANES],
    /// HASH160 per lane from the lane pipeline.
    pub digests: &'a [Hash160; LANES],
}

/// Comparison of one lane digest with the reference.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Check {
    /// Key encoding name.
    pub format: &'static str,
    /// Lane pipeline output, hex.
    pub lanes: String,
    /// Reference output, hex.
    pub reference: String,
    /// Whether both agree.
    pub ok: bool,
}

/// All checks for one key of the final batch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Verification {
    /// One-based position of the key in the run.
    pub index: u64,
    /// Private key, hex.
    pub private_key: String,
    /// One check per hashed format.
    pub checks: Vec<Check>,
}

impl Verification {
    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.ok)
    }
}

/// Verifies the last `count` lanes of the final batch.
///
/// `first_index` is the one-based run position of lane 0. `count` is capped
/// at the lane width.
pub fn verify_tail(
    first_index: u64,
    secrets: &[PrivateKey; LANES],
    results: &[FormatResults<'_>],
    count: usize,
) -> Vec<Verification> {
    let count = count.min(LANES);
    (LANES - count..LANES)
        .map(|lane| {
            let checks = results
                .iter()
                .map(|result| {
                    let reference = reference_hash160(result.keys[lane]);
                    let ok = reference == result.digests[lane];
                    if ok {
                        logging::trace_verify!(lane, format = result.format.name(), "verified");
                    } else {
                        tracing::error!(
                            target: logging::targets::VERIFY,
                            lane,
                            format = result.format.name(),
                            "lane digest differs from reference"
                        );
                    }
                    Check {
                        format: result.format.name(),
                        lanes: hex::encode(result.digests[lane]),
                        reference: hex::encode(reference),
                        ok,
                    }
                })
                .collect();
            Verification {
                index: first_index + lane as u64,
                private_key: hex::encode(secrets[lane]),
                checks,
            }
        })
        .collect()
}
