//! Error types for lane-parallel hashing.

use thiserror::Error;

use crate::dispatcher::Backend;

/// Contract violations reported by the lane engines, padding helpers and batch API.
///
/// The hot paths (`update_block`, `hash_compressed`, `hash_uncompressed`) are
/// infallible by construction; these errors only surface from the validated
/// accessors and from general-purpose entry points that accept arbitrary input.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LaneError {
    /// A lane index was outside the engine's lane count.
    #[error("lane {lane} is out of range for a {lanes}-lane engine")]
    LaneOutOfRange {
        /// Requested lane.
        lane: usize,
        /// Lanes provided by the engine.
        lanes: usize,
    },
    /// A pending tail must be strictly shorter than one block.
    #[error("tail of {len} bytes does not fit below the 64-byte block size")]
    TailTooLong {
        /// Offending tail length.
        len: usize,
    },
    /// A message exceeded the capacity of a fixed-size padding helper.
    #[error("message of {len} bytes exceeds the {max}-byte limit")]
    MessageTooLong {
        /// Message length in bytes.
        len: usize,
        /// Largest accepted length.
        max: usize,
    },
    /// A message length falls outside the window a padding helper covers.
    #[error("message of {len} bytes is outside the accepted range {min}..={max}")]
    MessageLength {
        /// Message length in bytes.
        len: usize,
        /// Smallest accepted length.
        min: usize,
        /// Largest accepted length.
        max: usize,
    },
    /// Lanes of one batch disagreed on how many blocks they need.
    #[error("lanes need between {min} and {max} blocks; a batch must share one block count")]
    MixedBlockCounts {
        /// Fewest blocks needed by any lane.
        min: usize,
        /// Most blocks needed by any lane.
        max: usize,
    },
    /// The engine was already finalized and must be re-initialized first.
    #[error("engine already finalized; call init() before feeding more data")]
    AlreadyFinalized,
    /// The requested backend cannot run here or cannot drive this lane count.
    #[error("backend {backend} is unavailable for {lanes} lanes on this CPU")]
    BackendUnavailable {
        /// Backend that was requested.
        backend: Backend,
        /// Lane count of the engine.
        lanes: usize,
    },
}

/// Failure to parse a backend name.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown backend '{name}' (expected 'avx2' or 'portable')")]
pub struct ParseBackendError {
    pub(crate) name: String,
}

impl ParseBackendError {
    /// The name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}
