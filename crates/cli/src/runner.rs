//! Generates keys batch by batch and pushes them through the lane pipeline.

use hash160_simd::{Backend, Hash160, Hash160Pipeline, KeyFormat, LANES, LaneError};
use thiserror::Error;

use crate::keys::{KeyBatch, KeyError, KeyStream, PrivateKey};
use crate::verify::{FormatResults, Verification, verify_tail};

/// Batches handed to one worker task.
pub const BATCHES_PER_TASK: u64 = 128;

/// Which encodings of each public key are hashed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormatSelection {
    /// 33-byte keys only.
    Compressed,
    /// 65-byte keys only.
    Uncompressed,
    /// Both encodings.
    #[default]
    Both,
}

impl FormatSelection {
    /// Formats hashed for every key.
    pub const fn formats(self) -> &'static [KeyFormat] {
        match self {
            Self::Compressed => &[KeyFormat::Compressed],
            Self::Uncompressed => &[KeyFormat::Uncompressed],
            Self::Both => &[KeyFormat::Compressed, KeyFormat::Uncompressed],
        }
    }
}

/// Backend requested on the command line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BackendChoice {
    /// Best available backend.
    #[default]
    Auto,
    /// A specific backend; fails if the CPU cannot run it.
    Fixed(Backend),
}

impl BackendChoice {
    /// Builds a pipeline for this choice.
    pub fn pipeline(self) -> Result<Hash160Pipeline<LANES>, LaneError> {
        match self {
            Self::Auto => Ok(Hash160Pipeline::new()),
            Self::Fixed(backend) => Hash160Pipeline::with_backend(backend),
        }
    }
}

/// Work description for [`run_job`].
#[derive(Clone, Debug)]
pub struct Job {
    /// First private key.
    pub start: PrivateKey,
    /// Number of lane batches.
    pub batches: u64,
    /// Encodings hashed per key.
    pub formats: FormatSelection,
    /// Backend selection.
    pub backend: BackendChoice,
    /// Trailing keys of the final batch to verify.
    pub verify: usize,
    /// Worker threads; 0 runs on the calling thread.
    pub threads: usize,
}

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The requested backend cannot run here.
    #[error(transparent)]
    Backend(#[from] LaneError),
    /// Key generation failed.
    #[error(transparent)]
    Keys(#[from] KeyError),
    /// The worker pool could not be created.
    #[cfg(feature = "parallel")]
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// `--threads` was given in a build without thread-pool support.
    #[cfg(not(feature = "parallel"))]
    #[error("this build does not support --threads")]
    ThreadsUnsupported,
}

/// Result of a completed job.
#[derive(Debug)]
pub struct JobOutcome {
    /// Backend that executed the pipeline.
    pub backend: Backend,
    /// Verification of the final batch.
    pub verified: Vec<Verification>,
}

/// Final lane batch with its digests, kept for verification.
struct FinalBatch {
    first_index: u64,
    keys: KeyBatch,
    compressed: Option<[Hash160; LANES]>,
    uncompressed: Option<[Hash160; LANES]>,
}

/// Runs the whole job and verifies the tail of the final batch.
pub fn run_job(job: &Job) -> Result<JobOutcome, RunError> {
    let backend = job.backend.pipeline()?.backend();
    let last = if job.threads == 0 {
        hash_range(job, 0, job.batches)?
    } else {
        run_parallel(job)?
    };

    let verified = last.map_or_else(Vec::new, |batch| {
        let mut results = Vec::with_capacity(2);
        if let Some(digests) = &batch.compressed {
            results.push(FormatResults {
                format: KeyFormat::Compressed,
                keys: std::array::from_fn(|lane| batch.keys.compressed[lane].as_slice()),
                digests,
            });
        }
        if let Some(digests) = &batch.uncompressed {
            results.push(FormatResults {
                format: KeyFormat::Uncompressed,
                keys: std::array::from_fn(|lane| batch.keys.uncompressed[lane].as_slice()),
                digests,
            });
        }
        verify_tail(batch.first_index, &batch.keys.secrets, &results, job.verify)
    });

    Ok(JobOutcome { backend, verified })
}

#[cfg(feature = "parallel")]
fn run_parallel(job: &Job) -> Result<Option<FinalBatch>, RunError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(job.threads)
        .build()?;
    let tasks = job.batches.div_ceil(BATCHES_PER_TASK);
    let finals = pool.install(|| {
        (0..tasks)
            .into_par_iter()
            .map(|task| {
                let first = task * BATCHES_PER_TASK;
                let count = BATCHES_PER_TASK.min(job.batches - first);
                hash_range(job, first, count)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    Ok(finals.into_iter().flatten().next_back())
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(_job: &Job) -> Result<Option<FinalBatch>, RunError> {
    Err(RunError::ThreadsUnsupported)
}

/// Hashes batches `first..first + count` with one pipeline.
///
/// Returns the final batch of the job when this range contains it.
fn hash_range(job: &Job, first: u64, count: u64) -> Result<Option<FinalBatch>, RunError> {
    let mut pipeline = job.backend.pipeline()?;
    let mut keys = KeyStream::starting_at(&job.start, first * LANES as u64)?;
    let hash_compressed = job.formats != FormatSelection::Uncompressed;
    let hash_uncompressed = job.formats != FormatSelection::Compressed;
    let mut last = None;

    for index in first..first + count {
        let batch = keys.next_batch()?;
        let compressed = hash_compressed.then(|| pipeline.hash_compressed(&batch.compressed));
        let uncompressed =
            hash_uncompressed.then(|| pipeline.hash_uncompressed(&batch.uncompressed));
        logging::trace_batch!(batch = index, lanes = LANES, "hashed batch");

        if index + 1 == job.batches {
            last = Some(FinalBatch {
                first_index: index * LANES as u64 + 1,
                keys: batch,
                compressed,
                uncompressed,
            });
        }
    }
    Ok(last)
}
