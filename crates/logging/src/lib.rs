#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` maps the command-line verbosity switches of the hash160-lanes
//! tools onto `tracing` levels and installs the process-wide subscriber.
//!
//! # Design
//!
//! [`Verbosity`] is derived from the number of `-v` flags and `--quiet`.
//! With the `tracing` feature, [`init_tracing`] installs a
//! `tracing-subscriber` formatter on stderr filtered by an `EnvFilter`; a
//! `RUST_LOG` variable overrides the verbosity-derived directive. The
//! `trace_*!` macros emit events under fixed `hash160::*` targets so filters
//! can address one subsystem at a time.
//!
//! # Examples
//!
//! ```
//! use logging::Verbosity;
//!
//! assert_eq!(Verbosity::from_flags(0, false).directive(), "warn");
//! assert_eq!(Verbosity::from_flags(2, false).directive(), "debug");
//! assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
//! ```

mod config;
#[cfg(feature = "tracing")]
mod tracing_bridge;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use config::Verbosity;
#[cfg(feature = "tracing")]
pub use tracing_bridge::{build_subscriber, init_tracing};

/// Tracing targets used by the trace macros.
pub mod targets {
    /// Lane batch scheduling.
    pub const BATCH: &str = "hash160::batch";
    /// Reference cross-checks.
    pub const VERIFY: &str = "hash160::verify";
    /// Key generation.
    pub const KEYS: &str = "hash160::keys";
    /// Throughput and totals.
    pub const STATS: &str = "hash160::stats";
    /// Backend selection.
    pub const DISPATCH: &str = "hash160::dispatch";
}
