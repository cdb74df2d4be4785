//! Convenience macros for hash160-specific tracing.
//!
//! These wrap the standard tracing macros with a fixed target per subsystem.

/// Emit a lane batch trace.
///
/// # Example
/// ```ignore
/// trace_batch!(batch = index, "hashed {} lanes", lanes);
/// ```
#[macro_export]
macro_rules! trace_batch {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "hash160::batch", $($arg)*);
    };
}

/// Emit a verification trace.
#[macro_export]
macro_rules! trace_verify {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "hash160::verify", $($arg)*);
    };
}

/// Emit a key generation trace.
#[macro_export]
macro_rules! trace_keys {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "hash160::keys", $($arg)*);
    };
}

/// Emit a statistics trace.
///
/// # Example
/// ```ignore
/// trace_stats!("{} hashes in {:.3}s", total, secs);
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "hash160::stats", $($arg)*);
    };
}

/// Emit a backend dispatch trace.
#[macro_export]
macro_rules! trace_dispatch {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "hash160::dispatch", $($arg)*);
    };
}
