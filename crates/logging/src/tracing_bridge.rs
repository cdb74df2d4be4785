//! Subscriber installation for the hash160-lanes binaries.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Verbosity;

/// Builds a plain-text formatting subscriber for `verbosity` that writes to `writer`.
///
/// Only the verbosity directive is applied; the environment is not consulted.
pub fn build_subscriber<W>(verbosity: Verbosity, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    subscriber_with_filter(EnvFilter::new(verbosity.directive()), writer, false)
}

fn subscriber_with_filter<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .without_time()
        .finish()
}

/// Installs the global subscriber on stderr.
///
/// `RUST_LOG`, when set and valid, replaces the directive derived from
/// `verbosity`. Returns `false` if a global subscriber was already installed.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{Verbosity, init_tracing};
///
/// init_tracing(Verbosity::from_flags(1, false));
/// logging::trace_stats!("ready");
/// ```
pub fn init_tracing(verbosity: Verbosity) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    let ansi = std::io::stderr().is_terminal();
    subscriber_with_filter(filter, std::io::stderr, ansi)
        .try_init()
        .is_ok()
}
