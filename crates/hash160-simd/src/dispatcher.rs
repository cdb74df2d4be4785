//! Runtime CPU detection and backend dispatch.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::LANES;
use crate::error::ParseBackendError;

/// Available execution backends for the lane engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// AVX2 with 8 parallel lanes in one YMM register.
    Avx2,
    /// Plain `u32` arrays, any lane count. The compiler may still vectorise it.
    Portable,
}

impl Backend {
    /// Number of parallel lanes this backend is specialised for.
    ///
    /// The portable backend reports the default width but accepts any lane
    /// count; see [`Backend::supports_lanes`].
    pub const fn lanes(self) -> usize {
        match self {
            Self::Avx2 | Self::Portable => LANES,
        }
    }

    /// Whether an engine with `lanes` lanes can run on this backend.
    pub const fn supports_lanes(self, lanes: usize) -> bool {
        match self {
            Self::Avx2 => lanes == 8,
            Self::Portable => lanes > 0,
        }
    }

    /// Whether the current CPU can execute this backend.
    pub fn is_available(self) -> bool {
        match self {
            Self::Avx2 => avx2_detected(),
            Self::Portable => true,
        }
    }

    /// Lower-case name used on the command line and in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx2 => "avx2",
            Self::Portable => "portable",
        }
    }

    /// Best backend for an engine of `lanes` lanes on this machine.
    pub fn for_lanes(lanes: usize) -> Self {
        let detected = global().backend();
        if detected.supports_lanes(lanes) {
            detected
        } else {
            Self::Portable
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avx2" => Ok(Self::Avx2),
            "portable" | "scalar" => Ok(Self::Portable),
            _ => Err(ParseBackendError { name: s.to_owned() }),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn avx2_detected() -> bool {
    is_x86_feature_detected!("avx2")
}

#[cfg(not(target_arch = "x86_64"))]
const fn avx2_detected() -> bool {
    false
}

/// Dispatcher that selects the optimal backend at runtime.
pub struct Dispatcher {
    backend: Backend,
}

impl Dispatcher {
    /// Detect CPU features and select the best available backend.
    pub fn detect() -> Self {
        let backend = if avx2_detected() {
            Backend::Avx2
        } else {
            Backend::Portable
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "hash160::dispatch", backend = backend.name(), "selected lane backend");

        Self { backend }
    }

    /// Get the selected backend.
    pub const fn backend(&self) -> Backend {
        self.backend
    }
}

/// Global dispatcher instance, initialized on first use.
pub fn global() -> &'static Dispatcher {
    static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();
    DISPATCHER.get_or_init(Dispatcher::detect)
}
