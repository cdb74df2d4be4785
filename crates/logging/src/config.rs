//! Verbosity levels derived from command-line flags.

use std::fmt;

/// How much diagnostic output to produce.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Verbosity {
    /// Errors only (`--quiet`).
    Quiet,
    /// Warnings and errors; the default.
    #[default]
    Normal,
    /// Progress information (`-v`).
    Verbose,
    /// Per-batch diagnostics (`-vv`).
    Debug,
    /// Everything, including per-key events (`-vvv` and beyond).
    Trace,
}

impl Verbosity {
    /// Maps a `-v` count and the `--quiet` switch to a level. Quiet wins.
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// `EnvFilter` directive for this level.
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Whether informational progress lines should be printed.
    pub const fn shows_progress(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug | Self::Trace)
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}
