#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of the `hash160-lanes` workspace. It
//! derives consecutive secp256k1 public keys, hashes them with the
//! lane-parallel [`hash160_simd::Hash160Pipeline`] eight at a time, checks the
//! tail of the final batch against the `sha2` and `ripemd` crates and prints
//! a throughput summary.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for standard
//! output and error and returns the process exit status, so the binary's
//! `main` stays a thin shim and tests can drive the whole tool in memory.
//! Parsing uses a [`clap`] builder command. Key generation lives in
//! [`keys`], batching and the optional rayon fan-out in [`runner`], the
//! reference cross-check in [`verify`] and output in [`report`].
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | every verified digest matched |
//! | 1 | a verified digest differed from the reference |
//! | 2 | invalid command line |
//! | 3 | key generation, backend or output failure |
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(
//!     ["hash160-lanes", "--keys", "16", "--backend", "portable", "-q"],
//!     &mut stdout,
//!     &mut stderr,
//! );
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().contains("Total public keys processed: 16"));
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command, value_parser};
use hash160_simd::{Backend, LANES};
use logging::Verbosity;

pub mod keys;
pub mod report;
pub mod runner;
pub mod verify;

use keys::{DEFAULT_START_KEY, PrivateKey, parse_start_key};
use report::Summary;
use runner::{BackendChoice, FormatSelection, Job, run_job};

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Every verified digest matched.
pub const EXIT_OK: i32 = 0;
/// A lane digest differed from the reference.
pub const EXIT_VERIFY_FAILED: i32 = 1;
/// The command line could not be parsed.
pub const EXIT_USAGE: i32 = 2;
/// Key generation, backend selection or output failed.
pub const EXIT_RUNTIME: i32 = 3;

/// Keys generated when no count is given or the count is not positive.
pub const DEFAULT_KEYS: u64 = 100_000;

/// Trailing keys of the final batch verified by default.
pub const DEFAULT_VERIFY: usize = 5;

/// Parsed command produced by [`parse_args`].
#[derive(Debug)]
struct ParsedArgs {
    keys: Option<i64>,
    formats: FormatSelection,
    backend: BackendChoice,
    verify: usize,
    start_key: PrivateKey,
    threads: usize,
    json: bool,
    verbosity: Verbosity,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("hash160-lanes")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bulk HASH160 of consecutive secp256k1 public keys on 8-lane SIMD engines")
        .arg(
            Arg::new("count")
                .value_name("COUNT")
                .help("Number of public keys (same as --keys).")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .conflicts_with("keys"),
        )
        .arg(
            Arg::new("keys")
                .long("keys")
                .short('n')
                .value_name("N")
                .help("Number of public keys; rounded up to a multiple of 8.")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Key encodings to hash.")
                .value_parser(["compressed", "uncompressed", "both"])
                .default_value("both"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("BACKEND")
                .help("Lane backend; auto picks AVX2 when the CPU supports it.")
                .value_parser(["auto", "avx2", "portable"])
                .default_value("auto"),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .value_name("K")
                .help("Cross-check the last K keys of the final batch (at most 8).")
                .value_parser(value_parser!(usize))
                .default_value("5"),
        )
        .arg(
            Arg::new("start-key")
                .long("start-key")
                .value_name("HEX")
                .help("First private key, up to 64 hex digits.")
                .value_parser(parse_start_key),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("T")
                .help("Worker threads; 0 hashes on the main thread.")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the summary as JSON.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeatable.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only print results and errors.")
                .action(ArgAction::SetTrue),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from("hash160-lanes"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let keys = matches
        .remove_one::<i64>("count")
        .or_else(|| matches.remove_one::<i64>("keys"));
    let formats = match matches.get_one::<String>("format").map(String::as_str) {
        Some("compressed") => FormatSelection::Compressed,
        Some("uncompressed") => FormatSelection::Uncompressed,
        _ => FormatSelection::Both,
    };
    let backend = match matches.get_one::<String>("backend").map(String::as_str) {
        Some("avx2") => BackendChoice::Fixed(Backend::Avx2),
        Some("portable") => BackendChoice::Fixed(Backend::Portable),
        _ => BackendChoice::Auto,
    };
    let verify = matches
        .remove_one::<usize>("verify")
        .unwrap_or(DEFAULT_VERIFY);
    let start_key = matches
        .remove_one::<PrivateKey>("start-key")
        .unwrap_or(DEFAULT_START_KEY);
    let threads = matches.remove_one::<usize>("threads").unwrap_or(0);
    let json = matches.get_flag("json");
    let verbosity = Verbosity::from_flags(matches.get_count("verbose"), matches.get_flag("quiet"));

    Ok(ParsedArgs {
        keys,
        formats,
        backend,
        verify,
        start_key,
        threads,
        json,
        verbosity,
    })
}

/// Runs the tool with `arguments` and returns its exit status.
///
/// Help and version requests print to `stdout` and succeed; other parse
/// failures print to `stderr` and return [`EXIT_USAGE`].
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                if write!(stdout, "{error}").is_err() {
                    return EXIT_RUNTIME;
                }
                EXIT_OK
            }
            _ => {
                let _ = write!(stderr, "{error}");
                EXIT_USAGE
            }
        },
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        keys,
        formats,
        backend,
        verify,
        start_key,
        threads,
        json,
        verbosity,
    } = parsed;

    logging::init_tracing(verbosity);
    let chatty = !json && verbosity != Verbosity::Quiet;

    let requested = keys
        .and_then(|count| u64::try_from(count).ok())
        .filter(|&count| count > 0)
        .unwrap_or(DEFAULT_KEYS);
    let total_keys = requested.div_ceil(LANES as u64) * LANES as u64;

    if chatty && write_banner(stdout, requested, total_keys, verify).is_err() {
        return EXIT_RUNTIME;
    }

    let job = Job {
        start: start_key,
        batches: total_keys / LANES as u64,
        formats,
        backend,
        verify,
        threads,
    };

    let started = Instant::now();
    let outcome = match run_job(&job) {
        Ok(outcome) => outcome,
        Err(error) => {
            let _ = writeln!(stderr, "hash160-lanes: {error}");
            return EXIT_RUNTIME;
        }
    };
    let elapsed = started.elapsed();
    logging::trace_dispatch!(backend = %outcome.backend, threads, "pipeline finished");

    let summary = Summary::new(
        total_keys,
        formats.formats().len() as u64,
        elapsed,
        outcome.backend.name(),
        threads,
        outcome.verified,
    );
    logging::trace_stats!(
        keys = summary.keys,
        hashes = summary.hashes,
        seconds = summary.seconds,
        backend = summary.backend,
        "run complete"
    );

    let written = if json {
        summary.write_json(stdout)
    } else {
        summary.write_text(stdout)
    };
    if let Err(error) = written {
        let _ = writeln!(stderr, "hash160-lanes: failed to write report: {error}");
        return EXIT_RUNTIME;
    }

    if summary.all_verified() {
        EXIT_OK
    } else {
        let _ = writeln!(stderr, "hash160-lanes: verification failed");
        EXIT_VERIFY_FAILED
    }
}

fn write_banner<W: Write>(out: &mut W, requested: u64, total: u64, verify: usize) -> io::Result<()> {
    if total != requested {
        writeln!(out, "Adjusting total public keys to be a multiple of {LANES}: {total}")?;
    }
    writeln!(
        out,
        "Starting {total} HASH160 calculations in batches of {LANES}. \
         Results for the last {} public keys will be verified.\n",
        verify.min(LANES)
    )
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
