//! Run summary and its text and JSON renderings.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use crate::verify::Verification;

/// Totals and verification results of one run.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    /// Public keys generated.
    pub keys: u64,
    /// Key encodings hashed per key.
    pub hashes_per_key: u64,
    /// HASH160 digests computed.
    pub hashes: u64,
    /// Wall-clock seconds for generation and hashing.
    pub seconds: f64,
    /// Throughput in HASH160/s.
    pub hashes_per_second: f64,
    /// Backend name.
    pub backend: &'static str,
    /// Worker threads; 0 for the calling thread only.
    pub threads: usize,
    /// Checked keys from the final batch.
    pub verified: Vec<Verification>,
}

impl Summary {
    /// Builds the summary, deriving totals and rates.
    pub fn new(
        keys: u64,
        hashes_per_key: u64,
        elapsed: Duration,
        backend: &'static str,
        threads: usize,
        verified: Vec<Verification>,
    ) -> Self {
        let hashes = keys * hashes_per_key;
        let seconds = elapsed.as_secs_f64();
        let hashes_per_second = if seconds > 0.0 {
            hashes as f64 / seconds
        } else {
            0.0
        };
        Self {
            keys,
            hashes_per_key,
            hashes,
            seconds,
            hashes_per_second,
            backend,
            threads,
            verified,
        }
    }

    /// Whether every verified key matched the reference.
    pub fn all_verified(&self) -> bool {
        self.verified.iter().all(Verification::passed)
    }

    /// Human-readable report.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if !self.verified.is_empty() {
            writeln!(out, "--- Results from the final batch (verification) ---")?;
        }
        for entry in &self.verified {
            writeln!(out, "--- Public key index: {} ---", entry.index)?;
            writeln!(out, "  Private key:              {}", entry.private_key)?;
            for check in &entry.checks {
                writeln!(out, "  HASH160 ({}, lanes):     {}", short(check.format), check.lanes)?;
                writeln!(out, "  HASH160 ({}, reference): {}", short(check.format), check.reference)?;
                if check.ok {
                    writeln!(out, "  ({} verified OK)", short(check.format))?;
                } else {
                    writeln!(out, "  (!!! {} verification FAILED !!!)", short(check.format))?;
                }
            }
            writeln!(out)?;
        }

        writeln!(out, "--- Performance summary ({}) ---", self.backend)?;
        writeln!(out, "Total public keys processed: {}", self.keys)?;
        writeln!(
            out,
            "Total HASH160s computed:     {} ({} per pubkey)",
            self.hashes, self.hashes_per_key
        )?;
        writeln!(out, "Total time:                  {:.4} seconds", self.seconds)?;
        writeln!(out, "Performance:                 {:.2} HASH160s/sec", self.hashes_per_second)?;
        writeln!(
            out,
            "Performance:                 {:.2} Million HASH160s/sec",
            self.hashes_per_second / 1e6
        )
    }

    /// Pretty-printed JSON report followed by a newline.
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}

/// Four-letter column label for a format name.
fn short(format: &str) -> &str {
    match format {
        "compressed" => "comp",
        "uncompressed" => "uncomp",
        other => other,
    }
}
