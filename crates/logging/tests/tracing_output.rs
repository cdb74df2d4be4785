//! Integration tests for subscriber filtering and the target-scoped macros.

use std::io;
use std::sync::{Arc, Mutex};

use logging::{Verbosity, build_subscriber, trace_batch, trace_keys, trace_stats, trace_verify};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture(verbosity: Verbosity, emit: impl FnOnce()) -> String {
    let sink = Captured::default();
    let subscriber = build_subscriber(verbosity, sink.clone());
    tracing::subscriber::with_default(subscriber, emit);
    sink.text()
}

fn emit_all() {
    trace_batch!(batch = 3, "batch event");
    trace_verify!("verify event");
    trace_keys!("keys event");
    trace_stats!("stats event");
}

#[test]
fn normal_verbosity_hides_info() {
    let out = capture(Verbosity::Normal, emit_all);
    assert!(out.is_empty(), "unexpected output: {out}");
}

#[test]
fn verbose_shows_info_targets_only() {
    let out = capture(Verbosity::Verbose, emit_all);
    assert!(out.contains("verify event"));
    assert!(out.contains("stats event"));
    assert!(!out.contains("batch event"));
    assert!(!out.contains("keys event"));
}

#[test]
fn debug_adds_batch_events_with_fields() {
    let out = capture(Verbosity::Debug, emit_all);
    assert!(out.contains("hash160::batch"));
    assert!(out.contains("batch=3"));
    assert!(!out.contains("keys event"));
}

#[test]
fn trace_shows_everything() {
    let out = capture(Verbosity::Trace, emit_all);
    for needle in ["batch event", "verify event", "keys event", "stats event"] {
        assert!(out.contains(needle), "missing {needle} in {out}");
    }
}

#[test]
fn quiet_still_reports_errors() {
    let out = capture(Verbosity::Quiet, || {
        tracing::error!(target: "hash160::verify", "mismatch");
        trace_verify!("hidden");
    });
    assert!(out.contains("mismatch"));
    assert!(!out.contains("hidden"));
}

#[test]
fn second_global_init_is_rejected() {
    let _ = logging::init_tracing(Verbosity::Quiet);
    assert!(!logging::init_tracing(Verbosity::Trace));
}
