//! Output sinks
//!
//! Every byte a logger produces goes through a [`Sink`]. The trait is the
//! shape of a print/println pair: `emit` takes preformatted arguments and
//! `emit_line` takes raw text. Both terminate the line themselves.
//!
//! A whole report is handed over through [`Sink::emit_report`]. The sinks in
//! this module override it so a report is written under a single lock and
//! lines of concurrent reports never interleave.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use errlog_core_types::schema::{EVENT_REPORT, TARGET};
use tracing::Level;

use crate::format::{Report, ReportLine};

/// Destination for rendered report text
pub trait Sink: Send + Sync {
    /// Emit one formatted line
    fn emit(&self, args: fmt::Arguments<'_>);

    /// Emit one raw line
    fn emit_line(&self, line: &str);

    /// Emit a full report
    ///
    /// Formatted sections go through [`Sink::emit`], stack trace lines
    /// through [`Sink::emit_line`]. Sinks shared between threads should
    /// override this to serialize whole reports.
    fn emit_report(&self, report: &Report) {
        for line in report.lines() {
            match line {
                ReportLine::Text(text) => self.emit(format_args!("{}", text)),
                ReportLine::Raw(text) => self.emit_line(text),
            }
        }
    }

    /// Flush buffered output, called before the process exits
    fn flush(&self) {}
}

/// Writes reports to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn emit(&self, args: fmt::Arguments<'_>) {
        let _ = writeln!(io::stderr().lock(), "{}", args);
    }

    fn emit_line(&self, line: &str) {
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }

    fn emit_report(&self, report: &Report) {
        let mut stderr = io::stderr().lock();
        for line in report.lines() {
            if writeln!(stderr, "{}", line.text()).is_err() {
                return;
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Forwards reports to the active `tracing` subscriber
///
/// Each report becomes a single event on the `errlog` target, carrying the
/// full text as its message.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::ERROR)
    }
}

macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!(target: TARGET, $($arg)+),
            Level::WARN => tracing::warn!(target: TARGET, $($arg)+),
            Level::INFO => tracing::info!(target: TARGET, $($arg)+),
            Level::DEBUG => tracing::debug!(target: TARGET, $($arg)+),
            _ => tracing::trace!(target: TARGET, $($arg)+),
        }
    };
}

impl Sink for TracingSink {
    fn emit(&self, args: fmt::Arguments<'_>) {
        event_at!(self.level, event = EVENT_REPORT, "{}", args);
    }

    fn emit_line(&self, line: &str) {
        event_at!(self.level, event = EVENT_REPORT, "{}", line);
    }

    fn emit_report(&self, report: &Report) {
        let text = report.to_string();
        event_at!(
            self.level,
            event = EVENT_REPORT,
            lines = report.len(),
            "{}",
            text
        );
    }
}

/// In-memory sink, mostly for tests and for capturing reports in tooling
///
/// Clones share the same buffer. Each `emit_report` call is stored as one
/// entry so callers can check that reports stay contiguous.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, lines: Vec<String>) {
        self.entries
            .lock()
            .map(|mut entries| entries.push(lines))
            .ok();
    }

    /// All emitted lines in order
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Emitted text joined with newlines
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    /// One entry per `emit_report` call (single `emit`s form their own entry)
    pub fn reports(&self) -> Vec<Vec<String>> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.is_empty())
            .unwrap_or(true)
    }

    pub fn clear(&self) {
        self.entries.lock().map(|mut e| e.clear()).ok();
    }
}

impl Sink for MemorySink {
    fn emit(&self, args: fmt::Arguments<'_>) {
        self.push(vec![args.to_string()]);
    }

    fn emit_line(&self, line: &str) {
        self.push(vec![line.to_string()]);
    }

    fn emit_report(&self, report: &Report) {
        self.push(report.lines().iter().map(|l| l.text().to_string()).collect());
    }
}

/// Sink built from a pair of closures, one per operation
///
/// Closures are called line by line; serializing concurrent reports is up to
/// them.
pub struct FnSink<E, L> {
    emit: E,
    emit_line: L,
}

impl<E, L> FnSink<E, L>
where
    E: Fn(fmt::Arguments<'_>) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    pub fn new(emit: E, emit_line: L) -> Self {
        Self { emit, emit_line }
    }
}

impl<E, L> Sink for FnSink<E, L>
where
    E: Fn(fmt::Arguments<'_>) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    fn emit(&self, args: fmt::Arguments<'_>) {
        (self.emit)(args)
    }

    fn emit_line(&self, line: &str) {
        (self.emit_line)(line)
    }
}

impl<E, L> fmt::Debug for FnSink<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}
