//! errlog Core - context-capturing diagnostic logger
//!
//! Reports an error together with where it was observed:
//! - the call site (file, line, enclosing function) resolved from the stack
//! - a window of source lines around that call site, read from disk
//! - optionally the error's cause chain and the full stack trace
//!
//! Output goes through a pluggable [`Sink`]. Everything degrades
//! gracefully: a missing source file or unresolvable frame shortens the
//! report, it never fails the caller.
//!
//! ```no_run
//! # fn fetch() -> std::io::Result<()> { Ok(()) }
//! let res = fetch();
//! if errlog_core::debugx(res.as_ref().err(), "fetching upstream") {
//!     return;
//! }
//! ```

pub mod config;
pub mod errors;
pub mod format;
pub mod logger;
pub mod logging_facility;
pub mod sink;
pub mod source;
pub mod stack;

pub use errlog_core_types as types;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use errors::{ConfigError, Result, SourceError};
pub use format::{Formatter, Report, ReportLine};
pub use logger::{debug, debugx, default_logger, report, Logger, ResultExt};
pub use sink::{FnSink, MemorySink, Sink, StderrSink, TracingSink};
pub use source::SourceWindowReader;
pub use stack::{BacktraceWalker, NullWalker, StackWalker, MAX_TRACE_DEPTH};
pub use types::{SourceWindow, StackFrame};
