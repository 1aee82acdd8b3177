//! The logger: gating, context capture and emission
//!
//! Three operations share one pipeline and differ only in gating and exit
//! behavior:
//!
//! | operation | `None` error | exits when `exit_on_success` |
//! |---|---|---|
//! | [`Logger::report`] | still renders | no |
//! | [`Logger::debug`] | no-op | yes |
//! | [`Logger::debugx`] | no-op, returns `false` | yes |
//!
//! Every public entry point reaches `Logger::observe` in exactly one call.
//! The stack walk happens directly inside `observe`, so the origin frame is
//! always [`ORIGIN_SKIP`] frames above the walker's caller.

use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

use errlog_core_types::schema::{EVENT_ENV_IGNORED, EVENT_EXIT, TARGET};
use errlog_core_types::StackFrame;

use crate::config::{Config, Settings};
use crate::format::{ErrorSummary, Formatter, ReportContext};
use crate::log_report_emitted;
use crate::sink::StderrSink;
use crate::source::SourceWindowReader;
use crate::stack::{BacktraceWalker, StackWalker};

/// Frames between the walker's caller and the application call site:
/// `observe` itself and the public entry point
pub const ORIGIN_SKIP: usize = 2;

/// Process exit code used by `exit_on_success`
pub const EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Report,
    Debug,
    Debugx,
}

impl Op {
    fn name(&self) -> &'static str {
        match self {
            Op::Report => "report",
            Op::Debug => "debug",
            Op::Debugx => "debugx",
        }
    }

    /// Gated operations do nothing without an error and may exit afterwards
    fn is_gated(&self) -> bool {
        !matches!(self, Op::Report)
    }
}

/// Diagnostic logger owning one immutable [`Config`]
///
/// Safe to share between threads; the only internal state is the optional
/// source cache, which is behind a lock.
pub struct Logger {
    config: Config,
    walker: Arc<dyn StackWalker>,
    reader: SourceWindowReader,
}

impl Logger {
    pub fn new(config: Config) -> Self {
        Self::with_walker(config, Arc::new(BacktraceWalker::new()))
    }

    /// Logger with a custom stack walker
    pub fn with_walker(config: Config, walker: Arc<dyn StackWalker>) -> Self {
        let reader = if config.cache_sources() {
            SourceWindowReader::cached()
        } else {
            SourceWindowReader::new()
        };
        Self {
            config,
            walker,
            reader,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_reader(&self) -> &SourceWindowReader {
        &self.reader
    }

    /// Render a report for `err`, or just the call-site context if `None`
    #[track_caller]
    pub fn report<E>(&self, err: Option<&E>)
    where
        E: Error + ?Sized,
    {
        self.observe(Op::Report, err, None, Location::caller());
    }

    /// Report `err` if present; exit afterwards when `exit_on_success` is set
    #[track_caller]
    pub fn debug<E>(&self, err: Option<&E>)
    where
        E: Error + ?Sized,
    {
        self.observe(Op::Debug, err, None, Location::caller());
    }

    /// Report `err` with a message if present, returning whether it was
    ///
    /// Meant to be used as a guard:
    ///
    /// ```no_run
    /// # use errlog_core::{Config, Logger};
    /// # fn load() -> std::io::Result<String> { Ok(String::new()) }
    /// let logger = Logger::new(Config::default());
    /// let res = load();
    /// if logger.debugx(res.as_ref().err(), "loading settings") {
    ///     return;
    /// }
    /// ```
    #[track_caller]
    pub fn debugx<E>(&self, err: Option<&E>, message: &str) -> bool
    where
        E: Error + ?Sized,
    {
        self.observe(Op::Debugx, err, Some(message), Location::caller())
    }

    /// Shared pipeline of every entry point
    ///
    /// Must be called directly by the public entry point, and must call the
    /// walker directly, for [`ORIGIN_SKIP`] to hold.
    #[inline(never)]
    pub(crate) fn observe<E>(
        &self,
        op: Op,
        err: Option<&E>,
        message: Option<&str>,
        caller: &'static Location<'static>,
    ) -> bool
    where
        E: Error + ?Sized,
    {
        if op.is_gated() && err.is_none() {
            return false;
        }

        let frame = if self.config.print_source() {
            self.walker
                .capture_frame(ORIGIN_SKIP)
                .or_else(|| Some(StackFrame::without_function(caller.file(), caller.line())))
        } else {
            None
        };
        let trace = if self.config.print_stack() {
            Some(self.walker.capture_full_trace(ORIGIN_SKIP))
        } else {
            None
        };

        let window = frame.as_ref().and_then(|frame| {
            self.reader.read_window(
                frame.file_path(),
                frame.line(),
                self.config.lines_before(),
                self.config.lines_after(),
            )
        });
        let summary = err.map(ErrorSummary::from_error);

        let report = Formatter::new(&self.config).render_to(&ReportContext {
            error: summary.as_ref(),
            message,
            frame: frame.as_ref(),
            window: window.as_ref(),
            trace: trace.as_deref(),
        });
        log_report_emitted!(op.name(), lines = report.len());

        if op.is_gated() && self.config.exit_on_success() {
            self.exit();
        }
        err.is_some()
    }

    fn exit(&self) -> ! {
        tracing::debug!(
            target: TARGET,
            component = module_path!(),
            event = EVENT_EXIT,
            code = EXIT_CODE,
        );
        self.config.sink().flush();
        std::process::exit(EXIT_CODE)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .field("reader", &self.reader)
            .finish_non_exhaustive()
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger, built on first use
///
/// Uses the default [`Settings`] with `ERRLOG_*` environment overrides and
/// writes to standard error. Invalid overrides are ignored with a warning.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| {
        let settings = Settings::from_env().unwrap_or_else(|err| {
            tracing::warn!(
                target: TARGET,
                component = module_path!(),
                event = EVENT_ENV_IGNORED,
                error = %err,
                "ignoring errlog environment overrides"
            );
            Settings::default()
        });
        Logger::new(Config::from_settings(settings, Arc::new(StderrSink)))
    })
}

/// [`Logger::report`] on the default logger
#[track_caller]
pub fn report<E>(err: Option<&E>)
where
    E: Error + ?Sized,
{
    default_logger().observe(Op::Report, err, None, Location::caller());
}

/// [`Logger::debug`] on the default logger
#[track_caller]
pub fn debug<E>(err: Option<&E>)
where
    E: Error + ?Sized,
{
    default_logger().observe(Op::Debug, err, None, Location::caller());
}

/// [`Logger::debugx`] on the default logger
#[track_caller]
pub fn debugx<E>(err: Option<&E>, message: &str) -> bool
where
    E: Error + ?Sized,
{
    default_logger().observe(Op::Debugx, err, Some(message), Location::caller())
}

/// Report the error of a `Result` through the default logger
///
/// ```no_run
/// use errlog_core::ResultExt;
///
/// let res = std::fs::read_to_string("settings.toml");
/// if res.debugx("reading settings") {
///     return;
/// }
/// ```
pub trait ResultExt {
    /// [`debug`] on the `Err` value, if any
    fn debug_err(&self);

    /// [`debugx`] on the `Err` value, if any
    fn debugx(&self, message: &str) -> bool;
}

impl<T, E> ResultExt for Result<T, E>
where
    E: Error,
{
    #[track_caller]
    fn debug_err(&self) {
        default_logger().observe(Op::Debug, self.as_ref().err(), None, Location::caller());
    }

    #[track_caller]
    fn debugx(&self, message: &str) -> bool {
        default_logger().observe(Op::Debugx, self.as_ref().err(), Some(message), Location::caller())
    }
}
