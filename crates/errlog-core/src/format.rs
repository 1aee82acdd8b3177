//! Report rendering
//!
//! The [`Formatter`] turns the captured context of one call into a
//! [`Report`]: an ordered list of lines, ready to be handed to a sink.
//!
//! Sections, in order, each independently optional:
//!
//! 1. `error: ...` and its `caused by: ...` chain
//! 2. `message: ...`
//! 3. `at <file>:<line> in <function>`
//! 4. the numbered source window, target line marked with `>`
//! 5. `stack trace:` with one entry per frame

use std::error::Error;
use std::fmt;

use errlog_core_types::schema::{SECTION_LOCATION, SECTION_SOURCE, SECTION_STACK};
use errlog_core_types::{SourceWindow, StackFrame};

use crate::config::Config;
use crate::log_section_skipped;
use crate::sink::Sink;

/// One rendered line of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Formatted section text, emitted through `Sink::emit`
    Text(String),
    /// Raw stack trace text, emitted through `Sink::emit_line`
    Raw(String),
}

impl ReportLine {
    pub fn text(&self) -> &str {
        match self {
            ReportLine::Text(text) | ReportLine::Raw(text) => text,
        }
    }
}

/// A fully rendered report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.lines.push(ReportLine::Text(text.into()));
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.lines.push(ReportLine::Raw(text.into()));
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line.text())?;
        }
        Ok(())
    }
}

/// Display text of an error and of every error in its `source()` chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSummary {
    pub message: String,
    pub causes: Vec<String>,
}

impl ErrorSummary {
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut causes = Vec::new();
        let mut next = err.source();
        while let Some(cause) = next {
            causes.push(cause.to_string());
            next = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}

/// Everything captured for one report
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportContext<'a> {
    pub error: Option<&'a ErrorSummary>,
    pub message: Option<&'a str>,
    pub frame: Option<&'a StackFrame>,
    pub window: Option<&'a SourceWindow>,
    pub trace: Option<&'a [StackFrame]>,
}

/// Renders report sections according to a [`Config`]
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    config: &'a Config,
}

impl<'a> Formatter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render the context into a report
    ///
    /// Missing inputs only remove their own section.
    pub fn render(&self, ctx: &ReportContext<'_>) -> Report {
        let mut report = Report::default();

        if self.config.print_error() {
            if let Some(error) = ctx.error {
                report.push_text(format!("error: {}", error.message));
                if self.config.print_causes() {
                    for cause in &error.causes {
                        report.push_text(format!("  caused by: {}", cause));
                    }
                }
            }
        }

        if let Some(message) = ctx.message.filter(|m| !m.is_empty()) {
            report.push_text(format!("message: {}", message));
        }

        if self.config.print_source() {
            match ctx.frame {
                Some(frame) => report.push_text(format!(
                    "at {}:{} in {}",
                    frame.file_path().display(),
                    frame.line(),
                    frame.function()
                )),
                None => log_section_skipped!(SECTION_LOCATION, "frame_unresolved"),
            }

            match ctx.window {
                Some(window) => {
                    for line in render_window(window) {
                        report.push_text(line);
                    }
                }
                None => log_section_skipped!(SECTION_SOURCE, "window_unavailable"),
            }
        }

        if self.config.print_stack() {
            match ctx.trace.filter(|t| !t.is_empty()) {
                Some(trace) => {
                    let depth = trace.len().min(self.config.max_stack_depth());
                    report.push_raw("stack trace:");
                    for (i, frame) in trace[..depth].iter().enumerate() {
                        report.push_raw(format!("{:>4}: {}", i, frame.function()));
                        report.push_raw(format!(
                            "        at {}:{}",
                            frame.file_path().display(),
                            frame.line()
                        ));
                    }
                }
                None => log_section_skipped!(SECTION_STACK, "trace_unavailable"),
            }
        }

        report
    }

    /// Hand a rendered report to the sink
    pub fn emit(&self, report: &Report, sink: &dyn Sink) {
        if !report.is_empty() {
            sink.emit_report(report);
        }
    }

    /// Render and emit through the configured sink
    pub fn render_to(&self, ctx: &ReportContext<'_>) -> Report {
        let report = self.render(ctx);
        self.emit(&report, self.config.sink());
        report
    }
}

/// Number and mark the lines of a window
///
/// Numbers are right-aligned to the widest one in the window; the target
/// line is prefixed with `>`.
pub fn render_window(window: &SourceWindow) -> Vec<String> {
    let width = window.end_line().to_string().len();
    window
        .lines()
        .iter()
        .map(|line| {
            let marker = if line.number == window.target_line() {
                '>'
            } else {
                ' '
            };
            format!("{} {:>width$} | {}", marker, line.number, line.text, width = width)
                .trim_end()
                .to_string()
        })
        .collect()
}
