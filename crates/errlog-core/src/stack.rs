//! Call stack capture
//!
//! [`StackWalker`] is the seam between the logger and the platform's stack
//! introspection. [`BacktraceWalker`] implements it on top of the
//! `backtrace` crate.
//!
//! # Skip accounting
//!
//! `skip` counts frames above the caller of the walker: `capture_frame(0)`
//! resolves the function that called `capture_frame`, `capture_frame(1)` its
//! caller, and so on. Functions inlined by the optimizer still count, as
//! long as debug info describes them.

use std::path::PathBuf;

use errlog_core_types::frame::UNKNOWN_FUNCTION;
use errlog_core_types::StackFrame;

/// Upper bound on frames collected for a full trace
pub const MAX_TRACE_DEPTH: usize = 64;

/// Captures frames of the current call stack
pub trait StackWalker: Send + Sync {
    /// First resolvable frame, starting `skip` frames above the caller
    ///
    /// Returns `None` when symbol information is unavailable.
    fn capture_frame(&self, skip: usize) -> Option<StackFrame>;

    /// Resolvable frames from the same starting point, outermost last
    ///
    /// At most [`MAX_TRACE_DEPTH`] frames are returned.
    fn capture_full_trace(&self, skip: usize) -> Vec<StackFrame>;
}

/// Whether a demangled symbol name is `BacktraceWalker::walk`
///
/// Legacy and v0 manglings render the path differently
/// (`a::BacktraceWalker::walk` vs `<a::BacktraceWalker>::walk`).
fn is_entry(name: &str) -> bool {
    name.ends_with("::walk") && name.contains("BacktraceWalker")
}

/// [`StackWalker`] backed by the `backtrace` crate
///
/// Frames without a file name or line number (runtime glue, stripped
/// libraries) are passed over but still count towards `skip`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceWalker;

#[derive(Debug, Clone, Copy)]
enum WalkState {
    /// Still inside the backtrace machinery
    Searching,
    /// Past our own entry point, dropping this many more frames
    Skipping(usize),
    Collecting,
}

impl BacktraceWalker {
    pub fn new() -> Self {
        Self
    }

    /// Collect up to `limit` resolvable frames, discarding the frame of the
    /// public method that called us plus `skip` more
    #[inline(never)]
    fn walk(&self, skip: usize, limit: usize) -> Vec<StackFrame> {
        let mut frames = Vec::new();
        let mut state = WalkState::Searching;

        backtrace::trace(|raw| {
            backtrace::resolve_frame(raw, |symbol| {
                if frames.len() >= limit {
                    return;
                }
                let name = symbol.name().map(|n| format!("{:#}", n));

                state = match state {
                    WalkState::Searching => {
                        if name.as_deref().is_some_and(is_entry) {
                            WalkState::Skipping(skip + 1)
                        } else {
                            WalkState::Searching
                        }
                    }
                    WalkState::Skipping(n) if n > 0 => WalkState::Skipping(n - 1),
                    WalkState::Skipping(_) | WalkState::Collecting => {
                        if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                            frames.push(StackFrame::new(
                                PathBuf::from(file),
                                line,
                                name.unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
                            ));
                        }
                        WalkState::Collecting
                    }
                };
            });
            frames.len() < limit
        });

        frames
    }
}

impl StackWalker for BacktraceWalker {
    #[inline(never)]
    fn capture_frame(&self, skip: usize) -> Option<StackFrame> {
        self.walk(skip, 1).into_iter().next()
    }

    #[inline(never)]
    fn capture_full_trace(&self, skip: usize) -> Vec<StackFrame> {
        self.walk(skip, MAX_TRACE_DEPTH)
    }
}

/// Walker that never resolves anything
///
/// Useful where stack walking is too expensive or symbols are known to be
/// missing; the logger then falls back to the `#[track_caller]` location.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWalker;

impl StackWalker for NullWalker {
    fn capture_frame(&self, _skip: usize) -> Option<StackFrame> {
        None
    }

    fn capture_full_trace(&self, _skip: usize) -> Vec<StackFrame> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn probe_frame() -> (Option<StackFrame>, u32) {
        let line = line!() + 1;
        let frame = BacktraceWalker::new().capture_frame(0);
        (frame, line)
    }

    #[inline(never)]
    fn probe_parent() -> Option<StackFrame> {
        // keeps this frame out of tail position
        let frame = BacktraceWalker::new().capture_frame(1);
        std::hint::black_box(frame)
    }

    #[test]
    fn test_capture_frame_zero_is_direct_caller() {
        let (frame, line) = probe_frame();
        let frame = frame.expect("test builds carry debug info");

        assert!(frame.function().ends_with("probe_frame"), "got {}", frame);
        assert_eq!(frame.line(), line);
        assert!(frame.file_path().ends_with("stack.rs"), "got {}", frame);
    }

    #[test]
    fn test_capture_frame_skip_moves_up_one_caller() {
        let line = line!() + 1;
        let frame = probe_parent().expect("test builds carry debug info");

        assert!(
            frame
                .function()
                .ends_with("test_capture_frame_skip_moves_up_one_caller"),
            "got {}",
            frame
        );
        assert_eq!(frame.line(), line);
    }

    #[test]
    fn test_full_trace_starts_at_caller_and_is_bounded() {
        let trace = BacktraceWalker::new().capture_full_trace(0);

        assert!(!trace.is_empty());
        assert!(trace.len() <= MAX_TRACE_DEPTH);
        assert!(
            trace[0]
                .function()
                .ends_with("test_full_trace_starts_at_caller_and_is_bounded"),
            "got {}",
            trace[0]
        );
        assert!(trace.iter().all(|f| !f.function().contains("BacktraceWalker")));
    }

    #[test]
    fn test_deep_recursion_is_bounded() {
        fn recurse(depth: usize) -> Vec<StackFrame> {
            if depth == 0 {
                BacktraceWalker::new().capture_full_trace(0)
            } else {
                let trace = recurse(depth - 1);
                std::hint::black_box(trace)
            }
        }

        let trace = recurse(MAX_TRACE_DEPTH * 2);
        assert_eq!(trace.len(), MAX_TRACE_DEPTH);
    }

    #[test]
    fn test_is_entry_accepts_both_manglings() {
        assert!(is_entry("errlog_core::stack::BacktraceWalker::walk"));
        assert!(is_entry("<errlog_core::stack::BacktraceWalker>::walk"));
        assert!(!is_entry("errlog_core::stack::BacktraceWalker::walk::{{closure}}"));
        assert!(!is_entry("app::walk"));
    }

    #[test]
    fn test_null_walker_resolves_nothing() {
        assert!(NullWalker.capture_frame(0).is_none());
        assert!(NullWalker.capture_full_trace(0).is_empty());
    }
}
