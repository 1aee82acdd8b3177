//! Resolved call stack frames

use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder used when a frame's enclosing function cannot be named
pub const UNKNOWN_FUNCTION: &str = "<unknown>";

/// One resolved entry of a call stack
///
/// Line numbers are 1-based, matching the convention of compiler-reported
/// locations and of [`crate::SourceWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    file_path: PathBuf,
    line: u32,
    function: String,
}

impl StackFrame {
    /// Create a frame from its resolved parts
    ///
    /// A zero line is clamped to 1 so the frame always names a real line.
    pub fn new(file_path: impl Into<PathBuf>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line: line.max(1),
            function: function.into(),
        }
    }

    /// Create a frame whose enclosing function is not known
    pub fn without_function(file_path: impl Into<PathBuf>, line: u32) -> Self {
        Self::new(file_path, line, UNKNOWN_FUNCTION)
    }

    /// Source file path as reported by the stack walker
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 1-based line number
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Enclosing function name
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Whether the enclosing function name was resolved
    pub fn has_function(&self) -> bool {
        self.function != UNKNOWN_FUNCTION
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} in {}",
            self.file_path.display(),
            self.line,
            self.function
        )
    }
}
