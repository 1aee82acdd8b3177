//! Source windows: bounded slices of a source file around a target line

use std::ops::RangeInclusive;

/// A single line of source text with its absolute 1-based number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: u32,
    pub text: String,
}

/// A contiguous, ascending run of source lines around a target line
///
/// The target line is always part of the window. Construction goes through
/// [`SourceWindow::new`], which enforces both properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow {
    target_line: u32,
    lines: Vec<SourceLine>,
}

impl SourceWindow {
    /// Build a window from the lines starting at `start_line`
    ///
    /// Returns `None` when `start_line` is zero or the lines do not cover
    /// `target_line`.
    pub fn new(target_line: u32, start_line: u32, texts: Vec<String>) -> Option<Self> {
        if start_line == 0 || target_line < start_line {
            return None;
        }
        let end_line = start_line.checked_add(u32::try_from(texts.len()).ok()?)? - 1;
        if target_line > end_line {
            return None;
        }

        let lines = (start_line..=end_line)
            .zip(texts)
            .map(|(number, text)| SourceLine { number, text })
            .collect();

        Some(Self { target_line, lines })
    }

    /// The line the window is centered on
    pub fn target_line(&self) -> u32 {
        self.target_line
    }

    /// First line number in the window
    pub fn start_line(&self) -> u32 {
        self.lines.first().map_or(self.target_line, |l| l.number)
    }

    /// Last line number in the window
    pub fn end_line(&self) -> u32 {
        self.lines.last().map_or(self.target_line, |l| l.number)
    }

    /// Inclusive range of line numbers covered
    pub fn range(&self) -> RangeInclusive<u32> {
        self.start_line()..=self.end_line()
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the target line
    pub fn target_text(&self) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.number == self.target_line)
            .map(|l| l.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_new_numbers_lines_from_start() {
        let window = SourceWindow::new(5, 3, texts(4)).unwrap();
        assert_eq!(window.range(), 3..=6);
        assert_eq!(window.lines()[0].number, 3);
        assert_eq!(window.target_text(), Some("line 3"));
    }

    #[test]
    fn test_new_rejects_target_outside_lines() {
        assert!(SourceWindow::new(9, 3, texts(4)).is_none());
        assert!(SourceWindow::new(2, 3, texts(4)).is_none());
        assert!(SourceWindow::new(1, 0, texts(4)).is_none());
        assert!(SourceWindow::new(1, 1, Vec::new()).is_none());
    }
}
