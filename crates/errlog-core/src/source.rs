//! Source window extraction
//!
//! Reads the lines around a fault line from disk. Files are streamed with a
//! buffered reader and reading stops at the last line of the window, so the
//! cost is bounded by the window position rather than the file size.
//!
//! An unavailable window is not an error for the logger: [`SourceWindowReader::read_window`]
//! logs the reason and returns `None`. [`SourceWindowReader::try_read_window`]
//! exposes the reason to callers that want it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use errlog_core_types::schema::SECTION_SOURCE;
use errlog_core_types::SourceWindow;

use crate::errors::SourceError;
use crate::log_section_skipped;

/// Files larger than this are never cached, only streamed
pub const MAX_CACHED_BYTES: u64 = 1024 * 1024;

/// Extracts bounded line windows from source files
#[derive(Debug, Default)]
pub struct SourceWindowReader {
    cache: Option<SourceCache>,
}

impl SourceWindowReader {
    /// Reader that goes to disk on every call
    pub fn new() -> Self {
        Self { cache: None }
    }

    /// Reader that keeps read-only snapshots of small files
    pub fn cached() -> Self {
        Self {
            cache: Some(SourceCache::default()),
        }
    }

    pub fn cache(&self) -> Option<&SourceCache> {
        self.cache.as_ref()
    }

    /// Window of `before` lines above and `after` lines below `target_line`
    ///
    /// Returns `None` when the file cannot be read or is shorter than
    /// `target_line`.
    pub fn read_window(
        &self,
        path: &Path,
        target_line: u32,
        before: u32,
        after: u32,
    ) -> Option<SourceWindow> {
        match self.try_read_window(path, target_line, before, after) {
            Ok(window) => Some(window),
            Err(err) => {
                log_section_skipped!(
                    SECTION_SOURCE,
                    err.reason(),
                    file = %path.display(),
                    line = target_line
                );
                None
            }
        }
    }

    /// Same as [`SourceWindowReader::read_window`], reporting why a window
    /// is unavailable
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidTargetLine`] for line 0
    /// - [`SourceError::Open`] / [`SourceError::Read`] on I/O failure
    /// - [`SourceError::LineOutOfRange`] if the file ends before `target_line`
    pub fn try_read_window(
        &self,
        path: &Path,
        target_line: u32,
        before: u32,
        after: u32,
    ) -> Result<SourceWindow, SourceError> {
        if target_line == 0 {
            return Err(SourceError::InvalidTargetLine);
        }
        let start = target_line.saturating_sub(before).max(1);
        let end = target_line.saturating_add(after);

        if let Some(cache) = &self.cache {
            if let Some(lines) = cache.lines(path)? {
                return slice_window(path, &lines, target_line, start, end);
            }
        }
        stream_window(path, target_line, start, end)
    }
}

/// Per-process snapshots of source files
///
/// Entries are loaded once and never refreshed; a file edited after it was
/// cached keeps showing its old content.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: RwLock<HashMap<PathBuf, Arc<[String]>>>,
}

impl SourceCache {
    /// Lines of `path`, loaded on first use
    ///
    /// `Ok(None)` means the file is too large to cache.
    fn lines(&self, path: &Path) -> Result<Option<Arc<[String]>>, SourceError> {
        let hit = self
            .files
            .read()
            .ok()
            .and_then(|files| files.get(path).cloned());
        if let Some(lines) = hit {
            return Ok(Some(lines));
        }

        let file = open(path)?;
        let size = file
            .metadata()
            .map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size > MAX_CACHED_BYTES {
            return Ok(None);
        }

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        while let Some(line) = next_line(&mut reader, &mut buf, path)? {
            lines.push(line);
        }
        let lines: Arc<[String]> = lines.into();

        let lines = match self.files.write() {
            Ok(mut files) => files
                .entry(path.to_path_buf())
                .or_insert(lines)
                .clone(),
            Err(_) => lines,
        };
        Ok(Some(lines))
    }

    /// Number of cached files
    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.files.write().map(|mut files| files.clear()).ok();
    }
}

fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Next line without its terminator; invalid UTF-8 is replaced
fn next_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    path: &Path,
) -> Result<Option<String>, SourceError> {
    buf.clear();
    let read = reader
        .read_until(b'\n', buf)
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

fn stream_window(
    path: &Path,
    target_line: u32,
    start: u32,
    end: u32,
) -> Result<SourceWindow, SourceError> {
    let mut reader = BufReader::new(open(path)?);
    let mut buf = Vec::new();
    let mut texts = Vec::new();
    let mut number = 0u32;

    while number < end {
        let Some(line) = next_line(&mut reader, &mut buf, path)? else {
            break;
        };
        number += 1;
        if number >= start {
            texts.push(line);
        }
    }

    build_window(path, target_line, start, number, texts)
}

fn slice_window(
    path: &Path,
    lines: &[String],
    target_line: u32,
    start: u32,
    end: u32,
) -> Result<SourceWindow, SourceError> {
    let last_line = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    let end = end.min(last_line);
    let texts = if start <= end {
        lines[(start - 1) as usize..end as usize].to_vec()
    } else {
        Vec::new()
    };
    build_window(path, target_line, start, last_line, texts)
}

/// `last_read` is the number of the last line seen, which is the file's
/// line count whenever the file ended early
fn build_window(
    path: &Path,
    target_line: u32,
    start: u32,
    last_read: u32,
    texts: Vec<String>,
) -> Result<SourceWindow, SourceError> {
    SourceWindow::new(target_line, start, texts).ok_or_else(|| SourceError::LineOutOfRange {
        path: path.to_path_buf(),
        line: target_line,
        last_line: last_read,
    })
}
