//! Logger configuration
//!
//! A [`Config`] is the immutable set of options a [`crate::Logger`] runs
//! with: the output sink plus the data-only [`Settings`]. Builder methods
//! consume the value and return a new one, so a config can be shared freely
//! once it is handed to a logger.
//!
//! Settings can also be loaded from TOML and from `ERRLOG_*` environment
//! variables:
//!
//! ```
//! use errlog_core::config::Settings;
//!
//! let settings = Settings::from_toml_str("lines_before = 2\nprint_stack = true").unwrap();
//! assert_eq!(settings.lines_before, 2);
//! assert!(settings.print_stack);
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};
use crate::sink::{Sink, StderrSink};
use crate::stack::MAX_TRACE_DEPTH;

pub const DEFAULT_LINES_BEFORE: u32 = 4;
pub const DEFAULT_LINES_AFTER: u32 = 2;

pub const ENV_LINES_BEFORE: &str = "ERRLOG_LINES_BEFORE";
pub const ENV_LINES_AFTER: &str = "ERRLOG_LINES_AFTER";
pub const ENV_PRINT_STACK: &str = "ERRLOG_PRINT_STACK";
pub const ENV_PRINT_SOURCE: &str = "ERRLOG_PRINT_SOURCE";
pub const ENV_PRINT_ERROR: &str = "ERRLOG_PRINT_ERROR";
pub const ENV_PRINT_CAUSES: &str = "ERRLOG_PRINT_CAUSES";
pub const ENV_EXIT_ON_SUCCESS: &str = "ERRLOG_EXIT_ON_SUCCESS";
pub const ENV_CACHE_SOURCES: &str = "ERRLOG_CACHE_SOURCES";
pub const ENV_MAX_STACK_DEPTH: &str = "ERRLOG_MAX_STACK_DEPTH";

/// Data part of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Source lines shown before the fault line
    pub lines_before: u32,
    /// Source lines shown after the fault line
    pub lines_after: u32,
    /// Append the full stack trace
    pub print_stack: bool,
    /// Show the call site and the source window
    pub print_source: bool,
    /// Show the error's message
    pub print_error: bool,
    /// Follow the error's `source()` chain
    pub print_causes: bool,
    /// Terminate the process after a gated report
    pub exit_on_success: bool,
    /// Keep read-only snapshots of source files between calls
    pub cache_sources: bool,
    /// Frames shown in the stack section, at most 64
    pub max_stack_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lines_before: DEFAULT_LINES_BEFORE,
            lines_after: DEFAULT_LINES_AFTER,
            print_stack: false,
            print_source: true,
            print_error: true,
            print_causes: true,
            exit_on_success: false,
            cache_sources: false,
            max_stack_depth: MAX_TRACE_DEPTH,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed text or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Render as TOML, in the format [`Settings::from_toml_str`] reads
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Read and parse a TOML settings file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults overridden by the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ERRLOG_*` overrides obtained through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for the first variable that does
    /// not parse; nothing is applied in that case.
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self;
        override_with(&lookup, ENV_LINES_BEFORE, &mut next.lines_before, parse_number)?;
        override_with(&lookup, ENV_LINES_AFTER, &mut next.lines_after, parse_number)?;
        override_with(&lookup, ENV_PRINT_STACK, &mut next.print_stack, parse_flag)?;
        override_with(&lookup, ENV_PRINT_SOURCE, &mut next.print_source, parse_flag)?;
        override_with(&lookup, ENV_PRINT_ERROR, &mut next.print_error, parse_flag)?;
        override_with(&lookup, ENV_PRINT_CAUSES, &mut next.print_causes, parse_flag)?;
        override_with(&lookup, ENV_EXIT_ON_SUCCESS, &mut next.exit_on_success, parse_flag)?;
        override_with(&lookup, ENV_CACHE_SOURCES, &mut next.cache_sources, parse_flag)?;
        override_with(&lookup, ENV_MAX_STACK_DEPTH, &mut next.max_stack_depth, parse_number)?;
        Ok(next)
    }
}

fn override_with<F, T>(
    lookup: &F,
    key: &str,
    slot: &mut T,
    parse: fn(&str) -> Option<T>,
) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        *slot = parse(value.trim()).ok_or_else(|| ConfigError::InvalidEnv {
            key: key.to_string(),
            value,
        })?;
    }
    Ok(())
}

fn parse_number<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Immutable logger configuration
#[derive(Clone)]
pub struct Config {
    sink: Arc<dyn Sink>,
    settings: Settings,
}

impl Config {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self::from_settings(Settings::default(), sink)
    }

    pub fn from_settings(settings: Settings, sink: Arc<dyn Sink>) -> Self {
        Self { sink, settings }
    }

    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_lines_before(mut self, lines: u32) -> Self {
        self.settings.lines_before = lines;
        self
    }

    pub fn with_lines_after(mut self, lines: u32) -> Self {
        self.settings.lines_after = lines;
        self
    }

    pub fn with_print_stack(mut self, enabled: bool) -> Self {
        self.settings.print_stack = enabled;
        self
    }

    pub fn with_print_source(mut self, enabled: bool) -> Self {
        self.settings.print_source = enabled;
        self
    }

    pub fn with_print_error(mut self, enabled: bool) -> Self {
        self.settings.print_error = enabled;
        self
    }

    pub fn with_print_causes(mut self, enabled: bool) -> Self {
        self.settings.print_causes = enabled;
        self
    }

    pub fn with_exit_on_success(mut self, enabled: bool) -> Self {
        self.settings.exit_on_success = enabled;
        self
    }

    pub fn with_cache_sources(mut self, enabled: bool) -> Self {
        self.settings.cache_sources = enabled;
        self
    }

    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.settings.max_stack_depth = depth;
        self
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn lines_before(&self) -> u32 {
        self.settings.lines_before
    }

    pub fn lines_after(&self) -> u32 {
        self.settings.lines_after
    }

    pub fn print_stack(&self) -> bool {
        self.settings.print_stack
    }

    pub fn print_source(&self) -> bool {
        self.settings.print_source
    }

    pub fn print_error(&self) -> bool {
        self.settings.print_error
    }

    pub fn print_causes(&self) -> bool {
        self.settings.print_causes
    }

    pub fn exit_on_success(&self) -> bool {
        self.settings.exit_on_success
    }

    pub fn cache_sources(&self) -> bool {
        self.settings.cache_sources
    }

    /// Stack section depth, clamped to `1..=MAX_TRACE_DEPTH`
    pub fn max_stack_depth(&self) -> usize {
        self.settings.max_stack_depth.clamp(1, MAX_TRACE_DEPTH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Arc::new(StderrSink))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
