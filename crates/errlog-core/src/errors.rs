use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the settings loaders
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a source window could not be produced
///
/// These never escape a report operation: the reader turns them into an
/// absent window and the report just loses its source section.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be opened (missing, permissions, stripped tree)
    #[error("cannot open source file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part way through the file
    #[error("cannot read source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Line numbers are 1-based
    #[error("target line must be at least 1")]
    InvalidTargetLine,

    /// The file ends before the target line
    #[error("line {line} is past the end of {} ({last_line} lines)", path.display())]
    LineOutOfRange {
        path: PathBuf,
        line: u32,
        last_line: u32,
    },
}

impl SourceError {
    /// Short stable name of the failure, used as the `reason` log field
    pub fn reason(&self) -> &'static str {
        match self {
            SourceError::Open { .. } => "open_failed",
            SourceError::Read { .. } => "read_failed",
            SourceError::InvalidTargetLine => "invalid_target_line",
            SourceError::LineOutOfRange { .. } => "line_out_of_range",
        }
    }
}

/// Errors raised while loading logger settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("cannot read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings text is not valid TOML or has unknown keys
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML
    #[error("cannot render settings: {0}")]
    Render(#[from] toml::ser::Error),

    /// An `ERRLOG_*` variable holds a value of the wrong type
    #[error("invalid value {value:?} for environment variable {key}")]
    InvalidEnv { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_reasons_are_distinct() {
        let errors = [
            SourceError::Open {
                path: "a.rs".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            SourceError::Read {
                path: "a.rs".into(),
                source: std::io::Error::from(std::io::ErrorKind::InvalidData),
            },
            SourceError::InvalidTargetLine,
            SourceError::LineOutOfRange {
                path: "a.rs".into(),
                line: 9,
                last_line: 3,
            },
        ];
        let mut reasons: Vec<_> = errors.iter().map(SourceError::reason).collect();
        reasons.sort_unstable();
        reasons.dedup();
        assert_eq!(reasons.len(), errors.len());
    }

    #[test]
    fn test_out_of_range_message() {
        let err = SourceError::LineOutOfRange {
            path: "lib.rs".into(),
            line: 12,
            last_line: 10,
        };
        assert_eq!(
            err.to_string(),
            "line 12 is past the end of lib.rs (10 lines)"
        );
    }

    #[test]
    fn test_invalid_env_message() {
        let err = ConfigError::InvalidEnv {
            key: "ERRLOG_LINES_BEFORE".to_string(),
            value: "many".to_string(),
        };
        assert!(err.to_string().contains("ERRLOG_LINES_BEFORE"));
        assert!(err.to_string().contains("\"many\""));
    }
}
