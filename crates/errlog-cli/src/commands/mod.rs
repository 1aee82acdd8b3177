//! CLI command implementations

pub mod demo;
pub mod window;

/// Failures surfaced to the user by a command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Source(#[from] errlog_core::SourceError),

    #[error(transparent)]
    Config(#[from] errlog_core::ConfigError),
}
