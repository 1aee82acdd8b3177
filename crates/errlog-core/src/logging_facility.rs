//! Tracing facility for errlog's own diagnostics
//!
//! Reports themselves go through a [`crate::sink::Sink`]. This module covers
//! the logger's side channel: structured `tracing` events that say when a
//! report was emitted or why one of its sections was left out.
//!
//! - Single initialization point via `init(profile)`
//! - Event macros (`log_section_skipped!`, `log_report_emitted!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use errlog_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
