//! Canonical diagnostic macros
//!
//! All events go to the `errlog` target with `component` and `event` fields
//! taken from [`crate::types::schema`].

/// Log that a report section was left out, and why
///
/// # Example
///
/// ```
/// # use errlog_core::log_section_skipped;
/// log_section_skipped!("source", "open_failed");
/// log_section_skipped!("source", "open_failed", file = "main.rs", line = 3);
/// ```
#[macro_export]
macro_rules! log_section_skipped {
    ($section:expr, $reason:expr) => {
        tracing::debug!(
            target: $crate::types::schema::TARGET,
            component = module_path!(),
            event = $crate::types::schema::EVENT_SECTION_SKIPPED,
            section = $section,
            reason = $reason,
        )
    };
    ($section:expr, $reason:expr, $($field:tt)*) => {
        tracing::debug!(
            target: $crate::types::schema::TARGET,
            component = module_path!(),
            event = $crate::types::schema::EVENT_SECTION_SKIPPED,
            section = $section,
            reason = $reason,
            $($field)*
        )
    };
}

/// Log that an operation handed a report to its sink
///
/// # Example
///
/// ```
/// # use errlog_core::log_report_emitted;
/// log_report_emitted!("debugx", lines = 7);
/// ```
#[macro_export]
macro_rules! log_report_emitted {
    ($op:expr, $($field:tt)*) => {
        tracing::debug!(
            target: $crate::types::schema::TARGET,
            component = module_path!(),
            op = $op,
            event = $crate::types::schema::EVENT_REPORT_EMITTED,
            $($field)*
        )
    };
}
