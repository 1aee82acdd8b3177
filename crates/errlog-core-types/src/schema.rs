//! Canonical schema constants for the logger's own diagnostics
//!
//! These constants keep the tracing events emitted by errlog consistent, so
//! tests and subscribers can match on them.

/// Tracing target used by every errlog event
pub const TARGET: &str = "errlog";

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_SECTION: &str = "section";
pub const FIELD_REASON: &str = "reason";
pub const FIELD_FILE: &str = "file";
pub const FIELD_LINE: &str = "line";

// Report sections
pub const SECTION_LOCATION: &str = "location";
pub const SECTION_SOURCE: &str = "source";
pub const SECTION_STACK: &str = "stack";

// Canonical event names
pub const EVENT_REPORT: &str = "report";
pub const EVENT_REPORT_EMITTED: &str = "report_emitted";
pub const EVENT_SECTION_SKIPPED: &str = "section_skipped";
pub const EVENT_EXIT: &str = "exit";
pub const EVENT_ENV_IGNORED: &str = "env_ignored";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!EVENT_REPORT_EMITTED.is_empty());
        assert!(!EVENT_SECTION_SKIPPED.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        let events = [
            EVENT_REPORT,
            EVENT_REPORT_EMITTED,
            EVENT_SECTION_SKIPPED,
            EVENT_EXIT,
            EVENT_ENV_IGNORED,
        ];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
