#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io;
use std::sync::Arc;

use errlog_core::logging_facility::test_capture::init_test_capture;
use errlog_core::types::schema::{
    EVENT_REPORT, EVENT_REPORT_EMITTED, EVENT_SECTION_SKIPPED, FIELD_COMPONENT, FIELD_FILE,
    FIELD_LINE, FIELD_OP, SECTION_SOURCE, SECTION_STACK, TARGET,
};
use errlog_core::{log_section_skipped, Config, Logger, NullWalker, SourceWindowReader, TracingSink};

#[test]
fn test_missing_source_logs_skip_reason() {
    let capture = init_test_capture();
    let path = "/missing/unique_logging_fixture_1.rs";

    assert!(SourceWindowReader::new()
        .read_window(path.as_ref(), 4, 1, 1)
        .is_none());

    let events = capture.events();
    let skipped = events
        .iter()
        .find(|e| e.fields.get(FIELD_FILE).map(String::as_str) == Some(path))
        .expect("skip event for the missing file");

    assert_eq!(skipped.target, TARGET);
    assert_eq!(skipped.event.as_deref(), Some(EVENT_SECTION_SKIPPED));
    assert_eq!(skipped.section.as_deref(), Some(SECTION_SOURCE));
    assert_eq!(skipped.reason.as_deref(), Some("open_failed"));
    assert_eq!(skipped.fields.get(FIELD_LINE), Some(&"4".to_string()));
    assert_eq!(
        skipped.fields.get(FIELD_COMPONENT).map(String::as_str),
        Some("errlog_core::source")
    );
}

#[test]
fn test_skip_macro_fields() {
    let capture = init_test_capture();

    log_section_skipped!(SECTION_STACK, "unique_reason_2");

    assert_eq!(
        capture.count_events(|e| e.reason.as_deref() == Some("unique_reason_2")
            && e.section.as_deref() == Some(SECTION_STACK)),
        1
    );
    capture.assert_event_exists(EVENT_SECTION_SKIPPED, SECTION_STACK);
}

#[test]
fn test_tracing_sink_emits_one_event_per_report() {
    let capture = init_test_capture();
    let logger = Logger::with_walker(
        Config::default()
            .with_print_source(false)
            .with_sink(Arc::new(TracingSink::default())),
        Arc::new(NullWalker),
    );

    logger.debug(Some(&io::Error::other("unique_tracing_failure_3")));

    let reports: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_REPORT))
        .filter(|e| {
            e.message
                .as_deref()
                .is_some_and(|m| m.contains("unique_tracing_failure_3"))
        })
        .collect();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].level, tracing::Level::ERROR);
    assert_eq!(
        reports[0].message.as_deref(),
        Some("error: unique_tracing_failure_3")
    );
}

#[test]
fn test_report_emitted_event_carries_op() {
    let capture = init_test_capture();
    let logger = Logger::with_walker(
        Config::default()
            .with_print_source(false)
            .with_sink(Arc::new(errlog_core::MemorySink::new())),
        Arc::new(NullWalker),
    );

    let before = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_REPORT_EMITTED)
            && e.fields.get(FIELD_OP).map(String::as_str) == Some("debugx")
    });
    logger.debugx(Some(&io::Error::other("x")), "y");
    let after = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_REPORT_EMITTED)
            && e.fields.get(FIELD_OP).map(String::as_str) == Some("debugx")
    });

    assert!(after > before);
}

#[test]
fn test_macros_expand_in_expression_position() {
    let capture = init_test_capture();

    for outcome in [Some(3usize), None] {
        match outcome {
            Some(lines) => errlog_core::log_report_emitted!("unique_op_4", lines = lines),
            None => log_section_skipped!(SECTION_STACK, "unique_reason_4"),
        }
    }

    assert_eq!(
        capture.count_events(|e| e.fields.get(FIELD_OP).map(String::as_str) == Some("unique_op_4")),
        1
    );
    assert_eq!(
        capture.count_events(|e| e.reason.as_deref() == Some("unique_reason_4")),
        1
    );
}
