//! In-memory capture of errlog's tracing events
//!
//! [`init_test_capture`] installs a global subscriber that records every
//! event, so tests can assert on skipped sections and emitted reports
//! without parsing log output.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use errlog_core_types::schema::{FIELD_EVENT, FIELD_REASON, FIELD_SECTION};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One recorded event
///
/// `event`, `section` and `reason` are lifted out of `fields` because
/// nearly every assertion matches on them.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub event: Option<String>,
    pub section: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_event(event: &Event<'_>) -> Self {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        let fields = fields.0;
        let metadata = event.metadata();

        Self {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            event: fields.get(FIELD_EVENT).cloned(),
            section: fields.get(FIELD_SECTION).cloned(),
            reason: fields.get(FIELD_REASON).cloned(),
            message: fields.get("message").cloned(),
            fields,
        }
    }
}

/// Field values as text; numbers and flags arrive through `record_debug`
#[derive(Default)]
struct FieldMap(HashMap<String, String>);

impl Visit for FieldMap {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// Shared handle on the recorded events
///
/// Clones share the same buffer. The handle doubles as the subscriber
/// layer that fills it.
#[derive(Clone, Default)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event has both the given `event` and `section` fields
    pub fn assert_event_exists(&self, event: &str, section: &str) {
        let found = self.count_events(|e| {
            e.event.as_deref() == Some(event) && e.section.as_deref() == Some(section)
        });
        assert!(
            found > 0,
            "no captured event with event={} section={}",
            event,
            section
        );
    }
}

impl<S: Subscriber> Layer<S> for TestCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let captured = CapturedEvent::from_event(event);
        self.events.lock().map(|mut e| e.push(captured)).ok();
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once and return its handle
///
/// All tests of one binary share the handle, so assertions should filter on
/// something unique to the test.
///
/// ```
/// use errlog_core::logging_facility::test_capture::init_test_capture;
/// use errlog_core::log_section_skipped;
///
/// let capture = init_test_capture();
/// log_section_skipped!("stack", "trace_unavailable");
/// capture.assert_event_exists("section_skipped", "stack");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            let _ = tracing_subscriber::registry()
                .with(capture.clone())
                .try_init();
            capture
        })
        .clone()
}
