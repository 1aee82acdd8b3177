#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;
use std::io;
use std::sync::{Arc, OnceLock};
use std::thread;

use errlog_core::{Config, Logger, MemorySink};

const CALLS: usize = 100;

fn shared_logger() -> &'static (Logger, MemorySink) {
    static SHARED: OnceLock<(Logger, MemorySink)> = OnceLock::new();
    SHARED.get_or_init(|| {
        let sink = MemorySink::new();
        let config = Config::default()
            .with_print_stack(true)
            .with_max_stack_depth(8)
            .with_cache_sources(true)
            .with_sink(Arc::new(sink.clone()));
        (Logger::new(config), sink)
    })
}

#[test]
fn test_concurrent_debugx_reports_stay_contiguous() {
    let (logger, sink) = shared_logger();

    let handles: Vec<_> = (0..CALLS)
        .map(|i| {
            thread::spawn(move || {
                let err = io::Error::other(format!("failure {}", i));
                logger.debugx(Some(&err), &format!("call {}", i))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let reports = sink.reports();
    assert_eq!(reports.len(), CALLS);

    let mut seen = HashSet::new();
    for report in &reports {
        let id = report[0]
            .strip_prefix("error: failure ")
            .expect("every report starts with its error");
        assert_eq!(report[1], format!("message: call {}", id));
        assert!(report.iter().any(|l| l == "stack trace:"));
        assert!(
            report.iter().skip(1).all(|l| !l.starts_with("error: ")),
            "report interleaved with another: {:?}",
            report
        );
        assert!(seen.insert(id.to_string()));
    }
}

#[test]
fn test_concurrent_debugx_on_default_logger() {
    let handles: Vec<_> = (0..CALLS)
        .map(|i| {
            thread::spawn(move || {
                let err = io::Error::other(format!("default failure {}", i));
                errlog_core::debugx(Some(&err), "concurrent")
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.len(), CALLS);
    assert!(results.into_iter().all(|reported| reported));
}
