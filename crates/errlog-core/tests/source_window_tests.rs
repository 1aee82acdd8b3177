#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::path::Path;

use errlog_core::{SourceError, SourceWindowReader};
use proptest::prelude::*;
use tempfile::{NamedTempFile, TempDir};

fn numbered_fixture(lines: u32) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 1..=lines {
        writeln!(file, "line {}", i).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_default_margins_window() {
    let file = numbered_fixture(30);
    let window = SourceWindowReader::new()
        .read_window(file.path(), 10, 4, 2)
        .unwrap();

    let numbers: Vec<u32> = window.lines().iter().map(|l| l.number).collect();
    assert_eq!(numbers, (6..=12).collect::<Vec<_>>());
    assert_eq!(window.target_text(), Some("line 10"));
}

#[test]
fn test_zero_margins_yield_single_line() {
    let file = numbered_fixture(5);
    let window = SourceWindowReader::new()
        .read_window(file.path(), 3, 0, 0)
        .unwrap();

    assert_eq!(window.len(), 1);
    assert_eq!(window.lines()[0].number, 3);
    assert_eq!(window.lines()[0].text, "line 3");
}

#[test]
fn test_missing_file_is_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never_written.rs");

    assert!(SourceWindowReader::new().read_window(&path, 1, 4, 2).is_none());
    assert!(SourceWindowReader::cached().read_window(&path, 1, 4, 2).is_none());
}

#[test]
fn test_directory_is_absent() {
    let dir = TempDir::new().unwrap();
    assert!(SourceWindowReader::new()
        .read_window(dir.path(), 1, 0, 0)
        .is_none());
}

#[test]
fn test_reading_stops_at_window_end() {
    // The tail is one 4 MiB line the window never reaches.
    let mut file = NamedTempFile::new().unwrap();
    for i in 1..=5 {
        writeln!(file, "line {}", i).unwrap();
    }
    file.write_all(&vec![b'x'; 4 * 1024 * 1024]).unwrap();
    file.flush().unwrap();

    let window = SourceWindowReader::new()
        .read_window(file.path(), 2, 1, 1)
        .unwrap();
    assert_eq!(window.range(), 1..=3);
}

#[test]
fn test_large_files_bypass_the_cache() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 1..=200_000 {
        writeln!(file, "line {}", i).unwrap();
    }
    file.flush().unwrap();

    let reader = SourceWindowReader::cached();
    let window = reader.read_window(file.path(), 150_000, 1, 1).unwrap();

    assert_eq!(window.target_text(), Some("line 150000"));
    assert!(reader.cache().unwrap().is_empty());
}

#[test]
fn test_file_without_trailing_newline() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"one\ntwo\nthree").unwrap();
    file.flush().unwrap();

    let window = SourceWindowReader::new()
        .read_window(file.path(), 3, 5, 5)
        .unwrap();
    assert_eq!(window.range(), 1..=3);
    assert_eq!(window.target_text(), Some("three"));
}

#[test]
fn test_try_read_window_explains_absence() {
    let err = SourceWindowReader::new()
        .try_read_window(Path::new("/no/such/file.rs"), 3, 1, 1)
        .unwrap_err();
    assert_eq!(err.reason(), "open_failed");

    let file = numbered_fixture(2);
    let err = SourceWindowReader::new()
        .try_read_window(file.path(), 3, 1, 1)
        .unwrap_err();
    assert!(matches!(err, SourceError::LineOutOfRange { line: 3, last_line: 2, .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_window_bounds(
        last in 1u32..60,
        target_seed in 0u32..1000,
        before in 0u32..10,
        after in 0u32..10,
        cached in any::<bool>(),
    ) {
        let target = target_seed % last + 1;
        let file = numbered_fixture(last);
        let reader = if cached {
            SourceWindowReader::cached()
        } else {
            SourceWindowReader::new()
        };

        let window = reader.read_window(file.path(), target, before, after).unwrap();

        let expected: Vec<u32> =
            (target.saturating_sub(before).max(1)..=(target + after).min(last)).collect();
        let numbers: Vec<u32> = window.lines().iter().map(|l| l.number).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert_eq!(window.target_line(), target);
        for line in window.lines() {
            prop_assert_eq!(&line.text, &format!("line {}", line.number));
        }
    }

    #[test]
    fn prop_target_past_end_is_absent(last in 0u32..20, extra in 1u32..20) {
        let file = numbered_fixture(last);
        prop_assert!(SourceWindowReader::new()
            .read_window(file.path(), last + extra, 2, 2)
            .is_none());
    }
}
