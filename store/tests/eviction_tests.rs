//! Eviction tests for LineStore.
//!
//! These tests drive the store with budgets small enough that most frames
//! spill to the swap file, and verify reads are unaffected.

use line_store::{LineStore, StoreConfig, StoreError, SwapOp};
use std::sync::Arc;
use std::thread;
use tempfile::{TempDir, tempdir};

/// A verifiable 50 byte line for position `i`.
fn line_text(i: usize) -> String {
    format!("line {:05} {}", i, "=".repeat(39))
}

/// Create a store that spills into its own temporary directory.
fn create_store(block: usize, total: u64) -> (LineStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = LineStore::new(
        StoreConfig::new()
            .block_size_limit(block)
            .max_total_size(total)
            .swap_dir(dir.path()),
    );
    (store, dir)
}

fn fill(store: &LineStore, n: usize) {
    for i in 0..n {
        store.append(&line_text(i)).expect("append failed");
    }
}

fn read_at(store: &LineStore, i: usize) -> String {
    let mut cursor = store.cursor();
    assert!(cursor.set_position(i as isize, false), "line {} out of range", i);
    cursor.get_line().expect("read failed")
}

// =============================================================================
// Budget Scenario
// =============================================================================

#[test]
fn test_concrete_scenario() {
    let (store, _dir) = create_store(1024, 4096);
    fill(&store, 500);

    assert_eq!(line_text(0).len(), 50);
    assert_eq!(store.len(), 500);

    let stats = store.stats();
    assert_eq!(stats.frames, 25);
    assert!(stats.resident_frames <= 4);
    assert!(stats.evictions > 0);

    for &i in &[0, 250, 499] {
        assert_eq!(read_at(&store, i), line_text(i));
    }

    // Cycle every frame through residency, then read again.
    let mut cursor = store.cursor();
    for i in 0..500 {
        assert!(cursor.set_position(i, false));
        cursor.get_line().unwrap();
    }
    for &i in &[0, 250, 499] {
        assert_eq!(read_at(&store, i), line_text(i));
    }
    assert!(store.stats().resident_frames <= 4);

    store.shutdown().unwrap();
}

#[test]
fn test_resident_bound_after_every_operation() {
    let (store, _dir) = create_store(256, 1024);
    let limit = 1024 / 256;

    for i in 0..300 {
        store.append(&line_text(i)).unwrap();
        assert!(store.stats().resident_frames <= limit);
    }

    let mut cursor = store.cursor();
    for i in (0..300).rev().step_by(7) {
        assert!(cursor.set_position(i, false));
        cursor.get_line().unwrap();
        assert!(store.stats().resident_frames <= limit);
    }
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_round_trip_without_eviction() {
    let store = LineStore::default();
    fill(&store, 1000);

    let stats = store.stats();
    assert_eq!(stats.evictions, 0);
    assert!(stats.swap_path.is_none());

    for i in 0..1000 {
        assert_eq!(read_at(&store, i), line_text(i));
    }
}

#[test]
fn test_round_trip_with_eviction() {
    let (store, _dir) = create_store(128, 256);
    fill(&store, 1000);
    assert!(store.stats().evictions > 0);

    for i in 0..1000 {
        assert_eq!(read_at(&store, i), line_text(i));
    }
    // And in reverse, which reloads every frame a second time.
    for i in (0..1000).rev() {
        assert_eq!(read_at(&store, i), line_text(i));
    }
    assert!(store.stats().loads > 0);
}

#[test]
fn test_round_trip_trims_input() {
    let (store, _dir) = create_store(64, 64);
    for i in 0..100 {
        store.append(&format!("{} \t\r\n", line_text(i))).unwrap();
    }
    for i in 0..100 {
        assert_eq!(read_at(&store, i), line_text(i));
    }
}

#[test]
fn test_round_trip_unicode() {
    let (store, _dir) = create_store(64, 128);
    let words = ["zażółć gęślą jaźń", "日本語のテキスト", "emoji 🦀 crab", ""];
    for i in 0..200 {
        store.append(words[i % words.len()]).unwrap();
    }
    for i in 0..200 {
        assert_eq!(read_at(&store, i), words[i % words.len()]);
    }
}

// =============================================================================
// Shutdown
// =============================================================================

#[test]
fn test_swap_file_deleted_on_shutdown() {
    let (store, dir) = create_store(128, 256);
    fill(&store, 200);

    let path = store.stats().swap_path.expect("swap file should exist");
    assert!(path.starts_with(dir.path()));
    assert!(path.exists());

    store.shutdown().unwrap();
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_operations_after_shutdown() {
    let (store, _dir) = create_store(128, 256);
    fill(&store, 50);
    store.shutdown().unwrap();
    store.shutdown().unwrap();

    assert_eq!(store.len(), 0);
    assert!(matches!(store.append("x"), Err(StoreError::Closed)));
    assert!(!store.cursor().set_position(0, false));
}

// =============================================================================
// Swap Failure
// =============================================================================

#[test]
fn test_swap_create_failure_is_fatal() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing").join("swap");
    // One resident frame, so the second line forces an eviction.
    let store = LineStore::new(
        StoreConfig::new()
            .block_size_limit(16)
            .max_total_size(16)
            .swap_dir(&missing),
    );

    store.append(&line_text(0)).expect("first frame stays resident");
    let err = store.append(&line_text(1)).unwrap_err();
    assert!(
        matches!(err, StoreError::Swap { op: SwapOp::Create, .. }),
        "unexpected error: {}",
        err
    );
    assert!(err.is_fatal());
    assert!(store.is_failed());

    for i in 2..10 {
        assert!(matches!(store.append(&line_text(i)), Err(StoreError::Failed)));
    }

    let mut cursor = store.cursor();
    assert!(cursor.set_position(0, false));
    assert!(matches!(cursor.get_line(), Err(StoreError::Failed)));
    assert!(store.is_failed());
    assert!(!missing.exists());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_ingest_and_read() {
    let (store, _dir) = create_store(256, 1024);
    let store = Arc::new(store);
    let total = 2000;

    thread::scope(|s| {
        let writer = Arc::clone(&store);
        s.spawn(move || fill(&writer, total));

        for _ in 0..3 {
            let reader = Arc::clone(&store);
            s.spawn(move || {
                let mut cursor = reader.cursor();
                let mut seen = 0;
                while seen < total {
                    let len = reader.len();
                    if len == 0 {
                        thread::yield_now();
                        continue;
                    }
                    let i = (seen * 7919) % len;
                    assert!(cursor.set_position(i as isize, false));
                    assert_eq!(cursor.get_line().unwrap(), line_text(i));
                    seen += 1;
                }
            });
        }
    });

    assert_eq!(store.len(), total);
    assert!(store.stats().resident_frames <= 4);
}
