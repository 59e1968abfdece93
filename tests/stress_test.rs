//! Stress Tests
//!
//! Concurrent readers and writers over one settings tree and over sibling
//! trees sharing a record.

mod common;

use agent_settings::{
    ErrorsFlagBinding, LOG_ERROR, LOG_VERBOSEDEBUG, Settings, SettingsConfig, SettingsGroup,
};
use common::TestFixture;
use serde_json::json;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_writes_and_reads() {
    const THREADS: usize = 8;
    const ITERATIONS: i64 = 200;

    let settings = Arc::new(Settings::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let settings = settings.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for n in 0..ITERATIONS {
                    let level = (n + i as i64) % (LOG_VERBOSEDEBUG + 1);
                    settings.set_log_level(level).unwrap();
                    settings
                        .transaction_tracer()
                        .set_transaction_threshold(n as f64 / 100.0)
                        .unwrap();
                    settings
                        .set("transaction_tracer.record_sql", json!(n % 3))
                        .unwrap();

                    let read = settings.log_level();
                    assert!((LOG_ERROR..=LOG_VERBOSEDEBUG).contains(&read));
                    assert!(settings.transaction_tracer().transaction_threshold().is_some());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let record_sql = settings.transaction_tracer().record_sql();
    assert!((0..3).contains(&record_sql));
}

#[test]
fn test_siblings_share_record_across_threads() {
    const THREADS: usize = 4;

    let fixture = TestFixture::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let tree = fixture.sibling();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                tree.set_monitor_mode(i % 2 == 0).unwrap();
                tree.transaction_tracer()
                    .set_stack_trace_threshold(i as f64)
                    .unwrap();
                tree.monitor_mode()
            })
        })
        .collect();

    let local: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(local, vec![true, false, true, false]);

    let micros = fixture.shared.read().slow_sql_stacktrace();
    assert!([0, 1_000_000, 2_000_000, 3_000_000].contains(&micros));
    // the fixture's own local property was never touched
    assert!(fixture.settings.monitor_mode());
}

#[test]
fn test_listeners_under_contention() {
    const THREADS: usize = 6;
    const ITERATIONS: usize = 50;

    let settings = Arc::new(Settings::new());
    let recorder = common::Recorder::attach(&settings);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let settings = settings.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for n in 0..ITERATIONS {
                    settings.set_capture_params(n % 2 == 0).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(recorder.keys().len(), THREADS * ITERATIONS);
}

#[test]
fn test_errors_flag_notifications_form_a_chain() {
    const THREADS: usize = 8;
    const ITERATIONS: usize = 200;

    let settings = Arc::new(
        Settings::from_config(
            SettingsConfig::builder()
                .errors_flag_binding(ErrorsFlagBinding::Independent)
                .build(),
        )
        .unwrap(),
    );
    let recorder = common::Recorder::attach(&settings);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let settings = settings.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for n in 0..ITERATIONS {
                    settings
                        .error_collector()
                        .set_enabled((n + i) % 2 == 0)
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // every commit reports the value it replaced, so the flips add up to the
    // final state
    let flips = recorder
        .events()
        .iter()
        .filter(|(key, old, new)| key == "error_collector.enabled" && old != new)
        .count();
    let expected_final = flips % 2 == 0;
    assert_eq!(settings.error_collector().enabled(), expected_final);
}
