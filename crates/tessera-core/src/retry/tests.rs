//! Integration tests for the retry module
//!
//! These tests verify the complete retry execution flow: classification,
//! budget accounting, delay placement, and the no-wrapping guarantee.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RetryPolicy;
use crate::retry::classify::{Classification, ClosureClassifier, ErrorClassifier, RetryAll};
use crate::retry::engine::RetryEngine;
use crate::retry::observer::StatsObserver;

/// A minimal error type with identity, so tests can assert the surfaced
/// error is exactly the one the operation raised
#[derive(Debug, Clone, PartialEq, Eq)]
enum TestError {
    Transient(&'static str),
    Permanent(&'static str),
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Transient(msg) => write!(f, "transient: {msg}"),
            TestError::Permanent(msg) => write!(f, "permanent: {msg}"),
        }
    }
}

/// Classifier mirroring the store default: permanent failures abort,
/// everything else retries
fn test_classifier() -> impl ErrorClassifier<TestError> {
    ClosureClassifier::new(|err: &TestError| match err {
        TestError::Permanent(_) => Classification::AbortImmediately,
        TestError::Transient(_) => Classification::RetryThenSurface,
    })
}

fn quick_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay_ms: 10,
    }
}

// ============================================================================
// Blocking form
// ============================================================================

#[test]
fn sync_success_short_circuits() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let result: Result<u32, TestError> = engine.execute(&quick_policy(3), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(42)
    });

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.attempt_starts(), 1);
    assert_eq!(observer.successes(), 1);
    assert_eq!(observer.failures(), 0);
}

#[test]
fn sync_eventual_success_after_transient_failures() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let start = Instant::now();
    let result: Result<u32, TestError> = engine.execute(&quick_policy(3), || {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call < 3 {
            Err(TestError::Transient("not yet"))
        } else {
            Ok(42)
        }
    });

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Two failed attempts, therefore exactly two delays of 10ms each
    assert_eq!(observer.failures(), 2);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn sync_exhaustion_surfaces_last_error_unchanged() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let result: Result<u32, TestError> = engine.execute(&quick_policy(3), || {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call < 3 {
            Err(TestError::Transient("early"))
        } else {
            Err(TestError::Transient("final"))
        }
    });

    assert_eq!(result.unwrap_err(), TestError::Transient("final"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(observer.attempt_starts(), 3);
    // Delays sit strictly between attempts: N attempts, N-1 delays
    assert_eq!(observer.failures(), 2);
    assert_eq!(observer.exhaustions(), 1);
}

#[test]
fn sync_abort_class_surfaces_on_first_occurrence() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let start = Instant::now();
    let result: Result<u32, TestError> = engine.execute(&quick_policy(5), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(TestError::Permanent("conflict"))
    });

    assert_eq!(result.unwrap_err(), TestError::Permanent("conflict"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.aborts(), 1);
    assert_eq!(observer.failures(), 0);
    // No delay is consumed on the abort path
    assert!(start.elapsed() < Duration::from_millis(10));
}

#[test]
fn sync_single_attempt_budget_fails_without_delay() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let start = Instant::now();
    let result: Result<u32, TestError> = engine.execute(&quick_policy(1), || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(TestError::Transient("once"))
    });

    assert_eq!(result.unwrap_err(), TestError::Transient("once"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.failures(), 0);
    assert_eq!(observer.exhaustions(), 1);
    assert!(start.elapsed() < Duration::from_millis(10));
}

#[test]
fn sync_zero_delay_policy_retries_back_to_back() {
    let engine = RetryEngine::new(RetryAll);
    let calls = AtomicU32::new(0);

    let result: Result<u32, TestError> = engine.execute(
        &RetryPolicy {
            max_attempts: 4,
            delay_ms: 0,
        },
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Transient("always"))
        },
    );

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

// ============================================================================
// Suspending form
// ============================================================================

#[tokio::test]
async fn async_success_short_circuits() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let counter = calls.clone();
    let result: Result<&str, TestError> = engine
        .execute_async(&quick_policy(3), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("success")
            }
        })
        .await;

    assert_eq!(result.unwrap(), "success");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.successes(), 1);
}

#[tokio::test]
async fn async_eventual_success_counts_invocations_and_delays() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let start = Instant::now();
    let counter = calls.clone();
    let result: Result<u32, TestError> = engine
        .execute_async(&quick_policy(5), || {
            let counter = counter.clone();
            async move {
                let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if call <= 2 {
                    Err(TestError::Transient("warming up"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(observer.failures(), 2);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[tokio::test]
async fn async_exhaustion_surfaces_nth_error() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let counter = calls.clone();
    let result: Result<u32, TestError> = engine
        .execute_async(&quick_policy(4), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Transient("still down"))
            }
        })
        .await;

    assert_eq!(result.unwrap_err(), TestError::Transient("still down"));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(observer.attempt_starts(), 4);
    assert_eq!(observer.failures(), 3);
    assert_eq!(observer.exhaustions(), 1);
}

#[tokio::test]
async fn async_abort_class_never_retries() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = Arc::new(AtomicU32::new(0));

    let counter = calls.clone();
    let result: Result<u32, TestError> = engine
        .execute_async(&quick_policy(10), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(TestError::Permanent("precondition failed"))
            }
        })
        .await;

    assert_eq!(
        result.unwrap_err(),
        TestError::Permanent("precondition failed")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(observer.aborts(), 1);
}

// ============================================================================
// Classification is per-failure, not per-call
// ============================================================================

#[test]
fn abort_after_transient_failures_stops_the_loop() {
    let observer = Arc::new(StatsObserver::new());
    let engine = RetryEngine::new(test_classifier()).with_observer(observer.clone());
    let calls = AtomicU32::new(0);

    let result: Result<u32, TestError> = engine.execute(&quick_policy(10), || {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 1 {
            Err(TestError::Transient("first"))
        } else {
            Err(TestError::Permanent("then it conflicts"))
        }
    });

    assert_eq!(
        result.unwrap_err(),
        TestError::Permanent("then it conflicts")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(observer.failures(), 1);
    assert_eq!(observer.aborts(), 1);
    assert_eq!(observer.exhaustions(), 0);
}
