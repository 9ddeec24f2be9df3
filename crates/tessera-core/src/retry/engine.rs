//! Retry execution engine
//!
//! One algorithm, two entry points: [`RetryEngine::execute`] blocks the
//! calling thread, [`RetryEngine::execute_async`] suspends on the operation
//! and on the inter-attempt delay. Both loops consult the same pure
//! [`next_step`] decision function, so the retry algorithm exists once.
//!
//! The engine surfaces errors exactly as the operation raised them: no
//! wrapping, no aggregation, no synthetic "retries exhausted" type. Whatever
//! the final attempt raised is what the caller receives.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::RetryPolicy;

use super::classify::{Classification, ErrorClassifier};
use super::observer::{NoOpObserver, RetryObserver};

/// What the loop does after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Surface the failure now; it is abort-class
    Abort,
    /// Surface the failure now; the budget is exhausted
    Surface,
    /// Wait the given delay, then run the next attempt
    RetryAfter(Duration),
}

/// Decide the next step after a failed attempt
///
/// Pure: both the blocking and the suspending loop call this and differ only
/// in how they sleep.
pub(crate) fn next_step(policy: &RetryPolicy, attempt: u32, verdict: Classification) -> Step {
    match verdict {
        Classification::AbortImmediately => Step::Abort,
        Classification::RetryThenSurface if attempt >= policy.max_attempts => Step::Surface,
        Classification::RetryThenSurface => Step::RetryAfter(policy.delay()),
    }
}

/// A retry executor bound to one classifier and one observer
///
/// The engine holds no other state; each call runs an independent attempt
/// loop on the caller's thread of execution. Concurrent calls through one
/// engine share nothing mutable.
///
/// # Example
///
/// ```rust
/// use tessera_core::retry::{Classification, ClosureClassifier, RetryEngine};
/// use tessera_core::RetryPolicy;
/// use std::io;
///
/// let engine = RetryEngine::new(ClosureClassifier::new(|err: &io::Error| {
///     if err.kind() == io::ErrorKind::InvalidInput {
///         Classification::AbortImmediately
///     } else {
///         Classification::RetryThenSurface
///     }
/// }));
///
/// let policy = RetryPolicy::new(3, std::time::Duration::from_millis(10)).unwrap();
/// let result: Result<u32, io::Error> = engine.execute(&policy, || Ok(42));
/// assert_eq!(result.unwrap(), 42);
/// ```
pub struct RetryEngine<C, O = NoOpObserver> {
    classifier: C,
    observer: O,
}

impl<C> RetryEngine<C, NoOpObserver> {
    /// Create an engine with the given classifier and no observation
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            observer: NoOpObserver,
        }
    }
}

impl<C, O> RetryEngine<C, O> {
    /// Replace the observer
    pub fn with_observer<O2: RetryObserver>(self, observer: O2) -> RetryEngine<C, O2> {
        RetryEngine {
            classifier: self.classifier,
            observer,
        }
    }

    /// The classifier this engine consults
    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<C, O> RetryEngine<C, O>
where
    O: RetryObserver,
{
    /// Execute a blocking operation under the given policy
    ///
    /// The operation is invoked at least once and at most
    /// `policy.max_attempts` times. The inter-attempt delay blocks the
    /// calling thread and is applied only between attempts, never before the
    /// first or after the last.
    pub fn execute<T, E, F>(&self, policy: &RetryPolicy, mut op: F) -> Result<T, E>
    where
        C: ErrorClassifier<E>,
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let start = Instant::now();
        let mut attempt = 1;

        loop {
            self.observer.on_attempt_start(attempt, policy.max_attempts);

            match op() {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(err) => match next_step(policy, attempt, self.classifier.classify(&err)) {
                    Step::Abort => {
                        self.observer.on_aborted(attempt, &err);
                        return Err(err);
                    }
                    Step::Surface => {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(err);
                    }
                    Step::RetryAfter(delay) => {
                        self.observer.on_attempt_failed(attempt, &err, delay);
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }

    /// Execute a suspending operation under the given policy
    ///
    /// Same algorithm as [`execute`](Self::execute); the operation and the
    /// inter-attempt delay are the only suspension points.
    pub async fn execute_async<T, E, F, Fut>(&self, policy: &RetryPolicy, mut op: F) -> Result<T, E>
    where
        C: ErrorClassifier<E>,
        E: Display,
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        let start = Instant::now();
        let mut attempt = 1;

        loop {
            self.observer.on_attempt_start(attempt, policy.max_attempts);

            match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(err) => match next_step(policy, attempt, self.classifier.classify(&err)) {
                    Step::Abort => {
                        self.observer.on_aborted(attempt, &err);
                        return Err(err);
                    }
                    Step::Surface => {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(err);
                    }
                    Step::RetryAfter(delay) => {
                        self.observer.on_attempt_failed(attempt, &err, delay);
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        attempt += 1;
                    }
                },
            }
        }
    }
}
