//! Retry execution engine with policy-based configuration
//!
//! This module absorbs transient failures of a remote store so callers never
//! write retry loops themselves. A [`RetryEngine`] runs an operation up to a
//! policy's attempt budget, consulting an [`ErrorClassifier`] after every
//! failure: abort-class failures surface on first occurrence, everything else
//! is retried with a fixed inter-attempt delay and surfaced unchanged once
//! the budget is exhausted.
//!
//! # Features
//!
//! - Blocking (`execute`) and suspending (`execute_async`) forms of the same
//!   algorithm
//! - Pluggable classification via the `ErrorClassifier` trait
//! - The surfaced error is always exactly what the operation raised; the
//!   engine never wraps or aggregates
//! - Observable attempts via the `RetryObserver` trait, with a built-in
//!   `TracingObserver`
//!
//! # Example
//!
//! ```rust,no_run
//! use tessera_core::retry::{RetryAll, RetryEngine};
//! use tessera_core::RetryPolicy;
//!
//! async fn example() -> Result<String, std::io::Error> {
//!     let engine = RetryEngine::new(RetryAll);
//!     let policy = RetryPolicy::default();
//!
//!     engine
//!         .execute_async(&policy, || async {
//!             // Your fallible operation here
//!             Ok("success".to_string())
//!         })
//!         .await
//! }
//! ```

mod classify;
mod engine;
mod observer;

pub use classify::{
    AbortAll, Classification, ClosureClassifier, ErrorClassifier, RetryAll, StatusClassifier,
    TransportStatus,
};
pub use engine::RetryEngine;
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};

#[cfg(test)]
mod tests;
