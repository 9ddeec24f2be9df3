//! Store failure taxonomy and its default classification
//!
//! Every fallible `TableStore` operation returns [`StoreError`]. The retry
//! layer surfaces these unmodified; the taxonomy exists so the classifier
//! can tell permanent rejections apart from transient faults.

use thiserror::Error;

use tessera_core::retry::{Classification, ErrorClassifier, TransportStatus};

/// Result type alias for table-store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by a table-store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write conflicted with existing state, either an insert against an
    /// existing key or an optimistic-concurrency violation
    #[error("write conflict on {partition_key}/{row_key}")]
    Conflict {
        partition_key: String,
        row_key: String,
    },

    /// A conditional write's version tag no longer matches the stored entity
    #[error("precondition failed on {partition_key}/{row_key}")]
    PreconditionFailed {
        partition_key: String,
        row_key: String,
    },

    /// The request itself is malformed and will never succeed
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// No entity at the addressed key
    #[error("entity not found: {partition_key}/{row_key}")]
    NotFound {
        partition_key: String,
        row_key: String,
    },

    /// The operation did not complete in time
    #[error("operation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The backend reported a service-side failure
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The transport failed before a response arrived
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The operation was cancelled before completing
    #[error("operation cancelled")]
    Cancelled,

    /// The target table cannot currently be reached
    #[error("table {table} unavailable: {message}")]
    TableUnavailable { table: String, message: String },
}

impl StoreError {
    /// Create a write-conflict error
    pub fn conflict(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self::Conflict {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Create a precondition-failed error
    pub fn precondition_failed(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
    ) -> Self {
        Self::PreconditionFailed {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Create a bad-request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self::NotFound {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(elapsed_ms: u64) -> Self {
        Self::Timeout { elapsed_ms }
    }

    /// Create a service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a table-unavailable error
    pub fn table_unavailable(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TableUnavailable {
            table: table.into(),
            message: message.into(),
        }
    }
}

impl TransportStatus for StoreError {
    fn status_code(&self) -> Option<u16> {
        match self {
            StoreError::Conflict { .. } => Some(409),
            StoreError::PreconditionFailed { .. } => Some(412),
            StoreError::BadRequest { .. } => Some(400),
            StoreError::NotFound { .. } => Some(404),
            StoreError::Service { status, .. } => Some(*status),
            StoreError::TableUnavailable { .. } => Some(503),
            StoreError::Timeout { .. }
            | StoreError::Transport { .. }
            | StoreError::Cancelled => None,
        }
    }
}

/// The default classifier for [`StoreError`]
///
/// Abort-class: write conflicts, precondition failures, malformed requests,
/// and cancellation. Retrying a conflicting write would either hit the same
/// conflict again or silently clobber a concurrent change; retrying a
/// cancelled operation is never what the caller asked for. Everything else
/// is treated as transient.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreClassifier;

impl ErrorClassifier<StoreError> for StoreClassifier {
    fn classify(&self, error: &StoreError) -> Classification {
        match error {
            StoreError::Conflict { .. }
            | StoreError::PreconditionFailed { .. }
            | StoreError::BadRequest { .. }
            | StoreError::Cancelled => Classification::AbortImmediately,
            _ => Classification::RetryThenSurface,
        }
    }
}
