//! Error types for tessera-core

use thiserror::Error;

/// Configuration errors raised at construction time, before any operation
/// executes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An attempt budget was configured below the minimum of one attempt
    #[error("{field} must allow at least 1 attempt (got {value})")]
    ZeroAttempts { field: &'static str, value: u32 },
}

impl ConfigError {
    /// Create a zero-attempts error for the given configuration field
    pub fn zero_attempts(field: &'static str, value: u32) -> Self {
        Self::ZeroAttempts { field, value }
    }
}
