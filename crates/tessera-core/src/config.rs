//! Configuration types for retry behavior
//!
//! These types define the construction-time knobs of the resilience layer:
//! attempt budgets per operation category and the fixed delay between
//! attempts. They are read-only after construction; invalid values are
//! rejected with a [`ConfigError`] before any operation runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Operation category, statically assigned per decorated method
///
/// Writes mutate remote state; reads do not. Each category carries its own
/// attempt budget so callers can tolerate slow reads differently from
/// contended writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Operations that only observe remote state
    Read,
    /// Operations that mutate remote state
    Write,
}

/// Retry policy for one operation category
///
/// `max_attempts` counts total invocations of the operation, not re-tries:
/// a policy with `max_attempts == 1` never retries. The delay is fixed and
/// applied only between attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of invocations, including the first
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Create a validated policy
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroAttempts`] if `max_attempts` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        let policy = Self {
            max_attempts,
            delay_ms: delay.as_millis() as u64,
        };
        policy.validate("max-attempts")?;
        Ok(policy)
    }

    /// The fixed inter-attempt delay
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check the policy invariants, naming `field` in any error
    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::zero_attempts(field, self.max_attempts));
        }
        Ok(())
    }
}

fn default_attempts() -> u32 {
    10
}
fn default_delay_ms() -> u64 {
    200
}

/// Construction-time options for the resilient decorator
///
/// Embedding applications typically deserialize this from their own
/// configuration file; the defaults match the table below.
///
/// | option | default |
/// |---|---|
/// | `write-attempts` | 10 |
/// | `read-attempts` | 10 |
/// | `delay-ms` | 200 |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryOptions {
    /// Attempt budget for write-category operations
    #[serde(default = "default_attempts")]
    pub write_attempts: u32,

    /// Attempt budget for read-category operations
    #[serde(default = "default_attempts")]
    pub read_attempts: u32,

    /// Fixed delay between attempts in milliseconds, shared by both
    /// categories
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            write_attempts: default_attempts(),
            read_attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryOptions {
    /// Check both budgets, failing before any operation can execute
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.write_attempts == 0 {
            return Err(ConfigError::zero_attempts(
                "write-attempts",
                self.write_attempts,
            ));
        }
        if self.read_attempts == 0 {
            return Err(ConfigError::zero_attempts(
                "read-attempts",
                self.read_attempts,
            ));
        }
        Ok(())
    }

    /// The policy for the given operation category
    pub fn policy_for(&self, category: Category) -> RetryPolicy {
        let max_attempts = match category {
            Category::Read => self.read_attempts,
            Category::Write => self.write_attempts,
        };
        RetryPolicy {
            max_attempts,
            delay_ms: self.delay_ms,
        }
    }

    /// Shorthand for `policy_for(Category::Read)`
    pub fn read_policy(&self) -> RetryPolicy {
        self.policy_for(Category::Read)
    }

    /// Shorthand for `policy_for(Category::Write)`
    pub fn write_policy(&self) -> RetryPolicy {
        self.policy_for(Category::Write)
    }
}
