//! Error types for the object pool

use std::time::Duration;
use thiserror::Error;

/// Error type returned by [`PooledObjectFactory`](crate::PooledObjectFactory) callbacks.
///
/// The pool never propagates it as-is: every callback failure is converted
/// into one of the [`PoolError`] kinds at the engine boundary.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Factory failed to create an object: {0}")]
    CreationFailed(String),

    #[error("Object activation failed: {0}")]
    ActivationFailed(String),

    #[error("Object passivation failed: {0}")]
    PassivationFailed(String),

    #[error("Object validation failed")]
    ValidationFailed,

    #[error("Timed out after {0:?} waiting for pool capacity")]
    Timeout(Duration),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(&'static str),

    #[error("Failed to destroy object: {0}")]
    DestroyFailed(String),

    #[error("Pool is closed")]
    Closed,

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Pool shutdown failed to destroy {failed} object(s), first error: {first}")]
    ShutdownFailed { failed: usize, first: String },

    #[error("Failed to start the evictor thread: {0}")]
    EvictorStart(String),

    #[error("Invalid pool configuration: {0}")]
    InvalidConfiguration(String),
}

impl PoolError {
    /// Whether this failure means the pool had no capacity in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PoolError::Timeout(_))
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
