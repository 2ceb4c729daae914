//! Error types for breaker-guarded calls

use std::time::Duration;
use thiserror::Error;

/// Errors returned by a [`Breaker`](crate::Breaker) call
///
/// Only [`BreakerError::Open`] originates in the breaker. Anything the
/// protected operation returns comes back as [`BreakerError::Execution`]
/// with the inner error untouched: `Display` and `source()` are forwarded
/// verbatim.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// Circuit is open, the operation was not invoked
    #[error("service unreachable: circuit '{circuit}' is open (retry in {retry_after:?})")]
    Open {
        circuit: String,
        retry_after: Duration,
    },
    /// The wrapped operation failed
    #[error(transparent)]
    Execution(E),
}

impl<E> BreakerError<E> {
    /// True when the breaker refused the call without running the operation
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open { .. })
    }

    /// The operation's own error, if the operation ran
    pub fn into_inner(self) -> Option<E> {
        match self {
            BreakerError::Execution(e) => Some(e),
            BreakerError::Open { .. } => None,
        }
    }

    /// Borrowing variant of [`into_inner`](Self::into_inner)
    pub fn inner(&self) -> Option<&E> {
        match self {
            BreakerError::Execution(e) => Some(e),
            BreakerError::Open { .. } => None,
        }
    }
}
