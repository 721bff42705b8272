//! Errors surfaced by handle operations.

use thiserror::Error;

use crate::{signal::Exception, Operation, State};

/// An operation was attempted in a state that does not permit it.
///
/// Raised synchronously before any of the computation's logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {op} a computation that is {state}")]
pub struct UsageError {
    pub op: Operation,
    pub state: State,
}

/// One or more cleanup actions raised while the computation was finishing.
///
/// Every registered action still ran. The exception raised last supersedes everything before it;
/// earlier cleanup failures are kept in `suppressed`, and whatever the computation was already
/// failing with is kept in `cause`.
#[derive(Debug, Error)]
#[error("cleanup action failed: {error}")]
pub struct CleanupFailure {
    #[source]
    pub error: Exception,
    pub suppressed: Vec<Exception>,
    pub cause: Option<Box<Error>>,
}

/// Failure of a handle operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is not legal in the computation's current state.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// An exception escaped the computation's logic. The computation is now `Failed`.
    #[error("unhandled exception in computation: {0}")]
    Unhandled(#[source] Exception),

    /// The logic yielded a value in response to a close request. The computation is now `Failed`.
    #[error("computation yielded a value after close was requested")]
    IgnoredClose,

    /// A cleanup action raised. The computation is now `Failed`.
    #[error(transparent)]
    Cleanup(#[from] CleanupFailure),
}

impl Error {
    /// Returns `true` for [`Error::Usage`].
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    /// The exception that escaped the computation, if this is [`Error::Unhandled`], or the
    /// superseding exception of a cleanup failure.
    pub fn exception(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Unhandled(exception) => Some(exception.as_ref()),
            Error::Cleanup(failure) => Some(failure.error.as_ref()),
            Error::Usage(_) | Error::IgnoredClose => None,
        }
    }

    /// Re-raises this error as an exception inside another computation's logic.
    ///
    /// An unhandled exception is unwrapped so its kind survives the hop; everything else is boxed
    /// whole.
    pub fn into_exception(self) -> Exception {
        match self {
            Error::Unhandled(exception) => exception,
            other => Box::new(other),
        }
    }
}
