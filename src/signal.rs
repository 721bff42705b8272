//! What a suspended computation receives when it is driven again.

use thiserror::Error;

/// An exception raised inside, or injected into, a computation.
///
/// Logic catches specific kinds by downcasting:
///
/// ```rust
/// use resumable::Exception;
///
/// let exc: Exception = Box::new(std::fmt::Error);
/// assert!(exc.downcast_ref::<std::fmt::Error>().is_some());
/// ```
pub type Exception = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The distinguished exception delivered at a suspension point by [`Handle::close`].
///
/// Logic that does not intercept it lets it propagate, and the computation becomes `Closed`.
///
/// [`Handle::close`]: crate::Handle::close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("computation close requested")]
pub struct CloseRequested;

/// The injection delivered to a computation's logic by a handle operation.
#[derive(Debug)]
pub enum Signal<I> {
    /// `resume()`: continue without injecting anything. Also starts a fresh computation.
    Resume,
    /// `send(value)`: the value the suspension point evaluates to.
    Send(I),
    /// `throw(exception)`: raise at the suspension point.
    Throw(Exception),
    /// `close()`: raise [`CloseRequested`] at the suspension point.
    Close,
}

impl<I> Signal<I> {
    /// Evaluates the suspension point.
    ///
    /// Resuming yields `Ok(None)`, sending yields `Ok(Some(value))`, and a thrown exception or a
    /// close request comes back as `Err`, ready to be propagated with `?` or caught.
    ///
    /// ```rust
    /// use resumable::{CloseRequested, Signal};
    ///
    /// assert_eq!(Signal::Send(3).value().unwrap(), Some(3));
    /// assert_eq!(Signal::<i32>::Resume.value().unwrap(), None);
    /// assert!(Signal::<i32>::Close.value().unwrap_err().is::<CloseRequested>());
    /// ```
    pub fn value(self) -> Result<Option<I>, Exception> {
        match self {
            Signal::Resume => Ok(None),
            Signal::Send(value) => Ok(Some(value)),
            Signal::Throw(exception) => Err(exception),
            Signal::Close => Err(Box::new(CloseRequested)),
        }
    }

    /// Returns `true` for a close request.
    pub const fn is_close(&self) -> bool {
        matches!(self, Signal::Close)
    }

    /// Returns `true` if this signal raises at the suspension point.
    pub const fn is_raise(&self) -> bool {
        matches!(self, Signal::Throw(_) | Signal::Close)
    }
}

/// Returns `true` if `exception` is a propagated close request.
pub fn is_close_request(exception: &Exception) -> bool {
    exception.is::<CloseRequested>()
}
