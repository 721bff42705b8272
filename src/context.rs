//! Cleanup registration for running computations.

use crate::signal::Exception;

type Cleanup = Box<dyn FnOnce() -> Result<(), Exception> + Send>;

/// Per-computation execution context, handed to the logic on every resume.
///
/// Cleanup actions registered here run exactly once, in reverse registration order, when the
/// computation reaches a terminal state, whichever terminal state that is.
#[derive(Default)]
pub struct Context {
    cleanups: Vec<Cleanup>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register an action to run when the computation exits for any reason.
    ///
    /// ```rust
    /// use resumable::prelude::*;
    /// use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
    ///
    /// let released = Arc::new(AtomicBool::new(false));
    /// let flag = Arc::clone(&released);
    /// let mut flag = Some(flag);
    /// let mut h = computation(from_fn(move |cx: &mut Context, signal: Signal<()>| {
    ///     signal.value()?;
    ///     if let Some(flag) = flag.take() {
    ///         cx.defer(move || flag.store(true, Ordering::SeqCst));
    ///         return Ok(Step::Yielded(1));
    ///     }
    ///     Ok(Step::Exhausted(()))
    /// }));
    ///
    /// h.resume().unwrap();
    /// h.close().unwrap();
    /// assert!(released.load(Ordering::SeqCst));
    /// ```
    pub fn defer<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cleanups.push(Box::new(move || {
            f();
            Ok(())
        }));
    }

    /// Register a fallible cleanup action.
    ///
    /// A failure does not stop the remaining actions; it is surfaced to the caller of the
    /// operation that ended the computation as a [`CleanupFailure`](crate::CleanupFailure).
    pub fn try_defer<F>(&mut self, f: F)
    where
        F: FnOnce() -> Result<(), Exception> + Send + 'static,
    {
        self.cleanups.push(Box::new(f));
    }

    /// Number of cleanup actions registered and not yet run.
    pub fn pending_cleanups(&self) -> usize {
        self.cleanups.len()
    }

    /// Runs every registered action, newest first, returning failures in the order they occurred.
    pub(crate) fn unwind(&mut self) -> Vec<Exception> {
        let mut failures = Vec::new();
        while let Some(cleanup) = self.cleanups.pop() {
            if let Err(exception) = cleanup() {
                failures.push(exception);
            }
        }
        failures
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("pending_cleanups", &self.cleanups.len())
            .finish()
    }
}
