//! Core trait for suspendable logic.
//!
//! A [`Body`] is the logic of one computation, written as an explicit state machine: the
//! implementing type holds every local that lives across a suspension point plus a tag recording
//! where to continue, and [`Body::resume`] dispatches on that tag each time it is driven.
//!
//! # Examples
//!
//! ```rust
//! use resumable::prelude::*;
//!
//! /// Counts down from `n`, then exhausts with `"liftoff"`.
//! struct Countdown {
//!     n: u32,
//! }
//!
//! impl Body for Countdown {
//!     type Input = ();
//!     type Output = u32;
//!     type Return = &'static str;
//!
//!     fn resume(&mut self, _cx: &mut Context, signal: Signal<()>) -> Result<Step<u32, &'static str>, Exception> {
//!         signal.value()?;
//!         if self.n == 0 {
//!             return Ok(Step::Exhausted("liftoff"));
//!         }
//!         self.n -= 1;
//!         Ok(Step::Yielded(self.n + 1))
//!     }
//! }
//!
//! let mut h = computation(Countdown { n: 2 });
//! assert_eq!(h.resume().unwrap(), Step::Yielded(2));
//! assert_eq!(h.resume().unwrap(), Step::Yielded(1));
//! assert_eq!(h.resume().unwrap(), Step::Exhausted("liftoff"));
//! ```

use crate::{signal::Exception, Context, Signal, Step};

/// The logic of a resumable computation.
///
/// Implementors never see their own lifecycle state: the owning [`Handle`](crate::Handle)
/// guarantees `resume` is only called on a fresh or suspended computation, and only one call is
/// ever in flight.
pub trait Body {
    /// Type of values injected with `send`.
    type Input;
    /// Type of values produced at suspension points.
    type Output;
    /// Type of the final payload carried by exhaustion.
    type Return;

    /// Run until the next suspension point or until the logic completes.
    ///
    /// `signal` is what the current suspension point receives. On the first call it is always
    /// [`Signal::Resume`]. Returning `Err` means the exception escaped the logic.
    fn resume(
        &mut self,
        cx: &mut Context,
        signal: Signal<Self::Input>,
    ) -> Result<Step<Self::Output, Self::Return>, Exception>;

    /// Called instead of `resume` when a computation that never started is closed.
    ///
    /// Pipeline stages use this to close their upstream.
    fn close_unstarted(&mut self) -> Result<(), Exception> {
        Ok(())
    }

    fn boxed<'a>(self) -> Box<dyn Body<Input = Self::Input, Output = Self::Output, Return = Self::Return> + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<I, O, R> Body for Box<dyn Body<Input = I, Output = O, Return = R> + '_> {
    type Input = I;
    type Output = O;
    type Return = R;

    fn resume(&mut self, cx: &mut Context, signal: Signal<I>) -> Result<Step<O, R>, Exception> {
        (**self).resume(cx, signal)
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        (**self).close_unstarted()
    }
}

impl<I, O, R> Body for Box<dyn Body<Input = I, Output = O, Return = R> + Send + '_> {
    type Input = I;
    type Output = O;
    type Return = R;

    fn resume(&mut self, cx: &mut Context, signal: Signal<I>) -> Result<Step<O, R>, Exception> {
        (**self).resume(cx, signal)
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        (**self).close_unstarted()
    }
}

impl<L, R> Body for either::Either<L, R>
where
    L: Body,
    R: Body<Input = L::Input, Output = L::Output, Return = L::Return>,
{
    type Input = L::Input;
    type Output = L::Output;
    type Return = L::Return;

    fn resume(
        &mut self,
        cx: &mut Context,
        signal: Signal<Self::Input>,
    ) -> Result<Step<Self::Output, Self::Return>, Exception> {
        match self {
            either::Either::Left(l) => l.resume(cx, signal),
            either::Either::Right(r) => r.resume(cx, signal),
        }
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        match self {
            either::Either::Left(l) => l.close_unstarted(),
            either::Either::Right(r) => r.close_unstarted(),
        }
    }
}
