//! Bounding how much of an upstream is consumed.
//!
//! Both stages close their upstream as soon as they know they will not pull from it again, so an
//! abandoned tail of a long or infinite computation releases its resources immediately.

use super::{close_upstream, forward};
use crate::{signal::Exception, Body, Context, Handle, Signal, Step};

/// Yields at most `n` upstream values.
///
/// The upstream is closed right after the `n`-th value is pulled, and the next resume exhausts
/// with `None`. If the upstream runs out first, its final payload is forwarded as `Some`.
pub struct Take<B: Body> {
    upstream: Handle<B>,
    remaining: usize,
}

/// Create a stage that stops after `n` values.
///
/// # Examples
///
/// ```
/// use resumable::prelude::*;
///
/// let mut first_two = take(computation(from_iter(1..)), 2);
/// assert_eq!(first_two.resume().unwrap(), Step::Yielded(1));
/// assert_eq!(first_two.resume().unwrap(), Step::Yielded(2));
/// assert_eq!(first_two.resume().unwrap(), Step::Exhausted(None));
/// assert_eq!(first_two.body().upstream().state(), State::Closed);
/// ```
pub fn take<B: Body>(upstream: Handle<B>, n: usize) -> Handle<Take<B>> {
    Handle::new(Take {
        upstream,
        remaining: n,
    })
}

impl<B: Body> Take<B> {
    pub fn upstream(&self) -> &Handle<B> {
        &self.upstream
    }

    /// How many more values this stage will pass on.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<B: Body> Body for Take<B> {
    type Input = B::Input;
    type Output = B::Output;
    type Return = Option<B::Return>;

    fn resume(
        &mut self,
        _cx: &mut Context,
        signal: Signal<B::Input>,
    ) -> Result<Step<B::Output, Option<B::Return>>, Exception> {
        if self.remaining == 0 {
            close_upstream(&mut self.upstream)?;
            // nothing left to deliver the signal to; raise it here
            signal.value()?;
            return Ok(Step::Exhausted(None));
        }

        match forward(&mut self.upstream, signal)? {
            Step::Yielded(value) => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    close_upstream(&mut self.upstream)?;
                }
                Ok(Step::Yielded(value))
            }
            Step::Exhausted(payload) => Ok(Step::Exhausted(Some(payload))),
        }
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        close_upstream(&mut self.upstream)
    }
}

/// Yields upstream values while a predicate holds.
///
/// The first rejected value is discarded, the upstream is closed, and the stage exhausts with
/// `None`.
pub struct TakeWhile<B: Body, P> {
    upstream: Handle<B>,
    predicate: P,
}

/// Create a stage that stops at the first value rejected by `predicate`.
///
/// # Examples
///
/// ```
/// use resumable::prelude::*;
///
/// let small: Vec<_> = take_while(computation(from_iter(1..)), |n: &u32| *n < 4)
///     .into_iter()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(small, vec![1, 2, 3]);
/// ```
pub fn take_while<B, P>(upstream: Handle<B>, predicate: P) -> Handle<TakeWhile<B, P>>
where
    B: Body,
    P: FnMut(&B::Output) -> bool,
{
    Handle::new(TakeWhile {
        upstream,
        predicate,
    })
}

impl<B: Body, P> TakeWhile<B, P> {
    pub fn upstream(&self) -> &Handle<B> {
        &self.upstream
    }
}

impl<B, P> Body for TakeWhile<B, P>
where
    B: Body,
    P: FnMut(&B::Output) -> bool,
{
    type Input = B::Input;
    type Output = B::Output;
    type Return = Option<B::Return>;

    fn resume(
        &mut self,
        _cx: &mut Context,
        signal: Signal<B::Input>,
    ) -> Result<Step<B::Output, Option<B::Return>>, Exception> {
        match forward(&mut self.upstream, signal)? {
            Step::Yielded(value) if (self.predicate)(&value) => Ok(Step::Yielded(value)),
            Step::Yielded(_) => {
                close_upstream(&mut self.upstream)?;
                Ok(Step::Exhausted(None))
            }
            Step::Exhausted(payload) => Ok(Step::Exhausted(Some(payload))),
        }
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        close_upstream(&mut self.upstream)
    }
}
