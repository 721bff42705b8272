//! Transforming and filtering yielded values.

use super::{close_upstream, forward};
use crate::{signal::Exception, Body, Context, Handle, Signal, Step};

/// Applies a function to every value the upstream yields.
///
/// Exhausts when the upstream does, forwarding its final payload.
pub struct Map<B: Body, F> {
    upstream: Handle<B>,
    f: F,
}

/// Create a stage that pipes every upstream value through `f`.
///
/// # Examples
///
/// ```
/// use resumable::prelude::*;
///
/// let mut squares = map(computation(from_iter(1..)), |n: u32| n * n);
/// assert_eq!(squares.resume().unwrap(), Step::Yielded(1));
/// assert_eq!(squares.resume().unwrap(), Step::Yielded(4));
/// ```
pub fn map<B, U, F>(upstream: Handle<B>, f: F) -> Handle<Map<B, F>>
where
    B: Body,
    F: FnMut(B::Output) -> U,
{
    Handle::new(Map { upstream, f })
}

impl<B: Body, F> Map<B, F> {
    pub fn upstream(&self) -> &Handle<B> {
        &self.upstream
    }
}

impl<B, U, F> Body for Map<B, F>
where
    B: Body,
    F: FnMut(B::Output) -> U,
{
    type Input = B::Input;
    type Output = U;
    type Return = B::Return;

    fn resume(
        &mut self,
        _cx: &mut Context,
        signal: Signal<B::Input>,
    ) -> Result<Step<U, B::Return>, Exception> {
        let step = forward(&mut self.upstream, signal)?;
        Ok(step.map_yielded(&mut self.f))
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        close_upstream(&mut self.upstream)
    }
}

/// Passes on only the upstream values accepted by a predicate.
///
/// Rejected values are discarded immediately; the stage keeps pulling until a value passes or the
/// upstream exhausts.
pub struct Filter<B: Body, P> {
    upstream: Handle<B>,
    predicate: P,
}

/// Create a stage that keeps only the values accepted by `predicate`.
///
/// # Examples
///
/// ```
/// use resumable::prelude::*;
///
/// let mut evens = filter(computation(from_iter(1..=5)), |n: &i32| n % 2 == 0);
/// assert_eq!(evens.resume().unwrap(), Step::Yielded(2));
/// assert_eq!(evens.resume().unwrap(), Step::Yielded(4));
/// assert_eq!(evens.resume().unwrap(), Step::Exhausted(()));
/// ```
pub fn filter<B, P>(upstream: Handle<B>, predicate: P) -> Handle<Filter<B, P>>
where
    B: Body,
    P: FnMut(&B::Output) -> bool,
{
    Handle::new(Filter {
        upstream,
        predicate,
    })
}

impl<B: Body, P> Filter<B, P> {
    pub fn upstream(&self) -> &Handle<B> {
        &self.upstream
    }
}

impl<B, P> Body for Filter<B, P>
where
    B: Body,
    P: FnMut(&B::Output) -> bool,
{
    type Input = B::Input;
    type Output = B::Output;
    type Return = B::Return;

    fn resume(
        &mut self,
        _cx: &mut Context,
        signal: Signal<B::Input>,
    ) -> Result<Step<B::Output, B::Return>, Exception> {
        let mut step = forward(&mut self.upstream, signal)?;
        loop {
            match step {
                Step::Yielded(value) if (self.predicate)(&value) => return Ok(Step::Yielded(value)),
                Step::Yielded(_) => step = forward(&mut self.upstream, Signal::Resume)?,
                Step::Exhausted(payload) => return Ok(Step::Exhausted(payload)),
            }
        }
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        close_upstream(&mut self.upstream)
    }
}
