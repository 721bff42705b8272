use std::marker::PhantomData;

use crate::{signal::Exception, Body, Context, Signal, Step};

/// A computation whose logic is a closure.
///
/// The closure's captured variables are the computation's locals; it is called once per handle
/// operation with the signal delivered to the current suspension point.
pub struct FromFn<F, I, O, R> {
    f: F,
    _marker: PhantomData<fn(I) -> (O, R)>,
}

impl<F, I, O, R> Body for FromFn<F, I, O, R>
where
    F: FnMut(&mut Context, Signal<I>) -> Result<Step<O, R>, Exception>,
{
    type Input = I;
    type Output = O;
    type Return = R;

    fn resume(&mut self, cx: &mut Context, signal: Signal<I>) -> Result<Step<O, R>, Exception> {
        (self.f)(cx, signal)
    }
}

/// Create a computation body from a closure.
///
/// ```rust
/// use resumable::prelude::*;
///
/// let mut calls = 0;
/// let mut h = computation(from_fn(move |_cx: &mut Context, signal: Signal<()>| {
///     signal.value()?;
///     calls += 1;
///     if calls < 3 { Ok(Step::Yielded(calls)) } else { Ok(Step::Exhausted("finished")) }
/// }));
///
/// assert_eq!(h.resume().unwrap(), Step::Yielded(1));
/// assert_eq!(h.resume().unwrap(), Step::Yielded(2));
/// assert_eq!(h.resume().unwrap(), Step::Exhausted("finished"));
/// ```
pub fn from_fn<I, O, R, F>(f: F) -> FromFn<F, I, O, R>
where
    F: FnMut(&mut Context, Signal<I>) -> Result<Step<O, R>, Exception>,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

/// A lazy source over an iterator.
///
/// Each resume pulls exactly one item. Thrown exceptions are not caught, and a close request
/// simply stops the source.
pub struct FromIter<It> {
    iter: It,
}

impl<It: Iterator> Body for FromIter<It> {
    type Input = ();
    type Output = It::Item;
    type Return = ();

    fn resume(&mut self, _cx: &mut Context, signal: Signal<()>) -> Result<Step<It::Item, ()>, Exception> {
        signal.value()?;
        Ok(match self.iter.next() {
            Some(item) => Step::Yielded(item),
            None => Step::Exhausted(()),
        })
    }
}

/// Create a source computation from anything iterable.
///
/// ```rust
/// use resumable::prelude::*;
///
/// let mut h = computation(from_iter(["a", "b"]));
/// assert_eq!(h.resume().unwrap(), Step::Yielded("a"));
/// assert_eq!(h.resume().unwrap(), Step::Yielded("b"));
/// assert_eq!(h.resume().unwrap(), Step::Exhausted(()));
/// ```
pub fn from_iter<T: IntoIterator>(iter: T) -> FromIter<T::IntoIter> {
    FromIter {
        iter: iter.into_iter(),
    }
}
