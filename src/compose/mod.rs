//! Pipeline stages
//!
//! Each stage is a [`Body`] that owns the [`Handle`] of its upstream computation, so stages nest
//! into arbitrarily long chains and every chain is itself a computation. Stages are pull-based:
//! nothing upstream runs until the stage's own handle is driven, and no stage buffers values.
//!
//! Signals received by a stage are delegated to the upstream suspension point: `send` and
//! `throw` reach the upstream logic, and `close` closes the upstream exactly once before the
//! stage itself becomes `Closed`.
//!
//! ```rust
//! use resumable::prelude::*;
//!
//! let squares_of_odds = computation(from_iter(1..))
//!     .filter(|n: &i32| n % 2 == 1)
//!     .map(|n| n * n)
//!     .take(3);
//!
//! let values: Vec<_> = squares_of_odds.into_iter().map(Result::unwrap).collect();
//! assert_eq!(values, vec![1, 9, 25]);
//! ```

mod chain;
mod map;
mod take;

pub use chain::{chain, Chain};
pub use map::{filter, map, Filter, Map};
pub use take::{take, take_while, Take, TakeWhile};

use crate::{signal::CloseRequested, signal::Exception, Body, Error, Handle, Signal, Step};

/// Deliver `signal` to the upstream suspension point.
///
/// Upstream failures come back as exceptions raised inside the stage. A close request closes the
/// upstream and is then re-raised so the stage ends `Closed` too.
fn forward<B: Body>(
    upstream: &mut Handle<B>,
    signal: Signal<B::Input>,
) -> Result<Step<B::Output, B::Return>, Exception> {
    let step = match signal {
        Signal::Resume => upstream.resume(),
        Signal::Send(value) => upstream.send(value),
        Signal::Throw(exception) => upstream.throw(exception),
        Signal::Close => {
            close_upstream(upstream)?;
            return Err(Box::new(CloseRequested));
        }
    };
    step.map_err(Error::into_exception)
}

fn close_upstream<B: Body>(upstream: &mut Handle<B>) -> Result<(), Exception> {
    upstream.close().map_err(Error::into_exception)
}

impl<B: Body> Handle<B> {
    /// Pipe every yielded value through `f`. See [`map`].
    pub fn map<U, F>(self, f: F) -> Handle<Map<B, F>>
    where
        F: FnMut(B::Output) -> U,
    {
        map(self, f)
    }

    /// Keep only the yielded values accepted by `predicate`. See [`filter`].
    pub fn filter<P>(self, predicate: P) -> Handle<Filter<B, P>>
    where
        P: FnMut(&B::Output) -> bool,
    {
        filter(self, predicate)
    }

    /// Stop after `n` values. See [`take`].
    pub fn take(self, n: usize) -> Handle<Take<B>> {
        take(self, n)
    }

    /// Stop at the first value rejected by `predicate`. See [`take_while`].
    pub fn take_while<P>(self, predicate: P) -> Handle<TakeWhile<B, P>>
    where
        P: FnMut(&B::Output) -> bool,
    {
        take_while(self, predicate)
    }

    /// Continue with `next` once this computation exhausts. See [`chain`].
    pub fn chain<N>(self, next: N) -> Handle<Chain<B, N>>
    where
        N: Body<Input = B::Input, Output = B::Output>,
    {
        chain(self, next)
    }
}
