use tracing::warn;

use super::{close_upstream, forward};
use crate::{signal::CloseRequested, signal::Exception, Body, Context, Handle, Signal, Step};

/// Delegates to the first computation until it exhausts, then to the second.
///
/// Created via [`chain`]. Signals go to whichever computation is active, so a value sent to the
/// chain reaches the active computation's suspension point. The first computation's final payload
/// is discarded; the chain exhausts with the second's.
pub struct Chain<A: Body, B: Body> {
    first: Option<Handle<A>>,
    second: Handle<B>,
}

/// Run `first` to exhaustion, then continue with `second`.
///
/// `second` is not started until `first` exhausts. Closing the chain closes both.
///
/// ```rust
/// use resumable::prelude::*;
///
/// let both: Vec<_> = chain(computation(from_iter(1..=2)), from_iter(7..=8))
///     .into_iter()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(both, vec![1, 2, 7, 8]);
/// ```
pub fn chain<A, B>(first: Handle<A>, second: B) -> Handle<Chain<A, B>>
where
    A: Body,
    B: Body<Input = A::Input, Output = A::Output>,
{
    Handle::new(Chain {
        first: Some(first),
        second: Handle::new(second),
    })
}

impl<A: Body, B: Body> Chain<A, B> {
    /// The first computation, until it exhausts.
    pub fn first(&self) -> Option<&Handle<A>> {
        self.first.as_ref()
    }

    pub fn second(&self) -> &Handle<B> {
        &self.second
    }

    fn close_both(&mut self) -> Result<(), Exception> {
        let first = match self.first.as_mut() {
            Some(first) => close_upstream(first),
            None => Ok(()),
        };
        let second = close_upstream(&mut self.second);
        match (first, second) {
            (Err(first), Err(second)) => {
                warn!(computation = %self.second.name(), error = %second, "closing chained computation also failed");
                Err(first)
            }
            (first, second) => first.and(second),
        }
    }
}

impl<A, B> Body for Chain<A, B>
where
    A: Body,
    B: Body<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;
    type Return = B::Return;

    fn resume(
        &mut self,
        _cx: &mut Context,
        signal: Signal<A::Input>,
    ) -> Result<Step<A::Output, B::Return>, Exception> {
        if signal.is_close() {
            self.close_both()?;
            return Err(Box::new(CloseRequested));
        }

        let signal = match self.first.as_mut() {
            Some(first) => match forward(first, signal)? {
                Step::Yielded(value) => return Ok(Step::Yielded(value)),
                Step::Exhausted(_) => {
                    self.first = None;
                    // the second computation has no suspension point yet
                    Signal::Resume
                }
            },
            None => signal,
        };
        forward(&mut self.second, signal)
    }

    fn close_unstarted(&mut self) -> Result<(), Exception> {
        self.close_both()
    }
}
