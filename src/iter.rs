//! Iterator adapter over a computation handle.
//!
//! [`Iter`] resumes the wrapped handle once per `next()` and yields each produced value until the
//! computation exhausts. The final payload is kept, so it stays reachable after the loop ends.
//!
//! # Examples
//!
//! ```rust
//! use resumable::prelude::*;
//!
//! let mut countdown = 3;
//! let h = computation(from_fn(move |_cx: &mut Context, signal: Signal<()>| {
//!     signal.value()?;
//!     if countdown == 0 {
//!         return Ok(Step::Exhausted("liftoff"));
//!     }
//!     countdown -= 1;
//!     Ok(Step::Yielded(countdown + 1))
//! }));
//!
//! let mut iter = h.into_iter();
//! let values: Vec<_> = iter.by_ref().map(Result::unwrap).collect();
//! assert_eq!(values, vec![3, 2, 1]);
//! assert_eq!(iter.into_return(), Some("liftoff"));
//! ```

use crate::{Body, Error, Handle, Step};

/// Iterator adapter for a [`Handle`].
///
/// Items are `Result`s: a failure ends the iteration after being yielded once. Both `Iter` and
/// `&mut Iter` implement `Iterator`, so iterating by reference leaves the return value available.
///
/// Dropping an `Iter` part way through drops the handle, which closes the computation according to
/// its [`DropPolicy`](crate::DropPolicy).
pub struct Iter<B: Body> {
    state: IterState<B>,
}

enum IterState<B: Body> {
    Active(Handle<B>),
    Complete(B::Return),
    Failed,
}

impl<B: Body> Iter<B> {
    pub fn new(handle: Handle<B>) -> Self {
        Self {
            state: IterState::Active(handle),
        }
    }

    /// Check if the computation has exhausted.
    pub fn is_complete(&self) -> bool {
        matches!(self.state, IterState::Complete(_))
    }

    /// Consume the iterator and return the final payload if the computation exhausted.
    pub fn into_return(self) -> Option<B::Return> {
        match self.state {
            IterState::Complete(ret) => Some(ret),
            _ => None,
        }
    }

    /// Get a reference to the final payload if the computation exhausted.
    pub fn return_value(&self) -> Option<&B::Return> {
        match &self.state {
            IterState::Complete(ret) => Some(ret),
            _ => None,
        }
    }

    /// The wrapped handle, until the computation ends.
    pub fn handle(&self) -> Option<&Handle<B>> {
        match &self.state {
            IterState::Active(handle) => Some(handle),
            _ => None,
        }
    }
}

impl<B: Body> Iterator for Iter<B> {
    type Item = Result<B::Output, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = match &mut self.state {
            IterState::Active(handle) => handle,
            IterState::Complete(_) | IterState::Failed => return None,
        };
        match handle.resume() {
            Ok(Step::Yielded(output)) => Some(Ok(output)),
            Ok(Step::Exhausted(ret)) => {
                self.state = IterState::Complete(ret);
                None
            }
            Err(err) => {
                self.state = IterState::Failed;
                Some(Err(err))
            }
        }
    }
}

impl<B: Body> IntoIterator for Handle<B> {
    type Item = Result<B::Output, Error>;
    type IntoIter = Iter<B>;

    fn into_iter(self) -> Iter<B> {
        Iter::new(self)
    }
}
