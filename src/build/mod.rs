//! Building computations from scratch
//!
//! Ready-made bodies for the common cases: a closure-backed state machine and a lazy source over
//! an iterator.

mod func;

pub use func::{from_fn, from_iter, FromFn, FromIter};
