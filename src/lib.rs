//! # Resumable: suspendable computations with an explicit control protocol
//!
//! A computation is a unit of logic that produces a sequence of values lazily, pausing at
//! suspension points and continuing when its caller drives it again. The caller drives it through
//! a [`Handle`] with four operations: `resume`, `send`, `throw` and `close`.
//!
//! ## Core Pieces
//!
//! - **[`Body`]**: the computation's logic, written as an explicit state machine
//! - **[`Handle`]**: the exclusive caller-side driver, tracking the lifecycle [`State`]
//! - **[`Signal`]**: what a suspension point receives: nothing, a value, an exception, or a close
//!   request
//! - **[`Context`]**: the cleanup stack, unwound exactly once whichever way the computation ends
//!
//! ## Example
//!
//! ```
//! use resumable::prelude::*;
//!
//! // yields whatever was last sent, and cleans up when it stops
//! let mut echo = computation(from_fn(|cx: &mut Context, signal: Signal<&'static str>| {
//!     if cx.pending_cleanups() == 0 {
//!         cx.defer(|| println!("echo released"));
//!     }
//!     Ok(Step::<_, ()>::Yielded(signal.value()?))
//! }));
//!
//! assert_eq!(echo.resume().unwrap(), Step::Yielded(None));
//! assert_eq!(echo.send("x").unwrap(), Step::Yielded(Some("x")));
//! echo.close().unwrap();
//! assert_eq!(echo.state(), State::Closed);
//! ```
//!
//! ## Common Functions
//!
//! **Building computations:**
//! - [`computation(body)`](computation) - wrap logic in a fresh handle
//! - [`from_fn(f)`](from_fn) - logic from a closure
//! - [`from_iter(iter)`](from_iter) - a lazy source over an iterator
//!
//! **Pipelines:**
//! - [`map`], [`filter`], [`take`], [`take_while`], [`chain`]
//!
//! **Execution:**
//! - [`drive(handle, responder)`](drive) - answer every yield until exhaustion
//! - [`drive_async(handle, responder)`](drive_async) - the same with async responses
//! - `for value in handle` - see [`Iter`]

pub mod body;
pub mod build;
pub mod compose;
pub mod context;
pub mod drive;
pub mod error;
pub mod handle;
pub mod iter;
pub mod prelude;
pub mod signal;
pub mod state;
pub mod step;

pub use body::Body;
pub use build::{from_fn, from_iter, FromFn, FromIter};
pub use compose::{chain, filter, map, take, take_while, Chain, Filter, Map, Take, TakeWhile};
pub use context::Context;
pub use drive::{drive, drive_async};
pub use error::{CleanupFailure, Error, UsageError};
pub use handle::{computation, Config, DropPolicy, Handle};
pub use iter::Iter;
pub use signal::{is_close_request, CloseRequested, Exception, Signal};
pub use state::{Operation, State};
pub use step::Step;
