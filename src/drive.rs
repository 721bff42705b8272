//! Running a computation to exhaustion with a responder.
//!
//! The computation yields requests and the responder answers each one; the answer is sent back to
//! the suspension point that produced the request. This keeps protocol logic free of I/O: the
//! computation describes the conversation, the responder performs it.

use std::future::Future;

use tracing::trace;

use crate::{Body, Error, Handle, Step};

/// Drive `handle` to exhaustion, answering every yielded value with `send(responder(value))`.
///
/// The first step is a plain `resume`, so a fresh handle is started and a primed one continues
/// without an injected value. Returns the final payload, or the first error the handle reports.
///
/// ```rust
/// use resumable::prelude::*;
///
/// // asks for numbers until it has seen three, then returns their sum
/// let mut seen = Vec::new();
/// let adder = computation(from_fn(move |_cx: &mut Context, signal: Signal<i32>| {
///     seen.extend(signal.value()?);
///     if seen.len() == 3 {
///         return Ok(Step::Exhausted(seen.iter().sum::<i32>()));
///     }
///     Ok(Step::Yielded(seen.len()))
/// }));
///
/// let total = drive(adder, |index| (index as i32 + 1) * 10).unwrap();
/// assert_eq!(total, 60);
/// ```
pub fn drive<B, F>(mut handle: Handle<B>, mut responder: F) -> Result<B::Return, Error>
where
    B: Body,
    F: FnMut(B::Output) -> B::Input,
{
    let mut step = handle.resume()?;
    loop {
        match step {
            Step::Yielded(output) => {
                let input = responder(output);
                trace!(computation = %handle.name(), "responding");
                step = handle.send(input)?;
            }
            Step::Exhausted(ret) => return Ok(ret),
        }
    }
}

/// Async version of [`drive`].
///
/// The responder returns a future that produces the next input. The computation itself still
/// runs synchronously between suspension points.
pub async fn drive_async<B, F, Fut>(mut handle: Handle<B>, mut responder: F) -> Result<B::Return, Error>
where
    B: Body,
    F: FnMut(B::Output) -> Fut,
    Fut: Future<Output = B::Input>,
{
    let mut step = handle.resume()?;
    loop {
        match step {
            Step::Yielded(output) => {
                let input = responder(output).await;
                trace!(computation = %handle.name(), "responding");
                step = handle.send(input)?;
            }
            Step::Exhausted(ret) => return Ok(ret),
        }
    }
}
