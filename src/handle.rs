//! The caller-side driver of a computation.
//!
//! A [`Handle`] owns one [`Body`] together with its lifecycle [`State`] and cleanup
//! [`Context`]. Every interaction goes through four operations:
//!
//! - [`Handle::resume`] starts a fresh computation or continues a suspended one
//! - [`Handle::send`] continues a suspended computation, delivering a value to its suspension point
//! - [`Handle::throw`] raises an exception at the suspension point
//! - [`Handle::close`] asks the computation to stop; idempotent
//!
//! Whichever way a computation ends, its registered cleanup runs exactly once before the operation
//! that ended it returns.

use std::borrow::Cow;

use tracing::{debug, error, trace, warn};

use crate::{
    error::{CleanupFailure, Error, UsageError},
    signal::{is_close_request, Exception},
    Body, Context, Operation, Signal, State, Step,
};

/// What happens when a handle is dropped while its computation is still suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Close the computation so its cleanup runs. Failures are logged.
    #[default]
    Close,
    /// Drop it in place. Registered cleanup never runs.
    Leak,
}

/// Per-handle settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Label attached to every log record about this computation.
    pub name: Cow<'static, str>,
    pub on_drop: DropPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("computation"),
            on_drop: DropPolicy::default(),
        }
    }
}

impl Config {
    /// Default settings with a custom log name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set what dropping a suspended handle does.
    pub fn on_drop(mut self, policy: DropPolicy) -> Self {
        self.on_drop = policy;
        self
    }
}

/// Exclusive driver of one computation.
///
/// Operations take `&mut self`, so a handle can never be driven from two places at once. A handle
/// is `Send` whenever its body is, which lets independent computations run on separate threads.
pub struct Handle<B: Body> {
    body: B,
    state: State,
    cx: Context,
    config: Config,
}

/// Wrap a unit of suspendable logic in a fresh handle, in the `Created` state.
///
/// ```rust
/// use resumable::prelude::*;
///
/// let h = computation(from_iter(1..=3));
/// assert_eq!(h.state(), State::Created);
/// ```
pub fn computation<B: Body>(body: B) -> Handle<B> {
    Handle::new(body)
}

impl<B: Body> Handle<B> {
    /// Wrap `body` in a fresh handle with the default [`Config`]. Same as [`computation`].
    pub fn new(body: B) -> Self {
        Self::with_config(body, Config::default())
    }

    /// Wrap `body` in a fresh handle with custom settings.
    ///
    /// ```rust
    /// use resumable::{from_iter, Config, DropPolicy, Handle};
    ///
    /// let h = Handle::with_config(from_iter(0..3), Config::named("digits").on_drop(DropPolicy::Leak));
    /// assert_eq!(h.name(), "digits");
    /// ```
    pub fn with_config(body: B, config: Config) -> Self {
        trace!(computation = %config.name, "created");
        Self {
            body,
            state: State::Created,
            cx: Context::new(),
            config,
        }
    }

    /// Create a handle and advance it to its first suspension point, discarding the value produced
    /// there, so the computation is ready to receive `send` right away.
    ///
    /// If the logic exhausts without suspending, the returned handle is already `Exhausted`.
    ///
    /// ```rust
    /// use resumable::prelude::*;
    ///
    /// let mut total = 0;
    /// let mut summer = Handle::primed(from_fn(move |_cx: &mut Context, signal: Signal<i32>| {
    ///     total += signal.value()?.unwrap_or(0);
    ///     Ok(Step::<i32, ()>::Yielded(total))
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(summer.send(5).unwrap(), Step::Yielded(5));
    /// assert_eq!(summer.send(7).unwrap(), Step::Yielded(12));
    /// ```
    pub fn primed(body: B) -> Result<Self, Error> {
        let mut handle = Self::new(body);
        handle.resume()?;
        Ok(handle)
    }

    /// The current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once the computation is `Exhausted`, `Closed` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The log name from this handle's [`Config`].
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The settings this handle was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the computation's logic, for inspection between operations.
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Start the computation, or continue it from its suspension point without injecting anything.
    ///
    /// Fails with a usage error if the computation is terminal.
    pub fn resume(&mut self) -> Result<Step<B::Output, B::Return>, Error> {
        match self.state {
            State::Created | State::Suspended => self.run(Signal::Resume),
            state => Err(self.usage(Operation::Resume, state)),
        }
    }

    /// Continue a suspended computation, delivering `value` to its suspension point.
    ///
    /// Fails with a usage error unless the computation is `Suspended`; a fresh computation has no
    /// suspension point to receive the value yet.
    pub fn send(&mut self, value: B::Input) -> Result<Step<B::Output, B::Return>, Error> {
        match self.state {
            State::Suspended => self.run(Signal::Send(value)),
            state => Err(self.usage(Operation::Send, state)),
        }
    }

    /// Raise `exception` at the suspension point of a suspended computation.
    ///
    /// If the logic catches it, this behaves like `resume`. Otherwise the computation fails, its
    /// cleanup runs, and the exception comes back as [`Error::Unhandled`].
    pub fn throw(
        &mut self,
        exception: impl Into<Exception>,
    ) -> Result<Step<B::Output, B::Return>, Error> {
        match self.state {
            State::Suspended => self.run(Signal::Throw(exception.into())),
            state => Err(self.usage(Operation::Throw, state)),
        }
    }

    /// Stop the computation.
    ///
    /// A fresh computation goes straight to `Closed`. A suspended one receives a close request at
    /// its suspension point; unless the logic intercepts it, cleanup runs and the computation
    /// becomes `Closed`. Closing a terminal computation is a no-op.
    ///
    /// `Err` is only returned to surface a failure of the computation itself while closing: an
    /// exception other than the close request, a value yielded in response to it, or a failing
    /// cleanup action. The computation is terminal afterwards either way.
    ///
    /// A computation whose logic panicked mid-operation is still `Running`. Closing it skips the
    /// logic, runs its cleanup and leaves it `Failed`.
    pub fn close(&mut self) -> Result<(), Error> {
        match self.state {
            State::Created => {
                self.transition(State::Closed);
                self.body.close_unstarted().map_err(|exception| {
                    warn!(computation = %self.config.name, error = %exception, "closing unstarted computation failed");
                    Error::Unhandled(exception)
                })
            }
            State::Suspended => {
                self.transition(State::Running);
                match self.body.resume(&mut self.cx, Signal::Close) {
                    Ok(Step::Exhausted(_)) => self.finish(State::Closed, Ok(())),
                    Ok(Step::Yielded(_)) => self.finish(State::Failed, Err(Error::IgnoredClose)),
                    Err(exception) if is_close_request(&exception) => {
                        self.finish(State::Closed, Ok(()))
                    }
                    Err(exception) => {
                        self.finish(State::Failed, Err(Error::Unhandled(exception)))
                    }
                }
            }
            State::Running => {
                warn!(computation = %self.config.name, "closing a computation left running by a panic");
                self.finish(State::Failed, Ok(()))
            }
            State::Exhausted | State::Closed | State::Failed => Ok(()),
        }
    }

    fn run(&mut self, signal: Signal<B::Input>) -> Result<Step<B::Output, B::Return>, Error> {
        self.transition(State::Running);
        match self.body.resume(&mut self.cx, signal) {
            Ok(Step::Yielded(output)) => {
                self.transition(State::Suspended);
                Ok(Step::Yielded(output))
            }
            Ok(Step::Exhausted(payload)) => {
                self.finish(State::Exhausted, Ok(Step::Exhausted(payload)))
            }
            Err(exception) => self.finish(State::Failed, Err(Error::Unhandled(exception))),
        }
    }

    /// Enter a terminal state, running cleanup first.
    fn finish<T>(&mut self, terminal: State, outcome: Result<T, Error>) -> Result<T, Error> {
        let mut failures = self.cx.unwind();
        for failure in &failures {
            warn!(computation = %self.config.name, error = %failure, "cleanup action failed");
        }

        let (terminal, outcome) = match failures.pop() {
            None => (terminal, outcome),
            Some(error) => {
                let failure = CleanupFailure {
                    error,
                    suppressed: failures,
                    cause: outcome.err().map(Box::new),
                };
                (State::Failed, Err(Error::Cleanup(failure)))
            }
        };

        self.transition(terminal);
        if let Err(err) = &outcome {
            debug!(computation = %self.config.name, state = %terminal, error = %err, "computation ended with error");
        } else {
            debug!(computation = %self.config.name, state = %terminal, "computation ended");
        }
        outcome
    }

    fn transition(&mut self, to: State) {
        debug_assert!(
            self.state.can_transition(to),
            "illegal transition {} -> {}",
            self.state,
            to
        );
        trace!(computation = %self.config.name, from = %self.state, to = %to, "transition");
        self.state = to;
    }

    fn usage(&self, op: Operation, state: State) -> Error {
        debug!(computation = %self.config.name, %op, %state, "usage error");
        Error::Usage(UsageError { op, state })
    }
}

impl<B: Body> Drop for Handle<B> {
    fn drop(&mut self) {
        let live = matches!(self.state, State::Suspended | State::Running);
        if !live || std::thread::panicking() {
            return;
        }
        match self.config.on_drop {
            DropPolicy::Close => {
                if let Err(err) = self.close() {
                    error!(computation = %self.config.name, error = %err, "close on drop failed");
                }
            }
            DropPolicy::Leak => {
                warn!(
                    computation = %self.config.name,
                    pending_cleanups = self.cx.pending_cleanups(),
                    state = %self.state,
                    "live computation dropped without close"
                );
            }
        }
    }
}

impl<B: Body> std::fmt::Debug for Handle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.config.name)
            .field("state", &self.state)
            .field("cx", &self.cx)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::from_fn;
    use proptest::prelude::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("value error: {0}")]
    struct ValueError(&'static str);

    #[derive(Debug, Error)]
    #[error("type error: {0}")]
    struct TypeError(&'static str);

    /// Produces 1, 2, 3 then exhausts with "done".
    fn one_two_three() -> Handle<impl Body<Input = (), Output = i32, Return = &'static str>> {
        let mut next = 1;
        computation(from_fn(move |_cx: &mut Context, signal: Signal<()>| {
            signal.value()?;
            if next > 3 {
                return Ok(Step::Exhausted("done"));
            }
            next += 1;
            Ok(Step::Yielded(next - 1))
        }))
    }

    /// Yields whatever was last sent, starting with `None`.
    fn echo() -> Handle<impl Body<Input = &'static str, Output = Option<&'static str>, Return = ()>> {
        computation(from_fn(|_cx: &mut Context, signal: Signal<&'static str>| {
            Ok(Step::<_, ()>::Yielded(signal.value()?))
        }))
    }

    /// Registers one cleanup on start, recovers from `ValueError` by yielding "recovered",
    /// and lets every other exception escape.
    fn guarded_logic(
        cleanups: Arc<AtomicUsize>,
    ) -> impl Body<Input = (), Output = &'static str, Return = ()> + Send {
        let mut started = false;
        from_fn(move |cx: &mut Context, signal: Signal<()>| {
            if !started {
                started = true;
                let cleanups = Arc::clone(&cleanups);
                cx.defer(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                });
                return Ok(Step::Yielded("ready"));
            }
            match signal.value() {
                Ok(_) => Ok(Step::Yielded("tick")),
                Err(exc) if exc.is::<ValueError>() => Ok(Step::Yielded("recovered")),
                Err(exc) => Err(exc),
            }
        })
    }

    fn guarded(
        cleanups: Arc<AtomicUsize>,
    ) -> Handle<impl Body<Input = (), Output = &'static str, Return = ()>> {
        computation(guarded_logic(cleanups))
    }

    #[test]
    fn test_scenario_a_suspend_resume_then_exhaust() {
        let mut h = one_two_three();
        assert_eq!(h.resume().unwrap(), Step::Yielded(1));
        assert_eq!(h.state(), State::Suspended);
        assert_eq!(h.resume().unwrap(), Step::Yielded(2));
        assert_eq!(h.resume().unwrap(), Step::Yielded(3));
        assert_eq!(h.resume().unwrap(), Step::Exhausted("done"));
        assert_eq!(h.state(), State::Exhausted);
    }

    #[test]
    fn test_scenario_b_send_echo() {
        let mut h = echo();
        assert_eq!(h.resume().unwrap(), Step::Yielded(None));
        assert_eq!(h.send("x").unwrap(), Step::Yielded(Some("x")));
        assert_eq!(h.send("y").unwrap(), Step::Yielded(Some("y")));
    }

    #[test]
    fn test_scenario_c_throw_caught_internally() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = guarded(Arc::clone(&cleanups));
        h.resume().unwrap();

        assert_eq!(h.throw(ValueError("bad")).unwrap(), Step::Yielded("recovered"));
        assert_eq!(h.state(), State::Suspended);
        assert_eq!(h.resume().unwrap(), Step::Yielded("tick"));
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scenario_d_throw_uncaught_fails_and_cleans_up_once() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = guarded(Arc::clone(&cleanups));
        h.resume().unwrap();

        let err = h.throw(TypeError("wrong")).unwrap_err();
        assert!(matches!(err, Error::Unhandled(_)));
        assert!(err.exception().is_some_and(|e| e.is::<TypeError>()));
        assert_eq!(h.state(), State::Failed);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);

        h.close().unwrap();
        drop(h);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_send_and_throw_before_start_are_usage_errors_without_running_logic() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut h = computation(from_fn(move |_cx: &mut Context, signal: Signal<i32>| {
            counter.fetch_add(1, Ordering::SeqCst);
            signal.value()?;
            Ok(Step::<i32, ()>::Yielded(0))
        }));

        let err = h.send(1).unwrap_err();
        assert!(matches!(
            err,
            Error::Usage(UsageError { op: Operation::Send, state: State::Created })
        ));
        assert!(h.throw(ValueError("early")).unwrap_err().is_usage());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(h.state(), State::Created);
    }

    #[test]
    fn test_operations_on_exhausted_are_usage_errors_except_close() {
        let mut h = one_two_three();
        while h.resume().unwrap().is_yielded() {}

        for err in [h.resume().unwrap_err(), h.throw(ValueError("late")).unwrap_err()] {
            assert!(err.is_usage());
        }
        assert!(h.send(()).unwrap_err().is_usage());
        h.close().unwrap();
        assert_eq!(h.state(), State::Exhausted);
    }

    #[test]
    fn test_close_created_skips_logic() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut h = computation(from_fn(move |_cx: &mut Context, _signal: Signal<()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Step::<(), ()>::Yielded(()))
        }));

        h.close().unwrap();
        assert_eq!(h.state(), State::Closed);
        assert!(h.resume().unwrap_err().is_usage());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = guarded(Arc::clone(&cleanups));
        h.resume().unwrap();

        h.close().unwrap();
        assert_eq!(h.state(), State::Closed);
        h.close().unwrap();
        assert_eq!(h.state(), State::Closed);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logic_intercepting_close_finishes_closed() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&log);
        let mut h = computation(from_fn(move |_cx: &mut Context, signal: Signal<()>| {
            match signal.value() {
                Ok(_) => Ok(Step::Yielded(())),
                Err(exc) if is_close_request(&exc) => {
                    seen.lock().unwrap().push("released resources");
                    Ok(Step::Exhausted(()))
                }
                Err(exc) => Err(exc),
            }
        }));

        h.resume().unwrap();
        h.close().unwrap();
        assert_eq!(h.state(), State::Closed);
        assert_eq!(*log.lock().unwrap(), vec!["released resources"]);
    }

    #[test]
    fn test_yield_after_close_request_fails() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut h = computation(from_fn(move |_cx: &mut Context, _signal: Signal<()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Step::<_, ()>::Yielded("still here"))
        }));
        h.resume().unwrap();

        assert!(matches!(h.close().unwrap_err(), Error::IgnoredClose));
        assert_eq!(h.state(), State::Failed);
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        assert!(h.send(()).unwrap_err().is_usage());
        assert!(h.throw(ValueError("late")).unwrap_err().is_usage());
        h.close().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    /// Registers one cleanup on start, then panics on the next resume.
    fn panics_when_resumed(
        cleanups: Arc<AtomicUsize>,
    ) -> Handle<impl Body<Input = (), Output = (), Return = ()>> {
        computation(from_fn(move |cx: &mut Context, signal: Signal<()>| {
            if cx.pending_cleanups() == 0 {
                let cleanups = Arc::clone(&cleanups);
                cx.defer(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                });
                return Ok(Step::<(), ()>::Yielded(()));
            }
            signal.value()?;
            panic!("logic bug");
        }))
    }

    fn resume_and_catch_panic<B: Body>(h: &mut Handle<B>) {
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = h.resume();
        }));
        assert!(caught.is_err());
    }

    #[test]
    fn test_close_after_caught_panic_runs_cleanup_once() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = panics_when_resumed(Arc::clone(&cleanups));
        h.resume().unwrap();
        resume_and_catch_panic(&mut h);

        assert_eq!(h.state(), State::Running);
        assert!(h.resume().unwrap_err().is_usage());
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);

        h.close().unwrap();
        assert_eq!(h.state(), State::Failed);
        h.close().unwrap();
        drop(h);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_after_caught_panic_runs_cleanup() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = panics_when_resumed(Arc::clone(&cleanups));
        h.resume().unwrap();
        resume_and_catch_panic(&mut h);
        drop(h);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cleanup_failure_supersedes_and_remaining_cleanup_runs() {
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);
        let mut h = computation(from_fn(move |cx: &mut Context, signal: Signal<()>| {
            if cx.pending_cleanups() == 0 {
                let counter = Arc::clone(&counter);
                cx.defer(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
                cx.try_defer(|| Err(ValueError("cleanup broke").into()));
                return Ok(Step::Yielded(()));
            }
            signal.value()?;
            Ok(Step::Exhausted(()))
        }));

        h.resume().unwrap();
        let err = h.throw(TypeError("original")).unwrap_err();
        let failure = match err {
            Error::Cleanup(failure) => failure,
            other => panic!("expected cleanup failure, got {other:?}"),
        };
        assert!(failure.error.is::<ValueError>());
        assert!(failure.suppressed.is_empty());
        let cause = failure.cause.expect("original failure is chained");
        assert!(cause.exception().is_some_and(|e| e.is::<TypeError>()));
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(h.state(), State::Failed);
    }

    #[test]
    fn test_cleanup_failure_on_exhaustion_turns_into_failed() {
        let mut h = computation(from_fn(|cx: &mut Context, signal: Signal<()>| {
            signal.value()?;
            cx.try_defer(|| Err("disk full".into()));
            Ok(Step::<(), _>::Exhausted(7))
        }));

        let err = h.resume().unwrap_err();
        assert!(matches!(&err, Error::Cleanup(f) if f.cause.is_none()));
        assert_eq!(err.to_string(), "cleanup action failed: disk full");
        assert_eq!(h.state(), State::Failed);
    }

    #[test]
    fn test_drop_closes_suspended_computation() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = guarded(Arc::clone(&cleanups));
        h.resume().unwrap();
        drop(h);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_leak_policy_skips_cleanup_on_drop() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let mut h = Handle::with_config(
            guarded_logic(Arc::clone(&cleanups)),
            Config::named("leaky").on_drop(DropPolicy::Leak),
        );
        assert_eq!(h.name(), "leaky");
        h.resume().unwrap();
        drop(h);
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_primed_is_ready_for_send() {
        let mut h = Handle::primed(from_fn(|_cx: &mut Context, signal: Signal<u8>| {
            Ok(Step::<_, ()>::Yielded(signal.value()?.map(|v| v * 2)))
        }))
        .unwrap();
        assert_eq!(h.state(), State::Suspended);
        assert_eq!(h.send(4).unwrap(), Step::Yielded(Some(8)));
    }

    #[test]
    fn test_independent_handles_on_separate_threads() {
        let workers: Vec<_> = (0..4)
            .map(|offset| {
                std::thread::spawn(move || {
                    let mut h = computation(crate::build::from_iter(offset..offset + 3));
                    let mut seen = Vec::new();
                    while let Step::Yielded(v) = h.resume().unwrap() {
                        seen.push(v);
                    }
                    seen
                })
            })
            .collect();

        for (offset, worker) in workers.into_iter().enumerate() {
            let offset = offset as i32;
            assert_eq!(worker.join().unwrap(), vec![offset, offset + 1, offset + 2]);
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Ending {
        Exhaust,
        Close,
        Throw,
    }

    fn any_ending() -> impl Strategy<Value = Ending> {
        prop_oneof![Just(Ending::Exhaust), Just(Ending::Close), Just(Ending::Throw)]
    }

    /// Registers `k` cleanups on start, each logging its registration index. Exhausts on the next
    /// resume and lets every exception escape.
    fn registers_cleanups(
        k: usize,
        log: Arc<Mutex<Vec<usize>>>,
        runs: Arc<AtomicUsize>,
    ) -> Handle<impl Body<Input = (), Output = (), Return = ()>> {
        let mut started = false;
        computation(from_fn(move |cx: &mut Context, signal: Signal<()>| {
            runs.fetch_add(1, Ordering::SeqCst);
            if !started {
                started = true;
                for i in 0..k {
                    let log = Arc::clone(&log);
                    cx.defer(move || log.lock().unwrap().push(i));
                }
                return Ok(Step::Yielded(()));
            }
            signal.value()?;
            Ok(Step::Exhausted(()))
        }))
    }

    proptest! {
        #[test]
        fn prop_cleanup_runs_once_in_reverse_on_every_terminal_edge(k in 0usize..8, ending in any_ending()) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let runs = Arc::new(AtomicUsize::new(0));
            let mut h = registers_cleanups(k, Arc::clone(&log), Arc::clone(&runs));
            h.resume().unwrap();
            prop_assert!(log.lock().unwrap().is_empty());

            let terminal = match ending {
                Ending::Exhaust => {
                    prop_assert_eq!(h.resume().unwrap(), Step::Exhausted(()));
                    State::Exhausted
                }
                Ending::Close => {
                    h.close().unwrap();
                    State::Closed
                }
                Ending::Throw => {
                    prop_assert!(matches!(h.throw(TypeError("uncaught")), Err(Error::Unhandled(_))));
                    State::Failed
                }
            };
            prop_assert_eq!(h.state(), terminal);
            let reversed: Vec<usize> = (0..k).rev().collect();
            prop_assert_eq!(&*log.lock().unwrap(), &reversed);

            let runs_at_end = runs.load(Ordering::SeqCst);
            prop_assert!(h.send(()).unwrap_err().is_usage());
            prop_assert!(h.throw(ValueError("late")).unwrap_err().is_usage());
            prop_assert!(h.resume().unwrap_err().is_usage());
            h.close().unwrap();
            prop_assert_eq!(h.state(), terminal);
            drop(h);

            prop_assert_eq!(runs.load(Ordering::SeqCst), runs_at_end);
            prop_assert_eq!(&*log.lock().unwrap(), &reversed);
        }
    }
}
