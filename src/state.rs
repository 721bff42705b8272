//! Lifecycle states of a computation.

use std::fmt;

/// Where a computation is in its lifecycle.
///
/// Transitions are monotonic except for `Suspended <-> Running`. `Exhausted`, `Closed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Constructed but never resumed; no suspension point exists yet.
    Created,
    /// Paused at a suspension point, waiting for the next operation.
    Suspended,
    /// Executing logic on behalf of a handle operation.
    Running,
    /// Ran to completion.
    Exhausted,
    /// Stopped by a close request.
    Closed,
    /// An exception escaped the computation's logic or its cleanup.
    Failed,
}

impl State {
    /// Returns `true` for `Exhausted`, `Closed` and `Failed`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Exhausted | State::Closed | State::Failed)
    }

    /// Whether the lifecycle permits moving from `self` to `to`.
    ///
    /// ```rust
    /// use resumable::State;
    ///
    /// assert!(State::Created.can_transition(State::Running));
    /// assert!(State::Created.can_transition(State::Closed));
    /// assert!(!State::Created.can_transition(State::Suspended));
    /// assert!(!State::Exhausted.can_transition(State::Running));
    /// ```
    pub const fn can_transition(self, to: State) -> bool {
        match (self, to) {
            (State::Created, State::Running | State::Closed) => true,
            (State::Suspended, State::Running) => true,
            (
                State::Running,
                State::Suspended | State::Exhausted | State::Closed | State::Failed,
            ) => true,
            _ => false,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Created => "created",
            State::Suspended => "suspended",
            State::Running => "running",
            State::Exhausted => "exhausted",
            State::Closed => "closed",
            State::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A resume-class handle operation, as reported in usage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`Handle::resume`](crate::Handle::resume)
    Resume,
    /// [`Handle::send`](crate::Handle::send)
    Send,
    /// [`Handle::throw`](crate::Handle::throw)
    Throw,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Resume => "resume",
            Operation::Send => "send to",
            Operation::Throw => "throw into",
        };
        f.write_str(s)
    }
}
