//! Commonly used imports
//!
//! Use `use resumable::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Body, Context, Error, Exception, Handle, Signal, State, Step};

// Constructors
pub use crate::{computation, from_fn, from_iter};

// Composition
pub use crate::compose::{chain, filter, map, take, take_while};

// Execution
pub use crate::drive::{drive, drive_async};
