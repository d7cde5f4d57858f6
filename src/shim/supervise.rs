//! Supervised calls
//!
//! A supervised call runs a callback to completion within the current tick and
//! reports how it ended. Panics are caught with [`catch_unwind`] so the host's
//! own stack is never unwound past the boundary.

use crate::errors::Fault;
use crate::host::Introspect;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// What a lifecycle callback reports when it returns normally
pub enum Completion {
    /// Ran to completion
    Finished,
    /// Yielded instead of completing, optionally with the suspended context
    Suspended(Option<Box<dyn Introspect>>),
}

/// Outcome of a supervised call
pub enum Supervised {
    Completed,
    Raised(Fault),
    Suspended(Option<Box<dyn Introspect>>),
}

/// Run a lifecycle callback under supervision
pub fn supervise<F>(callback: F) -> Supervised
where
    F: FnOnce() -> Result<Completion, Fault>,
{
    match catch_panic(callback) {
        Ok(Ok(Completion::Finished)) => Supervised::Completed,
        Ok(Ok(Completion::Suspended(context))) => Supervised::Suspended(context),
        Ok(Err(fault)) => Supervised::Raised(fault),
        Err(message) => Supervised::Raised(Fault::new(message)),
    }
}

/// Run `f`, turning a panic into its message
pub fn catch_panic<R, F>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
