//! Failure types for the crash explorer
//!
//! This module defines the error taxonomy the explorer deals with:
//!
//! - [`Fault`]: a failure raised by user code (or by a host object while it was
//!   being converted or enumerated)
//! - [`FailureKind`]: how the user callback failed (raised or suspended)
//! - [`ExplorerFailure`]: a failure inside the explorer itself, always reported
//!   together with the original trace
//! - [`ConfigError`]: an invalid [`ExplorerConfig`](crate::config::ExplorerConfig)
//!
//! Display-conversion failures have no error type: they are caught where values
//! are formatted and shown inline as placeholders.

use crate::host::Introspect;
use std::fmt;

/// Lifecycle entry point a user callback is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Init,
    Update,
    Draw,
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::Init => write!(f, "init"),
            EntryPoint::Update => write!(f, "update"),
            EntryPoint::Draw => write!(f, "draw"),
        }
    }
}

/// A failure raised by user code
///
/// The optional context is the failing execution context; without it the
/// explorer can still show the message, but no frames.
pub struct Fault {
    message: String,
    context: Option<Box<dyn Introspect>>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Fault {
            message: message.into(),
            context: None,
        }
    }

    /// Create a fault that carries the context it was raised in
    pub fn with_context(message: impl Into<String>, context: Box<dyn Introspect>) -> Self {
        Fault {
            message: message.into(),
            context: Some(context),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&dyn Introspect> {
        self.context.as_deref()
    }

    pub fn into_parts(self) -> (String, Option<Box<dyn Introspect>>) {
        (self.message, self.context)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("message", &self.message)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Fault {}

/// How the user callback failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The callback returned an error or panicked
    Raised,
    /// The callback suspended instead of running to completion
    IllegalSuspension(EntryPoint),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Raised => write!(f, "raised"),
            FailureKind::IllegalSuspension(entry) => write!(f, "illegal suspension in {}", entry),
        }
    }
}

/// A failure inside the explorer while it was showing another failure
///
/// Its `Display` output always starts with the original trace so the primary
/// failure is never masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerFailure {
    pub original_trace: String,
    pub description: String,
}

impl fmt::Display for ExplorerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\nerror explorer failed:\n{}",
            self.original_trace, self.description
        )
    }
}

impl std::error::Error for ExplorerFailure {}

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The frame cap must allow at least one frame
    ZeroMaxFrames,

    /// A wheel notch must scroll at least one row
    ZeroWheelStep,

    /// Smoothing factor outside (0, 1)
    SmoothingOutOfRange { value: f32 },

    /// A command-line argument could not be parsed
    InvalidArgument { argument: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxFrames => write!(f, "max_frames must be at least 1"),
            ConfigError::ZeroWheelStep => write!(f, "wheel_step must be at least 1"),
            ConfigError::SmoothingOutOfRange { value } => {
                write!(f, "scroll_smoothing must be in (0, 1), got {}", value)
            }
            ConfigError::InvalidArgument { argument, message } => {
                write!(f, "invalid argument '{}': {}", argument, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
