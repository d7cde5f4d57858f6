// Captured failure state

use crate::errors::{FailureKind, Fault};
use crate::host::Introspect;
use crate::shim::catch_panic;

/// Location parsed from a `"<path>:<line>:<description>"` failure message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLocation {
    pub path: String,
    pub line: u32,
    pub description: String,
}

/// Parse `"<path>:<line>:<rest>"`, using the first `:<digits>:` after a non-empty path
pub fn parse_location(message: &str) -> Option<MessageLocation> {
    for (colon, _) in message.match_indices(':') {
        if colon == 0 {
            continue;
        }
        let after = &message[colon + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !after[digits..].starts_with(':') {
            continue;
        }
        let Ok(line) = after[..digits].parse::<u32>() else {
            continue;
        };

        return Some(MessageLocation {
            path: message[..colon].to_string(),
            line,
            description: after[digits + 1..].trim_start().to_string(),
        });
    }
    None
}

/// The failure being explored
///
/// Created once per failure; the trace is taken from the failing context
/// before anything else touches it.
pub struct ErrorSnapshot {
    kind: FailureKind,
    message: String,
    location: Option<MessageLocation>,
    trace: String,
    context: Option<Box<dyn Introspect>>,
}

impl ErrorSnapshot {
    pub fn capture(fault: Fault, kind: FailureKind) -> Self {
        let (message, context) = fault.into_parts();
        let trace = match &context {
            Some(context) => catch_panic(|| context.traceback(&message))
                .unwrap_or_else(|panic| format!("{message}\n<traceback failed: {panic}>")),
            None => message.clone(),
        };
        let location = parse_location(&message);

        ErrorSnapshot {
            kind,
            message,
            location,
            trace,
            context,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&MessageLocation> {
        self.location.as_ref()
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn context(&self) -> Option<&dyn Introspect> {
        self.context.as_deref()
    }
}

impl std::fmt::Debug for ErrorSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSnapshot")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("location", &self.location)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}
