//! Lifecycle interception
//!
//! The [`Interceptor`] sits between the host tick and the user's lifecycle
//! callbacks. While nothing has failed it forwards `init`, `update` and `draw`
//! to the callbacks under supervision. The first failure (an error, a panic or
//! an illegal suspension) switches it permanently into exploring mode: the
//! trace goes to the host log, presentation state is reset, and from then on
//! every tick drives the [`ExplorerSession`] instead of user code.
//!
//! # Failure Boundaries
//!
//! - **Primary**: user callbacks run inside [`supervise`]; their failures are
//!   captured, never propagated to the host.
//! - **Secondary**: session population and every explorer update/draw run
//!   inside [`catch_panic`]. A failure there is reported as an
//!   [`ExplorerFailure`] that leads with the original trace, logged, and
//!   returned to the host. The session stays in place and the next tick
//!   tries again.

mod supervise;

pub use supervise::{catch_panic, panic_message, supervise, Completion, Supervised};

use crate::config::ExplorerConfig;
use crate::errors::{ConfigError, EntryPoint, ExplorerFailure, FailureKind, Fault};
use crate::host::Host;
use crate::snapshot::ErrorSnapshot;
use crate::ui::ExplorerSession;
use tracing::{info, warn};

/// A user lifecycle callback
pub type Callback<H> = Box<dyn FnMut(&mut H) -> Result<Completion, Fault>>;

/// The user's lifecycle callbacks
pub struct Lifecycle<H> {
    pub init: Option<Callback<H>>,
    pub update: Callback<H>,
    pub draw: Callback<H>,
}

impl<H> Lifecycle<H> {
    pub fn new<U, D>(update: U, draw: D) -> Self
    where
        U: FnMut(&mut H) -> Result<Completion, Fault> + 'static,
        D: FnMut(&mut H) -> Result<Completion, Fault> + 'static,
    {
        Lifecycle {
            init: None,
            update: Box::new(update),
            draw: Box::new(draw),
        }
    }

    pub fn with_init<I>(mut self, init: I) -> Self
    where
        I: FnMut(&mut H) -> Result<Completion, Fault> + 'static,
    {
        self.init = Some(Box::new(init));
        self
    }
}

enum Mode {
    Running,
    Exploring(Box<ExplorerSession>),
}

/// Routes host ticks to user code or, after a failure, to the explorer
pub struct Interceptor<H> {
    lifecycle: Lifecycle<H>,
    config: ExplorerConfig,
    mode: Mode,
}

impl<H: Host> Interceptor<H> {
    /// Fails if `config` does not validate
    pub fn new(lifecycle: Lifecycle<H>, config: ExplorerConfig) -> Result<Self, ConfigError> {
        Ok(Interceptor {
            lifecycle,
            config: config.validate()?,
            mode: Mode::Running,
        })
    }

    pub fn is_exploring(&self) -> bool {
        matches!(self.mode, Mode::Exploring(_))
    }

    pub fn session(&self) -> Option<&ExplorerSession> {
        match &self.mode {
            Mode::Exploring(session) => Some(session),
            Mode::Running => None,
        }
    }

    /// Run the user's init callback, if there is one
    pub fn init(&mut self, host: &mut H) -> Result<(), ExplorerFailure> {
        if self.is_exploring() {
            return Ok(());
        }
        self.run_user(EntryPoint::Init, host)
    }

    /// Update phase of a host tick
    pub fn update(&mut self, host: &mut H) -> Result<(), ExplorerFailure> {
        if let Mode::Exploring(session) = &mut self.mode {
            return Self::guarded(session, host, |session, host| session.update(host));
        }
        self.run_user(EntryPoint::Update, host)
    }

    /// Draw phase of a host tick
    ///
    /// A failure in the user's draw callback is shown by the explorer in the
    /// same call, so the failing frame is never left half drawn.
    pub fn draw(&mut self, host: &mut H) -> Result<(), ExplorerFailure> {
        if !self.is_exploring() {
            self.run_user(EntryPoint::Draw, host)?;
        }
        match &mut self.mode {
            Mode::Exploring(session) => {
                Self::guarded(session, host, |session, host| session.draw(host))
            }
            Mode::Running => Ok(()),
        }
    }

    fn run_user(&mut self, entry: EntryPoint, host: &mut H) -> Result<(), ExplorerFailure> {
        let callback = match entry {
            EntryPoint::Init => match self.lifecycle.init.as_mut() {
                Some(callback) => callback,
                None => return Ok(()),
            },
            EntryPoint::Update => &mut self.lifecycle.update,
            EntryPoint::Draw => &mut self.lifecycle.draw,
        };

        let (fault, kind) = match supervise(|| callback(&mut *host)) {
            Supervised::Completed => return Ok(()),
            Supervised::Raised(fault) => (fault, FailureKind::Raised),
            Supervised::Suspended(context) => {
                let message = format!("{} suspended instead of running to completion", entry);
                let fault = match context {
                    Some(context) => Fault::with_context(message, context),
                    None => Fault::new(message),
                };
                (fault, FailureKind::IllegalSuspension(entry))
            }
        };

        self.enter_exploring(host, fault, kind)
    }

    fn enter_exploring(
        &mut self,
        host: &mut H,
        fault: Fault,
        kind: FailureKind,
    ) -> Result<(), ExplorerFailure> {
        let snapshot = ErrorSnapshot::capture(fault, kind);
        host.log(snapshot.trace());
        host.reset_presentation();
        info!(%kind, message = snapshot.message(), "failure captured, entering explorer");

        let mut session = Box::new(ExplorerSession::new(snapshot, self.config.clone()));
        let result = Self::guarded(&mut session, host, |session, host| session.populate(host));
        self.mode = Mode::Exploring(session);
        result
    }

    /// Run an explorer phase behind the secondary failure boundary
    fn guarded<F>(
        session: &mut ExplorerSession,
        host: &mut H,
        phase: F,
    ) -> Result<(), ExplorerFailure>
    where
        F: FnOnce(&mut ExplorerSession, &mut H),
    {
        match catch_panic(|| phase(&mut *session, &mut *host)) {
            Ok(()) => Ok(()),
            Err(description) => {
                let failure = ExplorerFailure {
                    original_trace: session.snapshot().trace().to_string(),
                    description,
                };
                warn!(description = %failure.description, "error explorer failed");
                host.log(&failure.to_string());
                Err(failure)
            }
        }
    }
}
