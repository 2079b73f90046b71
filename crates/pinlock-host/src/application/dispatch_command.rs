//! CommandDispatcher: applies decoded client commands to one session.
//!
//! # State machine
//!
//! ```text
//!                    AUTH:<wrong>  → AUTH:FAIL
//!                   ┌──────────┐
//!                   ▼          │
//!          ┌─────────────────┐ │ AUTH:<pin> → AUTH:OK  ┌───────────────┐
//!   start ─►│ Unauthenticated ├─┴──────────────────────►│ Authenticated │
//!          └─────────────────┘                          └───────────────┘
//!            CMD:* ignored                                CMD:LOCK   → lock()
//!                                                         CMD:UNLOCK → unlock_with_pin()
//!                                                         AUTH:*     → re-verified, reply only
//! ```
//!
//! Authentication only moves forward: a failed `AUTH:` after a successful one
//! is answered with `AUTH:FAIL` but the session stays authenticated.
//!
//! The authenticated flag is an [`AtomicBool`] shared with the telemetry
//! broadcaster, which reads it on every tick without taking a lock.
//!
//! # Blocking actions
//!
//! Lock and unlock call into the OS and the unlock plan sleeps for a few
//! seconds between keystrokes.  They run on Tokio's blocking pool via
//! [`tokio::task::spawn_blocking`], and [`CommandDispatcher::dispatch`] awaits
//! the result before returning, so actions execute in command order.
//! An action failure is logged and otherwise ignored: nothing is written to
//! the client and the session continues.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use pinlock_core::{AuthState, Authenticator, Command, HostMessage};
use tracing::{debug, error, info, warn};

use super::execute_action::HostActions;

/// Privileged work requested by an authenticated client.
#[derive(Debug)]
enum Action {
    Lock,
    Unlock(String),
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Lock => "lock",
            Action::Unlock(_) => "unlock",
        }
    }
}

/// Per-session command dispatcher.
pub struct CommandDispatcher {
    authenticator: Authenticator,
    authenticated: Arc<AtomicBool>,
    actions: Arc<dyn HostActions>,
}

impl CommandDispatcher {
    /// Creates a dispatcher for a fresh, unauthenticated session.
    pub fn new(authenticator: Authenticator, actions: Arc<dyn HostActions>) -> Self {
        Self {
            authenticator,
            authenticated: Arc::new(AtomicBool::new(false)),
            actions,
        }
    }

    /// The shared authenticated flag, for the telemetry broadcaster.
    pub fn auth_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.authenticated)
    }

    /// Current authentication state.
    pub fn auth_state(&self) -> AuthState {
        if self.authenticated.load(Ordering::Acquire) {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Applies one command and returns the reply line to send, if any.
    ///
    /// Only `Auth` commands ever produce a reply.
    pub async fn dispatch(&self, command: Command) -> Option<HostMessage> {
        match command {
            Command::Auth(candidate) => Some(self.authenticate(&candidate)),

            cmd if self.auth_state() == AuthState::Unauthenticated => {
                debug!(kind = cmd.kind(), "ignoring command before authentication");
                None
            }

            Command::LockRequest => {
                self.run(Action::Lock).await;
                None
            }

            Command::UnlockRequest(pin) => {
                self.run(Action::Unlock(pin)).await;
                None
            }

            Command::Unrecognized(line) => {
                debug!(len = line.len(), "unrecognized command");
                None
            }
        }
    }

    fn authenticate(&self, candidate: &str) -> HostMessage {
        if self.authenticator.verify(candidate) {
            if !self.authenticated.swap(true, Ordering::AcqRel) {
                info!("client authenticated");
            }
            HostMessage::AuthOk
        } else {
            warn!("client submitted a wrong PIN");
            HostMessage::AuthFail
        }
    }

    async fn run(&self, action: Action) {
        let name = action.name();
        let actions = Arc::clone(&self.actions);
        info!(action = name, "running host action");

        let result = tokio::task::spawn_blocking(move || match action {
            Action::Lock => actions.lock(),
            Action::Unlock(pin) => actions.unlock_with_pin(&pin),
        })
        .await;

        match result {
            Ok(Ok(())) => debug!(action = name, "host action completed"),
            Ok(Err(e)) => error!(action = name, "host action failed: {e}"),
            Err(e) => error!(action = name, "host action task panicked: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
