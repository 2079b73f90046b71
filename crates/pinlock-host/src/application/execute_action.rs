//! Host actions: locking the workstation and typing a PIN into its lock screen.
//!
//! The dispatcher only knows the [`HostActions`] trait.  The production
//! implementation, [`SystemHostActions`], turns an unlock request into the
//! keystroke plan from `pinlock_core` and walks it through a
//! [`PlatformInput`] adapter (SendInput on Windows, `xdotool` on Linux).
//!
//! Every method here blocks: unlocking sleeps between keystrokes for a few
//! seconds.  Callers on the async runtime must go through
//! `tokio::task::spawn_blocking`.

use std::sync::Arc;

use pinlock_core::{unlock_sequence, NamedKey, UnlockStep, UnlockTiming};
use thiserror::Error;
use tracing::debug;

/// Error type for host actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The OS rejected the request.
    #[error("platform error: {0}")]
    Platform(String),

    /// A helper program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A helper program ran but reported failure.
    #[error("{program} exited with {status}")]
    CommandFailed {
        program: &'static str,
        status: std::process::ExitStatus,
    },

    /// This build has no adapter for the current platform.
    #[error("host actions are not supported on this platform")]
    Unsupported,
}

/// The two things a client can ask the host to do.
///
/// Implementations block until the action has completed.
#[cfg_attr(test, mockall::automock)]
pub trait HostActions: Send + Sync {
    /// Locks the interactive session.
    fn lock(&self) -> Result<(), ActionError>;

    /// Types `pin` into the unlock prompt and submits it.
    fn unlock_with_pin(&self, pin: &str) -> Result<(), ActionError>;
}

/// Platform-agnostic keyboard and session-lock primitives.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait PlatformInput: Send + Sync {
    /// Presses and releases a named key.
    fn tap_key(&self, key: NamedKey) -> Result<(), ActionError>;

    /// Types one printable character, using Shift where the layout needs it.
    fn type_char(&self, c: char) -> Result<(), ActionError>;

    /// Locks the workstation.
    fn lock_workstation(&self) -> Result<(), ActionError>;
}

/// [`HostActions`] backed by a [`PlatformInput`] adapter.
pub struct SystemHostActions {
    input: Arc<dyn PlatformInput>,
    timing: UnlockTiming,
}

impl SystemHostActions {
    /// Creates actions that drive `input` with the given unlock timing.
    pub fn new(input: Arc<dyn PlatformInput>, timing: UnlockTiming) -> Self {
        Self { input, timing }
    }
}

impl HostActions for SystemHostActions {
    fn lock(&self) -> Result<(), ActionError> {
        self.input.lock_workstation()
    }

    /// Stops at the first failing keystroke; the remaining steps are skipped.
    fn unlock_with_pin(&self, pin: &str) -> Result<(), ActionError> {
        let plan = unlock_sequence(pin, &self.timing);
        debug!(steps = plan.len(), "executing unlock plan");

        for step in plan {
            match step {
                UnlockStep::Tap(key) => self.input.tap_key(key)?,
                UnlockStep::Char(c) => self.input.type_char(c)?,
                UnlockStep::Pause(d) => std::thread::sleep(d),
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
