//! Mock platform input for tests and unsupported targets.
//!
//! # Why a mock input?
//!
//! The real adapters (`WindowsInput`, `LinuxInput`) lock the test machine or
//! type into whatever window has focus.  [`MockPlatformInput`] replaces every
//! OS call with in-memory recording: each call is pushed into a
//! `Mutex<Vec<...>>` so tests can assert exactly what was sent and in which
//! order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every method return
//! `ActionError::Platform`, for exercising error paths without a broken OS.

use std::sync::Mutex;

use pinlock_core::NamedKey;

use crate::application::execute_action::{ActionError, PlatformInput};

/// One recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCall {
    Tap(NamedKey),
    Char(char),
    Lock,
}

/// Records every call without touching the OS.
#[derive(Default)]
pub struct MockPlatformInput {
    /// Calls in the order they were made.
    pub calls: Mutex<Vec<InputCall>>,
    /// When `true`, every method returns `ActionError::Platform`.
    pub should_fail: bool,
}

impl MockPlatformInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<InputCall> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The characters typed so far, concatenated.
    pub fn typed(&self) -> String {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                InputCall::Char(ch) => Some(ch),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: InputCall) -> Result<(), ActionError> {
        if self.should_fail {
            return Err(ActionError::Platform("mock failure".into()));
        }
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

impl PlatformInput for MockPlatformInput {
    fn tap_key(&self, key: NamedKey) -> Result<(), ActionError> {
        self.record(InputCall::Tap(key))
    }

    fn type_char(&self, c: char) -> Result<(), ActionError> {
        self.record(InputCall::Char(c))
    }

    fn lock_workstation(&self) -> Result<(), ActionError> {
        self.record(InputCall::Lock)
    }
}

/// Input for targets with no adapter: every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedInput;

impl PlatformInput for UnsupportedInput {
    fn tap_key(&self, _key: NamedKey) -> Result<(), ActionError> {
        Err(ActionError::Unsupported)
    }

    fn type_char(&self, _c: char) -> Result<(), ActionError> {
        Err(ActionError::Unsupported)
    }

    fn lock_workstation(&self) -> Result<(), ActionError> {
        Err(ActionError::Unsupported)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
