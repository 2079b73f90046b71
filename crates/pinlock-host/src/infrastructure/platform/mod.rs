//! Platform-specific lock and keystroke implementations.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`.  [`native_input`] returns it as a trait object
//! so `main.rs` does not need any `cfg` of its own.

use std::sync::Arc;

use crate::application::execute_action::PlatformInput;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

/// Returns the [`PlatformInput`] for the current compilation target.
///
/// Targets without an adapter get an input whose every call fails with
/// `ActionError::Unsupported`; the host still runs and serves telemetry.
pub fn native_input() -> Arc<dyn PlatformInput> {
    #[cfg(target_os = "windows")]
    return Arc::new(windows::WindowsInput::new());
    #[cfg(target_os = "linux")]
    return Arc::new(linux::LinuxInput::new());
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    return Arc::new(mock::UnsupportedInput);
}
