//! Linux lock and keystroke injection via desktop helper programs.
//!
//! # Which programs? (for beginners)
//!
//! - **Locking** asks systemd-logind to lock the current session with
//!   `loginctl lock-session`.  logind forwards the request to whatever screen
//!   locker the desktop runs (GNOME, KDE, light-locker, ...).
//! - **Typing** uses `xdotool`, which injects key events through the X11
//!   XTest extension.  `xdotool key space` presses a named key and
//!   `xdotool type -- 7` types literal text, adding Shift where the keyboard
//!   layout needs it.
//!
//! Running helpers avoids linking libX11 into the host binary, so the host
//! starts (and serves telemetry) on headless machines too; the actions just
//! fail there.
//!
//! # Permissions
//!
//! `xdotool` needs access to the X display, normally satisfied when the host
//! runs inside the user's graphical session with `DISPLAY` set.  Wayland
//! compositors that refuse XTest input will ignore the keystrokes.

use std::process::Command;

use pinlock_core::NamedKey;
use tracing::trace;

use crate::application::execute_action::{ActionError, PlatformInput};

const LOGINCTL: &str = "loginctl";
const XDOTOOL: &str = "xdotool";

/// Linux implementation of [`PlatformInput`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxInput;

impl LinuxInput {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformInput for LinuxInput {
    fn tap_key(&self, key: NamedKey) -> Result<(), ActionError> {
        run(XDOTOOL, &["key", "--clearmodifiers", keysym_name(key)])
    }

    fn type_char(&self, c: char) -> Result<(), ActionError> {
        let mut text = [0u8; 4];
        run(
            XDOTOOL,
            &["type", "--delay", "0", "--", &*c.encode_utf8(&mut text)],
        )
    }

    fn lock_workstation(&self) -> Result<(), ActionError> {
        run(LOGINCTL, &["lock-session"])
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// X11 keysym name for a named key, as `xdotool key` expects it.
fn keysym_name(key: NamedKey) -> &'static str {
    match key {
        NamedKey::Space => "space",
        NamedKey::Enter => "Return",
    }
}

fn run(program: &'static str, args: &[&str]) -> Result<(), ActionError> {
    trace!(program, argc = args.len(), "running helper");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| ActionError::Spawn { program, source })?;

    if status.success() {
        Ok(())
    } else {
        Err(ActionError::CommandFailed { program, status })
    }
}
