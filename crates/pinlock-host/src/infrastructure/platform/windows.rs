//! Windows lock and keystroke injection via `LockWorkStation` and `SendInput`.
//!
//! Keystrokes are sent as hardware scan codes (`KEYEVENTF_SCANCODE`).  The
//! Windows logon / lock screen runs on the secure desktop and is more
//! reliable with scan codes than with virtual-key events.
//!
//! Characters are resolved against the active keyboard layout with
//! `VkKeyScanW`: the low byte is the virtual key, bit 0 of the high byte says
//! whether Shift is needed.  `MapVirtualKeyW` then turns the virtual key into
//! its scan code.

#![cfg(target_os = "windows")]

use pinlock_core::NamedKey;
use windows::Win32::System::Shutdown::LockWorkStation;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, VkKeyScanW, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, MAPVK_VK_TO_VSC, VIRTUAL_KEY,
    VK_RETURN, VK_SHIFT, VK_SPACE,
};

use crate::application::execute_action::{ActionError, PlatformInput};

/// Windows implementation of [`PlatformInput`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsInput;

impl WindowsInput {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformInput for WindowsInput {
    fn tap_key(&self, key: NamedKey) -> Result<(), ActionError> {
        let vk = match key {
            NamedKey::Space => VK_SPACE,
            NamedKey::Enter => VK_RETURN,
        };
        let scan = scan_code(vk);
        send(&[key_event(scan, false), key_event(scan, true)])
    }

    fn type_char(&self, c: char) -> Result<(), ActionError> {
        let (vk, shift) = resolve_char(c)?;
        let scan = scan_code(vk);

        let mut events = Vec::with_capacity(4);
        if shift {
            events.push(key_event(scan_code(VK_SHIFT), false));
        }
        events.push(key_event(scan, false));
        events.push(key_event(scan, true));
        if shift {
            events.push(key_event(scan_code(VK_SHIFT), true));
        }
        send(&events)
    }

    fn lock_workstation(&self) -> Result<(), ActionError> {
        // SAFETY: LockWorkStation takes no arguments and only posts a request
        // to the session manager.
        unsafe { LockWorkStation() }.map_err(|e| ActionError::Platform(e.to_string()))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Looks `c` up in the active layout.  Returns the virtual key and whether
/// Shift must be held.
fn resolve_char(c: char) -> Result<(VIRTUAL_KEY, bool), ActionError> {
    let unit = u16::try_from(u32::from(c))
        .map_err(|_| ActionError::Platform(format!("character U+{:04X} cannot be typed", c as u32)))?;

    // SAFETY: VkKeyScanW only reads the active keyboard layout.
    let result = unsafe { VkKeyScanW(unit) };
    if result == -1 {
        return Err(ActionError::Platform(format!(
            "no key for U+{:04X} in the active layout",
            c as u32
        )));
    }
    let [vk, state] = (result as u16).to_le_bytes();
    Ok((VIRTUAL_KEY(u16::from(vk)), state & 0x01 != 0))
}

fn scan_code(vk: VIRTUAL_KEY) -> u16 {
    // SAFETY: MapVirtualKeyW is a pure table lookup.
    unsafe { MapVirtualKeyW(u32::from(vk.0), MAPVK_VK_TO_VSC) as u16 }
}

fn key_event(scan: u16, key_up: bool) -> INPUT {
    let mut flags: KEYBD_EVENT_FLAGS = KEYEVENTF_SCANCODE;
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(events: &[INPUT]) -> Result<(), ActionError> {
    // SAFETY: every element is a fully initialised KEYBDINPUT.
    let sent = unsafe { SendInput(events, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize == events.len() {
        Ok(())
    } else {
        Err(ActionError::Platform(format!(
            "SendInput injected {sent} of {} events",
            events.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_sets_scancode_flags() {
        let down = key_event(0x39, false);
        let up = key_event(0x39, true);
        // SAFETY: both were built as keyboard inputs above.
        let (down, up) = unsafe { (down.Anonymous.ki, up.Anonymous.ki) };
        assert_eq!(down.wScan, 0x39);
        assert_eq!(down.dwFlags, KEYEVENTF_SCANCODE);
        assert_eq!(up.dwFlags, KEYEVENTF_SCANCODE | KEYEVENTF_KEYUP);
    }

    #[test]
    fn test_characters_outside_bmp_are_rejected() {
        assert!(matches!(
            resolve_char('\u{1F600}'),
            Err(ActionError::Platform(_))
        ));
    }
}
