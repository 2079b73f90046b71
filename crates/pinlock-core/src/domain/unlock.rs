//! Keystroke plan for unlocking the workstation with a PIN.
//!
//! # How the unlock works (for beginners)
//!
//! A locked desktop first shows a wallpaper/clock screen.  Pressing a key
//! dismisses it and reveals the credential prompt, which takes a moment to
//! appear.  So the plan is:
//!
//! 1. Tap Space, wait, tap Space again, wait (wake the screen, reveal prompt).
//! 2. Type the PIN one character at a time with a short gap between each.
//! 3. Wait a little, then press Enter to submit.
//!
//! This module only builds the list of steps.  Sending real key events is
//! done by the host's platform adapter, which walks the list in order.

use std::time::Duration;

/// Default pause after each wake-up Space tap.
pub const DEFAULT_WAKE_DELAY: Duration = Duration::from_millis(1000);
/// Default pause after each typed character.
pub const DEFAULT_KEYSTROKE_DELAY: Duration = Duration::from_millis(80);
/// Default pause between the last character and Enter.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// Non-printing keys the unlock plan presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Space,
    Enter,
}

/// One step of the unlock plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStep {
    /// Press and release a named key.
    Tap(NamedKey),
    /// Type one printable character (Shift handled by the platform).
    Char(char),
    /// Sleep before the next step.
    Pause(Duration),
}

/// Delays used when building the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockTiming {
    pub wake_delay: Duration,
    pub keystroke_delay: Duration,
    pub submit_delay: Duration,
}

impl Default for UnlockTiming {
    fn default() -> Self {
        Self {
            wake_delay: DEFAULT_WAKE_DELAY,
            keystroke_delay: DEFAULT_KEYSTROKE_DELAY,
            submit_delay: DEFAULT_SUBMIT_DELAY,
        }
    }
}

impl UnlockTiming {
    /// Sum of every pause in a plan for a PIN of `pin_len` characters.
    pub fn total_for(&self, pin_len: usize) -> Duration {
        self.wake_delay * 2
            + self.keystroke_delay * pin_len as u32
            + self.submit_delay
    }
}

/// Builds the keystroke plan that types `pin` into the lock screen.
///
/// The PIN is typed verbatim, whatever characters it holds; an empty PIN
/// still wakes the screen and presses Enter.
///
/// # Examples
///
/// ```rust
/// use pinlock_core::{unlock_sequence, NamedKey, UnlockStep, UnlockTiming};
///
/// let plan = unlock_sequence("12", &UnlockTiming::default());
/// assert_eq!(plan.first(), Some(&UnlockStep::Tap(NamedKey::Space)));
/// assert_eq!(plan.last(), Some(&UnlockStep::Tap(NamedKey::Enter)));
/// ```
pub fn unlock_sequence(pin: &str, timing: &UnlockTiming) -> Vec<UnlockStep> {
    let mut steps = Vec::with_capacity(6 + pin.chars().count() * 2);

    for _ in 0..2 {
        steps.push(UnlockStep::Tap(NamedKey::Space));
        steps.push(UnlockStep::Pause(timing.wake_delay));
    }

    for c in pin.chars() {
        steps.push(UnlockStep::Char(c));
        steps.push(UnlockStep::Pause(timing.keystroke_delay));
    }

    steps.push(UnlockStep::Pause(timing.submit_delay));
    steps.push(UnlockStep::Tap(NamedKey::Enter));
    steps
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_default_plan_matches_lock_screen_timing() {
        // Act
        let plan = unlock_sequence("1234", &UnlockTiming::default());

        // Assert
        use NamedKey::*;
        use UnlockStep::*;
        assert_eq!(
            plan,
            vec![
                Tap(Space),
                Pause(ms(1000)),
                Tap(Space),
                Pause(ms(1000)),
                Char('1'),
                Pause(ms(80)),
                Char('2'),
                Pause(ms(80)),
                Char('3'),
                Pause(ms(80)),
                Char('4'),
                Pause(ms(80)),
                Pause(ms(500)),
                Tap(Enter),
            ]
        );
    }

    #[test]
    fn test_pin_characters_are_typed_verbatim_in_order() {
        let plan = unlock_sequence("aB#9", &UnlockTiming::default());
        let typed: String = plan
            .iter()
            .filter_map(|s| match s {
                UnlockStep::Char(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(typed, "aB#9");
    }

    #[test]
    fn test_empty_pin_still_wakes_and_submits() {
        let plan = unlock_sequence("", &UnlockTiming::default());
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[5], UnlockStep::Tap(NamedKey::Enter));
    }

    #[test]
    fn test_custom_timing_is_used() {
        // Arrange
        let timing = UnlockTiming {
            wake_delay: ms(10),
            keystroke_delay: ms(1),
            submit_delay: ms(5),
        };

        // Act
        let plan = unlock_sequence("7", &timing);

        // Assert
        assert_eq!(plan[1], UnlockStep::Pause(ms(10)));
        assert_eq!(plan[5], UnlockStep::Pause(ms(1)));
        assert_eq!(plan[6], UnlockStep::Pause(ms(5)));
    }

    #[test]
    fn test_total_matches_sum_of_pauses() {
        let timing = UnlockTiming::default();
        let plan = unlock_sequence("4821", &timing);
        let sum: Duration = plan
            .iter()
            .filter_map(|s| match s {
                UnlockStep::Pause(d) => Some(*d),
                _ => None,
            })
            .sum();
        assert_eq!(sum, timing.total_for(4));
        assert_eq!(sum, ms(2820));
    }
}
