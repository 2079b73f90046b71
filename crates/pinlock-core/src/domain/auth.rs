//! Session PIN generation and verification.
//!
//! Every session draws a fresh 4-digit PIN in `1000..=9999`.  The host shows
//! it on screen and the user types it on the phone, which sends `AUTH:<pin>`.
//! Verification is an exact string comparison against the decimal form of the
//! PIN, so `"04821"` or `" 4821"` never match `4821`.
//!
//! There is no attempt counter: every `AUTH:` line is judged on its own.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

/// Smallest PIN value (inclusive).
pub const PIN_MIN: u16 = 1000;
/// Largest PIN value (inclusive).
pub const PIN_MAX: u16 = 9999;

/// Error returned when constructing a [`Pin`] from an out-of-range value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN {0} is outside 1000..=9999")]
    OutOfRange(u16),
    #[error("PIN {0:?} is not a 4-digit number")]
    NotNumeric(String),
}

/// A 4-digit session PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(u16);

impl Pin {
    /// Wraps `value` after checking it lies in `1000..=9999`.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::OutOfRange`] for any other value.
    pub fn new(value: u16) -> Result<Self, PinError> {
        if (PIN_MIN..=PIN_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PinError::OutOfRange(value))
        }
    }

    /// Draws a PIN uniformly from `1000..=9999` using the thread-local RNG.
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Draws a PIN uniformly from `1000..=9999` using `rng`.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(PIN_MIN..=PIN_MAX))
    }

    /// The numeric value.
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinError::NotNumeric(s.to_string()));
        }
        let value = s
            .parse::<u16>()
            .map_err(|_| PinError::NotNumeric(s.to_string()))?;
        Self::new(value)
    }
}

/// Authentication state of a session.  Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Holds one session's PIN and checks candidates against it.
#[derive(Debug, Clone)]
pub struct Authenticator {
    pin: Pin,
    /// Cached decimal form used for the exact string comparison.
    expected: String,
}

impl Authenticator {
    /// Creates an authenticator with a freshly drawn PIN.
    pub fn generate() -> Self {
        Self::with_pin(Pin::random())
    }

    /// Creates an authenticator for a known PIN.
    pub fn with_pin(pin: Pin) -> Self {
        Self {
            pin,
            expected: pin.to_string(),
        }
    }

    /// The session PIN, for display on the host.
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Returns `true` when `candidate` is exactly the session PIN.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pinlock_core::{Authenticator, Pin};
    ///
    /// let auth = Authenticator::with_pin(Pin::new(4821).unwrap());
    /// assert!(auth.verify("4821"));
    /// assert!(!auth.verify("4820"));
    /// assert!(!auth.verify("04821"));
    /// ```
    pub fn verify(&self, candidate: &str) -> bool {
        candidate == self.expected
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
