//! # pinlock-core
//!
//! Shared library for PinLock containing the line protocol, the per-session
//! PIN authenticator, and the keystroke plan used to unlock the host.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or sockets,
//! so every piece can be unit-tested on any platform.
//!
//! # Architecture overview
//!
//! PinLock lets a phone that is paired with a computer lock and unlock that
//! computer.  The phone opens a byte-stream connection to the host, types the
//! 4-digit PIN that the host shows on screen, and from then on may send
//! `CMD:LOCK` / `CMD:UNLOCK:<pin>` while receiving CPU/RAM telemetry once per
//! second.
//!
//! - **`protocol`** – How bytes travel over the stream.  Inbound bytes are cut
//!   into newline-terminated lines by the [`LineFramer`], each line is parsed
//!   into a [`Command`], and everything the host sends back is a
//!   [`HostMessage`].
//!
//! - **`domain`** – Pure session rules.  The [`Authenticator`] owns the session
//!   PIN, and [`unlock_sequence`] turns a PIN into the exact key taps needed to
//!   wake the lock screen and submit the PIN.

pub mod domain;
pub mod protocol;

pub use domain::auth::{AuthState, Authenticator, Pin, PinError};
pub use domain::unlock::{unlock_sequence, NamedKey, UnlockStep, UnlockTiming};
pub use protocol::command::Command;
pub use protocol::framer::{FrameError, LineFramer};
pub use protocol::messages::HostMessage;
