//! Domain rules for a PinLock session.
//!
//! Nothing in here touches the OS, the network, or a clock: the authenticator
//! compares strings and the unlock planner returns a list of steps.  Executing
//! those steps is the host's job.

/// Per-session PIN and authentication state.
pub mod auth;

/// Keystroke plan for typing a PIN into the lock screen.
pub mod unlock;
