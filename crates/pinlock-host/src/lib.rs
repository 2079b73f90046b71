//! pinlock-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does pinlock-host do? (for beginners)
//!
//! The *host* is the computer being locked and unlocked.  A phone connects to
//! it over a byte stream and speaks a tiny line-based protocol:
//!
//! 1. On every new connection the host draws a fresh 4-digit PIN and shows it
//!    on its own screen.
//! 2. The user types that PIN on the phone, which sends `AUTH:<pin>`.  The
//!    host answers `AUTH:OK` or `AUTH:FAIL`.
//! 3. Once authenticated, the phone may send `CMD:LOCK` (lock the workstation)
//!    or `CMD:UNLOCK:<pin>` (type the account PIN into the lock screen).
//! 4. While authenticated, the host pushes `METRICS:CPU=..;RAM=..` once per
//!    second so the phone can show a small dashboard.
//!
//! Only one phone is served at a time: a new connection replaces the old one.

/// Application layer: use cases for a host session.
pub mod application;

/// Infrastructure layer: transport, session wiring, OS adapters, and config.
pub mod infrastructure;
