//! Infrastructure layer for the host application.
//!
//! Contains everything that touches the outside world: the byte-stream
//! session, the TCP listener, OS lock / keystroke APIs, system telemetry, and
//! the config file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pinlock_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`session`** – One client connection: read loop, framing, dispatch, the
//!   serialised writer, and the telemetry task.
//!
//! - **`transport`** – TCP accept loop that hands each connection to a new
//!   session, replacing whichever session was active.
//!
//! - **`platform`** – OS-specific implementations of `PlatformInput`.
//!   The correct implementation is selected at compile time using
//!   `#[cfg(target_os)]`.  A `MockPlatformInput` is also provided for tests.
//!
//! - **`telemetry`** – `TelemetryProvider` implementations: live readings via
//!   `sysinfo`, and fixed values for tests.
//!
//! - **`storage`** – TOML configuration file.

pub mod platform;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod transport;
