//! Application layer use cases for the host.
//!
//! # What use cases does the host have?
//!
//! - **`dispatch_command`** – Applies one decoded client command to the
//!   session: checks PINs, gates privileged commands behind authentication,
//!   and runs lock / unlock actions.  Produces the reply line, if any.
//!
//! - **`broadcast_telemetry`** – Once per interval, samples CPU and RAM and
//!   pushes a `METRICS:` line to an authenticated client.
//!
//! - **`execute_action`** – The [`HostActions`](execute_action::HostActions)
//!   seam the dispatcher calls, plus the keystroke-driven implementation that
//!   sits on top of a [`PlatformInput`](execute_action::PlatformInput)
//!   adapter from the infrastructure layer.
//!
//! Nothing in this layer touches a socket or an OS API directly; those are
//! injected as trait objects.

pub mod broadcast_telemetry;
pub mod dispatch_command;
pub mod execute_action;
