//! Protocol module: line framing, the client command grammar, and host replies.
//!
//! Wire format:
//! ```text
//! <ASCII text>\n
//! ```
//! Clients may terminate lines with `\r\n`; the host always writes a bare `\n`.

pub mod command;
pub mod framer;
pub mod messages;

pub use command::Command;
pub use framer::{FrameError, LineFramer, Lines};
pub use messages::HostMessage;
