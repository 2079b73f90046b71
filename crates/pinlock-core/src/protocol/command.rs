//! Client → host command grammar.
//!
//! | Line prefix    | Command                 | Payload                    |
//! |----------------|-------------------------|----------------------------|
//! | `AUTH:`        | [`Command::Auth`]       | everything after the colon |
//! | `CMD:LOCK`     | [`Command::LockRequest`]| — (exact match only)       |
//! | `CMD:UNLOCK:`  | [`Command::UnlockRequest`] | everything after the prefix |
//! | anything else  | [`Command::Unrecognized`] | the whole line           |
//!
//! Matching is case-sensitive.  Trailing spaces, tabs, `\r` and `\n` are
//! trimmed before matching; leading whitespace is significant.

const AUTH_PREFIX: &str = "AUTH:";
const LOCK_COMMAND: &str = "CMD:LOCK";
const UNLOCK_PREFIX: &str = "CMD:UNLOCK:";
const TRAILING_WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `AUTH:<pin>` – submit a PIN candidate for this session.
    Auth(String),
    /// `CMD:LOCK` – lock the host workstation.
    LockRequest,
    /// `CMD:UNLOCK:<pin>` – type `<pin>` into the host's unlock prompt.
    UnlockRequest(String),
    /// Any line that matches none of the above.
    Unrecognized(String),
}

impl Command {
    /// Parses one framed line.
    ///
    /// Never fails: lines outside the grammar become [`Command::Unrecognized`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pinlock_core::Command;
    ///
    /// assert_eq!(Command::parse("AUTH:4821"), Command::Auth("4821".into()));
    /// assert_eq!(Command::parse("CMD:LOCK \t"), Command::LockRequest);
    /// assert_eq!(Command::parse("cmd:lock"), Command::Unrecognized("cmd:lock".into()));
    /// ```
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(TRAILING_WHITESPACE);

        if let Some(pin) = line.strip_prefix(AUTH_PREFIX) {
            Command::Auth(pin.to_string())
        } else if line == LOCK_COMMAND {
            Command::LockRequest
        } else if let Some(pin) = line.strip_prefix(UNLOCK_PREFIX) {
            Command::UnlockRequest(pin.to_string())
        } else {
            Command::Unrecognized(line.to_string())
        }
    }

    /// Returns `true` for commands that require an authenticated session.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Command::LockRequest | Command::UnlockRequest(_))
    }

    /// Short variant name for log messages.
    ///
    /// Never includes the payload, so PINs do not end up in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Auth(_) => "Auth",
            Command::LockRequest => "LockRequest",
            Command::UnlockRequest(_) => "UnlockRequest",
            Command::Unrecognized(_) => "Unrecognized",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
