//! Host → client message types.
//!
//! Everything the host writes is one ASCII line terminated by a bare `\n`:
//!
//! ```text
//! AUTH:OK
//! AUTH:FAIL
//! METRICS:CPU=<0-100>;RAM=<0-100>
//! ```

use std::fmt;

use thiserror::Error;

const METRICS_PREFIX: &str = "METRICS:";

/// Errors returned by [`HostMessage::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageParseError {
    /// The line is not one of the host message forms.
    #[error("unknown host message: {0:?}")]
    Unknown(String),

    /// A `METRICS:` line whose fields are missing or out of range.
    #[error("malformed metrics line: {0:?}")]
    MalformedMetrics(String),
}

/// A line sent from the host to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    /// The submitted PIN matched.
    AuthOk,
    /// The submitted PIN did not match.
    AuthFail,
    /// Periodic utilisation sample, both values in percent.
    Metrics { cpu: u8, ram: u8 },
}

impl HostMessage {
    /// Builds a metrics sample, clamping both values to 100.
    pub fn metrics(cpu: u8, ram: u8) -> Self {
        HostMessage::Metrics {
            cpu: cpu.min(100),
            ram: ram.min(100),
        }
    }

    /// Returns the exact bytes written to the wire, terminator included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pinlock_core::HostMessage;
    ///
    /// assert_eq!(HostMessage::AuthOk.to_line(), "AUTH:OK\n");
    /// assert_eq!(HostMessage::metrics(12, 45).to_line(), "METRICS:CPU=12;RAM=45\n");
    /// ```
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    /// Parses one line received by a client (terminator already removed).
    ///
    /// # Errors
    ///
    /// Returns [`MessageParseError`] when the line is not a host message.
    pub fn parse(line: &str) -> Result<Self, MessageParseError> {
        match line {
            "AUTH:OK" => Ok(HostMessage::AuthOk),
            "AUTH:FAIL" => Ok(HostMessage::AuthFail),
            _ => match line.strip_prefix(METRICS_PREFIX) {
                Some(fields) => parse_metrics(fields)
                    .ok_or_else(|| MessageParseError::MalformedMetrics(line.to_string())),
                None => Err(MessageParseError::Unknown(line.to_string())),
            },
        }
    }
}

impl fmt::Display for HostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMessage::AuthOk => f.write_str("AUTH:OK"),
            HostMessage::AuthFail => f.write_str("AUTH:FAIL"),
            HostMessage::Metrics { cpu, ram } => write!(f, "METRICS:CPU={cpu};RAM={ram}"),
        }
    }
}

fn parse_metrics(fields: &str) -> Option<HostMessage> {
    let mut cpu = None;
    let mut ram = None;
    for field in fields.split(';') {
        let (key, value) = field.split_once('=')?;
        let value: u8 = value.parse().ok().filter(|v| *v <= 100)?;
        match key {
            "CPU" => cpu = Some(value),
            "RAM" => ram = Some(value),
            _ => return None,
        }
    }
    Some(HostMessage::Metrics {
        cpu: cpu?,
        ram: ram?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_replies_format_without_carriage_return() {
        assert_eq!(HostMessage::AuthOk.to_line(), "AUTH:OK\n");
        assert_eq!(HostMessage::AuthFail.to_line(), "AUTH:FAIL\n");
        assert!(!HostMessage::AuthOk.to_line().contains('\r'));
    }

    #[test]
    fn test_metrics_format() {
        assert_eq!(
            HostMessage::metrics(0, 100).to_line(),
            "METRICS:CPU=0;RAM=100\n"
        );
    }

    #[test]
    fn test_metrics_constructor_clamps_to_100() {
        assert_eq!(
            HostMessage::metrics(250, 101),
            HostMessage::Metrics { cpu: 100, ram: 100 }
        );
    }

    #[test]
    fn test_parse_metrics_line() {
        assert_eq!(
            HostMessage::parse("METRICS:CPU=12;RAM=45"),
            Ok(HostMessage::Metrics { cpu: 12, ram: 45 })
        );
    }

    #[test]
    fn test_parse_metrics_in_any_field_order() {
        assert_eq!(
            HostMessage::parse("METRICS:RAM=45;CPU=12"),
            Ok(HostMessage::Metrics { cpu: 12, ram: 45 })
        );
    }

    #[test]
    fn test_parse_metrics_out_of_range_is_malformed() {
        assert!(matches!(
            HostMessage::parse("METRICS:CPU=101;RAM=1"),
            Err(MessageParseError::MalformedMetrics(_))
        ));
    }

    #[test]
    fn test_parse_metrics_missing_field_is_malformed() {
        assert!(matches!(
            HostMessage::parse("METRICS:CPU=10"),
            Err(MessageParseError::MalformedMetrics(_))
        ));
    }

    #[test]
    fn test_parse_unknown_line() {
        assert_eq!(
            HostMessage::parse("HELLO"),
            Err(MessageParseError::Unknown("HELLO".into()))
        );
    }
}
