//! TOML-based configuration for the host.
//!
//! Reads `HostConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\PinLock\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/pinlock/config.toml` (or `~/.config/pinlock/`)
//! - macOS:    `~/Library/Application Support/PinLock/config.toml`
//!
//! Example:
//!
//! ```toml
//! [host]
//! log_level = "debug"
//!
//! [network]
//! bind_address = "0.0.0.0"
//! port = 47800
//!
//! [session]
//! telemetry_interval_ms = 1000
//! read_chunk_size = 1024
//! max_line_length = 256
//!
//! [unlock]
//! wake_delay_ms = 1000
//! keystroke_delay_ms = 80
//! submit_delay_ms = 500
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]` and every section is
//! `#[serde(default)]`, so an empty file, a missing section, or a missing
//! field all fall back to the built-in defaults.  A missing file is not an
//! error either: the host runs on defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pinlock_core::UnlockTiming;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::session::SessionSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is not usable.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSection,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub unlock: UnlockConfig,
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSection {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind.  `"0.0.0.0"` listens on all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port the phone connects to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Per-session tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Milliseconds between `METRICS:` lines.
    #[serde(default = "default_telemetry_interval_ms")]
    pub telemetry_interval_ms: u64,
    /// Bytes requested per transport read.
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// Longest accepted command line; absent means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<usize>,
}

/// Delays of the unlock keystroke sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockConfig {
    /// Pause after each wake-up Space tap.
    #[serde(default = "default_wake_delay_ms")]
    pub wake_delay_ms: u64,
    /// Pause after each typed PIN character.
    #[serde(default = "default_keystroke_delay_ms")]
    pub keystroke_delay_ms: u64,
    /// Pause before Enter.
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

/// Port used when neither the config file nor the CLI names one.
pub const DEFAULT_PORT: u16 = 47800;

fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_telemetry_interval_ms() -> u64 {
    1000
}
fn default_read_chunk_size() -> usize {
    1024
}
fn default_wake_delay_ms() -> u64 {
    1000
}
fn default_keystroke_delay_ms() -> u64 {
    80
}
fn default_submit_delay_ms() -> u64 {
    500
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            telemetry_interval_ms: default_telemetry_interval_ms(),
            read_chunk_size: default_read_chunk_size(),
            max_line_length: None,
        }
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            wake_delay_ms: default_wake_delay_ms(),
            keystroke_delay_ms: default_keystroke_delay_ms(),
            submit_delay_ms: default_submit_delay_ms(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl NetworkConfig {
    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `bind_address` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| ConfigError::Invalid {
                field: "network.bind_address",
                reason: format!("{:?}: {e}", self.bind_address),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl SessionConfig {
    /// Session settings for the controller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero interval, chunk size or
    /// line length.
    pub fn settings(&self) -> Result<SessionSettings, ConfigError> {
        if self.telemetry_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "session.telemetry_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.read_chunk_size == 0 {
            return Err(ConfigError::Invalid {
                field: "session.read_chunk_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_line_length == Some(0) {
            return Err(ConfigError::Invalid {
                field: "session.max_line_length",
                reason: "must be greater than zero when set".into(),
            });
        }
        Ok(SessionSettings {
            read_chunk_size: self.read_chunk_size,
            max_line_length: self.max_line_length,
            telemetry_interval: Duration::from_millis(self.telemetry_interval_ms),
        })
    }
}

impl UnlockConfig {
    pub fn timing(&self) -> UnlockTiming {
        UnlockTiming {
            wake_delay: Duration::from_millis(self.wake_delay_ms),
            keystroke_delay: Duration::from_millis(self.keystroke_delay_ms),
            submit_delay: Duration::from_millis(self.submit_delay_ms),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `HostConfig` from `path`, returning `HostConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads `HostConfig` from the platform config file.
///
/// # Errors
///
/// See [`config_file_path`] and [`load_config_from`].
pub fn load_config() -> Result<HostConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Renders `config` as TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &HostConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Resolves the platform config directory including the `PinLock` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PinLock"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pinlock"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PinLock")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
