//! PinLock host entry point.
//!
//! Listens for the phone on TCP, shows a fresh PIN for every connection, and
//! serves lock / unlock commands plus live CPU and RAM telemetry once the
//! phone has sent the right PIN.
//!
//! # Usage
//!
//! ```text
//! pinlock-host [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Config file [default: platform config dir]
//!   --bind <IP>           Listen address (overrides network.bind_address)
//!   --port <PORT>         Listen port (overrides network.port)
//!   --log-level <FILTER>  Log filter when RUST_LOG is unset
//!   --print-config        Print the effective config as TOML and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Flag            |
//! |-------------------|-----------------|
//! | `PINLOCK_CONFIG`  | `--config`      |
//! | `PINLOCK_BIND`    | `--bind`        |
//! | `PINLOCK_PORT`    | `--port`        |
//! | `PINLOCK_LOG`     | `--log-level`   |
//!
//! CLI arguments take precedence over the config file.
//!
//! # Architecture overview
//!
//! ```text
//! Phone  (line protocol over TCP)
//!       ↕
//! pinlock-host  ← this process
//!   infrastructure/transport  accept loop, one session at a time
//!   infrastructure/session    framer + dispatcher + telemetry per connection
//!   infrastructure/platform   LockWorkStation / SendInput, loginctl / xdotool
//!   infrastructure/telemetry  sysinfo CPU and RAM readings
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pinlock_host::application::execute_action::SystemHostActions;
use pinlock_host::infrastructure::platform::native_input;
use pinlock_host::infrastructure::session::{SessionDeps, SessionEvent};
use pinlock_host::infrastructure::storage::config::{self, HostConfig};
use pinlock_host::infrastructure::telemetry::SysinfoTelemetry;
use pinlock_host::infrastructure::transport::{bind, run_host};

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PinLock host: lock and unlock this computer from a paired phone.
#[derive(Debug, Parser)]
#[command(
    name = "pinlock-host",
    about = "Remote lock / unlock host with PIN authentication",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.  A missing
    /// file is not an error.
    #[arg(long, env = "PINLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to listen on, e.g. `0.0.0.0` or `127.0.0.1`.
    #[arg(long, env = "PINLOCK_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "PINLOCK_PORT")]
    port: Option<u16>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[arg(long, env = "PINLOCK_LOG")]
    log_level: Option<String>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Loads the config file and applies the CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if no config path is given and the platform directory is
    /// unknown.
    fn resolve_config(&self) -> anyhow::Result<HostConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => config::load_config().context("loading config")?,
        };
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    fn apply_overrides(&self, cfg: &mut HostConfig) {
        if let Some(bind) = &self.bind {
            cfg.network.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            cfg.network.port = port;
        }
        if let Some(level) = &self.log_level {
            cfg.host.log_level = level.clone();
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level; otherwise `info`.
fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Prints the PIN for every new session and logs sessions that end.
async fn pump_session_events(mut rx: mpsc::Receiver<SessionEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Started { session_id, pin } => {
                info!(session = %session_id, "phone connected; waiting for PIN");
                println!();
                println!("  PinLock PIN: {pin}");
                println!("  Enter this PIN on your phone.");
                println!();
            }
            SessionEvent::Ended {
                session_id,
                clean_close,
                reason,
            } => {
                if clean_close {
                    info!(session = %session_id, "phone disconnected");
                } else {
                    warn!(session = %session_id, "session ended: {reason}");
                }
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed and merged over the config file.
/// 2. `tracing_subscriber` is initialised with the resulting filter.
/// 3. The platform input adapter and the sysinfo telemetry are created.
/// 4. A Ctrl+C handler clears the shared `running` flag.
/// 5. [`run_host`] accepts phone connections until the flag is cleared.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;

    if cli.print_config {
        print!("{}", config::render_config(&cfg)?);
        return Ok(());
    }

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&cfg.host.log_level))
        .init();

    let addr = cfg.network.socket_addr()?;
    let settings = cfg.session.settings()?;
    let timing = cfg.unlock.timing();

    info!("PinLock host starting on {addr}");

    // ── Collaborators ─────────────────────────────────────────────────────────
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(pump_session_events(events_rx));

    let deps = SessionDeps {
        actions: Arc::new(SystemHostActions::new(native_input(), timing)),
        telemetry: Arc::new(SysinfoTelemetry::new()),
        settings,
        events: Some(events_tx),
    };

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Main accept loop ──────────────────────────────────────────────────────
    let listener = bind(addr).await.context("starting listener")?;
    run_host(listener, deps, running).await;

    info!("PinLock host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
