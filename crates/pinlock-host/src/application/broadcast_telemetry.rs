//! TelemetryBroadcaster: pushes CPU / RAM readings to an authenticated client.
//!
//! # Timing (for beginners)
//!
//! `tokio::time::interval` fires its first tick immediately.  The broadcaster
//! consumes that tick before entering the loop, so the first sample goes out
//! one full interval after the session starts:
//!
//! ```text
//! t=0s  session start (tick skipped)
//! t=1s  tick → authenticated? send METRICS : skip
//! t=2s  tick → ...
//! ```
//!
//! Ticks while the client is still unauthenticated are skipped silently.
//! The first failed write ends the loop for good: the outbound stream is gone
//! and the session is tearing down.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use pinlock_core::HostMessage;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Default spacing between `METRICS:` lines.
pub const DEFAULT_TELEMETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Source of utilisation readings, each an integer percentage.
///
/// Implementations clamp to `0..=100`.
pub trait TelemetryProvider: Send + Sync {
    fn cpu_percent(&self) -> u8;
    fn ram_percent(&self) -> u8;
}

/// Error returned when a line cannot be written to the client.
#[derive(Debug, Error)]
pub enum SendError {
    /// The outbound half was already shut down.
    #[error("outbound stream is closed")]
    Closed,
    /// The transport write or flush failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can deliver a complete host line to the client.
///
/// Infrastructure implementation serialises writes on the session transport;
/// test implementations record calls.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: HostMessage) -> Result<(), SendError>;
}

/// Periodic metrics task for one session.
pub struct TelemetryBroadcaster {
    provider: Arc<dyn TelemetryProvider>,
    sink: Arc<dyn MessageSink>,
    authenticated: Arc<AtomicBool>,
    period: Duration,
}

impl TelemetryBroadcaster {
    pub fn new(
        provider: Arc<dyn TelemetryProvider>,
        sink: Arc<dyn MessageSink>,
        authenticated: Arc<AtomicBool>,
        period: Duration,
    ) -> Self {
        Self {
            provider,
            sink,
            authenticated,
            period,
        }
    }

    /// Reads the provider once and builds the metrics line.
    pub fn sample(&self) -> HostMessage {
        HostMessage::metrics(self.provider.cpu_percent(), self.provider.ram_percent())
    }

    /// Runs until a write fails.  Cancel by aborting the task.
    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if !self.authenticated.load(Ordering::Acquire) {
                trace!("telemetry tick skipped: not authenticated");
                continue;
            }

            let message = self.sample();
            if let Err(e) = self.sink.send(message).await {
                debug!("telemetry stopped: {e}");
                break;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
