//! Session controller: one connected client, from handoff to teardown.
//!
//! Architecture:
//! - The transport is any `AsyncRead + AsyncWrite` stream.  It is split into
//!   a read half, owned by the read loop, and a write half, owned by a
//!   [`SessionWriter`] shared between the read loop and the telemetry task.
//! - The read loop feeds every chunk to a [`LineFramer`], parses each line
//!   into a [`Command`], hands it to the [`CommandDispatcher`], and writes any
//!   reply through the writer.
//! - The [`TelemetryBroadcaster`] runs as a separately spawned task.  Its
//!   handle is held by a guard that aborts it on drop, so it stops whether
//!   the session ends on its own or the session task itself is aborted.
//!
//! ```text
//! transport ──read──► LineFramer ──► Command::parse ──► CommandDispatcher
//!     ▲                                                       │ reply
//!     └──────────── SessionWriter (Mutex) ◄───────────────────┘
//!                          ▲
//!                          └──── TelemetryBroadcaster (every interval)
//! ```
//!
//! Every fault is local to the session: it ends the read loop, the writer is
//! closed, a [`SessionEvent::Ended`] is emitted, and the fault is returned to
//! whoever spawned the session for logging.  Nothing is retried.

pub mod writer;

use std::sync::Arc;
use std::time::Duration;

use pinlock_core::{Authenticator, Command, FrameError, LineFramer, Pin};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn, Instrument};
use uuid::Uuid;

use crate::application::broadcast_telemetry::{
    SendError, TelemetryBroadcaster, TelemetryProvider, DEFAULT_TELEMETRY_INTERVAL,
};
use crate::application::dispatch_command::CommandDispatcher;
use crate::application::execute_action::HostActions;

pub use writer::SessionWriter;

/// Default number of bytes requested per transport read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Why a session ended.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The peer closed its side (zero-length read).
    #[error("peer closed the connection")]
    TransportClosed,

    /// Reading from the transport failed.
    #[error("transport read failed: {0}")]
    TransportReadFailed(#[source] std::io::Error),

    /// Writing a reply to the transport failed.
    #[error("transport write failed: {0}")]
    TransportWriteFailed(#[source] std::io::Error),

    /// The client sent a line longer than the configured maximum.
    #[error(transparent)]
    FrameTooLong(#[from] FrameError),
}

impl SessionError {
    /// `true` for an orderly disconnect by the peer.
    pub fn is_clean_close(&self) -> bool {
        matches!(self, SessionError::TransportClosed)
    }
}

impl From<SendError> for SessionError {
    fn from(e: SendError) -> Self {
        match e {
            SendError::Closed => SessionError::TransportClosed,
            SendError::Io(io) => SessionError::TransportWriteFailed(io),
        }
    }
}

/// Lifecycle notifications for the host UI.
#[derive(Debug)]
pub enum SessionEvent {
    /// A client connected; `pin` must be shown to the user.
    Started { session_id: Uuid, pin: Pin },
    /// The session ended on its own (not by replacement or shutdown).
    Ended {
        session_id: Uuid,
        /// `true` when the peer disconnected cleanly.
        clean_close: bool,
        reason: String,
    },
}

/// Tunables for one session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Bytes requested per transport read.
    pub read_chunk_size: usize,
    /// Longest accepted line; `None` accumulates without limit.
    pub max_line_length: Option<usize>,
    /// Spacing between `METRICS:` lines.
    pub telemetry_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_line_length: None,
            telemetry_interval: DEFAULT_TELEMETRY_INTERVAL,
        }
    }
}

/// Collaborators shared by every session the host runs.
#[derive(Clone)]
pub struct SessionDeps {
    pub actions: Arc<dyn HostActions>,
    pub telemetry: Arc<dyn TelemetryProvider>,
    pub settings: SessionSettings,
    /// Receives [`SessionEvent`]s; `None` disables notifications.
    pub events: Option<mpsc::Sender<SessionEvent>>,
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Owns one session over `stream`.
pub struct SessionController<S> {
    id: Uuid,
    stream: S,
    authenticator: Authenticator,
    deps: SessionDeps,
}

impl<S> SessionController<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Creates a session with a freshly drawn PIN.
    pub fn new(stream: S, deps: SessionDeps) -> Self {
        Self::with_authenticator(stream, deps, Authenticator::generate())
    }

    /// Creates a session that accepts a known PIN.
    pub fn with_authenticator(stream: S, deps: SessionDeps, authenticator: Authenticator) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream,
            authenticator,
            deps,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The PIN the client must submit.
    pub fn pin(&self) -> Pin {
        self.authenticator.pin()
    }

    /// Runs the session to completion and returns why it ended.
    pub async fn run(self) -> SessionError {
        let span = tracing::info_span!("session", id = %self.id);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(self) -> SessionError {
        let SessionController {
            id,
            stream,
            authenticator,
            deps,
        } = self;
        let pin = authenticator.pin();

        let (reader, write_half) = tokio::io::split(stream);
        let writer = SessionWriter::new(write_half);
        let dispatcher = CommandDispatcher::new(authenticator, Arc::clone(&deps.actions));

        info!("session started");
        notify(&deps.events, SessionEvent::Started { session_id: id, pin }).await;

        let broadcaster = TelemetryBroadcaster::new(
            Arc::clone(&deps.telemetry),
            Arc::new(writer.clone()),
            dispatcher.auth_flag(),
            deps.settings.telemetry_interval,
        );
        let telemetry = AbortOnDrop(tokio::spawn(broadcaster.run().in_current_span()));

        let reason = read_loop(reader, &writer, &dispatcher, &deps.settings).await;

        drop(telemetry);
        writer.close().await;

        if reason.is_clean_close() {
            info!("session ended: {reason}");
        } else {
            warn!("session ended: {reason}");
        }
        notify(
            &deps.events,
            SessionEvent::Ended {
                session_id: id,
                clean_close: reason.is_clean_close(),
                reason: reason.to_string(),
            },
        )
        .await;
        reason
    }
}

/// Reads, frames and dispatches until the first fault.
async fn read_loop<R, W>(
    mut reader: R,
    writer: &SessionWriter<W>,
    dispatcher: &CommandDispatcher,
    settings: &SessionSettings,
) -> SessionError
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    let mut framer = match settings.max_line_length {
        Some(max) => LineFramer::with_max_line_length(max),
        None => LineFramer::new(),
    };
    let mut buf = vec![0u8; settings.read_chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => return SessionError::TransportClosed,
            Ok(n) => n,
            Err(e) => return SessionError::TransportReadFailed(e),
        };
        trace!(bytes = n, "chunk received");

        for line in framer.feed(&buf[..n]) {
            let line = match line {
                Ok(line) => line,
                Err(e) => return e.into(),
            };

            let command = Command::parse(&line);
            debug!(kind = command.kind(), "command received");

            if let Some(reply) = dispatcher.dispatch(command).await {
                if let Err(e) = writer.write_line(reply).await {
                    return e.into();
                }
            }
        }
    }
}

async fn notify(events: &Option<mpsc::Sender<SessionEvent>>, event: SessionEvent) {
    if let Some(tx) = events {
        if tx.send(event).await.is_err() {
            debug!("session event receiver dropped");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
