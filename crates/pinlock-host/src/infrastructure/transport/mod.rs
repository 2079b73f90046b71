//! TCP transport: accept loop with single-session replacement.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming connections from the phone.
//! 3. Stopping the previous session (if any) before the new one starts.
//! 4. Gracefully shutting down when the `running` flag is cleared.
//!
//! # One session at a time
//!
//! The host serves exactly one client.  When a second connection arrives the
//! active session task is aborted *and awaited* before the new session is
//! spawned.  Awaiting the aborted handle guarantees the old read loop has been
//! dropped, so no command from the old connection can be dispatched once the
//! new session exists.
//!
//! A lock or unlock already running on the blocking pool cannot be
//! interrupted; it finishes in the background but its result is discarded.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::session::{SessionController, SessionDeps, SessionError};

/// How often the accept loop re-checks the shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Errors raised while setting up the listener.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not be bound.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Binds the host's TCP listener.
///
/// # Errors
///
/// Returns [`TransportError::Bind`] if the port is in use or the process
/// lacks permission.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, TransportError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind { addr, source })
}

/// The session currently being served.
struct ActiveSession {
    id: Uuid,
    handle: JoinHandle<SessionError>,
}

impl ActiveSession {
    /// Aborts the session task and waits until it is gone.
    async fn stop(self) {
        self.handle.abort();
        match self.handle.await {
            Ok(reason) => debug!(session = %self.id, "session had already ended: {reason}"),
            Err(e) if e.is_cancelled() => info!(session = %self.id, "session stopped"),
            Err(e) => error!(session = %self.id, "session task panicked: {e}"),
        }
    }
}

/// Runs the accept loop until `running` is set to `false`.
///
/// Each accepted connection replaces the active session.  On return no
/// session task is left running.
pub async fn run_host(listener: TcpListener, deps: SessionDeps, running: Arc<AtomicBool>) {
    match listener.local_addr() {
        Ok(addr) => info!("PinLock host listening on {addr}"),
        Err(e) => debug!("listener address unavailable: {e}"),
    }

    let mut active: Option<ActiveSession> = None;

    while running.load(Ordering::Relaxed) {
        // A short timeout lets the loop notice the shutdown flag even when
        // nobody connects.
        let (stream, peer) = match timeout(ACCEPT_POLL_INTERVAL, listener.accept()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                error!("accept error: {e}");
                continue;
            }
            Err(_) => continue,
        };

        if let Some(previous) = active.take() {
            info!(session = %previous.id, "new connection from {peer} replaces active session");
            previous.stop().await;
        }

        if let Err(e) = stream.set_nodelay(true) {
            debug!("could not disable Nagle on {peer}: {e}");
        }

        let session = SessionController::new(stream, deps.clone());
        let id = session.id();
        info!(session = %id, "client connected from {peer}");
        active = Some(ActiveSession {
            id,
            handle: tokio::spawn(session.run()),
        });
    }

    info!("shutdown flag set; stopping accept loop");
    if let Some(session) = active.take() {
        session.stop().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_reports_address_in_use() {
        // Arrange
        let first = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = first.local_addr().unwrap();

        // Act
        let second = bind(addr).await;

        // Assert
        match second {
            Err(TransportError::Bind { addr: a, .. }) => assert_eq!(a, addr),
            Ok(_) => panic!("second bind on {addr} must fail"),
        }
    }
}
