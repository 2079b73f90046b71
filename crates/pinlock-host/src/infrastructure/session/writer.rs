//! Serialised writer for the outbound half of a session transport.
//!
//! # Why a mutex around the write half? (for beginners)
//!
//! Two tasks write to the same client: the read loop (replies such as
//! `AUTH:OK`) and the telemetry task (`METRICS:` lines).  A single
//! `write_all` call can take several partial writes when the transport buffer
//! is small.  If both tasks wrote at the same time, bytes from one line could
//! land in the middle of the other.
//!
//! Every write therefore takes an async [`Mutex`], then performs `write_all`
//! followed by `flush`, and only then releases the lock.  Each line reaches
//! the wire whole.
//!
//! The slot holds an `Option`: [`SessionWriter::close`] shuts the half down
//! and leaves `None` behind, so any later write fails with
//! [`SendError::Closed`] instead of touching the transport.

use std::sync::Arc;

use async_trait::async_trait;
use pinlock_core::HostMessage;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::application::broadcast_telemetry::{MessageSink, SendError};

/// Cloneable handle to one session's outbound half.
pub struct SessionWriter<W> {
    half: Arc<Mutex<Option<W>>>,
}

impl<W> Clone for SessionWriter<W> {
    fn clone(&self) -> Self {
        Self {
            half: Arc::clone(&self.half),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> SessionWriter<W> {
    pub fn new(half: W) -> Self {
        Self {
            half: Arc::new(Mutex::new(Some(half))),
        }
    }

    /// Writes one complete line and flushes it.
    ///
    /// # Errors
    ///
    /// [`SendError::Closed`] after [`close`](Self::close), or
    /// [`SendError::Io`] if the transport rejects the bytes.
    pub async fn write_line(&self, message: HostMessage) -> Result<(), SendError> {
        let line = message.to_line();
        let mut guard = self.half.lock().await;
        let half = guard.as_mut().ok_or(SendError::Closed)?;
        half.write_all(line.as_bytes()).await?;
        half.flush().await?;
        trace!(bytes = line.len(), "line written");
        Ok(())
    }

    /// Shuts the outbound half down and releases it.  Idempotent.
    pub async fn close(&self) {
        let taken = self.half.lock().await.take();
        if let Some(mut half) = taken {
            if let Err(e) = half.shutdown().await {
                debug!("shutdown of outbound half failed: {e}");
            }
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub async fn is_closed(&self) -> bool {
        self.half.lock().await.is_none()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> MessageSink for SessionWriter<W> {
    async fn send(&self, message: HostMessage) -> Result<(), SendError> {
        self.write_line(message).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
