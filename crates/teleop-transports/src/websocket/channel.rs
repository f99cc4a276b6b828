// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Send-capable session channel handle
//!
//! Wraps a connected WebSocket stream. Handles are cheap to clone; all
//! clones share the underlying stream and open flag.

use crate::common::{TransportError, TransportResult};
use futures_util::SinkExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Open WebSocket channel to the remote viewer
#[derive(Clone)]
pub struct WsChannel {
    stream: Arc<Mutex<Option<WsStream>>>,
    open: Arc<AtomicBool>,
    peer: Arc<String>,
}

impl WsChannel {
    pub(crate) fn new(stream: WsStream, peer: String) -> Self {
        Self {
            stream: Arc::new(Mutex::new(Some(stream))),
            open: Arc::new(AtomicBool::new(true)),
            peer: Arc::new(peer),
        }
    }

    /// Whether the channel is still usable for sending
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Remote address this channel was negotiated against
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one text frame, bounded by `timeout`.
    ///
    /// Any failure marks the channel closed; a half-written frame leaves the
    /// stream unusable.
    pub async fn send_text(&self, payload: &str, timeout: Duration) -> TransportResult<()> {
        if !self.is_open() {
            return Err(TransportError::ConnectionClosed);
        }

        let mut guard = self.stream.lock().await;
        let ws = guard.as_mut().ok_or(TransportError::ConnectionClosed)?;

        match tokio::time::timeout(timeout, ws.send(Message::Text(payload.to_string()))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.open.store(false, Ordering::Release);
                Err(TransportError::SendFailed(e.to_string()))
            }
            Err(_) => {
                self.open.store(false, Ordering::Release);
                Err(TransportError::Timeout)
            }
        }
    }

    /// Close the channel, sending a close frame on a best-effort basis.
    pub async fn close(&self) {
        self.open.store(false, Ordering::Release);
        let mut guard = self.stream.lock().await;
        if let Some(mut ws) = guard.take() {
            match tokio::time::timeout(CLOSE_TIMEOUT, ws.close(None)).await {
                Ok(Ok(())) => info!("🦀 [WS-CHANNEL] Closed channel to {}", self.peer),
                Ok(Err(e)) => debug!("[WS-CHANNEL] close handshake failed: {}", e),
                Err(_) => debug!("[WS-CHANNEL] close handshake timed out"),
            }
        }
    }
}
