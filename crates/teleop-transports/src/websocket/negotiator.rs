// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Session channel negotiation
//!
//! Negotiation runs on its own task, separate from the control worker, so a
//! slow or failing handshake never blocks arm motion. A failed handshake
//! downgrades the session to the HTTP fallback without aborting it.

use crate::common::{TransportError, TransportResult};
use crate::websocket::WsChannel;
use async_trait::async_trait;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tracing::info;

/// Establishes a send-capable session channel from a channel URL
#[async_trait]
pub trait SessionNegotiator: Send + Sync {
    async fn negotiate(&self, channel_url: &str) -> TransportResult<WsChannel>;
}

/// Default negotiator: a bounded WebSocket client handshake
pub struct WsNegotiator {
    timeout: Duration,
}

impl WsNegotiator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl SessionNegotiator for WsNegotiator {
    async fn negotiate(&self, channel_url: &str) -> TransportResult<WsChannel> {
        match tokio::time::timeout(self.timeout, connect_async(channel_url)).await {
            Ok(Ok((stream, _response))) => {
                info!("🦀 [WS-CHANNEL] Session channel open to {}", channel_url);
                Ok(WsChannel::new(stream, channel_url.to_string()))
            }
            Ok(Err(e)) => Err(TransportError::NegotiationFailed(e.to_string())),
            Err(_) => Err(TransportError::NegotiationFailed(format!(
                "handshake timed out after {:?}",
                self.timeout
            ))),
        }
    }
}
