// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Telemetry transport with per-call backend selection
//!
//! Selection policy, evaluated once per sample: open session channel first,
//! then the HTTP fallback, else drop the sample. An open channel is never
//! silently replaced or downgraded; it stays preferred until it closes or
//! the session ends.

use crate::common::TelemetrySample;
use crate::endpoint::TransportEndpoint;
use crate::fallback::HttpFallback;
use crate::websocket::WsChannel;
use parking_lot::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fire-and-forget sample sender shared between the controller and worker
pub struct TelemetryTransport {
    channel: RwLock<Option<WsChannel>>,
    fallback: Option<HttpFallback>,
    channel_send_timeout: Duration,
}

impl TelemetryTransport {
    pub fn new(fallback: Option<HttpFallback>, channel_send_timeout: Duration) -> Self {
        Self {
            channel: RwLock::new(None),
            fallback,
            channel_send_timeout,
        }
    }

    /// Build a transport for one session from its derived endpoint.
    ///
    /// A fallback URL that fails client construction is dropped with a
    /// warning; the session proceeds without it.
    pub fn for_endpoint(
        endpoint: &TransportEndpoint,
        channel_send_timeout: Duration,
        fallback_timeout: Duration,
    ) -> Self {
        let fallback = endpoint.fallback_url.as_ref().and_then(|url| {
            match HttpFallback::new(url.clone(), fallback_timeout) {
                Ok(fallback) => Some(fallback),
                Err(e) => {
                    warn!("Disabling HTTP fallback for {}: {}", url, e);
                    None
                }
            }
        });

        Self::new(fallback, channel_send_timeout)
    }

    /// Install a negotiated session channel.
    ///
    /// Ignored when an open channel is already installed.
    pub fn install_channel(&self, channel: WsChannel) {
        let mut guard = self.channel.write();
        match guard.as_ref() {
            Some(existing) if existing.is_open() => {
                debug!(
                    "Session channel to {} already open; ignoring channel to {}",
                    existing.peer(),
                    channel.peer()
                );
            }
            _ => {
                info!("Session channel installed: {}", channel.peer());
                *guard = Some(channel);
            }
        }
    }

    /// Whether an open session channel is currently installed
    pub fn channel_is_open(&self) -> bool {
        self.channel.read().as_ref().is_some_and(WsChannel::is_open)
    }

    /// Close and discard the session channel, if any.
    pub async fn close_channel(&self) {
        let channel = self.channel.write().take();
        if let Some(channel) = channel {
            channel.close().await;
        }
    }

    /// Send one sample, never raising into the caller.
    ///
    /// Failures are logged at debug; the next sample follows within the
    /// loop interval.
    pub async fn send(&self, sample: &TelemetrySample) {
        let payload = match sample.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Telemetry sample serialization failed: {}", e);
                return;
            }
        };

        // Snapshot the handle so no lock is held across the send
        let channel = {
            let guard = self.channel.read();
            guard.as_ref().filter(|c| c.is_open()).cloned()
        };

        if let Some(channel) = channel {
            if let Err(e) = channel
                .send_text(&payload, self.channel_send_timeout)
                .await
            {
                debug!("Session channel send failed: {}", e);
            }
            return;
        }

        if let Some(fallback) = &self.fallback {
            if let Err(e) = fallback.post_sample(sample).await {
                debug!("HTTP fallback send failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_targets_is_a_noop() {
        let transport = TelemetryTransport::new(None, Duration::from_millis(50));
        transport.send(&TelemetrySample::new(vec![0.0])).await;
        assert!(!transport.channel_is_open());
    }

    #[tokio::test]
    async fn test_for_endpoint_without_fallback() {
        let transport = TelemetryTransport::for_endpoint(
            &TransportEndpoint::none(),
            Duration::from_millis(50),
            Duration::from_millis(50),
        );
        transport.send(&TelemetrySample::new(vec![0.0])).await;
    }

    #[tokio::test]
    async fn test_close_channel_without_channel() {
        let transport = TelemetryTransport::new(None, Duration::from_millis(50));
        transport.close_channel().await;
        assert!(!transport.channel_is_open());
    }
}
