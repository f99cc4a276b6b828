// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Telemetry transport layer
//!
//! Streams joint-state samples from the intervention worker to a remote
//! viewer. Two backends sit behind [`TelemetryTransport`]:
//!
//! - a low-latency WebSocket session channel, negotiated out-of-band by a
//!   [`SessionNegotiator`], preferred whenever it is open;
//! - a best-effort HTTP POST fallback with a short bounded timeout.
//!
//! `send` is fire-and-forget: a dropped sample is acceptable because the
//! next one follows within the control-loop interval.

pub mod common;
pub mod endpoint;
pub mod fallback;
pub mod telemetry;
pub mod websocket;

pub use common::{TelemetrySample, TransportError, TransportResult};
pub use endpoint::TransportEndpoint;
pub use fallback::HttpFallback;
pub use telemetry::TelemetryTransport;
pub use websocket::{SessionNegotiator, WsChannel, WsNegotiator};

/// Convenience re-exports for downstream crates
pub mod prelude {
    pub use crate::common::{TelemetrySample, TransportError, TransportResult};
    pub use crate::endpoint::TransportEndpoint;
    pub use crate::telemetry::TelemetryTransport;
    pub use crate::websocket::{SessionNegotiator, WsChannel, WsNegotiator};
}
