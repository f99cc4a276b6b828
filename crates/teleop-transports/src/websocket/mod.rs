// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! WebSocket session channel
//!
//! The low-latency telemetry path. A channel is obtained out-of-band by a
//! [`SessionNegotiator`] and handed to the telemetry transport, which
//! prefers it over the HTTP fallback for as long as it reports open.

pub mod channel;
pub mod negotiator;

pub use channel::WsChannel;
pub use negotiator::{SessionNegotiator, WsNegotiator};
