// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Teleop - Operator Intervention Service for Robotic Arms
//!
//! Teleop lets an operator take manual control of one or two robotic arms:
//! a background control loop puts the motors into gravity compensation so
//! the arms can be moved by hand, continuously samples joint state, and
//! streams it to a remote viewer over a low-latency session channel with an
//! HTTP fallback. A small REST control plane governs the loop's lifecycle.
//!
//! ## Components
//!
//! - [`teleop_config`]: TOML configuration with environment overrides
//! - [`teleop_observability`]: tracing/logging initialization
//! - [`teleop_agent`]: the `RobotAgent` capability and bimanual composition
//! - [`teleop_transports`]: session channel, HTTP fallback, negotiation
//! - [`teleop_services`]: the intervention lifecycle coordinator
//! - [`teleop_api`]: the axum control plane
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! teleop = "0.1"
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use teleop::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = InterventionSettings::from_config(&load_config(None)?);
//! let agent: SharedAgent = Arc::new(tokio::sync::Mutex::new(StubArm::new(7)));
//! let controller = InterventionController::new(
//!     Some(agent),
//!     settings,
//!     Arc::new(WsNegotiator::new(Duration::from_secs(5))),
//! );
//!
//! controller.start(TransportEndpoint::none()).await?;
//! assert!(controller.is_active());
//! controller.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The ready-to-run server binary lives in `tools/run_server.rs`
//! (`cargo run --bin teleop_server`).

pub use teleop_agent as agent;
pub use teleop_api as api;
pub use teleop_config as config;
pub use teleop_observability as observability;
pub use teleop_services as services;
pub use teleop_transports as transports;

/// Common imports for building on the service layer
pub mod prelude {
    pub use teleop_agent::{BimanualAgent, Observation, RobotAgent, SharedAgent, StubArm};
    pub use teleop_api::{create_http_server, ApiState};
    pub use teleop_config::{load_config, TeleopConfig};
    pub use teleop_observability::{init_logging, ObservabilityConfig};
    pub use teleop_services::{
        InterventionController, InterventionService, InterventionSettings, SessionState,
        StartOutcome, StopOutcome,
    };
    pub use teleop_transports::{
        SessionNegotiator, TelemetrySample, TelemetryTransport, TransportEndpoint, WsNegotiator,
    };
}
