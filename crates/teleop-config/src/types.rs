// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `teleop_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TeleopConfig {
    pub system: SystemConfig,
    pub api: ApiConfig,
    pub robot: RobotConfig,
    pub intervention: InterventionConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub debug: bool,
    /// Deadline for the graceful-shutdown sequence (stop session + close agent)
    pub shutdown_deadline_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            debug: false,
            shutdown_deadline_ms: 5000,
        }
    }
}

/// REST API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Robot composition configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Compose two arms into a bimanual agent
    pub bimanual: bool,
    /// Degrees of freedom of the right arm (and the left, when bimanual)
    pub right_dofs: usize,
    pub left_dofs: usize,
    /// Known-safe pose the preamble moves to before engaging gravity
    /// compensation. Length must equal the total DOF count.
    pub start_pose: Vec<f64>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            bimanual: true,
            right_dofs: 7,
            left_dofs: 7,
            start_pose: vec![0.0; 14],
        }
    }
}

/// Intervention control-loop timing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterventionConfig {
    /// Per-iteration sleep of the control loop (design default 10ms, ~100Hz)
    pub loop_interval_ms: u64,
    /// Settle time after enabling torque, before the start-pose move
    pub torque_settle_ms: u64,
    /// Settle time after the start-pose move, before disabling torque
    pub move_settle_ms: u64,
    /// Stagger between right-arm and left-arm commands
    pub arm_stagger_ms: u64,
    /// How long stop() waits for the worker to terminate
    pub worker_join_timeout_ms: u64,
    /// Emit a heartbeat log line every N loop iterations
    pub heartbeat_every: u64,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 10,
            torque_settle_ms: 1000,
            move_settle_ms: 300,
            arm_stagger_ms: 50,
            worker_join_timeout_ms: 2000,
            heartbeat_every: 1000,
        }
    }
}

/// Telemetry transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Well-known path the operator's stream address is rewritten to
    pub negotiation_path: String,
    /// Deadline for the session-channel handshake
    pub negotiation_timeout_ms: u64,
    /// Per-sample send timeout on the session channel
    pub channel_send_timeout_ms: u64,
    /// Per-sample timeout of the HTTP fallback POST
    pub fallback_timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            negotiation_path: "/client/intervene".to_string(),
            negotiation_timeout_ms: 5000,
            channel_send_timeout_ms: 50,
            fallback_timeout_ms: 50,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (text or json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl RobotConfig {
    /// Total degrees of freedom across the composed arms
    pub fn total_dofs(&self) -> usize {
        if self.bimanual {
            self.right_dofs + self.left_dofs
        } else {
            self.right_dofs
        }
    }
}
