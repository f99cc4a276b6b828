// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Telemetry wire sample
//!
//! The field names and layout below are the contract consumed by the remote
//! viewer. The same serde serialization feeds both the session channel and
//! the HTTP fallback, so the bytes match whichever path carries a sample.

use crate::common::TransportResult;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One joint-state sample produced per control-loop iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Joint positions, one per degree of freedom
    pub joint_states: Vec<f64>,
    /// Capture time as epoch seconds
    pub timestamp: f64,
}

impl TelemetrySample {
    /// Create a sample stamped with the current time
    pub fn new(joint_states: Vec<f64>) -> Self {
        Self {
            joint_states,
            timestamp: epoch_seconds(),
        }
    }

    /// Serialize to the JSON wire form
    pub fn to_json(&self) -> TransportResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
