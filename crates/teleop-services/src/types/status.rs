// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intervention session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new worker was spawned
    Started,
    /// A worker is already running; the request is a no-op
    AlreadyActive,
}

/// Result of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The running session was signalled and released
    Stopped,
    /// No session was running
    NotActive,
}

/// Snapshot of the coordinator's state for status queries
#[derive(Debug, Clone, Serialize)]
pub struct InterventionStatus {
    /// True iff a worker is currently running
    pub active: bool,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl InterventionStatus {
    pub fn idle() -> Self {
        Self {
            active: false,
            state: SessionState::Idle,
            started_at: None,
        }
    }
}
