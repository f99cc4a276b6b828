// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Robot agent capability layer.
//!
//! Defines the [`RobotAgent`] trait the intervention coordinator drives, a
//! deterministic [`StubArm`] for wiring and tests, and [`BimanualAgent`],
//! which composes two arms behind the same interface.
//!
//! The low-level joint wire protocol lives behind `RobotAgent`
//! implementations and is out of scope for this crate.

pub mod bimanual;
pub mod stub;
pub mod traits;

pub use bimanual::BimanualAgent;
pub use stub::StubArm;
pub use traits::{Observation, RobotAgent, SharedAgent};

use thiserror::Error;

/// Errors raised by robot agent implementations
#[derive(Debug, Error)]
pub enum AgentError {
    /// An observation array cannot be split evenly between two arms
    #[error("Malformed observation: key '{key}' has odd length {len}")]
    MalformedObservation { key: String, len: usize },

    /// A target vector does not match the agent's degrees of freedom
    #[error("Dimension mismatch: expected {expected} joints, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The underlying motor driver rejected or failed a command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The agent has been closed
    #[error("Agent is closed")]
    Closed,
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
