// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Agent trait definitions
//!
//! `RobotAgent` is the capability boundary between the intervention
//! coordinator and the motor drivers. Implementations wrap whatever joint
//! transport the hardware speaks; the coordinator only sees these five
//! operations.

use crate::AgentResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-key float arrays handed to `act`. Empty for plain joint sampling.
pub type Observation = HashMap<String, Vec<f64>>;

/// Capability interface of one arm (or a composite of two)
#[async_trait]
pub trait RobotAgent: Send {
    /// Sample the current joint state.
    ///
    /// Returns one float per degree of freedom.
    async fn act(&mut self, obs: &Observation) -> AgentResult<Vec<f64>>;

    /// Command the arm to a joint-space target.
    async fn move_to_position(&mut self, target: &[f64]) -> AgentResult<()>;

    /// Enable or disable torque mode.
    ///
    /// Enabled: motors actively hold position. Disabled: motors passively
    /// compensate gravity only, so the operator can move the arm by hand.
    async fn set_torque_mode(&mut self, enabled: bool) -> AgentResult<()>;

    /// Degrees of freedom this agent commands
    fn num_dofs(&self) -> usize;

    /// Release the underlying driver resources.
    ///
    /// Further commands fail with `AgentError::Closed`.
    async fn close(&mut self) -> AgentResult<()>;
}

/// Shared handle to the process-owned agent.
///
/// The agent is not safe for concurrent use; while a session is active the
/// worker is the only holder that issues commands (enforced by the
/// single-session rule in the controller, not by this lock).
pub type SharedAgent = Arc<Mutex<dyn RobotAgent + Send>>;
