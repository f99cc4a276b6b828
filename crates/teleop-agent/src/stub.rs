// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic in-memory arm
//!
//! Stands in for a hardware driver when the service runs without real
//! arms attached, and doubles as the base agent in tests.

use crate::traits::{Observation, RobotAgent};
use crate::{AgentError, AgentResult};
use async_trait::async_trait;

/// Arm stub that tracks commanded state without any I/O
#[derive(Debug)]
pub struct StubArm {
    num_dofs: usize,
    positions: Vec<f64>,
    torque_enabled: bool,
    closed: bool,
}

impl StubArm {
    pub fn new(num_dofs: usize) -> Self {
        Self {
            num_dofs,
            positions: vec![0.0; num_dofs],
            torque_enabled: true,
            closed: false,
        }
    }

    /// Current torque mode (stub-only introspection)
    pub fn torque_enabled(&self) -> bool {
        self.torque_enabled
    }

    fn ensure_open(&self) -> AgentResult<()> {
        if self.closed {
            return Err(AgentError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl RobotAgent for StubArm {
    async fn act(&mut self, _obs: &Observation) -> AgentResult<Vec<f64>> {
        self.ensure_open()?;
        Ok(self.positions.clone())
    }

    async fn move_to_position(&mut self, target: &[f64]) -> AgentResult<()> {
        self.ensure_open()?;
        if target.len() != self.num_dofs {
            return Err(AgentError::DimensionMismatch {
                expected: self.num_dofs,
                actual: target.len(),
            });
        }
        self.positions.copy_from_slice(target);
        Ok(())
    }

    async fn set_torque_mode(&mut self, enabled: bool) -> AgentResult<()> {
        self.ensure_open()?;
        self.torque_enabled = enabled;
        Ok(())
    }

    fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    async fn close(&mut self) -> AgentResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_arm_tracks_position() {
        let mut arm = StubArm::new(3);
        arm.move_to_position(&[1.0, 2.0, 3.0]).await.unwrap();
        let joints = arm.act(&Observation::new()).await.unwrap();
        assert_eq!(joints, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_stub_arm_rejects_wrong_dimensions() {
        let mut arm = StubArm::new(3);
        let result = arm.move_to_position(&[1.0]).await;
        assert!(matches!(
            result,
            Err(AgentError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_stub_arm_rejects_commands_after_close() {
        let mut arm = StubArm::new(3);
        arm.close().await.unwrap();
        assert!(matches!(
            arm.act(&Observation::new()).await,
            Err(AgentError::Closed)
        ));
    }
}
