// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bimanual composition
//!
//! Fans agent operations out to a right and a left arm behind the single
//! `RobotAgent` interface. Joint vectors are laid out `[right | left]`.
//!
//! Command ordering is right before left. Position moves additionally put a
//! stagger delay between the two arms so they never draw peak current at
//! the same instant; that ordering and delay are a physical-safety
//! property, not a tuning knob.

use crate::traits::{Observation, RobotAgent};
use crate::{AgentError, AgentResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Two arms composed behind one `RobotAgent`
pub struct BimanualAgent {
    right: Box<dyn RobotAgent + Send>,
    left: Box<dyn RobotAgent + Send>,
    stagger: Duration,
}

impl BimanualAgent {
    /// Compose two arms with the given inter-arm command stagger
    pub fn new(
        right: Box<dyn RobotAgent + Send>,
        left: Box<dyn RobotAgent + Send>,
        stagger: Duration,
    ) -> Self {
        Self {
            right,
            left,
            stagger,
        }
    }

    fn split_observation(&self, obs: &Observation) -> AgentResult<(Observation, Observation)> {
        let mut right_obs = Observation::with_capacity(obs.len());
        let mut left_obs = Observation::with_capacity(obs.len());

        for (key, values) in obs {
            let len = values.len();
            let half = len / 2;
            if half * 2 != len {
                return Err(AgentError::MalformedObservation {
                    key: key.clone(),
                    len,
                });
            }
            right_obs.insert(key.clone(), values[..half].to_vec());
            left_obs.insert(key.clone(), values[half..].to_vec());
        }

        Ok((right_obs, left_obs))
    }
}

#[async_trait]
impl RobotAgent for BimanualAgent {
    async fn act(&mut self, obs: &Observation) -> AgentResult<Vec<f64>> {
        let (right_obs, left_obs) = self.split_observation(obs)?;

        let mut joints = self.right.act(&right_obs).await?;
        joints.extend(self.left.act(&left_obs).await?);
        Ok(joints)
    }

    async fn move_to_position(&mut self, target: &[f64]) -> AgentResult<()> {
        let expected = self.num_dofs();
        if target.len() != expected {
            return Err(AgentError::DimensionMismatch {
                expected,
                actual: target.len(),
            });
        }

        let mid = self.right.num_dofs();
        debug!("Bimanual move: right arm ({} joints), then left", mid);
        self.right.move_to_position(&target[..mid]).await?;
        tokio::time::sleep(self.stagger).await;
        self.left.move_to_position(&target[mid..]).await?;
        Ok(())
    }

    async fn set_torque_mode(&mut self, enabled: bool) -> AgentResult<()> {
        self.right.set_torque_mode(enabled).await?;
        self.left.set_torque_mode(enabled).await?;
        Ok(())
    }

    fn num_dofs(&self) -> usize {
        self.right.num_dofs() + self.left.num_dofs()
    }

    async fn close(&mut self) -> AgentResult<()> {
        let right_result = self.right.close().await;
        let left_result = self.left.close().await;
        right_result?;
        left_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Instant;

    /// Records every command with its wall-clock instant
    struct RecordingArm {
        name: &'static str,
        num_dofs: usize,
        log: Arc<Mutex<Vec<(String, Instant)>>>,
    }

    impl RecordingArm {
        fn new(
            name: &'static str,
            num_dofs: usize,
            log: Arc<Mutex<Vec<(String, Instant)>>>,
        ) -> Self {
            Self {
                name,
                num_dofs,
                log,
            }
        }

        fn record(&self, op: &str) {
            self.log
                .lock()
                .push((format!("{}:{}", self.name, op), Instant::now()));
        }
    }

    #[async_trait]
    impl RobotAgent for RecordingArm {
        async fn act(&mut self, _obs: &Observation) -> AgentResult<Vec<f64>> {
            self.record("act");
            Ok(vec![1.0; self.num_dofs])
        }

        async fn move_to_position(&mut self, _target: &[f64]) -> AgentResult<()> {
            self.record("move");
            Ok(())
        }

        async fn set_torque_mode(&mut self, enabled: bool) -> AgentResult<()> {
            self.record(if enabled { "torque_on" } else { "torque_off" });
            Ok(())
        }

        fn num_dofs(&self) -> usize {
            self.num_dofs
        }

        async fn close(&mut self) -> AgentResult<()> {
            self.record("close");
            Ok(())
        }
    }

    fn bimanual_with_log(stagger_ms: u64) -> (BimanualAgent, Arc<Mutex<Vec<(String, Instant)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let agent = BimanualAgent::new(
            Box::new(RecordingArm::new("right", 2, log.clone())),
            Box::new(RecordingArm::new("left", 2, log.clone())),
            Duration::from_millis(stagger_ms),
        );
        (agent, log)
    }

    #[tokio::test]
    async fn test_move_issues_right_before_left_with_stagger() {
        let (mut agent, log) = bimanual_with_log(20);
        agent
            .move_to_position(&[0.1, 0.2, 0.3, 0.4])
            .await
            .unwrap();

        let log = log.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].0, "right:move");
        assert_eq!(log[1].0, "left:move");
        let gap = log[1].1.duration_since(log[0].1);
        assert!(gap >= Duration::from_millis(20), "gap was {:?}", gap);
    }

    #[tokio::test]
    async fn test_torque_fans_out_right_before_left() {
        let (mut agent, log) = bimanual_with_log(1);
        agent.set_torque_mode(false).await.unwrap();

        let log = log.lock();
        assert_eq!(log[0].0, "right:torque_off");
        assert_eq!(log[1].0, "left:torque_off");
    }

    #[tokio::test]
    async fn test_act_rejects_odd_observation_arrays() {
        let (mut agent, _log) = bimanual_with_log(1);
        let mut obs = Observation::new();
        obs.insert("joints".to_string(), vec![1.0, 2.0, 3.0]);

        let result = agent.act(&obs).await;
        assert!(matches!(
            result,
            Err(AgentError::MalformedObservation { len: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_act_concatenates_right_then_left() {
        let (mut agent, _log) = bimanual_with_log(1);
        let joints = agent.act(&Observation::new()).await.unwrap();
        assert_eq!(joints.len(), 4);
    }

    #[tokio::test]
    async fn test_move_rejects_wrong_total_dimension() {
        let (mut agent, _log) = bimanual_with_log(1);
        let result = agent.move_to_position(&[0.1, 0.2]).await;
        assert!(matches!(
            result,
            Err(AgentError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }
}
