// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Cross-field checks that cannot be expressed through serde defaults alone.

use crate::{ConfigError, ConfigResult, TeleopConfig};

/// Validate a loaded configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` describing the first failed check.
pub fn validate_config(config: &TeleopConfig) -> ConfigResult<()> {
    if config.api.port == 0 {
        return Err(ConfigError::ValidationError(
            "api.port must be non-zero".to_string(),
        ));
    }

    if config.robot.right_dofs == 0 {
        return Err(ConfigError::ValidationError(
            "robot.right_dofs must be non-zero".to_string(),
        ));
    }

    if config.robot.bimanual && config.robot.left_dofs == 0 {
        return Err(ConfigError::ValidationError(
            "robot.left_dofs must be non-zero for a bimanual robot".to_string(),
        ));
    }

    let expected = config.robot.total_dofs();
    if config.robot.start_pose.len() != expected {
        return Err(ConfigError::ValidationError(format!(
            "robot.start_pose has {} entries but the robot has {} degrees of freedom",
            config.robot.start_pose.len(),
            expected
        )));
    }

    if config.intervention.loop_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "intervention.loop_interval_ms must be non-zero".to_string(),
        ));
    }

    // Zero stagger would let both arms draw peak current simultaneously
    if config.robot.bimanual && config.intervention.arm_stagger_ms == 0 {
        return Err(ConfigError::ValidationError(
            "intervention.arm_stagger_ms must be non-zero for a bimanual robot".to_string(),
        ));
    }

    if config.intervention.worker_join_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "intervention.worker_join_timeout_ms must be non-zero".to_string(),
        ));
    }

    if config.intervention.heartbeat_every == 0 {
        return Err(ConfigError::ValidationError(
            "intervention.heartbeat_every must be non-zero".to_string(),
        ));
    }

    if !config.telemetry.negotiation_path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "telemetry.negotiation_path must start with '/': {}",
            config.telemetry.negotiation_path
        )));
    }

    if config.telemetry.negotiation_timeout_ms == 0
        || config.telemetry.channel_send_timeout_ms == 0
        || config.telemetry.fallback_timeout_ms == 0
    {
        return Err(ConfigError::ValidationError(
            "telemetry timeouts must be non-zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TeleopConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_mismatched_start_pose() {
        let mut config = TeleopConfig::default();
        config.robot.start_pose = vec![0.0; 3];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_stagger_for_bimanual() {
        let mut config = TeleopConfig::default();
        config.intervention.arm_stagger_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_relative_negotiation_path() {
        let mut config = TeleopConfig::default();
        config.telemetry.negotiation_path = "client/intervene".to_string();
        assert!(validate_config(&config).is_err());
    }
}
