// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Teleop Intervention Server

Boots the control plane and the intervention coordinator with the robot
composition described in `teleop_configuration.toml`.

Usage:
  cargo run --bin teleop_server

Configuration is discovered automatically; set TELEOP_CONFIG_PATH to point
at a custom file.
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use teleop_agent::{BimanualAgent, RobotAgent, SharedAgent, StubArm};
use teleop_api::{create_http_server, ApiState};
use teleop_config::{load_config, TeleopConfig};
use teleop_observability::{init_logging, ObservabilityConfig};
use teleop_services::{InterventionController, InterventionSettings};
use teleop_transports::WsNegotiator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config(None).context("Failed to load configuration")?;

    let observability =
        ObservabilityConfig::from_level_and_format(&config.logging.level, &config.logging.format);
    let _logging_guard = init_logging(&observability)?;

    info!("🦾 Teleop intervention server starting");
    info!(
        "Robot composition: {} ({} DOF)",
        if config.robot.bimanual {
            "bimanual"
        } else {
            "single arm"
        },
        config.robot.total_dofs()
    );

    let agent = build_agent(&config);
    let settings = InterventionSettings::from_config(&config);
    let negotiator = Arc::new(WsNegotiator::new(settings.negotiation_timeout));
    let controller = Arc::new(InterventionController::new(
        Some(agent),
        settings,
        negotiator,
    ));

    let state = ApiState::new(controller.clone(), &config.telemetry.negotiation_path);
    let app = create_http_server(state);

    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Control plane listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // Bounded teardown: stop a running session (torque restored by the
    // worker), then close the agent.
    let deadline = Duration::from_millis(config.system.shutdown_deadline_ms);
    if tokio::time::timeout(deadline, controller.shutdown())
        .await
        .is_err()
    {
        warn!("Shutdown deadline {:?} elapsed; exiting anyway", deadline);
    }

    info!("Teleop intervention server stopped");
    Ok(())
}

/// Compose the process-owned robot agent from configuration.
///
/// Hardware joint drivers plug in behind `RobotAgent`; the stub arms keep
/// the service runnable with no arms attached.
fn build_agent(config: &TeleopConfig) -> SharedAgent {
    if config.robot.bimanual {
        let right: Box<dyn RobotAgent + Send> = Box::new(StubArm::new(config.robot.right_dofs));
        let left: Box<dyn RobotAgent + Send> = Box::new(StubArm::new(config.robot.left_dofs));
        let stagger = Duration::from_millis(config.intervention.arm_stagger_ms);
        Arc::new(tokio::sync::Mutex::new(BimanualAgent::new(
            right, left, stagger,
        )))
    } else {
        Arc::new(tokio::sync::Mutex::new(StubArm::new(
            config.robot.right_dofs,
        )))
    }
}

/// Resolves when SIGINT or SIGTERM arrives; cleanup runs after the serve
/// loop drains.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received; performing cleanup");
}
