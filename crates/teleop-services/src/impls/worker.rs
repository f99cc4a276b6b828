// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Intervention worker body
//!
//! Runs in its own task, never the control plane's. Whatever ends the
//! session - cancellation, a preamble failure, a sampling error - the
//! torque-restore finalizer runs before the task exits.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use teleop_agent::{AgentError, Observation, SharedAgent};
use teleop_transports::{TelemetrySample, TelemetryTransport};

use crate::impls::controller::InterventionSettings;
use crate::types::SessionState;

/// Everything one worker task needs, moved in at spawn time
pub(crate) struct WorkerContext {
    pub agent: SharedAgent,
    pub transport: Arc<TelemetryTransport>,
    pub cancel: CancellationToken,
    pub state: Arc<Mutex<SessionState>>,
    pub settings: InterventionSettings,
}

/// Errors that terminate a session from inside the worker
#[derive(Debug, Error)]
pub(crate) enum WorkerError {
    #[error("Preamble failed: {0}")]
    Preamble(AgentError),

    #[error("Joint sampling failed: {0}")]
    Sample(AgentError),
}

/// Worker entry point: drive the session, then always restore safe state.
pub(crate) async fn run_worker(ctx: WorkerContext) {
    if let Err(e) = drive_session(&ctx).await {
        error!("[intervention] Session error: {}", e);
    }

    restore_safe_state(&ctx.agent).await;
    *ctx.state.lock() = SessionState::Idle;
    info!("[intervention] Stopped");
}

async fn drive_session(ctx: &WorkerContext) -> Result<(), WorkerError> {
    let settings = &ctx.settings;

    // Preamble: torque on, move to the start pose, then hand over to gravity
    // compensation. Right arm before left with a stagger lives inside the
    // bimanual composite.
    info!("[intervention] Moving robots to starting position...");
    ctx.agent
        .lock()
        .await
        .set_torque_mode(true)
        .await
        .map_err(WorkerError::Preamble)?;
    tokio::time::sleep(settings.torque_settle).await;

    ctx.agent
        .lock()
        .await
        .move_to_position(&settings.start_pose)
        .await
        .map_err(WorkerError::Preamble)?;
    tokio::time::sleep(settings.move_settle).await;

    info!("[intervention] Enabling gravity compensation mode...");
    ctx.agent
        .lock()
        .await
        .set_torque_mode(false)
        .await
        .map_err(WorkerError::Preamble)?;

    *ctx.state.lock() = SessionState::Active;
    info!("[intervention] Active - robots in gravity compensation mode");

    let obs = Observation::new();
    let mut iterations: u64 = 0;

    while !ctx.cancel.is_cancelled() {
        let joints = ctx
            .agent
            .lock()
            .await
            .act(&obs)
            .await
            .map_err(WorkerError::Sample)?;

        iterations += 1;
        if iterations % settings.heartbeat_every == 0 {
            debug!("[intervention] Heartbeat: {} samples streamed", iterations);
        }

        // Telemetry is best-effort; send never raises into the loop
        ctx.transport.send(&TelemetrySample::new(joints)).await;

        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = tokio::time::sleep(settings.loop_interval) => {}
        }
    }

    Ok(())
}

/// Finalizer: torque back on for all composed arms, errors logged only.
async fn restore_safe_state(agent: &SharedAgent) {
    if let Err(e) = agent.lock().await.set_torque_mode(true).await {
        warn!("[intervention] Failed to restore torque mode: {}", e);
    }
}
