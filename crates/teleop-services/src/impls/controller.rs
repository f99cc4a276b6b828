// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Intervention lifecycle coordinator
//!
//! Owns the session state machine and the single worker task. The
//! bookkeeping mutex is held only for check-and-set, never across the
//! worker join, so a slow stop cannot starve concurrent status queries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use teleop_agent::SharedAgent;
use teleop_config::TeleopConfig;
use teleop_transports::{SessionNegotiator, TelemetryTransport, TransportEndpoint};

use crate::impls::worker::{self, WorkerContext};
use crate::traits::InterventionService;
use crate::types::{
    InterventionStatus, ServiceError, ServiceResult, SessionState, StartOutcome, StopOutcome,
};

/// Timing and pose parameters of the intervention lifecycle
#[derive(Debug, Clone)]
pub struct InterventionSettings {
    /// Per-iteration sleep of the control loop
    pub loop_interval: Duration,
    /// Settle time after enabling torque, before the start-pose move
    pub torque_settle: Duration,
    /// Settle time after the start-pose move, before disabling torque
    pub move_settle: Duration,
    /// How long `stop()` waits for the worker to terminate
    pub worker_join_timeout: Duration,
    /// Deadline for the session-channel handshake
    pub negotiation_timeout: Duration,
    /// Per-sample send timeout on the session channel
    pub channel_send_timeout: Duration,
    /// Per-sample timeout of the HTTP fallback POST
    pub fallback_timeout: Duration,
    /// Known-safe pose the preamble moves to
    pub start_pose: Vec<f64>,
    /// Emit a heartbeat log every N loop iterations
    pub heartbeat_every: u64,
}

impl InterventionSettings {
    /// Map the service configuration onto lifecycle settings
    pub fn from_config(config: &TeleopConfig) -> Self {
        Self {
            loop_interval: Duration::from_millis(config.intervention.loop_interval_ms),
            torque_settle: Duration::from_millis(config.intervention.torque_settle_ms),
            move_settle: Duration::from_millis(config.intervention.move_settle_ms),
            worker_join_timeout: Duration::from_millis(config.intervention.worker_join_timeout_ms),
            negotiation_timeout: Duration::from_millis(config.telemetry.negotiation_timeout_ms),
            channel_send_timeout: Duration::from_millis(config.telemetry.channel_send_timeout_ms),
            fallback_timeout: Duration::from_millis(config.telemetry.fallback_timeout_ms),
            start_pose: config.robot.start_pose.clone(),
            heartbeat_every: config.intervention.heartbeat_every,
        }
    }
}

/// Bookkeeping for one running session
struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
    transport: Arc<TelemetryTransport>,
    worker: JoinHandle<()>,
}

/// Lifecycle coordinator - the single owner of intervention state
pub struct InterventionController {
    agent: Option<SharedAgent>,
    settings: InterventionSettings,
    negotiator: Arc<dyn SessionNegotiator>,
    session: Mutex<Option<SessionHandle>>,
}

impl InterventionController {
    pub fn new(
        agent: Option<SharedAgent>,
        settings: InterventionSettings,
        negotiator: Arc<dyn SessionNegotiator>,
    ) -> Self {
        Self {
            agent,
            settings,
            negotiator,
            session: Mutex::new(None),
        }
    }

    /// Graceful teardown: stop a running session, then close the agent.
    ///
    /// The caller bounds this with the shutdown deadline.
    pub async fn shutdown(&self) {
        if self.is_active() {
            if let Err(e) = self.stop().await {
                warn!("Stop during shutdown failed: {}", e);
            }
        }

        if let Some(agent) = &self.agent {
            let mut agent = agent.lock().await;
            if let Err(e) = agent.close().await {
                warn!("Agent close failed: {}", e);
            } else {
                info!("Robot agent closed");
            }
        }
    }

    /// Best-effort torque restore when the worker could not be joined.
    ///
    /// The worker normally restores torque itself; this only covers the
    /// orphaned-worker and panicked-worker paths.
    async fn restore_torque_best_effort(&self) {
        let Some(agent) = &self.agent else {
            return;
        };
        match agent.try_lock() {
            Ok(mut agent) => {
                if let Err(e) = agent.set_torque_mode(true).await {
                    warn!("Failed to restore torque mode: {}", e);
                }
            }
            Err(_) => warn!("Agent handle busy; torque restore left to the worker"),
        }
    }
}

#[async_trait]
impl InterventionService for InterventionController {
    async fn start(&self, endpoint: TransportEndpoint) -> ServiceResult<StartOutcome> {
        let agent = self.agent.clone().ok_or(ServiceError::NotLaunched)?;

        // Check-and-set under the bookkeeping lock; no awaits in here
        let mut guard = self.session.lock();
        if let Some(session) = guard.as_ref() {
            if !session.worker.is_finished() {
                info!("Intervention already active; ignoring start request");
                return Ok(StartOutcome::AlreadyActive);
            }
        }

        let transport = Arc::new(TelemetryTransport::for_endpoint(
            &endpoint,
            self.settings.channel_send_timeout,
            self.settings.fallback_timeout,
        ));
        let cancel = CancellationToken::new();
        let state = Arc::new(Mutex::new(SessionState::Starting));

        // The handshake runs on its own task so a slow viewer never delays
        // arm motion; failure downgrades to the HTTP fallback.
        if let Some(channel_url) = endpoint.channel_url.clone() {
            let negotiator = self.negotiator.clone();
            let negotiation_transport = transport.clone();
            let negotiation_cancel = cancel.clone();
            tokio::spawn(async move {
                match negotiator.negotiate(&channel_url).await {
                    Ok(channel) => {
                        if negotiation_cancel.is_cancelled() {
                            channel.close().await;
                            return;
                        }
                        negotiation_transport.install_channel(channel);
                        if negotiation_cancel.is_cancelled() {
                            // Session ended while we were installing
                            negotiation_transport.close_channel().await;
                        }
                    }
                    Err(e) => {
                        warn!(
                            "Session channel negotiation failed ({}); continuing on HTTP fallback",
                            e
                        );
                    }
                }
            });
        }

        let worker = tokio::spawn(worker::run_worker(WorkerContext {
            agent,
            transport: transport.clone(),
            cancel: cancel.clone(),
            state: state.clone(),
            settings: self.settings.clone(),
        }));

        *guard = Some(SessionHandle {
            state,
            started_at: Utc::now(),
            cancel,
            transport,
            worker,
        });

        info!("Intervention worker started");
        Ok(StartOutcome::Started)
    }

    async fn stop(&self) -> ServiceResult<StopOutcome> {
        let session = {
            let mut guard = self.session.lock();
            match guard.take() {
                None => return Ok(StopOutcome::NotActive),
                Some(session) if session.worker.is_finished() => {
                    debug!("Reaping already-finished intervention session");
                    return Ok(StopOutcome::NotActive);
                }
                Some(session) => session,
            }
        };

        *session.state.lock() = SessionState::Stopping;
        info!("Stopping intervention worker");

        // Close the session channel before the worker is signalled
        session.transport.close_channel().await;
        session.cancel.cancel();

        match tokio::time::timeout(self.settings.worker_join_timeout, session.worker).await {
            Ok(Ok(())) => info!("Intervention worker stopped"),
            Ok(Err(e)) => {
                warn!("Intervention worker aborted: {}", e);
                self.restore_torque_best_effort().await;
            }
            Err(_) => {
                warn!(
                    "Intervention worker did not stop within {:?}; releasing session",
                    self.settings.worker_join_timeout
                );
                self.restore_torque_best_effort().await;
            }
        }

        Ok(StopOutcome::Stopped)
    }

    fn is_active(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .map_or(false, |session| !session.worker.is_finished())
    }

    fn status(&self) -> InterventionStatus {
        let guard = self.session.lock();
        match guard.as_ref() {
            Some(session) if !session.worker.is_finished() => InterventionStatus {
                active: true,
                state: *session.state.lock(),
                started_at: Some(session.started_at),
            },
            _ => InterventionStatus::idle(),
        }
    }

    fn is_launched(&self) -> bool {
        self.agent.is_some()
    }
}
