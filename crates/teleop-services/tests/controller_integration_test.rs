//! Intervention controller integration tests
//!
//! Drive the full lifecycle against an instrumented agent: start/stop
//! idempotency, the single-worker guarantee, and the safe-state finalizer
//! on every exit path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use teleop_agent::{AgentError, AgentResult, Observation, RobotAgent, SharedAgent};
use teleop_services::{
    InterventionController, InterventionService, InterventionSettings, SessionState, StartOutcome,
    StopOutcome,
};
use teleop_transports::{TransportEndpoint, WsNegotiator};

// ────────────────────────────────────────────────────────────────────────
// Instrumented agent
// ────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ProbeState {
    torque_enabled: bool,
    calls: Vec<String>,
    act_count: u64,
    fail_act_after: Option<u64>,
    fail_move: bool,
    act_delay: Option<Duration>,
}

struct ProbeArm {
    num_dofs: usize,
    state: Arc<Mutex<ProbeState>>,
}

impl ProbeArm {
    fn new(num_dofs: usize) -> (Self, Arc<Mutex<ProbeState>>) {
        let state = Arc::new(Mutex::new(ProbeState {
            torque_enabled: true,
            ..Default::default()
        }));
        (
            Self {
                num_dofs,
                state: state.clone(),
            },
            state,
        )
    }
}

#[async_trait]
impl RobotAgent for ProbeArm {
    async fn act(&mut self, _obs: &Observation) -> AgentResult<Vec<f64>> {
        let delay = {
            let mut state = self.state.lock();
            state.act_count += 1;
            state.calls.push("act".to_string());
            if let Some(after) = state.fail_act_after {
                if state.act_count > after {
                    return Err(AgentError::CommandFailed("joint bus dropped".to_string()));
                }
            }
            state.act_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(vec![0.5; self.num_dofs])
    }

    async fn move_to_position(&mut self, target: &[f64]) -> AgentResult<()> {
        let mut state = self.state.lock();
        state.calls.push("move".to_string());
        if state.fail_move {
            return Err(AgentError::CommandFailed("move rejected".to_string()));
        }
        if target.len() != self.num_dofs {
            return Err(AgentError::DimensionMismatch {
                expected: self.num_dofs,
                actual: target.len(),
            });
        }
        Ok(())
    }

    async fn set_torque_mode(&mut self, enabled: bool) -> AgentResult<()> {
        let mut state = self.state.lock();
        state.torque_enabled = enabled;
        state
            .calls
            .push(if enabled { "torque_on" } else { "torque_off" }.to_string());
        Ok(())
    }

    fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    async fn close(&mut self) -> AgentResult<()> {
        self.state.lock().calls.push("close".to_string());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────

fn test_settings() -> InterventionSettings {
    InterventionSettings {
        loop_interval: Duration::from_millis(5),
        torque_settle: Duration::from_millis(2),
        move_settle: Duration::from_millis(2),
        worker_join_timeout: Duration::from_millis(500),
        negotiation_timeout: Duration::from_millis(500),
        channel_send_timeout: Duration::from_millis(50),
        fallback_timeout: Duration::from_millis(200),
        start_pose: vec![0.0; 4],
        heartbeat_every: 1000,
    }
}

fn controller_with_probe(
    settings: InterventionSettings,
) -> (Arc<InterventionController>, Arc<Mutex<ProbeState>>) {
    let (arm, state) = ProbeArm::new(4);
    let agent: SharedAgent = Arc::new(tokio::sync::Mutex::new(arm));
    let controller = Arc::new(InterventionController::new(
        Some(agent),
        settings,
        Arc::new(WsNegotiator::new(Duration::from_millis(500))),
    ));
    (controller, state)
}

async fn wait_until<F: Fn() -> bool>(deadline: Duration, predicate: F) -> bool {
    let started = Instant::now();
    while started.elapsed() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}

async fn spawn_fallback_server() -> (String, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = axum::Router::new().route(
        "/client/intervene",
        axum::routing::post(move |body: String| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                axum::http::StatusCode::OK
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/client/intervene", addr), rx)
}

// ────────────────────────────────────────────────────────────────────────
// Lifecycle properties
// ────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_starts_spawn_exactly_one_worker() {
    let (controller, _state) = controller_with_probe(test_settings());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let controller = controller.clone();
        handles.push(tokio::spawn(async move {
            controller.start(TransportEndpoint::none()).await.unwrap()
        }));
    }

    let mut started = 0;
    let mut already_active = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StartOutcome::Started => started += 1,
            StartOutcome::AlreadyActive => already_active += 1,
        }
    }

    assert_eq!(started, 1);
    assert_eq!(already_active, 7);
    assert!(controller.is_active());

    assert_eq!(controller.stop().await.unwrap(), StopOutcome::Stopped);
}

#[tokio::test]
async fn test_stop_without_session_is_not_active() {
    let (controller, state) = controller_with_probe(test_settings());

    let started = Instant::now();
    assert_eq!(controller.stop().await.unwrap(), StopOutcome::NotActive);
    assert!(started.elapsed() < Duration::from_millis(100));
    assert!(state.lock().calls.is_empty());
}

#[tokio::test]
async fn test_start_without_agent_is_not_launched() {
    let controller = InterventionController::new(
        None,
        test_settings(),
        Arc::new(WsNegotiator::new(Duration::from_millis(500))),
    );
    assert!(!controller.is_launched());
    assert!(controller.start(TransportEndpoint::none()).await.is_err());
}

#[tokio::test]
async fn test_round_trip_restores_torque_and_releases_worker() {
    let (controller, state) = controller_with_probe(test_settings());

    assert_eq!(
        controller.start(TransportEndpoint::none()).await.unwrap(),
        StartOutcome::Started
    );

    // Becomes active within the startup bound, with gravity compensation on
    assert!(
        wait_until(Duration::from_secs(2), || {
            controller.status().state == SessionState::Active
        })
        .await
    );
    assert!(!state.lock().torque_enabled);
    assert!(controller.status().started_at.is_some());

    assert_eq!(controller.stop().await.unwrap(), StopOutcome::Stopped);
    assert!(!controller.is_active());
    assert!(state.lock().torque_enabled);

    // No leaked bookkeeping: a fresh start spawns again
    assert_eq!(
        controller.start(TransportEndpoint::none()).await.unwrap(),
        StartOutcome::Started
    );
    assert_eq!(controller.stop().await.unwrap(), StopOutcome::Stopped);
}

#[tokio::test]
async fn test_preamble_order_enables_torque_before_move() {
    let (controller, state) = controller_with_probe(test_settings());

    controller.start(TransportEndpoint::none()).await.unwrap();
    assert!(
        wait_until(Duration::from_secs(2), || {
            controller.status().state == SessionState::Active
        })
        .await
    );
    controller.stop().await.unwrap();

    let calls = state.lock().calls.clone();
    let torque_on = calls.iter().position(|c| c == "torque_on").unwrap();
    let moved = calls.iter().position(|c| c == "move").unwrap();
    let torque_off = calls.iter().position(|c| c == "torque_off").unwrap();
    assert!(torque_on < moved);
    assert!(moved < torque_off);
}

#[tokio::test]
async fn test_torque_restored_when_loop_fails_mid_iteration() {
    let (controller, state) = controller_with_probe(test_settings());
    state.lock().fail_act_after = Some(3);

    controller.start(TransportEndpoint::none()).await.unwrap();

    // The worker dies on its own after the third sample
    assert!(wait_until(Duration::from_secs(2), || !controller.is_active()).await);
    assert!(state.lock().torque_enabled);

    // The dead session is reaped, not stopped
    assert_eq!(controller.stop().await.unwrap(), StopOutcome::NotActive);
}

#[tokio::test]
async fn test_torque_restored_when_preamble_fails() {
    let (controller, state) = controller_with_probe(test_settings());
    state.lock().fail_move = true;

    controller.start(TransportEndpoint::none()).await.unwrap();

    assert!(wait_until(Duration::from_secs(2), || !controller.is_active()).await);
    assert!(state.lock().torque_enabled);
    assert_eq!(controller.status().state, SessionState::Idle);
}

#[tokio::test]
async fn test_stop_is_bounded_when_worker_ignores_cancellation() {
    let mut settings = test_settings();
    settings.worker_join_timeout = Duration::from_millis(200);
    let (controller, state) = controller_with_probe(settings);
    state.lock().act_delay = Some(Duration::from_secs(10));

    controller.start(TransportEndpoint::none()).await.unwrap();
    assert!(
        wait_until(Duration::from_secs(2), || {
            controller.status().state == SessionState::Active
        })
        .await
    );

    let started = Instant::now();
    assert_eq!(controller.stop().await.unwrap(), StopOutcome::Stopped);
    // Bounded join: the orphaned worker is released, not awaited to the end
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!controller.is_active());
}

#[tokio::test]
async fn test_failed_negotiation_falls_back_to_http() {
    let (fallback_url, mut received) = spawn_fallback_server().await;
    let (controller, _state) = controller_with_probe(test_settings());

    // Nothing listens on the channel URL; negotiation fails after connect
    let endpoint = TransportEndpoint {
        channel_url: Some("ws://127.0.0.1:1/client/intervene".to_string()),
        fallback_url: Some(fallback_url),
    };

    assert_eq!(
        controller.start(endpoint).await.unwrap(),
        StartOutcome::Started
    );
    assert!(
        wait_until(Duration::from_secs(2), || {
            controller.status().state == SessionState::Active
        })
        .await
    );

    // The loop keeps streaming over the fallback, uninterrupted
    let body = tokio::time::timeout(Duration::from_secs(2), received.recv())
        .await
        .expect("no fallback sample arrived")
        .unwrap();
    assert!(body.contains("joint_states"));
    assert!(controller.is_active());

    controller.stop().await.unwrap();
}

#[tokio::test]
async fn test_status_reports_idle_after_stop() {
    let (controller, _state) = controller_with_probe(test_settings());

    controller.start(TransportEndpoint::none()).await.unwrap();
    controller.stop().await.unwrap();

    let status = controller.status();
    assert!(!status.active);
    assert_eq!(status.state, SessionState::Idle);
    assert!(status.started_at.is_none());
}
