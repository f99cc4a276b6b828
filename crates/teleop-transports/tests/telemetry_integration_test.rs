//! Telemetry transport integration tests
//!
//! Exercise the session channel and HTTP fallback end-to-end over loopback
//! sockets.

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use teleop_transports::prelude::*;
use teleop_transports::HttpFallback;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

/// Spawn a one-shot WebSocket server; forwards the first text frame it reads.
async fn spawn_ws_server() -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if message.is_text() {
                let _ = tx.send(message.into_text().unwrap());
                break;
            }
        }
    });

    (format!("ws://{}", addr), rx)
}

/// Spawn a one-shot HTTP server; forwards every POST body it receives.
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

#[tokio::test]
async fn test_session_channel_carries_wire_shape() {
    let (url, received) = spawn_ws_server().await;

    let negotiator = WsNegotiator::new(Duration::from_secs(2));
    let channel = negotiator.negotiate(&url).await.unwrap();
    assert!(channel.is_open());

    let transport = TelemetryTransport::new(None, Duration::from_millis(500));
    transport.install_channel(channel);
    assert!(transport.channel_is_open());

    transport
        .send(&TelemetrySample {
            joint_states: vec![1.5, -0.5],
            timestamp: 1700000000.0,
        })
        .await;

    let frame = received.await.unwrap();
    let decoded: TelemetrySample = serde_json::from_str(&frame).unwrap();
    assert_eq!(decoded.joint_states, vec![1.5, -0.5]);
    assert_eq!(decoded.timestamp, 1700000000.0);
}

#[tokio::test]
async fn test_negotiation_failure_is_reported() {
    // Nothing listens here; the connect fails fast
    let negotiator = WsNegotiator::new(Duration::from_secs(2));
    let result = negotiator.negotiate("ws://127.0.0.1:1/client/intervene").await;
    assert!(matches!(result, Err(TransportError::NegotiationFailed(_))));
}

#[tokio::test]
async fn test_fallback_receives_samples_when_no_channel() {
    let (url, mut received) = spawn_fallback_server().await;

    let fallback = HttpFallback::new(url, Duration::from_millis(500)).unwrap();
    let transport = TelemetryTransport::new(Some(fallback), Duration::from_millis(50));

    transport
        .send(&TelemetrySample {
            joint_states: vec![0.25],
            timestamp: 1700000001.0,
        })
        .await;

    let body = received.recv().await.unwrap();
    let decoded: TelemetrySample = serde_json::from_str(&body).unwrap();
    assert_eq!(decoded.joint_states, vec![0.25]);
}

#[tokio::test]
async fn test_send_is_bounded_when_fallback_unreachable() {
    // Connection refused on loopback resolves quickly; the client timeout
    // bounds the slow-network case either way.
    let fallback = HttpFallback::new(
        "http://127.0.0.1:1/client/intervene",
        Duration::from_millis(50),
    )
    .unwrap();
    let transport = TelemetryTransport::new(Some(fallback), Duration::from_millis(50));

    let started = Instant::now();
    transport.send(&TelemetrySample::new(vec![0.0])).await;
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_channel_close_downgrades_to_fallback() {
    let (ws_url, _received) = spawn_ws_server().await;
    let (http_url, mut fallback_received) = spawn_fallback_server().await;

    let negotiator = WsNegotiator::new(Duration::from_secs(2));
    let channel = negotiator.negotiate(&ws_url).await.unwrap();

    let fallback = HttpFallback::new(http_url, Duration::from_millis(500)).unwrap();
    let transport = TelemetryTransport::new(Some(fallback), Duration::from_millis(500));
    transport.install_channel(channel);

    transport.close_channel().await;
    assert!(!transport.channel_is_open());

    transport.send(&TelemetrySample::new(vec![2.0])).await;
    let body = fallback_received.recv().await.unwrap();
    assert!(body.contains("joint_states"));
}
