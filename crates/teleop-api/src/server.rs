// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

// HTTP server implementation (Axum)
//
// This module sets up the HTTP control plane with Axum, including routing,
// middleware, and state management.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use teleop_services::InterventionService;

use crate::endpoints::{intervene, system};

/// Application state shared across all HTTP handlers
#[derive(Clone)]
pub struct ApiState {
    pub intervention: Arc<dyn InterventionService>,
    /// Well-known path stream addresses are rewritten to
    pub negotiation_path: Arc<str>,
}

impl ApiState {
    pub fn new(intervention: Arc<dyn InterventionService>, negotiation_path: &str) -> Self {
        Self {
            intervention,
            negotiation_path: Arc::from(negotiation_path),
        }
    }
}

/// Create the main HTTP server application
pub fn create_http_server(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(system::get_health))
        .route("/launch", post(system::post_launch))
        .route(
            "/intervene",
            get(intervene::get_intervene)
                .post(intervene::post_intervene)
                .delete(intervene::delete_intervene),
        )
        // Catch-all route for debugging unmatched requests
        .fallback(|| async {
            tracing::warn!(target: "teleop-api", "⚠️ Unmatched request - 404 Not Found");
            (StatusCode::NOT_FOUND, "404 Not Found")
        })
        .with_state(state)
        .layer(create_cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::span!(
                        target: "teleop-api",
                        tracing::Level::DEBUG,
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    tracing::debug!(target: "teleop-api", "📥 Incoming request: {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::debug!(
                            target: "teleop-api",
                            "📤 Response: status={}, latency={:?}",
                            response.status(),
                            latency
                        );
                    },
                ),
        )
}

/// Create CORS layer for the API
///
/// The control plane is reached from the operator UI on another origin.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
