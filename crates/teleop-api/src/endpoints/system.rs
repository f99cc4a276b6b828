// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! System endpoints - `/health`, `/launch`

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::server::ApiState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health` - liveness probe
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /launch` - confirm robot launch state.
///
/// Robot agents are constructed at process launch; this endpoint reports
/// that state to the UI rather than constructing drivers on demand.
pub async fn post_launch(State(state): State<ApiState>) -> (StatusCode, Json<LaunchResponse>) {
    if state.intervention.is_launched() {
        (
            StatusCode::OK,
            Json(LaunchResponse {
                status: "already_launched",
                message: None,
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(LaunchResponse {
                status: "error",
                message: Some("Robot agents are constructed at process launch".to_string()),
            }),
        )
    }
}
