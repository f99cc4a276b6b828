// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Intervention lifecycle endpoints - `/intervene`

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use teleop_services::{ServiceError, StartOutcome, StopOutcome};
use teleop_transports::TransportEndpoint;

use crate::server::ApiState;

// ============================================================================
// REQUEST/RESPONSE MODELS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterveneRequest {
    /// Base URL of the remote viewer the telemetry should stream to
    pub stream_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InterveneStatusResponse {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct InterveneActionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InterveneActionResponse {
    fn status_only(status: &'static str) -> Self {
        Self {
            status,
            message: None,
        }
    }

    fn with_message(status: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// ENDPOINTS
// ============================================================================

/// `GET /intervene` - report whether a session is running
pub async fn get_intervene(State(state): State<ApiState>) -> Json<InterveneStatusResponse> {
    Json(InterveneStatusResponse {
        active: state.intervention.is_active(),
    })
}

/// `POST /intervene` - start a session, optionally streaming to the given
/// address
pub async fn post_intervene(
    State(state): State<ApiState>,
    body: Option<Json<InterveneRequest>>,
) -> (StatusCode, Json<InterveneActionResponse>) {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let endpoint = match request
        .stream_address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
    {
        Some(address) => match TransportEndpoint::derive(address, &state.negotiation_path) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                // An unusable stream address is not a reason to refuse the
                // operator; the session just runs without telemetry
                warn!("Ignoring invalid stream address: {}", e);
                TransportEndpoint::none()
            }
        },
        None => TransportEndpoint::none(),
    };

    match state.intervention.start(endpoint).await {
        Ok(StartOutcome::Started) => (
            StatusCode::OK,
            Json(InterveneActionResponse::with_message(
                "started",
                "Intervention mode active",
            )),
        ),
        Ok(StartOutcome::AlreadyActive) => (
            StatusCode::OK,
            Json(InterveneActionResponse::status_only("already_active")),
        ),
        Err(ServiceError::NotLaunched) => (
            StatusCode::BAD_REQUEST,
            Json(InterveneActionResponse::with_message(
                "not_launched",
                "Robots not launched",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(InterveneActionResponse::with_message("error", e.to_string())),
        ),
    }
}

/// `DELETE /intervene` - stop the running session
pub async fn delete_intervene(
    State(state): State<ApiState>,
) -> (StatusCode, Json<InterveneActionResponse>) {
    match state.intervention.stop().await {
        Ok(StopOutcome::Stopped) => (
            StatusCode::OK,
            Json(InterveneActionResponse::with_message(
                "stopped",
                "Intervention mode ended",
            )),
        ),
        Ok(StopOutcome::NotActive) => (
            StatusCode::BAD_REQUEST,
            Json(InterveneActionResponse::status_only("not_active")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(InterveneActionResponse::with_message("error", e.to_string())),
        ),
    }
}
