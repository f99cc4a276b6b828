// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! REST control plane for the intervention service.
//!
//! Thin request handlers over the [`InterventionService`] boundary; no
//! robot I/O ever happens on a request path. Service errors and
//! idempotency outcomes are translated to user-visible status fields,
//! never surfaced as raw errors.
//!
//! [`InterventionService`]: teleop_services::InterventionService

pub mod endpoints;
pub mod server;

pub use server::{create_http_server, ApiState};
