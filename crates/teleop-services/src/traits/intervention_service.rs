// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Intervention lifecycle service trait.

Defines the stable interface the control plane drives. Adapters depend on
this trait, never on the controller type directly.
*/

use crate::types::{InterventionStatus, ServiceResult, StartOutcome, StopOutcome};
use async_trait::async_trait;
use teleop_transports::TransportEndpoint;

/// Intervention lifecycle control (transport-agnostic)
#[async_trait]
pub trait InterventionService: Send + Sync {
    /// Start an intervention session.
    ///
    /// Spawns at most one worker; a concurrent or repeated start while a
    /// worker is alive returns `StartOutcome::AlreadyActive` without
    /// side effects.
    ///
    /// # Errors
    /// * `ServiceError::NotLaunched` - no robot agent was constructed
    ///
    async fn start(&self, endpoint: TransportEndpoint) -> ServiceResult<StartOutcome>;

    /// Stop the running intervention session.
    ///
    /// Closes any open session channel, signals the worker, and waits a
    /// bounded time for it to terminate. Never blocks the caller past the
    /// configured join timeout; the session is released from bookkeeping
    /// even when the worker overruns it.
    ///
    async fn stop(&self) -> ServiceResult<StopOutcome>;

    /// Whether a worker is currently running.
    ///
    /// Pure bookkeeping query; safe to call concurrently with
    /// `start`/`stop` and never touches robot I/O.
    fn is_active(&self) -> bool;

    /// Snapshot of the lifecycle state
    fn status(&self) -> InterventionStatus;

    /// Whether a robot agent is wired into the coordinator
    fn is_launched(&self) -> bool;
}
