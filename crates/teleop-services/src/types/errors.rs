// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Service layer error types.

Transport-agnostic errors that adapters map to user-visible status codes.
Idempotency signals (`already_active`, `not_active`) are outcomes, not
errors - see `types::status`.
*/

use thiserror::Error;

/// Service layer errors (transport-agnostic)
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// The robot agent was never constructed - fatal to the request, not
    /// to the process
    #[error("Robots not launched")]
    NotLaunched,

    /// Internal service error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
