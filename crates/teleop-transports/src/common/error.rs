// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common error types for all transports

use thiserror::Error;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-agnostic error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to connect client socket
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send message
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Timeout occurred
    #[error("Operation timed out")]
    Timeout,

    /// Connection closed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Session-channel handshake failed
    #[error("Negotiation failed: {0}")]
    NegotiationFailed(String),

    /// Stream address could not be turned into a transport endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
