// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified observability for the teleop intervention service.
//!
//! One entry point, [`init_logging`], wires the `tracing` subscriber for the
//! whole process: console output always, JSON file output when the
//! `file-logging` feature is enabled.

pub mod config;
pub mod init;

pub use config::{LogFormat, ObservabilityConfig};
pub use init::{init_logging, LoggingGuard};
