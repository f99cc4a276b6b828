// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; JSON file output with daily rotation when the
//! `file-logging` feature is enabled and a log directory is configured.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogFormat, ObservabilityConfig};

/// Holds the non-blocking writer guards for the lifetime of the process.
///
/// Dropping this guard flushes and closes the file appenders, so keep it
/// alive in `main` until shutdown.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Fails if the filter directive is invalid, the log directory cannot be
/// created, or a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log filter directive: {}", config.level))?;

    let mut layers = Vec::new();

    // Console layer (human-readable by default)
    match config.format {
        LogFormat::Text => {
            let console_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(env_filter)
                .boxed();
            layers.push(console_layer);
        }
        LogFormat::Json => {
            let console_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .with_filter(env_filter)
                .boxed();
            layers.push(console_layer);
        }
    }

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();

    #[cfg(feature = "file-logging")]
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "teleop.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let file_filter = EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log filter directive: {}", config.level))?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(file_filter)
            .boxed();
        layers.push(file_layer);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
    })
}
