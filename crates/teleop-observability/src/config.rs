// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Observability configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unified observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive string
    pub level: String,

    /// Console log format
    pub format: LogFormat,

    /// Directory for file logs (None disables file logging)
    pub log_dir: Option<PathBuf>,
}

/// Log format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
        }
    }
}

impl ObservabilityConfig {
    /// Build a config from the plain strings carried in the service config file
    pub fn from_level_and_format(level: &str, format: &str) -> Self {
        let format = match format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            level: level.to_string(),
            format,
            log_dir: None,
        }
    }

    /// Enable file logging into the given directory
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}
