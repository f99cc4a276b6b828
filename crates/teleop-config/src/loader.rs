// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 2-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)

use crate::{validate_config, ConfigError, ConfigResult, TeleopConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "teleop_configuration.toml";

/// Find the teleop configuration file
///
/// Search order:
/// 1. `TELEOP_CONFIG_PATH` environment variable
/// 2. Current working directory: `./teleop_configuration.toml`
/// 3. Parent directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("TELEOP_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by TELEOP_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search in common locations
    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        // Search up to 5 levels for workspace root
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Teleop configuration file '{}' not found in any of these locations:\n{}\n\nSet TELEOP_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
///
/// # Returns
///
/// Complete `TeleopConfig` with all overrides applied
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<TeleopConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: TeleopConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Apply `TELEOP_*` environment variable overrides to a loaded config
///
/// Supported overrides:
/// - `TELEOP_API_HOST`
/// - `TELEOP_API_PORT`
/// - `TELEOP_LOG_LEVEL`
/// - `TELEOP_LOG_FORMAT`
/// - `TELEOP_LOOP_INTERVAL_MS`
pub fn apply_environment_overrides(config: &mut TeleopConfig) {
    if let Ok(host) = env::var("TELEOP_API_HOST") {
        config.api.host = host;
    }
    if let Ok(port) = env::var("TELEOP_API_PORT") {
        if let Ok(port) = port.parse::<u16>() {
            config.api.port = port;
        }
    }
    if let Ok(level) = env::var("TELEOP_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(format) = env::var("TELEOP_LOG_FORMAT") {
        config.logging.format = format;
    }
    if let Ok(interval) = env::var("TELEOP_LOOP_INTERVAL_MS") {
        if let Ok(interval) = interval.parse::<u64>() {
            config.intervention.loop_interval_ms = interval;
        }
    }
}
