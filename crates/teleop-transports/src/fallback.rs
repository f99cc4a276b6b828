// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! HTTP POST fallback
//!
//! Best-effort sample delivery when no session channel is open. One short
//! bounded POST per sample, response discarded, no retry.

use crate::common::{TelemetrySample, TransportError, TransportResult};
use std::time::Duration;

/// Fallback sender bound to a single target URL
pub struct HttpFallback {
    client: reqwest::Client,
    url: String,
}

impl HttpFallback {
    /// Build a fallback sender whose every request is bounded by `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one sample as a JSON body; the response is discarded.
    pub async fn post_sample(&self, sample: &TelemetrySample) -> TransportResult<()> {
        self.client
            .post(&self.url)
            .json(sample)
            .send()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
