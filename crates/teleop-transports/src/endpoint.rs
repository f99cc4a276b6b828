// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport endpoint derivation
//!
//! The operator supplies a single "stream address" (the viewer's base URL).
//! Both transport targets are derived from it once per session by rewriting
//! the path to the well-known negotiation path: a `ws(s)://` URL for the
//! session channel and an `http(s)://` URL for the fallback POST.

use crate::common::{TransportError, TransportResult};
use url::Url;

/// Telemetry targets for one intervention session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportEndpoint {
    /// WebSocket URL the session channel is negotiated against
    pub channel_url: Option<String>,
    /// HTTP URL samples fall back to when no channel is open
    pub fallback_url: Option<String>,
}

impl TransportEndpoint {
    /// Endpoint with no telemetry targets (the loop still runs)
    pub fn none() -> Self {
        Self::default()
    }

    /// True when neither transport target is configured
    pub fn is_empty(&self) -> bool {
        self.channel_url.is_none() && self.fallback_url.is_none()
    }

    /// Derive both targets from an operator-supplied stream address.
    ///
    /// A bare `host:port` is treated as `http://host:port`. Query and
    /// fragment are dropped; the path is replaced by `negotiation_path`.
    pub fn derive(stream_address: &str, negotiation_path: &str) -> TransportResult<Self> {
        let trimmed = stream_address.trim();
        if trimmed.is_empty() {
            return Err(TransportError::InvalidEndpoint(
                "empty stream address".to_string(),
            ));
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let mut url = Url::parse(&with_scheme)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {}", trimmed, e)))?;

        if url.host_str().is_none() {
            return Err(TransportError::InvalidEndpoint(format!(
                "no host in stream address: {}",
                trimmed
            )));
        }

        let (http_scheme, ws_scheme) = match url.scheme() {
            "http" | "ws" => ("http", "ws"),
            "https" | "wss" => ("https", "wss"),
            other => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "unsupported scheme '{}' in stream address: {}",
                    other, trimmed
                )));
            }
        };

        url.set_path(negotiation_path);
        url.set_query(None);
        url.set_fragment(None);

        // Rebuild with each scheme; Url::set_scheme refuses some special-scheme
        // swaps, so splice the scheme textually instead.
        let rendered = url.to_string();
        let rest = rendered
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&rendered);

        Ok(Self {
            channel_url: Some(format!("{}://{}", ws_scheme, rest)),
            fallback_url: Some(format!("{}://{}", http_scheme, rest)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/client/intervene";

    #[test]
    fn test_derive_from_bare_host_port() {
        let ep = TransportEndpoint::derive("192.168.1.20:8080", PATH).unwrap();
        assert_eq!(
            ep.channel_url.as_deref(),
            Some("ws://192.168.1.20:8080/client/intervene")
        );
        assert_eq!(
            ep.fallback_url.as_deref(),
            Some("http://192.168.1.20:8080/client/intervene")
        );
    }

    #[test]
    fn test_derive_rewrites_path_and_drops_query() {
        let ep = TransportEndpoint::derive("http://viewer.local:8080/app?x=1#top", PATH).unwrap();
        assert_eq!(
            ep.fallback_url.as_deref(),
            Some("http://viewer.local:8080/client/intervene")
        );
    }

    #[test]
    fn test_derive_https_maps_to_wss() {
        let ep = TransportEndpoint::derive("https://viewer.example.com", PATH).unwrap();
        assert_eq!(
            ep.channel_url.as_deref(),
            Some("wss://viewer.example.com/client/intervene")
        );
        assert_eq!(
            ep.fallback_url.as_deref(),
            Some("https://viewer.example.com/client/intervene")
        );
    }

    #[test]
    fn test_derive_rejects_empty_address() {
        assert!(matches!(
            TransportEndpoint::derive("   ", PATH),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_derive_rejects_unsupported_scheme() {
        assert!(matches!(
            TransportEndpoint::derive("ftp://viewer.local", PATH),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }
}
