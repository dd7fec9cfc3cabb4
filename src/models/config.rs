// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Client configuration.
//!
//! This module holds the settings needed to reach the presentation server:
//! address, transport selection and optional preset overrides. A config is
//! passed explicitly to [`crate::init_client`]; there is no global client.

use super::bbox::PresetTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How remote calls reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Emit scripts that the notebook front-end runs in the browser.
    #[default]
    Javascript,
    /// Call the server directly over HTTP.
    Direct,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Javascript => f.write_str("javascript"),
            TransportKind::Direct => f.write_str("direct"),
        }
    }
}

/// Complete client configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub transport: TransportKind,
    /// Request timeout for the direct transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "PresetTable::is_empty")]
    pub presets: PresetTable,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            transport: TransportKind::default(),
            timeout_secs: None,
            presets: PresetTable::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given server and transport.
    pub fn new(host: impl Into<String>, port: u16, javascript: bool) -> Self {
        Self {
            host: host.into(),
            port,
            transport: if javascript {
                TransportKind::Javascript
            } else {
                TransportKind::Direct
            },
            ..Self::default()
        }
    }

    /// Base URL of the server, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// URL of a remote method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url(), method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.transport, TransportKind::Javascript);
    }

    #[test]
    fn test_new_selects_transport() {
        assert_eq!(ClientConfig::new("h", 1, true).transport, TransportKind::Javascript);
        assert_eq!(ClientConfig::new("h", 1, false).transport, TransportKind::Direct);
    }

    #[test]
    fn test_method_url() {
        let config = ClientConfig::new("ppt-host", 8080, false);
        assert_eq!(config.method_url("add_figure"), "http://ppt-host:8080/add_figure");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ClientConfig = serde_yaml::from_str("port: 6000\ntransport: direct\n").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6000);
        assert_eq!(config.transport, TransportKind::Direct);
        assert!(config.presets.is_empty());
    }
}
