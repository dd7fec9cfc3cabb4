// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Client configuration serialization and deserialization.
//!
//! This module handles reading and writing client configuration in YAML
//! and JSON formats, picking the format from the file extension.

use crate::error::{ClientError, Result};
use crate::models::config::ClientConfig;
use std::path::Path;

/// Config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(ClientError::UnsupportedFormat(extension.map(str::to_string))),
        }
    }
}

/// Export client configuration to YAML format.
pub fn export_yaml(config: &ClientConfig, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export client configuration to JSON format.
pub fn export_json(config: &ClientConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import client configuration from YAML format.
pub fn import_yaml(path: &Path) -> Result<ClientConfig> {
    let yaml = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&yaml)?;
    Ok(config)
}

/// Import client configuration from JSON format.
pub fn import_json(path: &Path) -> Result<ClientConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json)?;
    Ok(config)
}

/// Load a config file in the format given by its extension.
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let config = match Format::from_path(path)? {
        Format::Yaml => import_yaml(path)?,
        Format::Json => import_json(path)?,
    };
    log::info!("Loaded client config from {}", path.display());
    Ok(config)
}

/// Save a config file in the format given by its extension.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    match Format::from_path(path)? {
        Format::Yaml => export_yaml(config, path)?,
        Format::Json => export_json(config, path)?,
    }
    log::info!("Wrote client config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bbox::Preset;
    use crate::models::config::TransportKind;
    use crate::util::geometry::Rect;

    fn sample() -> ClientConfig {
        let mut config = ClientConfig::new("192.168.1.20", 5050, false);
        config.timeout_secs = Some(30);
        config.presets.set(Preset::Right, Rect::new(0.5, 0.2, 0.5, 0.8));
        config
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pptpush.yaml");
        save_config(&sample(), &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), sample());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pptpush.json");
        save_config(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"transport\": \"direct\""));
        assert!(text.contains("\"Right\""));
        assert_eq!(load_config(&path).unwrap(), sample());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Format::from_path(Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedFormat(Some(ext)) if ext == "toml"));
        assert!(Format::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yml");
        std::fs::write(&path, "host: ppt-box\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.host, "ppt-box");
        assert_eq!(config.port, 5000);
        assert_eq!(config.transport, TransportKind::Javascript);
    }
}
