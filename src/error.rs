// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the client library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main library error type.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{transport} transport is not available: cargo feature `{feature}` is not enabled")]
    TransportUnavailable {
        transport: &'static str,
        feature: &'static str,
    },

    #[error("remote call `{method}` failed with status {status}: {body}")]
    Remote {
        method: String,
        status: u16,
        body: String,
    },

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid bounding box `{0}`")]
    InvalidBbox(String),

    #[error("only one of pic_no, left_no, top_no, zorder_no may be set")]
    ConflictingSelector,

    #[error("{name} must be a 1-based index, got 0")]
    InvalidIndex { name: &'static str },

    #[error("unsupported config file extension: {0:?}")]
    UnsupportedFormat(Option<String>),

    #[error("figure file not found: {}", .0.display())]
    MissingFigure(PathBuf),
}

pub type Result<T> = std::result::Result<T, ClientError>;
