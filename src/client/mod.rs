// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transports for remote calls to the presentation server.
//!
//! Every remote call is a method name plus keyword parameters. The
//! [`Client`] trait is implemented by two transports:
//!
//! - [`JavascriptClient`] renders each call as a script that the notebook
//!   front-end runs in the browser, next to the server.
//! - [`RequestsClient`] calls the server directly over HTTP.
//!
//! [`connect`] picks one from a [`ClientConfig`], failing fast when the
//! transport was compiled out.

#[cfg(feature = "javascript")]
pub mod javascript;
#[cfg(feature = "http")]
pub mod requests;

#[cfg(feature = "javascript")]
pub use javascript::{JavascriptClient, NotebookSink, ScriptSink};
#[cfg(feature = "http")]
pub use requests::RequestsClient;

use crate::error::{ClientError, Result};
use crate::models::config::{ClientConfig, TransportKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Keyword parameters of a remote call.
pub type Params = Map<String, Value>;

/// Build parameters from a serializable struct, dropping `null` values.
pub fn params_of<T: Serialize + ?Sized>(value: &T) -> Result<Params> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        Value::Null => Ok(Params::new()),
        other => Err(ClientError::Json(serde::ser::Error::custom(format!(
            "parameters must serialize to an object, got {other}"
        )))),
    }
}

/// Encode a parameter value for a query string or form field.
///
/// Strings are sent as-is; everything else as compact JSON.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parameters as `(name, encoded value)` pairs, skipping `null`.
pub fn encoded_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Outcome of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Response body of a call made directly
    Body(String),
    /// The call was handed to the notebook front-end and runs out of band
    Deferred,
}

impl Response {
    /// Whether the call runs out of band.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Response::Deferred)
    }

    /// Response text of a direct call.
    pub fn body(&self) -> Option<&str> {
        match self {
            Response::Body(body) => Some(body),
            Response::Deferred => None,
        }
    }

    /// Decode the body as JSON. `None` for a deferred response.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.body()
            .map(|body| serde_json::from_str(body).map_err(ClientError::from))
            .transpose()
    }
}

/// Request/response contract shared by all transports.
pub trait Client {
    /// Read-style remote call.
    fn get(&self, method: &str, params: &Params) -> Result<Response>;

    /// Mutating remote call.
    fn post(&self, method: &str, params: &Params) -> Result<Response>;

    /// Upload an image file along with the call.
    ///
    /// The file is read in full before anything is sent; the caller owns
    /// it and is responsible for removing it afterwards.
    fn post_and_figure(&self, method: &str, filename: &Path, params: &Params) -> Result<Response>;

    /// Which transport this is.
    fn kind(&self) -> TransportKind;
}

/// Read a figure file, distinguishing a missing file from other IO errors.
pub(crate) fn read_figure(filename: &Path) -> Result<Vec<u8>> {
    std::fs::read(filename).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ClientError::MissingFigure(filename.to_path_buf()),
        _ => ClientError::Io(e),
    })
}

/// Whether a transport was compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Missing { feature: &'static str },
}

impl Availability {
    /// Whether the transport was compiled in.
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl TransportKind {
    /// Cargo feature providing this transport.
    pub fn feature(&self) -> &'static str {
        match self {
            TransportKind::Javascript => "javascript",
            TransportKind::Direct => "http",
        }
    }

    /// Probe whether this transport can be constructed.
    pub fn availability(&self) -> Availability {
        let present = match self {
            TransportKind::Javascript => cfg!(feature = "javascript"),
            TransportKind::Direct => cfg!(feature = "http"),
        };
        if present {
            Availability::Available
        } else {
            Availability::Missing {
                feature: self.feature(),
            }
        }
    }
}

/// Construct the transport selected by `config`.
pub fn connect(config: &ClientConfig) -> Result<Box<dyn Client>> {
    if let Availability::Missing { feature } = config.transport.availability() {
        return Err(ClientError::TransportUnavailable {
            transport: match config.transport {
                TransportKind::Javascript => "javascript",
                TransportKind::Direct => "direct",
            },
            feature,
        });
    }

    log::info!("Connecting {} client to {}", config.transport, config.base_url());
    match config.transport {
        #[cfg(feature = "javascript")]
        TransportKind::Javascript => Ok(Box::new(JavascriptClient::new(config))),
        #[cfg(feature = "http")]
        TransportKind::Direct => Ok(Box::new(RequestsClient::new(config)?)),
        #[allow(unreachable_patterns)]
        kind => Err(ClientError::TransportUnavailable {
            transport: "unknown",
            feature: kind.feature(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Sample {
        title: &'static str,
        slide_no: Option<u32>,
        keep_aspect: bool,
    }

    #[test]
    fn test_params_drop_nulls() {
        let params = params_of(&Sample {
            title: "Results",
            slide_no: None,
            keep_aspect: true,
        })
        .unwrap();
        assert_eq!(params.len(), 2);
        assert!(!params.contains_key("slide_no"));
    }

    #[test]
    fn test_params_require_object() {
        assert!(params_of(&3).is_err());
        assert!(params_of(&()).unwrap().is_empty());
    }

    #[test]
    fn test_encode_values() {
        assert_eq!(encode_value(&json!("Center")), "Center");
        assert_eq!(encode_value(&json!(true)), "true");
        assert_eq!(encode_value(&json!(3)), "3");
        assert_eq!(encode_value(&json!([1.0, 2.5, 3.0, 4.0])), "[1.0,2.5,3.0,4.0]");
    }

    #[test]
    fn test_response_json() {
        let body = Response::Body("[960.0, 540.0]".into());
        let dims: Option<(f64, f64)> = body.json().unwrap();
        assert_eq!(dims, Some((960.0, 540.0)));

        let deferred: Option<(f64, f64)> = Response::Deferred.json().unwrap();
        assert_eq!(deferred, None);

        assert!(Response::Body("OK".into()).json::<u32>().is_err());
    }

    #[test]
    fn test_availability_follows_features() {
        assert_eq!(
            TransportKind::Javascript.availability().is_available(),
            cfg!(feature = "javascript")
        );
        assert_eq!(TransportKind::Direct.availability().is_available(), cfg!(feature = "http"));
    }

    #[cfg(feature = "javascript")]
    #[test]
    fn test_connect_selects_javascript() {
        let client = connect(&ClientConfig::new("127.0.0.1", 5000, true)).unwrap();
        assert_eq!(client.kind(), TransportKind::Javascript);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_connect_selects_direct() {
        let client = connect(&ClientConfig::new("127.0.0.1", 5000, false)).unwrap();
        assert_eq!(client.kind(), TransportKind::Direct);
    }

    #[test]
    fn test_read_missing_figure() {
        let err = read_figure(Path::new("/nonexistent/pptpush/figure.png")).unwrap_err();
        assert!(matches!(err, ClientError::MissingFigure(_)));
    }
}
