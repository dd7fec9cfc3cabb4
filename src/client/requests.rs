// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Direct HTTP transport.
//!
//! Calls go straight to the server: `GET /<method>?k=v` for reads,
//! `POST /<method>` with a JSON body for writes and a multipart form with a
//! `figure` file part for uploads. This needs the server to be reachable
//! from this machine (address, port and firewalls).

use super::{encoded_pairs, read_figure, Client, Params, Response};
use crate::error::{ClientError, Result};
use crate::models::config::{ClientConfig, TransportKind};
use reqwest::blocking::{multipart, Request};
use std::path::Path;
use std::time::Duration;

/// Multipart field carrying the uploaded figure.
pub const FIGURE_FIELD: &str = "figure";

/// Client calling the server over blocking HTTP.
pub struct RequestsClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl RequestsClient {
    /// Build the HTTP client, applying the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            config: config.clone(),
        })
    }

    /// `GET /<method>` with the params in the query string.
    pub fn build_get(&self, method: &str, params: &Params) -> Result<Request> {
        Ok(self
            .http
            .get(self.config.method_url(method))
            .query(&encoded_pairs(params))
            .build()?)
    }

    /// `POST /<method>` with the params as a JSON body.
    pub fn build_post(&self, method: &str, params: &Params) -> Result<Request> {
        Ok(self.http.post(self.config.method_url(method)).json(params).build()?)
    }

    /// `POST /<method>` as a multipart form carrying the figure file.
    pub fn build_upload(&self, method: &str, filename: &Path, params: &Params) -> Result<Request> {
        let bytes = read_figure(filename)?;
        let name = filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "figure.png".to_string());

        let part = multipart::Part::bytes(bytes).file_name(name).mime_str("image/png")?;
        let form = encoded_pairs(params)
            .into_iter()
            .fold(multipart::Form::new().part(FIGURE_FIELD, part), |form, (k, v)| form.text(k, v));

        Ok(self.http.post(self.config.method_url(method)).multipart(form).build()?)
    }

    fn execute(&self, method: &str, request: Request) -> Result<Response> {
        log::debug!("{} {}", request.method(), request.url());
        let response = self.http.execute(request)?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            log::error!("Remote call {} failed with {}", method, status);
            return Err(ClientError::Remote {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(Response::Body(body))
    }
}

impl Client for RequestsClient {
    fn get(&self, method: &str, params: &Params) -> Result<Response> {
        let request = self.build_get(method, params)?;
        self.execute(method, request)
    }

    fn post(&self, method: &str, params: &Params) -> Result<Response> {
        let request = self.build_post(method, params)?;
        self.execute(method, request)
    }

    fn post_and_figure(&self, method: &str, filename: &Path, params: &Params) -> Result<Response> {
        let request = self.build_upload(method, filename, params)?;
        log::info!("Uploading {} to {}", filename.display(), method);
        self.execute(method, request)
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn client(port: u16) -> RequestsClient {
        let mut config = ClientConfig::new("127.0.0.1", port, false);
        config.timeout_secs = Some(5);
        RequestsClient::new(&config).unwrap()
    }

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_get_encodes_query() {
        let request = client(5000)
            .build_get("set_title", &params(json!({ "title": "Q3 results", "slide_no": 2 })))
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/set_title");

        let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert!(query.contains(&("title".to_string(), "Q3 results".to_string())));
        assert!(query.contains(&("slide_no".to_string(), "2".to_string())));
    }

    #[test]
    fn test_post_sends_json_body() {
        let request = client(5000)
            .build_post("add_slide", &params(json!({ "layout_as": 1 })))
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(decoded, json!({ "layout_as": 1 }));
    }

    #[test]
    fn test_upload_is_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let request = client(5000)
            .build_upload("add_figure", &path, &params(json!({ "keep_aspect": true })))
            .unwrap();
        let content_type = request.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        assert_eq!(request.url().as_str(), "http://127.0.0.1:5000/add_figure");
    }

    #[test]
    fn test_upload_missing_file_fails_before_sending() {
        let err = client(5000)
            .post_and_figure("add_figure", Path::new("/nonexistent/figure.png"), &Params::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingFigure(_)));
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        // Port 1 is reserved and nothing listens on it
        let err = client(1).get("get_notes", &Params::new()).unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }

    #[test]
    fn test_error_status_is_remote_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).unwrap();
            stream
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      Content-Type: text/plain\r\n\
                      Content-Length: 4\r\n\
                      Connection: close\r\n\r\nboom",
                )
                .unwrap();
        });

        let err = client(port).get("get_notes", &Params::new()).unwrap_err();
        server.join().unwrap();
        match err {
            ClientError::Remote { method, status, body } => {
                assert_eq!(method, "get_notes");
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected a remote error, got {other:?}"),
        }
    }
}
