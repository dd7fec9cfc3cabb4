// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script-injection transport.
//!
//! When the notebook kernel runs on a different machine than PowerPoint,
//! the browser showing the notebook is usually the one that can reach the
//! server. This transport renders each call as a self-contained script and
//! hands it to a [`ScriptSink`]; the notebook front-end runs it and the
//! result shows up in the browser console. Calls therefore complete out of
//! band and return [`Response::Deferred`].

use super::{encoded_pairs, read_figure, Client, Params, Response};
use crate::error::Result;
use crate::models::config::{ClientConfig, TransportKind};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// Destination for rendered scripts.
pub trait ScriptSink {
    fn inject(&self, script: &str) -> Result<()>;
}

/// Writes scripts to stdout as evcxr rich HTML output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotebookSink;

impl ScriptSink for NotebookSink {
    fn inject(&self, script: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "EVCXR_BEGIN_CONTENT text/html")?;
        writeln!(out, "<script type=\"text/javascript\">\n{script}\n</script>")?;
        writeln!(out, "EVCXR_END_CONTENT")?;
        out.flush()?;
        Ok(())
    }
}

/// Client that renders each call as a browser-side script.
pub struct JavascriptClient {
    config: ClientConfig,
    sink: Box<dyn ScriptSink>,
}

impl JavascriptClient {
    /// Emit scripts to the evcxr notebook front-end.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_sink(config, Box::new(NotebookSink))
    }

    /// Emit scripts to a custom sink.
    pub fn with_sink(config: &ClientConfig, sink: Box<dyn ScriptSink>) -> Self {
        Self {
            config: config.clone(),
            sink,
        }
    }

    fn emit(&self, method: &str, script: String) -> Result<Response> {
        log::debug!("Injecting script for {} ({} bytes)", method, script.len());
        self.sink.inject(&script)?;
        Ok(Response::Deferred)
    }

    /// Script performing `GET /<method>?k=v`.
    pub fn render_get(&self, method: &str, params: &Params) -> String {
        let pairs = string_object(params);
        wrap(
            method,
            &format!(
                "var url = new URL({url});\n\
                 var params = {pairs};\n\
                 Object.keys(params).forEach(function(k) {{ url.searchParams.append(k, params[k]); }});\n\
                 var request = fetch(url, {{ method: \"GET\" }});",
                url = js_string(&self.config.method_url(method)),
            ),
        )
    }

    /// Script performing `POST /<method>` with a JSON body.
    pub fn render_post(&self, method: &str, params: &Params) -> String {
        wrap(
            method,
            &format!(
                "var params = {params};\n\
                 var request = fetch({url}, {{\n\
                 \x20 method: \"POST\",\n\
                 \x20 headers: {{ \"Content-Type\": \"application/json\" }},\n\
                 \x20 body: JSON.stringify(params)\n\
                 }});",
                params = Value::Object(params.clone()),
                url = js_string(&self.config.method_url(method)),
            ),
        )
    }

    /// Script uploading the figure bytes as a multipart form.
    pub fn render_upload(&self, method: &str, file_name: &str, figure: &[u8], params: &Params) -> String {
        wrap(
            method,
            &format!(
                "var bytes = Uint8Array.from(atob({data}), function(c) {{ return c.charCodeAt(0); }});\n\
                 var form = new FormData();\n\
                 form.append(\"figure\", new Blob([bytes], {{ type: \"image/png\" }}), {name});\n\
                 var params = {pairs};\n\
                 Object.keys(params).forEach(function(k) {{ form.append(k, params[k]); }});\n\
                 var request = fetch({url}, {{ method: \"POST\", body: form }});",
                data = js_string(&STANDARD.encode(figure)),
                name = js_string(file_name),
                pairs = string_object(params),
                url = js_string(&self.config.method_url(method)),
            ),
        )
    }
}

impl Client for JavascriptClient {
    fn get(&self, method: &str, params: &Params) -> Result<Response> {
        self.emit(method, self.render_get(method, params))
    }

    fn post(&self, method: &str, params: &Params) -> Result<Response> {
        self.emit(method, self.render_post(method, params))
    }

    fn post_and_figure(&self, method: &str, filename: &Path, params: &Params) -> Result<Response> {
        let figure = read_figure(filename)?;
        let name = filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "figure.png".to_string());
        log::info!("Embedding {} ({} bytes) for {}", filename.display(), figure.len(), method);
        self.emit(method, self.render_upload(method, &name, &figure, params))
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Javascript
    }
}

/// JSON string literal, safe to embed in an HTML `<script>` block.
fn js_string(s: &str) -> String {
    Value::from(s).to_string().replace("</", "<\\/")
}

/// Parameters as a JS object of encoded strings.
fn string_object(params: &Params) -> String {
    let map: serde_json::Map<String, Value> = encoded_pairs(params)
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    Value::Object(map).to_string().replace("</", "<\\/")
}

/// Wrap a request body in an IIFE that reports the outcome.
fn wrap(method: &str, body: &str) -> String {
    let label = js_string(&format!("pptpush {method}"));
    format!(
        "(function() {{\n\
         {body}\n\
         request\n\
         \x20 .then(function(r) {{ return r.text().then(function(t) {{ console.log({label}, r.status, t); }}); }})\n\
         \x20 .catch(function(e) {{ console.error({label}, e); }});\n\
         }})();"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Recorded = Rc<RefCell<Vec<String>>>;

    impl ScriptSink for Recorded {
        fn inject(&self, script: &str) -> Result<()> {
            self.borrow_mut().push(script.to_string());
            Ok(())
        }
    }

    fn client() -> (JavascriptClient, Recorded) {
        let recorded = Recorded::default();
        let config = ClientConfig::new("10.0.0.5", 5000, true);
        (JavascriptClient::with_sink(&config, Box::new(recorded.clone())), recorded)
    }

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_get_is_deferred_and_injected() {
        let (client, recorded) = client();
        let response = client.get("set_title", &params(json!({ "title": "Intro", "slide_no": 1 }))).unwrap();
        assert!(response.is_deferred());

        let scripts = recorded.borrow();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("\"http://10.0.0.5:5000/set_title\""));
        assert!(scripts[0].contains("\"slide_no\":\"1\""));
        assert!(scripts[0].contains("method: \"GET\""));
    }

    #[test]
    fn test_post_embeds_json_params() {
        let (client, recorded) = client();
        client.post("add_slide", &params(json!({ "layout_as": 2 }))).unwrap();
        let scripts = recorded.borrow();
        assert!(scripts[0].contains("var params = {\"layout_as\":2};"));
        assert!(scripts[0].contains("JSON.stringify(params)"));
    }

    #[test]
    fn test_upload_embeds_base64_figure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let (client, recorded) = client();
        let response = client
            .post_and_figure("add_figure", &path, &params(json!({ "bbox": "Center" })))
            .unwrap();
        assert_eq!(response, Response::Deferred);

        let scripts = recorded.borrow();
        assert!(scripts[0].contains(&STANDARD.encode(b"png-bytes")));
        assert!(scripts[0].contains("\"plot.png\""));
        assert!(scripts[0].contains("\"bbox\":\"Center\""));
    }

    #[test]
    fn test_missing_figure_injects_nothing() {
        let (client, recorded) = client();
        let err = client
            .post_and_figure("add_figure", Path::new("/nonexistent/plot.png"), &Params::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingFigure(_)));
        assert!(recorded.borrow().is_empty());
    }

    #[test]
    fn test_script_cannot_close_tag() {
        let (client, _) = client();
        let script = client.render_get("set_title", &params(json!({ "title": "</script><b>" })));
        assert!(!script.contains("</script>"));
    }
}
