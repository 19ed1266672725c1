//! `fetch`-backed [`Transport`] for the browser build.
//!
//! ERROR HANDLING
//! ==============
//! Only failures that produced no response (network, CORS, aborted fetch)
//! become [`BackendError::Transport`]. Non-2xx responses are returned as-is
//! so the backend crate can parse the service's error body.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

#[cfg(feature = "csr")]
use backend::Method;
use backend::{BackendError, Body, HttpRequest, HttpResponse, Transport};

/// Content type sent with JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers to set for `request`, including the body content type.
pub fn outgoing_headers(request: &HttpRequest) -> Vec<(String, String)> {
    let mut headers = request.headers.clone();
    let content_type = match &request.body {
        Some(Body::Json(_)) => Some(JSON_CONTENT_TYPE.to_owned()),
        Some(Body::Bytes { content_type, .. }) => Some(content_type.clone()),
        None => None,
    };
    if let Some(content_type) = content_type {
        if request.header_value("Content-Type").is_none() {
            headers.push(("Content-Type".to_owned(), content_type));
        }
    }
    headers
}

/// Transport over the browser `fetch` API.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;

            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Patch => Request::patch(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            for (name, value) in outgoing_headers(&request) {
                builder = builder.header(&name, &value);
            }
            let outgoing = match request.body {
                Some(Body::Json(text)) => builder.body(text),
                Some(Body::Bytes { data, .. }) => builder.body(js_sys::Uint8Array::from(data.as_slice())),
                None => builder.build(),
            }
            .map_err(|e| BackendError::Transport(e.to_string()))?;

            let response = outgoing.send().await.map_err(|e| {
                log::warn!("net: {} {} failed: {e}", request.method.as_str(), request.url);
                BackendError::Transport(e.to_string())
            })?;
            let headers = response.headers().entries().collect();
            let status = response.status();
            let body = response.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;
            Ok(HttpResponse { status, headers, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(BackendError::Transport(format!("no network outside the browser: {}", request.url)))
        }
    }
}
