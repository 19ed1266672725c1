//! HTTP request/response model and the transport seam.
//!
//! DESIGN
//! ======
//! Statements and auth/storage calls render plain [`HttpRequest`] values.
//! Executing them is the job of a [`Transport`], which keeps this crate free
//! of browser bindings and lets tests script responses.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use crate::error::BackendError;

/// HTTP verbs used by the managed backend APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Request payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// Serialized JSON text, sent with `Content-Type: application/json`.
    Json(String),
    /// Raw bytes (object uploads) with an explicit content type.
    Bytes { content_type: String, data: Vec<u8> },
}

/// A fully rendered HTTP request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Decode`] if `value` cannot be serialized.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, BackendError> {
        let text = serde_json::to_string(value).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.body = Some(Body::Json(text));
        Ok(self)
    }

    #[must_use]
    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = Some(Body::Bytes { content_type: content_type.into(), data });
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Replace any existing header with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }
}

/// A received HTTP response with its body read as text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes rendered requests against the network.
///
/// Futures are not required to be `Send`: the browser event loop is single
/// threaded and `fetch` futures hold JS values.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// Send one request and read the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] when the request never produced a
    /// response (network failure, CORS rejection, aborted fetch).
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BackendError>;
}
