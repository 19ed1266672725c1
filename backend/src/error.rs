//! Error taxonomy for calls into the managed backend.
//!
//! The UI only distinguishes "operation failed" from a handful of cases it
//! reacts to (no rows, not signed in), so the variants stay coarse and keep
//! the server's own message for display.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// PostgREST code for a single-row request that matched zero (or many) rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors produced by backend operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Required configuration is missing or malformed.
    #[error("config error: {0}")]
    Config(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The row/RPC API rejected the request.
    #[error("api error {status}: {message}")]
    Api { status: u16, code: Option<String>, message: String },

    /// The auth API rejected the request.
    #[error("auth error {status}: {message}")]
    Auth { status: u16, message: String },

    /// The object storage API rejected the request.
    #[error("storage error {status}: {message}")]
    Storage { status: u16, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The operation needs a signed-in user.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl BackendError {
    /// True when a single-row query matched no row.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::Api { code: Some(code), .. } if code == NO_ROWS_CODE)
    }

    /// Short message suitable for a user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Auth { message, .. } | Self::Storage { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::NotAuthenticated => "You need to sign in first.".to_owned(),
            Self::Transport(_) => "Network error. Please check your connection and try again.".to_owned(),
            _ => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Build an error from a non-2xx row/RPC API response.
#[must_use]
pub fn api_error(status: u16, body: &str) -> BackendError {
    let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.details)
        .unwrap_or_else(|| fallback_message(status, body));
    BackendError::Api { status, code: parsed.code, message }
}

#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Build an error from a non-2xx auth API response.
#[must_use]
pub fn auth_error(status: u16, body: &str) -> BackendError {
    let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| fallback_message(status, body));
    BackendError::Auth { status, message }
}

#[derive(Debug, Default, Deserialize)]
struct StorageErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Build an error from a non-2xx storage API response.
#[must_use]
pub fn storage_error(status: u16, body: &str) -> BackendError {
    let parsed: StorageErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| fallback_message(status, body));
    BackendError::Storage { status, message }
}

fn fallback_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {status}")
    } else {
        trimmed.to_owned()
    }
}
