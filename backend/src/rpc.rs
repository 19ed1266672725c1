//! Remote procedures exposed by the backend.
//!
//! Each procedure is a serializable argument struct that names its function
//! and its decoded result. Business rules (credit spend, counters) live in
//! the database; the client only calls them.

#[cfg(test)]
#[path = "rpc_test.rs"]
mod rpc_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::transport::{HttpRequest, Method};

/// A callable database function.
pub trait Procedure: Serialize {
    /// Function name under `/rest/v1/rpc/`.
    const NAME: &'static str;
    type Output: DeserializeOwned;
}

/// Render the POST request for a procedure call.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the arguments cannot be serialized.
pub fn request<P: Procedure>(config: &BackendConfig, procedure: &P) -> Result<HttpRequest, BackendError> {
    HttpRequest::new(Method::Post, config.rest_url(&format!("rpc/{}", P::NAME))).json(procedure)
}

/// Decode a procedure result. Void functions answer with an empty body,
/// which is read as JSON `null`.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the body does not match `P::Output`.
pub fn decode<P: Procedure>(body: &str) -> Result<P::Output, BackendError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| BackendError::Decode(format!("{}: {e}", P::NAME)))
}

/// Atomically spend one daily credit to unlock a prompt.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SpendPromptCredit {
    pub in_prompt_id: Uuid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SpendResult {
    pub success: bool,
    #[serde(default)]
    pub credits_left: Option<i32>,
}

impl Procedure for SpendPromptCredit {
    const NAME: &'static str = "spend_prompt_credit";
    type Output = Vec<SpendResult>;
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct IncrementViewCount {
    pub prompt_id: Uuid,
}

impl Procedure for IncrementViewCount {
    const NAME: &'static str = "increment_view_count";
    type Output = ();
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct IncrementCopyCount {
    pub prompt_id: Uuid,
}

impl Procedure for IncrementCopyCount {
    const NAME: &'static str = "increment_copy_count";
    type Output = ();
}

/// Create today's credit row for a user.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct InitializeUserCredits {
    pub target_user_id: Uuid,
}

impl Procedure for InitializeUserCredits {
    const NAME: &'static str = "initialize_user_credits";
    type Output = ();
}
