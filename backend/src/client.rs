//! The backend handle shared across the app.
//!
//! DESIGN
//! ======
//! [`Backend`] bundles configuration, the transport, the auth client and the
//! clock behind one `Arc`, so cloning it into UI contexts is cheap. It adds
//! credentials to every request: the `apikey` header always, and a bearer
//! token that is the signed-in user's access token or the anonymous key.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{AuthClient, SessionStore};
use crate::clock::{self, Clock};
use crate::config::BackendConfig;
use crate::error::{BackendError, api_error};
use crate::query::{Cardinality, Select, Statement, content_range_total};
use crate::rpc::{self, Procedure};
use crate::storage::Storage;
use crate::transport::{HttpRequest, HttpResponse, Transport};

struct Inner {
    config: BackendConfig,
    transport: Arc<dyn Transport>,
    auth: AuthClient,
    clock: Clock,
}

#[derive(Clone)]
pub struct Backend {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("url", &self.inner.config.url).finish_non_exhaustive()
    }
}

impl Backend {
    #[must_use]
    pub fn new(config: BackendConfig, transport: Arc<dyn Transport>, store: Box<dyn SessionStore>) -> Self {
        Self::with_clock(config, transport, store, clock::now_ms)
    }

    /// Like [`Backend::new`] with an explicit clock.
    #[must_use]
    pub fn with_clock(
        config: BackendConfig,
        transport: Arc<dyn Transport>,
        store: Box<dyn SessionStore>,
        clock: Clock,
    ) -> Self {
        let auth = AuthClient::new(config.clone(), transport.clone(), store, clock);
        Self { inner: Arc::new(Inner { config, transport, auth, clock }) }
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    #[must_use]
    pub fn storage(&self) -> Storage<'_> {
        Storage::new(self)
    }

    /// Current time in milliseconds from the configured clock.
    #[must_use]
    pub fn now_ms(&self) -> i64 {
        (self.inner.clock)()
    }

    /// Send a request with credentials attached. Non-2xx responses are
    /// returned as-is; callers map them to the right error family.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] when no response arrives.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, BackendError> {
        let bearer = self.auth().access_token().unwrap_or_else(|| self.inner.config.anon_key.clone());
        request.set_header("apikey", self.inner.config.anon_key.clone());
        request.set_header("Authorization", format!("Bearer {bearer}"));
        self.inner.transport.send(request).await
    }

    async fn send_checked(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        let response = self.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(api_error(response.status, &response.body))
        }
    }

    /// Run a select and decode every row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] or [`BackendError::Decode`].
    pub async fn fetch<T: DeserializeOwned>(&self, select: &Select) -> Result<Vec<T>, BackendError> {
        let response = self.send_checked(select.to_request(&self.inner.config)).await?;
        decode(select.table(), &response.body)
    }

    /// Run a select that must match exactly one row.
    ///
    /// # Errors
    ///
    /// Zero rows yields an error for which [`BackendError::is_no_rows`] holds.
    pub async fn fetch_one<T: DeserializeOwned>(&self, select: &Select) -> Result<T, BackendError> {
        let select = if select.cardinality() == Cardinality::One { select.clone() } else { select.clone().single() };
        let response = self.send_checked(select.to_request(&self.inner.config)).await?;
        decode(select.table(), &response.body)
    }

    /// Run a select that matches at most one row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] or [`BackendError::Decode`].
    pub async fn fetch_optional<T: DeserializeOwned>(&self, select: &Select) -> Result<Option<T>, BackendError> {
        let select = select.clone().maybe_single();
        let rows: Vec<T> = self.fetch(&select).await?;
        Ok(rows.into_iter().next())
    }

    /// Exact number of rows matching the select's filters.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Decode`] if the response carries no total.
    pub async fn count(&self, select: &Select) -> Result<u64, BackendError> {
        let select = select.clone().count_only();
        let response = self.send_checked(select.to_request(&self.inner.config)).await?;
        response
            .header("Content-Range")
            .and_then(content_range_total)
            .ok_or_else(|| BackendError::Decode(format!("{}: missing row count", select.table())))
    }

    /// Execute a write, discarding any returned rows.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] when the write is rejected.
    pub async fn execute(&self, statement: &impl Statement) -> Result<(), BackendError> {
        self.send_checked(statement.to_request(&self.inner.config)).await.map(|_| ())
    }

    /// Execute a write built with `returning()` and decode the rows.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] or [`BackendError::Decode`].
    pub async fn execute_returning<T: DeserializeOwned>(
        &self,
        statement: &impl Statement,
    ) -> Result<Vec<T>, BackendError> {
        let response = self.send_checked(statement.to_request(&self.inner.config)).await?;
        decode("write", &response.body)
    }

    /// Call a remote procedure.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] or [`BackendError::Decode`].
    pub async fn rpc<P: Procedure>(&self, procedure: &P) -> Result<P::Output, BackendError> {
        let request = rpc::request(&self.inner.config, procedure)?;
        let response = self.send_checked(request).await?;
        rpc::decode::<P>(&response.body)
    }
}

fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(format!("{what}: {e}")))
}
