//! Object storage buckets.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Backend;
use crate::error::{BackendError, storage_error};
use crate::transport::{HttpRequest, Method};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    /// `max-age` in seconds for the stored object.
    pub cache_control: String,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self { cache_control: "3600".to_owned(), upsert: false }
    }
}

/// One entry of a bucket listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Storage API handle borrowed from a [`Backend`].
pub struct Storage<'a> {
    backend: &'a Backend,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Upload `data` to `bucket/path`. Returns the stored path.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Storage`] when the upload is rejected (for
    /// example, the path already exists and `upsert` is off).
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<String, BackendError> {
        let url = self.backend.config().storage_url(&format!("object/{bucket}/{path}"));
        let request = HttpRequest::new(Method::Post, url)
            .header("cache-control", format!("max-age={}", options.cache_control))
            .header("x-upsert", options.upsert.to_string())
            .bytes(content_type, data);
        self.send(request).await?;
        Ok(path.to_owned())
    }

    /// List objects under `prefix`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Storage`] or [`BackendError::Decode`].
    pub async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredObject>, BackendError> {
        let url = self.backend.config().storage_url(&format!("object/list/{bucket}"));
        let request = HttpRequest::new(Method::Post, url).json(&serde_json::json!({
            "prefix": prefix,
            "limit": limit,
            "offset": offset,
            "sortBy": { "column": "name", "order": "asc" },
        }))?;
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(format!("storage list: {e}")))
    }

    /// Public URL of an object in a public bucket. No request is made.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.backend
            .config()
            .storage_url(&format!("object/public/{bucket}/{}", path.trim_start_matches('/')))
    }

    /// Delete objects by path.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Storage`] when the delete is rejected.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), BackendError> {
        let url = self.backend.config().storage_url(&format!("object/{bucket}"));
        let request = HttpRequest::new(Method::Delete, url).json(&serde_json::json!({ "prefixes": paths }))?;
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: HttpRequest) -> Result<String, BackendError> {
        let response = self.backend.send(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(storage_error(response.status, &response.body))
        }
    }
}
