//! Backend connection settings parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::BackendError;

pub const DEFAULT_IMAGE_BUCKET: &str = "prompt-images";

pub const URL_VAR: &str = "BACKEND_URL";
pub const ANON_KEY_VAR: &str = "BACKEND_ANON_KEY";
pub const IMAGE_BUCKET_VAR: &str = "BACKEND_IMAGE_BUCKET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL without a trailing slash, e.g. `https://abcd.example.co`.
    pub url: String,
    /// Public (anonymous) API key sent as `apikey` on every request.
    pub anon_key: String,
    /// Storage bucket holding prompt and collection images.
    pub image_bucket: String,
}

impl BackendConfig {
    /// Build config from any key lookup.
    ///
    /// Required:
    /// - `BACKEND_URL`
    /// - `BACKEND_ANON_KEY`
    ///
    /// Optional:
    /// - `BACKEND_IMAGE_BUCKET`: default `prompt-images`
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when a required value is missing or
    /// the URL is not absolute.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BackendError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, URL_VAR)?.trim_end_matches('/').to_owned();
        if url::Url::parse(&url).is_err() {
            return Err(BackendError::Config(format!("{URL_VAR} is not a valid URL: {url}")));
        }
        let anon_key = required(&lookup, ANON_KEY_VAR)?;
        let image_bucket = lookup(IMAGE_BUCKET_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_owned());
        Ok(Self { url, anon_key, image_bucket })
    }

    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`BackendConfig::from_lookup`].
    pub fn from_env() -> Result<Self, BackendError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values captured at compile time.
    ///
    /// The wasm bundle has no process environment, so the same variables are
    /// baked in when the crate is built.
    ///
    /// # Errors
    ///
    /// See [`BackendConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, BackendError> {
        Self::from_lookup(|key| {
            let value = match key {
                URL_VAR => option_env!("BACKEND_URL"),
                ANON_KEY_VAR => option_env!("BACKEND_ANON_KEY"),
                IMAGE_BUCKET_VAR => option_env!("BACKEND_IMAGE_BUCKET"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Project reference: the first label of the project host.
    #[must_use]
    pub fn project_ref(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.split('.').next().unwrap_or(h).to_owned()))
            .unwrap_or_default()
    }

    /// Key under which the browser persists the auth session.
    #[must_use]
    pub fn session_storage_key(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }

    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.url, path.trim_start_matches('/'))
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, BackendError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BackendError::Config(format!("{key} not set")))
}
