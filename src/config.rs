//! App configuration and fixed UI timings.
//!
//! Backend credentials come from `backend::BackendConfig`; this module adds
//! the client-side knobs. In the browser there is no process environment,
//! so [`AppConfig::from_build_env`] reads values baked in at compile time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use backend::BackendConfig;

use crate::error::ServiceError;

/// Safety valve for the first auth event after start-up.
pub const AUTH_BOOTSTRAP_TIMEOUT_MS: u64 = 8_000;
/// Route guards show a retry prompt after this long in the loading state.
pub const ROUTE_GUARD_TIMEOUT_MS: u64 = 10_000;
/// Admin form submissions are reported as timed out after this long.
pub const ADMIN_MUTATION_TIMEOUT_MS: u64 = 10_000;
/// How long a toast stays on screen before dismissing itself.
pub const TOAST_DISMISS_MS: u64 = 5_000;
/// Cached prompt lists are reused without a refetch for one minute.
pub const PROMPT_CACHE_STALE_MS: i64 = 60 * 1000;
/// Credits are considered fresh for two minutes.
pub const CREDITS_STALE_MS: i64 = 2 * 60 * 1000;
/// Distance from the page bottom that triggers the next page load.
pub const SCROLL_THRESHOLD_PX: f64 = 800.0;
/// Shown wherever a prompt has no image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

pub const PAGE_SIZE_VAR: &str = "PROMPT_STUDIO_PAGE_SIZE";
pub const LOG_LEVEL_VAR: &str = "PROMPT_STUDIO_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendConfig,
    /// Rows per page for explore and admin content grids.
    pub page_size: usize,
    pub log_level: log::Level,
}

impl AppConfig {
    /// Build config from any key lookup.
    ///
    /// Required: the backend variables (see [`BackendConfig::from_lookup`]).
    ///
    /// Optional:
    /// - `PROMPT_STUDIO_PAGE_SIZE`: default 24, must be positive
    /// - `PROMPT_STUDIO_LOG_LEVEL`: `error`..`trace`, default `info`
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Backend`] when backend settings are missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = BackendConfig::from_lookup(&lookup)?;
        let page_size = lookup(PAGE_SIZE_VAR)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let log_level = parse_log_level(lookup(LOG_LEVEL_VAR).as_deref());
        Ok(Self { backend, page_size, log_level })
    }

    /// Build config from values captured when the bundle was compiled.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ServiceError> {
        let backend = BackendConfig::from_build_env()?;
        let page_size = option_env!("PROMPT_STUDIO_PAGE_SIZE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(Self { backend, page_size, log_level: log_level() })
    }
}

/// Console log level compiled into the bundle.
#[must_use]
pub fn log_level() -> log::Level {
    parse_log_level(option_env!("PROMPT_STUDIO_LOG_LEVEL"))
}

fn parse_log_level(raw: Option<&str>) -> log::Level {
    raw.and_then(|v| v.trim().parse::<log::Level>().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}
