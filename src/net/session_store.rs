//! Session persistence in `localStorage`, keyed per project so two
//! deployments on one origin do not share a login.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use backend::{BackendConfig, Session, SessionStore};

/// Parse a stored session; corrupt or foreign values read as signed out.
pub fn decode_session(raw: &str) -> Option<Session> {
    match serde_json::from_str(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("session store: ignoring unreadable session: {e}");
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct LocalStorageSessionStore {
    key: String,
}

impl LocalStorageSessionStore {
    pub fn new(config: &BackendConfig) -> Self {
        Self { key: config.session_storage_key() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Option<Session> {
        #[cfg(feature = "csr")]
        {
            let raw = local_storage()?.get_item(&self.key).ok().flatten()?;
            decode_session(&raw)
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn save(&self, session: &Session) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = local_storage() else { return };
            let Ok(raw) = serde_json::to_string(session) else { return };
            if storage.set_item(&self.key, &raw).is_err() {
                log::warn!("session store: could not persist session");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = session;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}
