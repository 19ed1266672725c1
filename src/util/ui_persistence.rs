//! Remembered browse preferences in `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Explore remembers its last filters and the content page its time filter.
//! Values are JSON. An entry that no longer decodes (an older filter shape,
//! a hand-edited value) is dropped so the page starts from its defaults.

#[cfg(test)]
#[path = "ui_persistence_test.rs"]
mod ui_persistence_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const EXPLORE_FILTERS_KEY: &str = "prompt_studio_explore_filters";
pub const CONTENT_FILTER_KEY: &str = "prompt_studio_content_filter";

/// Parse a stored preference; `None` for anything that does not decode.
pub fn decode_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read the preference under `key`, discarding it when it is unreadable.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    #[cfg(feature = "csr")]
    {
        let storage = local_storage()?;
        let raw = storage.get_item(key).ok().flatten()?;
        let value = decode_json(&raw);
        if value.is_none() {
            log::debug!("ui_persistence: dropping unreadable {key}");
            let _ = storage.remove_item(key);
        }
        value
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        None
    }
}

/// Remember `value` under `key`. Storage failures (private mode, quota) only
/// cost the preference.
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    #[cfg(feature = "csr")]
    {
        let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(value)) else {
            return;
        };
        if storage.set_item(key, &raw).is_err() {
            log::warn!("ui_persistence: could not save {key}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (key, value);
    }
}
