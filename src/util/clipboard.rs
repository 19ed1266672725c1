//! Clipboard writes for the copy buttons.

use crate::error::ServiceError;

/// Write `text` to the system clipboard.
///
/// # Errors
///
/// [`ServiceError::Browser`] when the clipboard is unavailable or the
/// browser refuses the write (no user gesture, insecure context).
pub async fn copy_text(text: &str) -> Result<(), ServiceError> {
    #[cfg(feature = "csr")]
    {
        let window = web_sys::window().ok_or_else(|| ServiceError::Browser("no window".to_owned()))?;
        let Some(clipboard) = window.navigator().clipboard() else {
            return Err(ServiceError::Browser("clipboard unavailable".to_owned()));
        };
        wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text))
            .await
            .map(|_| ())
            .map_err(|e| ServiceError::Browser(format!("{e:?}")))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = text;
        Err(ServiceError::Browser("clipboard unavailable".to_owned()))
    }
}
