//! Infinite-scroll trigger.
//!
//! The window scroll listener only reports "near the bottom"; whether to
//! load another page is the [`crate::state::browse::Pager`]'s call.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use crate::config::SCROLL_THRESHOLD_PX;

/// True when the viewport bottom is within the threshold of the document end.
pub fn near_bottom(scroll_y: f64, viewport_height: f64, document_height: f64) -> bool {
    scroll_y + viewport_height >= document_height - SCROLL_THRESHOLD_PX
}

/// Call `on_near_bottom` whenever a window scroll ends near the bottom.
/// The listener is removed when the owning component is cleaned up.
pub fn install_near_bottom_listener(on_near_bottom: impl Fn() + 'static) {
    #[cfg(feature = "csr")]
    {
        use leptos::prelude::{on_cleanup, window_event_listener};

        let handle = window_event_listener(leptos::ev::scroll, move |_| {
            let Some(window) = web_sys::window() else { return };
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            let viewport = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let document = window
                .document()
                .and_then(|d| d.document_element())
                .map_or(0.0, |el| f64::from(el.scroll_height()));
            if near_bottom(scroll_y, viewport, document) {
                on_near_bottom();
            }
        });
        on_cleanup(move || handle.remove());
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = on_near_bottom;
    }
}
