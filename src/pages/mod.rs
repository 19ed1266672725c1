//! Routed pages. Each page is thin orchestration over `crate::services`.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod explore;
pub mod favorites;
pub mod landing;
pub mod prompt_detail;
pub mod settings;

use std::future::Future;

use leptos::prelude::*;

use crate::error::ServiceError;

/// Status of a page's initial fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum Load<T> {
    Pending,
    Ready(T),
    Failed(String),
}

/// Run `fetch` and store its outcome in `target`, logging failures under
/// `what`.
pub fn load_into<T, F>(target: RwSignal<Load<T>>, what: &'static str, fetch: F)
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T, ServiceError>> + 'static,
{
    leptos::task::spawn_local(async move {
        let outcome = match fetch.await {
            Ok(value) => Load::Ready(value),
            Err(e) => {
                log::error!("{what}: load failed: {e}");
                Load::Failed(e.user_message())
            }
        };
        target.try_set(outcome);
    });
}

/// Spinner with a caption.
#[component]
pub fn Spinner(#[prop(default = "Loading...")] caption: &'static str) -> impl IntoView {
    view! {
        <div class="page-state">
            <div class="spinner" aria-hidden="true"></div>
            <p>{caption}</p>
        </div>
    }
}
