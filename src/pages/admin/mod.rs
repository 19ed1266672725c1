//! Administrator pages. Every route here sits behind the admin guard.
//!
//! DESIGN
//! ======
//! Admin writes go through [`Mutation::run`]: one write at a time per
//! form, each bounded by the admin timeout so a stalled request turns into
//! a toast instead of a form that never re-enables.

pub mod analytics;
pub mod categories;
pub mod content;
pub mod dashboard;
pub mod featured;
pub mod upload;

use std::future::Future;

use backend::Backend;
use leptos::prelude::*;

use crate::components::toaster::notify;
use crate::config::ADMIN_MUTATION_TIMEOUT_MS;
use crate::error::ServiceError;
use crate::state::toast::{Notice, ToastState};
use crate::util::timer::with_timeout;

/// What an admin form needs to run a write.
#[derive(Clone, Copy)]
pub struct Mutation {
    pub backend: StoredValue<Backend>,
    pub toasts: RwSignal<ToastState>,
    /// True while a write is in flight; the form disables its buttons.
    pub busy: RwSignal<bool>,
}

impl Mutation {
    pub fn new(backend: Backend, toasts: RwSignal<ToastState>) -> Self {
        Self { backend: StoredValue::new(backend), toasts, busy: RwSignal::new(false) }
    }

    /// Run `op` unless another write is in flight, then toast whatever
    /// `done` makes of the outcome.
    pub fn run<Op, Fut, Done>(self, op: Op, done: Done)
    where
        Op: FnOnce(Backend) -> Fut + 'static,
        Fut: Future<Output = Result<(), ServiceError>> + 'static,
        Done: FnOnce(&Result<(), ServiceError>) -> Notice + 'static,
    {
        if self.busy.get_untracked() {
            return;
        }
        self.busy.set(true);
        let backend = self.backend.get_value();
        leptos::task::spawn_local(async move {
            let result = with_timeout(op(backend), ADMIN_MUTATION_TIMEOUT_MS).await;
            if let Err(e) = &result {
                log::error!("admin: write failed: {e}");
            }
            notify(self.toasts, done(&result));
            self.busy.try_set(false);
        });
    }
}

/// One headline number.
#[component]
pub fn StatCard(
    label: &'static str,
    #[prop(into)] value: String,
    #[prop(optional)] hint: Option<String>,
) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-card__label">{label}</span>
            <strong class="stat-card__value">{value}</strong>
            {hint.map(|h| view! { <span class="stat-card__hint">{h}</span> })}
        </div>
    }
}

/// `Mar 5, 2024` style date for admin tables.
pub fn short_date(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|at| at.format("%b %-d, %Y").to_string()).unwrap_or_default()
}
