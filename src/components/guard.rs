//! Route guard wrapper.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every route except `/auth`. The decision comes from
//! [`crate::util::auth`]; this component adds the timeout that turns an
//! endless spinner into a reload prompt, and performs redirects.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ROUTE_GUARD_TIMEOUT_MS;
use crate::state::auth::AuthState;
use crate::util::auth::{GuardView, admin_view, landing_view, protected_view};

/// Which access rule a route applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    User,
    Admin,
    Landing,
}

impl GuardKind {
    fn decide(self, state: &AuthState, timed_out: bool) -> GuardView {
        match self {
            Self::User => protected_view(state, timed_out),
            Self::Admin => admin_view(state, timed_out),
            Self::Landing => landing_view(state, timed_out),
        }
    }
}

#[component]
pub fn Guarded(kind: GuardKind, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let timed_out = RwSignal::new(false);

    #[cfg(feature = "csr")]
    {
        let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let alive_task = alive.clone();
        leptos::task::spawn_local(async move {
            crate::util::timer::sleep_ms(ROUTE_GUARD_TIMEOUT_MS).await;
            if alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                log::warn!("guard: auth still pending after {ROUTE_GUARD_TIMEOUT_MS}ms");
                timed_out.set(true);
            }
        });
        on_cleanup(move || alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ROUTE_GUARD_TIMEOUT_MS;
    }

    let decision = Memo::new(move |_| auth.with(|state| kind.decide(state, timed_out.get())));

    Effect::new(move || {
        if let GuardView::Redirect(to) = decision.get() {
            navigate(to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decision.get() {
        GuardView::Allow => children().into_any(),
        GuardView::Wait(caption) => view! {
            <div class="guard guard--waiting">
                <div class="spinner" aria-hidden="true"></div>
                <p>{caption}</p>
            </div>
        }
        .into_any(),
        GuardView::Stalled => view! { <StalledNotice/> }.into_any(),
        GuardView::Redirect(_) => view! { <div class="guard"></div> }.into_any(),
    }
}

#[component]
fn StalledNotice() -> impl IntoView {
    let on_reload = move |_| {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
    };

    view! {
        <div class="guard guard--stalled">
            <p>"Connection is taking longer than expected..."</p>
            <button class="button" on:click=on_reload>
                "Reload Page"
            </button>
        </div>
    }
}
