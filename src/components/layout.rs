//! App shell: top navigation, credit balance and account menu.

use backend::Backend;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::toaster::notify;
use crate::state::auth::AuthState;
use crate::state::credits::CreditsState;
use crate::state::toast::{Notice, ToastState};
use crate::util::auth::AUTH_ROUTE;

const USER_LINKS: &[(&str, &str)] = &[("/explore", "Explore"), ("/categories", "Categories"), ("/favorites", "Favorites")];

const ADMIN_LINKS: &[(&str, &str)] = &[
    ("/admin/dashboard", "Dashboard"),
    ("/admin/upload", "Upload"),
    ("/admin/content", "Content"),
    ("/admin/categories", "Categories"),
    ("/admin/featured", "Featured"),
    ("/admin/analytics", "Analytics"),
];

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    view! {
        <div class="layout">
            <header class="layout__header">
                <a class="layout__brand" href="/">
                    "AI Studio"
                </a>
                <nav class="layout__nav">
                    {USER_LINKS.iter().map(|(href, label)| view! { <a href=*href>{*label}</a> }).collect_view()}
                    <Show when=move || auth.with(AuthState::is_admin)>
                        <span class="layout__divider" aria-hidden="true"></span>
                        {ADMIN_LINKS
                            .iter()
                            .map(|(href, label)| view! { <a class="layout__admin-link" href=*href>{*label}</a> })
                            .collect_view()}
                    </Show>
                </nav>
                <CreditsBadge/>
                <AccountMenu/>
            </header>
            <main class="layout__main">{children()}</main>
        </div>
    }
}

/// Today's remaining credits; refreshed on mount when stale.
#[component]
fn CreditsBadge() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let credits = expect_context::<RwSignal<CreditsState>>();
    let backend = expect_context::<Backend>();

    Effect::new(move || {
        let Some(user_id) = auth.with(AuthState::user_id) else {
            return;
        };
        let backend = backend.clone();
        leptos::task::spawn_local(async move {
            crate::services::credits::refresh_credits(&backend, &credits, user_id).await;
        });
    });

    view! {
        <Show when=move || credits.with(|c| c.credits.is_some())>
            <span class="credits-badge" title="Daily prompt credits">
                {move || {
                    credits
                        .with(|c| {
                            c.credits
                                .as_ref()
                                .map(|row| format!("{} / {} credits", row.credits_remaining, row.daily_quota))
                        })
                        .unwrap_or_default()
                }}
            </span>
        </Show>
    }
}

#[component]
fn AccountMenu() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let credits = expect_context::<RwSignal<CreditsState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let backend = expect_context::<Backend>();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let email = move || auth.with(|a| a.user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());

    let on_sign_out = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let backend = backend.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            crate::services::session::sign_out(&backend, &auth).await;
            credits.update(CreditsState::reset);
            notify(toasts, Notice::info("Signed out", "You have been successfully signed out."));
            busy.set(false);
            navigate(AUTH_ROUTE, NavigateOptions::default());
        });
    };

    view! {
        <div class="account-menu">
            <span class="account-menu__email">{email}</span>
            <a class="account-menu__link" href="/settings">
                "Settings"
            </a>
            <button class="account-menu__sign-out" on:click=on_sign_out disabled=move || busy.get()>
                "Sign out"
            </button>
        </div>
    }
}
