//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the backend client from build-time config, provides the
//! shared state signals, and starts two background loops: the auth event
//! listener and the session auto-refresh tick. Every other page reads its
//! dependencies from context.

use std::sync::Arc;

use backend::Backend;
use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::guard::{GuardKind, Guarded};
use crate::components::layout::Layout;
use crate::components::toaster::Toaster;
use crate::config::{AppConfig, PROMPT_CACHE_STALE_MS};
use crate::net::session_store::LocalStorageSessionStore;
use crate::net::transport::GlooTransport;
use crate::pages::admin::{
    analytics::AnalyticsPage, categories::CategoryManagementPage, content::ContentPage,
    dashboard::AdminDashboardPage, featured::FeaturedCollectionsPage, upload::UploadPromptPage,
};
use crate::pages::{
    auth::AuthPage, categories::CategoriesPage, explore::ExplorePage, favorites::FavoritesPage,
    landing::LandingPage, prompt_detail::PromptDetailPage, settings::SettingsPage,
};
use crate::services::prompts::PromptCache;
use crate::state::{auth::AuthState, credits::CreditsState, toast::ToastState};

/// Root application component.
///
/// Renders a configuration error instead of the app when the backend
/// settings were not baked into the bundle.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let content = match AppConfig::from_build_env() {
        Ok(config) => view! { <ConfiguredApp config/> }.into_any(),
        Err(e) => {
            log::error!("app: configuration error: {e}");
            view! { <ConfigError message=e.to_string()/> }.into_any()
        }
    };

    view! {
        <Stylesheet id="leptos" href="/pkg/prompt-studio.css"/>
        <Title text="AI Studio"/>
        {content}
    }
}

#[component]
fn ConfigError(message: String) -> impl IntoView {
    view! {
        <div class="config-error">
            <h1>"AI Studio is not configured"</h1>
            <p>{message}</p>
        </div>
    }
}

#[component]
fn ConfiguredApp(config: AppConfig) -> impl IntoView {
    let backend = Backend::new(
        config.backend.clone(),
        Arc::new(GlooTransport),
        Box::new(LocalStorageSessionStore::new(&config.backend)),
    );

    let auth = RwSignal::new(AuthState::default());
    let toasts = RwSignal::new(ToastState::default());
    let cache = RwSignal::new(PromptCache::new(PROMPT_CACHE_STALE_MS));
    let credits = RwSignal::new(CreditsState::default());

    provide_context(backend.clone());
    provide_context(config);
    provide_context(auth);
    provide_context(toasts);
    provide_context(cache);
    provide_context(credits);

    start_auth_listener(backend.clone(), auth, credits);
    start_auto_refresh(backend);

    view! {
        <Toaster/>
        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("auth") view=AuthPage/>
                <Route path=StaticSegment("") view=LandingPage/>
                <Route path=StaticSegment("explore") view=|| view! { <UserRoute><ExplorePage/></UserRoute> }/>
                <Route path=StaticSegment("categories") view=|| view! { <UserRoute><CategoriesPage/></UserRoute> }/>
                <Route path=StaticSegment("favorites") view=|| view! { <UserRoute><FavoritesPage/></UserRoute> }/>
                <Route
                    path=(StaticSegment("prompt"), ParamSegment("id"))
                    view=|| view! { <UserRoute><PromptDetailPage/></UserRoute> }
                />
                <Route path=StaticSegment("settings") view=|| view! { <UserRoute><SettingsPage/></UserRoute> }/>
                <Route
                    path=(StaticSegment("admin"), StaticSegment("dashboard"))
                    view=|| view! { <AdminRoute><AdminDashboardPage/></AdminRoute> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("upload"))
                    view=|| view! { <AdminRoute><UploadPromptPage/></AdminRoute> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("content"))
                    view=|| view! { <AdminRoute><ContentPage/></AdminRoute> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("categories"))
                    view=|| view! { <AdminRoute><CategoryManagementPage/></AdminRoute> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("featured"))
                    view=|| view! { <AdminRoute><FeaturedCollectionsPage/></AdminRoute> }
                />
                <Route
                    path=(StaticSegment("admin"), StaticSegment("analytics"))
                    view=|| view! { <AdminRoute><AnalyticsPage/></AdminRoute> }
                />
            </Routes>
        </Router>
    }
}

/// Signed-in pages: guard plus the app chrome.
#[component]
fn UserRoute(children: ChildrenFn) -> impl IntoView {
    let children = StoredValue::new(children);
    view! {
        <Guarded kind=GuardKind::User>
            <Layout>{children.with_value(|c| c())}</Layout>
        </Guarded>
    }
}

#[component]
fn AdminRoute(children: ChildrenFn) -> impl IntoView {
    let children = StoredValue::new(children);
    view! {
        <Guarded kind=GuardKind::Admin>
            <Layout>{children.with_value(|c| c())}</Layout>
        </Guarded>
    }
}

// =============================================================================
// BACKGROUND LOOPS
// =============================================================================

/// Subscribe before initializing so the initial-session event is not
/// missed, then mirror every auth change into `auth`.
fn start_auth_listener(backend: Backend, auth: RwSignal<AuthState>, credits: RwSignal<CreditsState>) {
    #[cfg(feature = "csr")]
    {
        use backend::AuthEvent;
        use futures::StreamExt;
        use leptos::task::spawn_local;

        use crate::config::AUTH_BOOTSTRAP_TIMEOUT_MS;
        use crate::services::session::{handle_auth_change, race_first_event};
        use crate::util::timer::sleep_ms;

        let mut events = backend.auth().subscribe();

        let init_backend = backend.clone();
        spawn_local(async move {
            init_backend.auth().initialize().await;
        });

        spawn_local(async move {
            let on_change = |change: backend::AuthChange| {
                if matches!(change.event, AuthEvent::SignedIn | AuthEvent::SignedOut) {
                    credits.try_update(CreditsState::reset);
                }
                let backend = backend.clone();
                spawn_local(async move {
                    handle_auth_change(&backend, &auth, &change).await;
                });
            };

            match race_first_event(events.next(), sleep_ms(AUTH_BOOTSTRAP_TIMEOUT_MS)).await {
                Ok(change) => on_change(change),
                Err(_) => {
                    auth.try_update(AuthState::force_loaded);
                }
            }
            while let Some(change) = events.next().await {
                on_change(change);
            }
        });
    }

    #[cfg(not(feature = "csr"))]
    {
        let _ = (backend, auth, credits);
    }
}

/// Refresh the access token ahead of expiry for as long as the app lives.
fn start_auto_refresh(backend: Backend) {
    #[cfg(feature = "csr")]
    {
        use std::sync::atomic::{AtomicBool, Ordering};

        use leptos::task::spawn_local;

        use crate::util::timer::sleep_ms;

        let alive = Arc::new(AtomicBool::new(true));
        let alive_loop = alive.clone();
        on_cleanup(move || alive.store(false, Ordering::Relaxed));

        spawn_local(async move {
            while alive_loop.load(Ordering::Relaxed) {
                sleep_ms(backend::auth::AUTO_REFRESH_TICK_MS).await;
                if !alive_loop.load(Ordering::Relaxed) {
                    break;
                }
                if let Err(e) = backend.auth().auto_refresh_tick().await {
                    log::warn!("session: token auto-refresh failed: {e}");
                }
            }
        });
    }

    #[cfg(not(feature = "csr"))]
    {
        let _ = backend;
    }
}
