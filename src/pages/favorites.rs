//! The signed-in user's favorited prompts.

use backend::Backend;
use leptos::prelude::*;
use uuid::Uuid;

use crate::components::prompt_card::{PromptCard, copy_prompt, toggle_favorite};
use crate::pages::Spinner;
use crate::services::favorites::{favorites_key, fetch_favorite_prompts, needs_fetch};
use crate::services::prompts::{PromptCache, PromptCard as CardData};
use crate::state::auth::AuthState;
use crate::state::toast::ToastState;

#[component]
pub fn FavoritesPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let cache = expect_context::<RwSignal<PromptCache>>();
    let stored_backend = StoredValue::new(backend);
    let fetching = RwSignal::new(false);
    let failed = RwSignal::new(false);

    let key = Memo::new(move |_| auth.with(AuthState::user_id).map(favorites_key));

    // Fetch when the list is missing, stale, or invalidated by a toggle. A
    // failed load is not retried automatically.
    Effect::new(move || {
        let Some(key) = key.get() else { return };
        let Some(user_id) = auth.with_untracked(AuthState::user_id) else { return };
        let now = stored_backend.with_value(Backend::now_ms);
        let due = cache.with(|c| needs_fetch(c, &key, now));
        if !due || fetching.get() || failed.get_untracked() {
            return;
        }
        fetching.set(true);
        let token = cache.try_update(|c| c.begin_fetch(key));
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            match fetch_favorite_prompts(&backend, user_id).await {
                Ok(cards) => {
                    failed.try_set(false);
                    if let Some(token) = token {
                        cache.try_update(|c| c.complete_fetch(token, cards, backend.now_ms()));
                    }
                }
                Err(e) => {
                    log::error!("favorites page: load failed: {e}");
                    failed.try_set(true);
                }
            }
            fetching.try_set(false);
        });
    });

    let cards = move || key.get().and_then(|k| cache.with(|c| c.get(&k).cloned())).unwrap_or_default();
    let loaded = move || key.get().is_some_and(|k| cache.with(|c| c.get(&k).is_some()));

    let on_copy = Callback::new(move |card: CardData| {
        copy_prompt(stored_backend.get_value(), toasts, &card, auth.with_untracked(AuthState::user_id));
    });
    let on_favorite = Callback::new(move |(id, was): (Uuid, bool)| {
        toggle_favorite(stored_backend.get_value(), cache, toasts, auth.with_untracked(AuthState::user_id), id, was);
    });

    view! {
        <div class="favorites-page">
            <h1>"Your Favorites"</h1>
            {move || {
                if !loaded() && failed.get() {
                    view! { <p class="page-error">"Failed to load favorites. Please try again."</p> }.into_any()
                } else if !loaded() {
                    view! { <Spinner caption="Loading favorites..."/> }.into_any()
                } else if cards().is_empty() {
                    view! {
                        <div class="page-state">
                            <p>"No favorites yet"</p>
                            <a class="button" href="/explore">
                                "Explore prompts"
                            </a>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="prompt-grid">
                            <For
                                each=cards
                                key=|card| card.id()
                                children=move |card| {
                                    view! { <PromptCard card=card on_copy=on_copy on_favorite=on_favorite/> }
                                }
                            />
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
