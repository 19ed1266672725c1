//! Single prompt view at `/prompt/:id`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Loading the page records one view. The full prompt text stays hidden
//! until the user spends a daily credit on it (admins always see it);
//! unlocks last for the session.

use backend::Backend;
use backend::schema::PromptWithCategory;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use uuid::Uuid;

use crate::components::prompt_card::copy_prompt;
use crate::components::toaster::notify;
use crate::pages::{Load, Spinner, load_into};
use crate::services::images::resolve_image_url;
use crate::services::prompts::{PromptCache, PromptCard as CardData, favorite_ids, fetch_prompt};
use crate::state::auth::AuthState;
use crate::state::credits::CreditsState;
use crate::state::toast::{Notice, ToastState, ToastVariant};

#[component]
pub fn PromptDetailPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let cache = expect_context::<RwSignal<PromptCache>>();
    let credits = expect_context::<RwSignal<CreditsState>>();
    let params = use_params_map();
    let stored_backend = StoredValue::new(backend);

    let prompt = RwSignal::new(Load::<PromptWithCategory>::Pending);
    let favorited = RwSignal::new(false);

    let prompt_id = Memo::new(move |_| params.with(|p| p.get("id")).and_then(|raw| Uuid::parse_str(&raw).ok()));

    Effect::new(move || {
        let Some(id) = prompt_id.get() else {
            prompt.set(Load::Failed("Prompt not found or failed to load.".to_owned()));
            return;
        };
        let user = auth.with_untracked(AuthState::user_id);
        let backend = stored_backend.get_value();
        prompt.set(Load::Pending);
        load_into(prompt, "prompt detail", {
            let backend = backend.clone();
            async move { fetch_prompt(&backend, id).await }
        });
        leptos::task::spawn_local(async move {
            crate::services::interactions::record_view(&backend, id, user).await;
            if let Some(user_id) = user {
                match favorite_ids(&backend, user_id, &[id]).await {
                    Ok(ids) => {
                        favorited.try_set(ids.contains(&id));
                    }
                    Err(e) => log::warn!("prompt detail: favorite lookup failed: {e}"),
                }
            }
        });
    });

    let unlocked = move || {
        auth.with(AuthState::is_admin) || prompt_id.get().is_some_and(|id| credits.with(|c| c.is_unlocked(id)))
    };

    let on_unlock = move |_| {
        let Some(id) = prompt_id.get_untracked() else { return };
        if credits.with_untracked(|c| c.spending) {
            return;
        }
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            let notice = match crate::services::credits::unlock_prompt(&backend, &credits, id).await {
                Ok(outcome) if outcome.success => {
                    let left = outcome
                        .credits_left
                        .map_or_else(String::new, |n| format!("{n} credits left today."));
                    Notice::info("Prompt unlocked", left)
                }
                Ok(_) => Notice::error("No credits left", "You have used all of today's credits. Come back tomorrow."),
                Err(e) => Notice::error("Unlock failed", e.user_message()),
            };
            notify(toasts, notice);
            if let Some(user_id) = auth.with_untracked(AuthState::user_id) {
                crate::services::credits::refresh_credits(&backend, &credits, user_id).await;
            }
        });
    };

    let card = move || match prompt.get() {
        Load::Ready(row) => Some(CardData { is_favorited: favorited.get(), ..CardData::from(row) }),
        _ => None,
    };

    let on_copy = move |_| {
        if let Some(card) = card() {
            copy_prompt(stored_backend.get_value(), toasts, &card, auth.with_untracked(AuthState::user_id));
        }
    };

    let on_favorite = move |_| {
        let (Some(id), Some(user_id)) = (prompt_id.get_untracked(), auth.with_untracked(AuthState::user_id)) else {
            return;
        };
        let was = favorited.get_untracked();
        favorited.set(!was);
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            let notice = crate::services::favorites::toggle_favorite(&backend, &cache, user_id, id, was).await;
            if notice.variant == ToastVariant::Destructive {
                favorited.try_set(was);
            }
            notify(toasts, notice);
        });
    };

    view! {
        <div class="prompt-detail">
            <a class="prompt-detail__back" href="/explore">
                "Back to Explore"
            </a>
            {move || match prompt.get() {
                Load::Pending => view! { <Spinner caption="Loading prompt..."/> }.into_any(),
                Load::Failed(_) => view! {
                    <div class="page-state">
                        <p class="page-error">"Prompt not found or failed to load."</p>
                        <a class="button" href="/explore">
                            "Back to Explore"
                        </a>
                    </div>
                }
                .into_any(),
                Load::Ready(row) => {
                    let image = stored_backend
                        .with_value(|b| resolve_image_url(b, row.prompt.primary_image_url.as_deref()));
                    let before = row.prompt.before_image_url.clone();
                    let after = row.prompt.after_image_url.clone();
                    let tags: Vec<String> = row
                        .prompt
                        .style_tags
                        .clone()
                        .unwrap_or_default()
                        .into_iter()
                        .chain(row.prompt.industry_tags.clone().unwrap_or_default())
                        .collect();
                    let text = row.prompt.prompt_text.clone();
                    view! {
                        <article class="prompt-detail__body">
                            <img class="prompt-detail__image" src=image alt=row.prompt.title.clone()/>
                            <header>
                                <h1>{row.prompt.title.clone()}</h1>
                                <div class="prompt-card__badges">
                                    {row.category.map(|c| view! { <span class="badge">{c.name}</span> })}
                                    <span class="badge badge--outline">{row.prompt.media_type.as_str()}</span>
                                    {row
                                        .prompt
                                        .difficulty_level
                                        .map(|d| view! { <span class="badge badge--outline">{d.as_str()}</span> })}
                                </div>
                                <p class="muted">
                                    {row.prompt.view_count.unwrap_or(0)} " views · "
                                    {row.prompt.copy_count.unwrap_or(0)} " copies"
                                </p>
                            </header>
                            <Show
                                when=unlocked
                                fallback=move || {
                                    view! {
                                        <div class="prompt-detail__locked">
                                            <p>"Spend one of today's credits to reveal and copy this prompt."</p>
                                            <button
                                                class="button"
                                                on:click=on_unlock
                                                disabled=move || credits.with(|c| c.spending)
                                            >
                                                {move || {
                                                    if credits.with(|c| c.spending) {
                                                        "Unlocking..."
                                                    } else {
                                                        "Unlock prompt"
                                                    }
                                                }}
                                            </button>
                                        </div>
                                    }
                                }
                            >
                                <pre class="prompt-detail__text">{text.clone()}</pre>
                                <button class="button" on:click=on_copy>
                                    "Copy prompt"
                                </button>
                            </Show>
                            <button
                                class="button button--ghost"
                                on:click=on_favorite
                            >
                                {move || if favorited.get() { "Remove from favorites" } else { "Add to favorites" }}
                            </button>
                            {(!tags.is_empty())
                                .then(|| {
                                    view! {
                                        <ul class="tag-list">
                                            {tags.into_iter().map(|t| view! { <li class="tag">{t}</li> }).collect_view()}
                                        </ul>
                                    }
                                })}
                            {before
                                .zip(after)
                                .map(|(before, after)| {
                                    view! {
                                        <div class="prompt-detail__compare">
                                            <figure>
                                                <img src=before alt="Before"/>
                                                <figcaption>"Before"</figcaption>
                                            </figure>
                                            <figure>
                                                <img src=after alt="After"/>
                                                <figcaption>"After"</figcaption>
                                            </figure>
                                        </div>
                                    }
                                })}
                        </article>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
