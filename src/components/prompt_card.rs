//! Prompt grid card plus the copy and favorite actions shared by every page
//! that lists prompts.

use backend::Backend;
use leptos::prelude::*;
use uuid::Uuid;

use crate::components::toaster::notify;
use crate::services::images::resolve_image_url;
use crate::services::prompts::{PromptCache, PromptCard as CardData};
use crate::state::toast::{Notice, ToastState};

/// Copy a prompt's text, toast the outcome and record the copy.
pub fn copy_prompt(backend: Backend, toasts: RwSignal<ToastState>, card: &CardData, user_id: Option<Uuid>) {
    let prompt_id = card.id();
    let title = card.prompt.title.clone();
    let text = card.prompt.prompt_text.clone();
    leptos::task::spawn_local(async move {
        match crate::util::clipboard::copy_text(&text).await {
            Ok(()) => {
                notify(toasts, Notice::info("Copied!", format!("\"{title}\" has been copied to your clipboard.")));
                crate::services::interactions::record_copy(&backend, prompt_id, user_id).await;
            }
            Err(e) => {
                log::warn!("prompt card: copy failed: {e}");
                notify(toasts, Notice::error("Copy failed", "Unable to copy to clipboard. Please try again."));
            }
        }
    });
}

/// Flip a favorite optimistically and toast the result.
pub fn toggle_favorite(
    backend: Backend,
    cache: RwSignal<PromptCache>,
    toasts: RwSignal<ToastState>,
    user_id: Option<Uuid>,
    prompt_id: Uuid,
    was_favorited: bool,
) {
    let Some(user_id) = user_id else {
        notify(toasts, Notice::error("Error", "You need to sign in first."));
        return;
    };
    leptos::task::spawn_local(async move {
        let notice =
            crate::services::favorites::toggle_favorite(&backend, &cache, user_id, prompt_id, was_favorited).await;
        notify(toasts, notice);
    });
}

#[component]
pub fn PromptCard(
    card: CardData,
    on_copy: Callback<CardData>,
    on_favorite: Callback<(Uuid, bool)>,
) -> impl IntoView {
    let backend = expect_context::<Backend>();
    let id = card.id();
    let favorited = card.is_favorited;
    let image = resolve_image_url(&backend, card.prompt.primary_image_url.as_deref());
    let category = card.category.as_ref().map(|c| c.name.clone());
    let media = card.prompt.media_type.as_str();
    let difficulty = card.prompt.difficulty_level.map(|d| d.as_str());
    let title = card.prompt.title.clone();
    let href = format!("/prompt/{id}");

    view! {
        <article class="prompt-card">
            <a class="prompt-card__image" href=href.clone()>
                <img src=image alt=title.clone() loading="lazy"/>
            </a>
            <div class="prompt-card__body">
                <a class="prompt-card__title" href=href>
                    {title}
                </a>
                <div class="prompt-card__badges">
                    {category.map(|name| view! { <span class="badge">{name}</span> })}
                    <span class="badge badge--outline">{media}</span>
                    {difficulty.map(|level| view! { <span class="badge badge--outline">{level}</span> })}
                </div>
            </div>
            <div class="prompt-card__actions">
                <button
                    class="icon-button"
                    class:icon-button--active=favorited
                    aria-label=if favorited { "Remove from favorites" } else { "Add to favorites" }
                    on:click=move |_| on_favorite.run((id, favorited))
                >
                    {if favorited { "♥" } else { "♡" }}
                </button>
                <button class="icon-button" aria-label="Copy prompt" on:click=move |_| on_copy.run(card.clone())>
                    "Copy"
                </button>
            </div>
        </article>
    }
}
