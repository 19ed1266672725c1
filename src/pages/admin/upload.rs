//! Prompt upload form.

use backend::Backend;
use backend::schema::{Category, DifficultyLevel, MediaType};
use leptos::prelude::*;
use uuid::Uuid;

use crate::components::image_upload::ImageUpload;
use crate::components::toaster::notify;
use crate::config::ADMIN_MUTATION_TIMEOUT_MS;
use crate::services::prompts::{PromptDraft, add_tag, create_prompt, parse_tags};
use crate::state::auth::AuthState;
use crate::state::toast::{Notice, ToastState};
use crate::util::timer::with_timeout;

#[component]
pub fn UploadPromptPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let stored_backend = StoredValue::new(backend);

    let draft = RwSignal::new(PromptDraft::new());
    let categories = RwSignal::new(Vec::<Category>::new());
    let submitting = RwSignal::new(false);
    // Bumped after a successful submit so the image picker remounts empty.
    let form_epoch = RwSignal::new(0_u32);

    let backend = stored_backend.get_value();
    leptos::task::spawn_local(async move {
        match crate::services::categories::list_categories(&backend).await {
            Ok(rows) => {
                categories.try_set(rows);
            }
            Err(e) => log::warn!("upload: categories failed: {e}"),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let Some(user_id) = auth.with_untracked(AuthState::user_id) else { return };
        let values = draft.get_untracked();
        if let Err(e) = values.validate() {
            notify(toasts, Notice::error("Upload failed", e.user_message()));
            return;
        }
        submitting.set(true);
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            match with_timeout(create_prompt(&backend, values, user_id), ADMIN_MUTATION_TIMEOUT_MS).await {
                Ok(()) => {
                    notify(
                        toasts,
                        Notice::info("Prompt uploaded!", "Your prompt with image has been successfully added to the library."),
                    );
                    draft.try_set(PromptDraft::new());
                    form_epoch.try_update(|n| *n += 1);
                }
                Err(e) => {
                    log::error!("upload: create failed: {e}");
                    notify(toasts, Notice::error("Upload failed", e.user_message()));
                }
            }
            submitting.try_set(false);
        });
    };

    let on_image = Callback::new(move |url: String| {
        draft.update(|d| d.image_url = Some(url).filter(|u| !u.is_empty()));
    });

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Upload Prompt"</h1>
                <a class="button button--ghost" href="/admin/dashboard">
                    "Back to Dashboard"
                </a>
            </header>
            <form class="admin-form" on:submit=on_submit>
                {move || {
                    form_epoch.track();
                    view! { <ImageUpload on_uploaded=on_image label="Prompt Image *"/> }
                }}
                <label class="field">
                    <span>"Title *"</span>
                    <input
                        type="text"
                        required=true
                        prop:value=move || draft.with(|d| d.title.clone())
                        on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Prompt Text *"</span>
                    <textarea
                        rows="6"
                        required=true
                        prop:value=move || draft.with(|d| d.prompt_text.clone())
                        on:input=move |ev| draft.update(|d| d.prompt_text = event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="field-row">
                    <label class="field">
                        <span>"Category"</span>
                        <select
                            prop:value=move || draft.with(|d| d.category_id.map(|c| c.to_string()).unwrap_or_default())
                            on:change=move |ev| {
                                draft.update(|d| d.category_id = Uuid::parse_str(&event_target_value(&ev)).ok());
                            }
                        >
                            <option value="">"No category"</option>
                            <For
                                each=move || categories.get()
                                key=|c| c.id
                                children=move |c| view! { <option value=c.id.to_string()>{c.name}</option> }
                            />
                        </select>
                    </label>
                    <label class="field">
                        <span>"Media Type"</span>
                        <select
                            prop:value=move || draft.with(|d| d.media_type.as_str())
                            on:change=move |ev| {
                                if let Some(media) = MediaType::parse(&event_target_value(&ev)) {
                                    draft.update(|d| d.media_type = media);
                                }
                            }
                        >
                            {MediaType::ALL
                                .iter()
                                .map(|m| view! { <option value=m.as_str()>{m.as_str()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="field">
                        <span>"Difficulty Level"</span>
                        <select
                            prop:value=move || draft.with(|d| d.difficulty.map(DifficultyLevel::as_str).unwrap_or_default())
                            on:change=move |ev| {
                                draft.update(|d| d.difficulty = DifficultyLevel::parse(&event_target_value(&ev)));
                            }
                        >
                            {DifficultyLevel::ALL
                                .iter()
                                .map(|l| view! { <option value=l.as_str()>{l.as_str()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </div>
                <TagInput
                    label="Style Tags"
                    tags=Signal::derive(move || draft.with(|d| d.style_tags.clone()))
                    on_change=Callback::new(move |tags: Vec<String>| draft.update(|d| d.style_tags = tags))
                />
                <TagInput
                    label="Industry Tags"
                    tags=Signal::derive(move || draft.with(|d| d.industry_tags.clone()))
                    on_change=Callback::new(move |tags: Vec<String>| draft.update(|d| d.industry_tags = tags))
                />
                <button class="button" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Uploading..." } else { "Upload Prompt" }}
                </button>
            </form>
        </div>
    }
}

/// Tag chips with a text box; Enter or "Add" appends, commas split.
#[component]
fn TagInput(label: &'static str, tags: Signal<Vec<String>>, on_change: Callback<Vec<String>>) -> impl IntoView {
    let pending = RwSignal::new(String::new());

    let commit = move || {
        let raw = pending.get_untracked();
        let mut next = tags.get_untracked();
        let before = next.len();
        for tag in parse_tags(&raw) {
            add_tag(&mut next, &tag);
        }
        if next.len() != before {
            on_change.run(next);
        }
        pending.set(String::new());
    };

    view! {
        <div class="field">
            <span>{label}</span>
            <div class="field__row">
                <input
                    type="text"
                    placeholder="Add a tag"
                    prop:value=move || pending.get()
                    on:input=move |ev| pending.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            commit();
                        }
                    }
                />
                <button type="button" class="button button--ghost" on:click=move |_| commit()>
                    "Add"
                </button>
            </div>
            <ul class="tag-list">
                <For
                    each=move || tags.get()
                    key=|tag| tag.clone()
                    children=move |tag| {
                        let removed = tag.clone();
                        view! {
                            <li class="tag">
                                {tag}
                                <button
                                    type="button"
                                    class="tag__remove"
                                    aria-label="Remove tag"
                                    on:click=move |_| {
                                        let next = tags.get_untracked().into_iter().filter(|t| *t != removed).collect();
                                        on_change.run(next);
                                    }
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
