//! Admin content grid: every prompt, newest first, with delete.

use backend::Backend;
use backend::schema::PromptSummary;
use leptos::prelude::*;

use crate::components::toaster::notify;
use crate::config::{ADMIN_MUTATION_TIMEOUT_MS, AppConfig};
use crate::pages::admin::short_date;
use crate::services::images::resolve_image_url;
use crate::services::prompts::{PROMPTS_KEY, PromptCache, TimeFilter, delete_prompt, fetch_content_page};
use crate::state::browse::Pager;
use crate::state::toast::{Notice, ToastState};
use crate::util::scroll::install_near_bottom_listener;
use crate::util::timer::with_timeout;
use crate::util::ui_persistence::{CONTENT_FILTER_KEY, load_json, save_json};

#[component]
pub fn ContentPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let config = expect_context::<AppConfig>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let cache = expect_context::<RwSignal<PromptCache>>();
    let stored_backend = StoredValue::new(backend);

    let initial = load_json::<String>(CONTENT_FILTER_KEY)
        .and_then(|raw| TimeFilter::parse(&raw))
        .unwrap_or_default();
    let filter = RwSignal::new(initial);
    let pager = RwSignal::new(Pager::<PromptSummary>::new(config.page_size));
    let selected = RwSignal::new(None::<PromptSummary>);
    let deleting = RwSignal::new(false);

    let load_next = move || {
        let Some(Some(ticket)) = pager.try_update(Pager::begin_next) else { return };
        let time_filter = filter.get_untracked();
        let page_size = pager.with_untracked(|p| p.page_size);
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            match fetch_content_page(&backend, time_filter, ticket.page, page_size).await {
                Ok(rows) => {
                    pager.try_update(|p| p.apply_page(ticket, rows));
                }
                Err(e) => {
                    log::error!("content: page {} failed: {e}", ticket.page);
                    pager.try_update(|p| p.fail(ticket));
                    notify(toasts, Notice::error("Error", e.user_message()));
                }
            }
        });
    };

    Effect::new(move || {
        let current = filter.get();
        save_json(CONTENT_FILTER_KEY, &current.as_str());
        pager.update(Pager::reset);
        load_next();
    });

    install_near_bottom_listener(load_next);

    let on_delete = move |_| {
        let Some(row) = selected.get_untracked() else { return };
        if deleting.get_untracked() {
            return;
        }
        deleting.set(true);
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            match with_timeout(delete_prompt(&backend, row.id), ADMIN_MUTATION_TIMEOUT_MS).await {
                Ok(()) => {
                    pager.try_update(|p| p.items.retain(|item| item.id != row.id));
                    cache.try_update(|c| c.invalidate_prefix(&[PROMPTS_KEY.to_owned()]));
                    notify(toasts, Notice::info("Deleted", "Content removed successfully."));
                }
                Err(e) => {
                    log::error!("content: delete of {} failed: {e}", row.id);
                    notify(toasts, Notice::error("Delete failed", e.user_message()));
                }
            }
            deleting.try_set(false);
            selected.try_set(None);
        });
    };

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Content"</h1>
                <select
                    prop:value=move || filter.get().as_str()
                    on:change=move |ev| {
                        if let Some(next) = TimeFilter::parse(&event_target_value(&ev)) {
                            filter.set(next);
                        }
                    }
                >
                    {TimeFilter::ALL
                        .iter()
                        .map(|f| view! { <option value=f.as_str()>{f.label()}</option> })
                        .collect_view()}
                </select>
            </header>
            <div class="content-grid">
                <For
                    each=move || pager.with(|p| p.items.clone())
                    key=|row| row.id
                    children=move |row| {
                        let image = stored_backend.with_value(|b| resolve_image_url(b, row.primary_image_url.as_deref()));
                        let target = row.clone();
                        view! {
                            <figure class="content-card">
                                <img src=image alt=row.title.clone() loading="lazy"/>
                                <figcaption>
                                    <strong>{row.title}</strong>
                                    <span class="muted">{short_date(row.created_at)}</span>
                                </figcaption>
                                <button
                                    class="button button--destructive"
                                    on:click=move |_| selected.set(Some(target.clone()))
                                >
                                    "Delete"
                                </button>
                            </figure>
                        }
                    }
                />
            </div>
            <Show when=move || pager.with(|p| p.loading)>
                <p class="muted">"Loading more..."</p>
            </Show>
            <Show when=move || pager.with(|p| !p.loading && p.items.is_empty())>
                <p class="muted">"No content for this period."</p>
            </Show>
            <Show when=move || selected.with(Option::is_some)>
                <div class="modal" role="dialog">
                    <div class="modal__card">
                        <h2>"Delete prompt?"</h2>
                        <p>
                            {move || selected.with(|s| s.as_ref().map(|r| r.title.clone()).unwrap_or_default())}
                        </p>
                        <p class="muted">"This cannot be undone."</p>
                        <div class="modal__actions">
                            <button class="button button--ghost" on:click=move |_| selected.set(None)>
                                "Cancel"
                            </button>
                            <button
                                class="button button--destructive"
                                on:click=on_delete
                                disabled=move || deleting.get()
                            >
                                {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
