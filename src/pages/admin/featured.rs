//! Featured collection management for the explore banner.

use backend::Backend;
use backend::schema::{Category, FeaturedCollection, FeaturedCollectionInput};
use leptos::prelude::*;
use uuid::Uuid;

use crate::components::image_upload::ImageUpload;
use crate::error::ServiceError;
use crate::pages::admin::Mutation;
use crate::pages::{Load, Spinner, load_into};
use crate::services::featured::{
    BADGE_COLORS, create_featured, delete_featured, form_from, list_featured, prepare, set_active, update_featured,
};
use crate::state::toast::{Notice, ToastState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Editing {
    Closed,
    New,
    Existing(Uuid),
}

/// Destructive toast for a failed write; timeouts get their own title.
fn failure_notice(error: &ServiceError, fallback: &str) -> Notice {
    match error {
        ServiceError::TimedOut => Notice::error("Timeout", error.user_message()),
        ServiceError::Backend(_) | ServiceError::Validation(_) | ServiceError::Rejected(_) => {
            Notice::error("Error", error.user_message())
        }
        _ => Notice::error("Error", fallback),
    }
}

#[component]
pub fn FeaturedCollectionsPage() -> impl IntoView {
    let mutation = Mutation::new(expect_context::<Backend>(), expect_context::<RwSignal<ToastState>>());
    let busy = mutation.busy;

    let rows = RwSignal::new(Load::<Vec<FeaturedCollection>>::Pending);
    let categories = RwSignal::new(Vec::<Category>::new());
    let reload = RwSignal::new(0_u32);
    let editing = RwSignal::new(Editing::Closed);
    let form = RwSignal::new(FeaturedCollectionInput::default());

    Effect::new(move || {
        reload.track();
        let backend = mutation.backend.get_value();
        load_into(rows, "featured management", async move { list_featured(&backend).await });
    });

    {
        let backend = mutation.backend.get_value();
        leptos::task::spawn_local(async move {
            match crate::services::categories::list_categories(&backend).await {
                Ok(list) => {
                    categories.try_set(list);
                }
                Err(e) => log::warn!("featured management: categories failed: {e}"),
            }
        });
    }

    let finish = move |result: &Result<(), ServiceError>, done: &'static str, fallback: &'static str| match result {
        Ok(()) => {
            editing.try_set(Editing::Closed);
            reload.try_update(|n| *n += 1);
            Notice::info("Success", done)
        }
        Err(e) => failure_notice(e, fallback),
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let values = form.get_untracked();
        // Report missing fields before starting the timed write.
        if let Err(e) = prepare(&values) {
            crate::components::toaster::notify(mutation.toasts, Notice::error("Error", e.user_message()));
            return;
        }
        match editing.get_untracked() {
            Editing::Closed => {}
            Editing::New => mutation.run(
                move |backend| async move { create_featured(&backend, &values).await },
                move |result| {
                    finish(result, "Featured collection created successfully.", "Failed to create featured collection.")
                },
            ),
            Editing::Existing(id) => mutation.run(
                move |backend| async move { update_featured(&backend, id, &values).await.map(|_| ()) },
                move |result| {
                    finish(result, "Featured collection updated successfully.", "Failed to update featured collection.")
                },
            ),
        }
    };

    let on_delete = move |id: Uuid| {
        #[cfg(feature = "csr")]
        {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Are you sure you want to delete this featured collection?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
        }
        mutation.run(
            move |backend| async move { delete_featured(&backend, id).await },
            move |result| finish(result, "Featured collection deleted successfully.", "Failed to delete featured collection."),
        );
    };

    let on_toggle = move |id: Uuid, active: bool| {
        mutation.run(
            move |backend| async move { set_active(&backend, id, active).await },
            move |result| finish(result, "Featured collection status updated.", "Failed to update status."),
        );
    };

    let on_image = Callback::new(move |url: String| form.update(|f| f.image_url = url));

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Featured Collections"</h1>
                <button
                    class="button"
                    on:click=move |_| {
                        form.set(FeaturedCollectionInput::default());
                        editing.set(Editing::New);
                    }
                >
                    "Add Collection"
                </button>
            </header>
            <Show when=move || editing.get() != Editing::Closed>
                <form class="admin-form" on:submit=on_submit>
                    <h2>{move || if editing.get() == Editing::New { "New Collection" } else { "Edit Collection" }}</h2>
                    <label class="field">
                        <span>"Title *"</span>
                        <input
                            type="text"
                            prop:value=move || form.with(|f| f.title.clone())
                            on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Description"</span>
                        <textarea
                            rows="3"
                            prop:value=move || form.with(|f| f.description.clone().unwrap_or_default())
                            on:input=move |ev| form.update(|f| f.description = Some(event_target_value(&ev)))
                        ></textarea>
                    </label>
                    <ImageUpload
                        on_uploaded=on_image
                        current=Signal::derive(move || Some(form.with(|f| f.image_url.clone())))
                        label="Image *"
                    />
                    <label class="field">
                        <span>"Image URL"</span>
                        <input
                            type="url"
                            prop:value=move || form.with(|f| f.image_url.clone())
                            on:input=move |ev| form.update(|f| f.image_url = event_target_value(&ev))
                        />
                    </label>
                    <div class="field-row">
                        <label class="field">
                            <span>"Redirect Category"</span>
                            <select
                                prop:value=move || {
                                    form.with(|f| f.redirect_category_id.map(|c| c.to_string()).unwrap_or_default())
                                }
                                on:change=move |ev| {
                                    form.update(|f| {
                                        f.redirect_category_id = Uuid::parse_str(&event_target_value(&ev)).ok();
                                    });
                                }
                            >
                                <option value="">"None"</option>
                                <For
                                    each=move || categories.get()
                                    key=|c| c.id
                                    children=move |c| view! { <option value=c.id.to_string()>{c.name}</option> }
                                />
                            </select>
                        </label>
                        <label class="field">
                            <span>"Display Order"</span>
                            <input
                                type="number"
                                prop:value=move || form.with(|f| f.display_order.to_string())
                                on:input=move |ev| {
                                    form.update(|f| f.display_order = event_target_value(&ev).parse().unwrap_or(0));
                                }
                            />
                        </label>
                    </div>
                    <div class="field-row">
                        <label class="field">
                            <span>"Badge Text"</span>
                            <input
                                type="text"
                                prop:value=move || form.with(|f| f.badge_text.clone())
                                on:input=move |ev| form.update(|f| f.badge_text = event_target_value(&ev))
                            />
                        </label>
                        <label class="field">
                            <span>"Badge Color"</span>
                            <select
                                prop:value=move || form.with(|f| f.badge_color.clone())
                                on:change=move |ev| form.update(|f| f.badge_color = event_target_value(&ev))
                            >
                                {BADGE_COLORS.iter().map(|c| view! { <option value=*c>{*c}</option> }).collect_view()}
                            </select>
                        </label>
                        <label class="field field--inline">
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.is_active)
                                on:change=move |ev| form.update(|f| f.is_active = event_target_checked(&ev))
                            />
                            <span>"Active"</span>
                        </label>
                    </div>
                    <div class="admin-form__actions">
                        <button type="button" class="button button--ghost" on:click=move |_| editing.set(Editing::Closed)>
                            "Cancel"
                        </button>
                        <button type="submit" class="button" disabled=move || busy.get()>
                            {move || if busy.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </Show>
            {move || match rows.get() {
                Load::Pending => view! { <Spinner caption="Loading featured collections..."/> }.into_any(),
                Load::Failed(message) => view! { <p class="page-error">{message}</p> }.into_any(),
                Load::Ready(list) if list.is_empty() => view! {
                    <p class="muted">"No featured collections yet."</p>
                }
                .into_any(),
                Load::Ready(list) => view! {
                    <div class="featured-admin-grid">
                        {list
                            .into_iter()
                            .map(|collection| {
                                let id = collection.id;
                                let active = collection.is_active;
                                let values = form_from(&collection);
                                let category = collection.redirect_category.map(|c| c.name);
                                view! {
                                    <article class="featured-admin-card" class:featured-admin-card--inactive=!active>
                                        <img src=collection.image_url alt=collection.title.clone()/>
                                        <span class=format!("badge badge--{}", collection.badge_color)>
                                            {collection.badge_text}
                                        </span>
                                        <h3>{collection.title}</h3>
                                        <p class="muted">
                                            "Order " {collection.display_order}
                                            {category.map(|name| format!(" · opens {name}"))}
                                        </p>
                                        <div class="featured-admin-card__actions">
                                            <button
                                                class="button button--ghost"
                                                disabled=move || busy.get()
                                                on:click=move |_| on_toggle(id, !active)
                                            >
                                                {if active { "Deactivate" } else { "Activate" }}
                                            </button>
                                            <button
                                                class="button button--ghost"
                                                on:click=move |_| {
                                                    form.set(values.clone());
                                                    editing.set(Editing::Existing(id));
                                                }
                                            >
                                                "Edit"
                                            </button>
                                            <button
                                                class="button button--destructive"
                                                disabled=move || busy.get()
                                                on:click=move |_| on_delete(id)
                                            >
                                                "Delete"
                                            </button>
                                        </div>
                                    </article>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
