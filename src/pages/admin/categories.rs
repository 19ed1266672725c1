//! Admin category management.

use backend::Backend;
use leptos::prelude::*;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::pages::admin::Mutation;
use crate::pages::{Load, Spinner, load_into};
use crate::services::categories::{
    CategoryForm, CategoryWithCount, create_category, delete_category, list_categories_with_counts, update_category,
};
use crate::state::toast::{Notice, ToastState};

/// Which row the form is editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Editing {
    Closed,
    New,
    Existing(Uuid),
}

#[component]
pub fn CategoryManagementPage() -> impl IntoView {
    let mutation = Mutation::new(expect_context::<Backend>(), expect_context::<RwSignal<ToastState>>());
    let busy = mutation.busy;

    let rows = RwSignal::new(Load::<Vec<CategoryWithCount>>::Pending);
    let reload = RwSignal::new(0_u32);
    let editing = RwSignal::new(Editing::Closed);
    let form = RwSignal::new(CategoryForm::default());

    Effect::new(move || {
        reload.track();
        let backend = mutation.backend.get_value();
        load_into(rows, "category management", async move { list_categories_with_counts(&backend).await });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let values = form.get_untracked();
        match editing.get_untracked() {
            Editing::Closed => {}
            Editing::New => mutation.run(
                move |backend| async move { create_category(&backend, &values).await },
                move |result| settle(result, &CREATED, editing, reload),
            ),
            Editing::Existing(id) => mutation.run(
                move |backend| async move { update_category(&backend, id, &values).await },
                move |result| settle(result, &UPDATED, editing, reload),
            ),
        }
    };

    let on_delete = move |id: Uuid| {
        mutation.run(
            move |backend| async move { delete_category(&backend, id).await },
            move |result| settle(result, &DELETED, editing, reload),
        );
    };

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Category Management"</h1>
                <button
                    class="button"
                    on:click=move |_| {
                        form.set(CategoryForm::default());
                        editing.set(Editing::New);
                    }
                >
                    "Add Category"
                </button>
            </header>
            <Show when=move || editing.get() != Editing::Closed>
                <form class="admin-form" on:submit=on_submit>
                    <h2>{move || if editing.get() == Editing::New { "New Category" } else { "Edit Category" }}</h2>
                    <label class="field">
                        <span>"Name *"</span>
                        <input
                            type="text"
                            required=true
                            prop:value=move || form.with(|f| f.name.clone())
                            on:input=move |ev| form.update(|f| f.set_name(&event_target_value(&ev)))
                        />
                    </label>
                    <label class="field">
                        <span>"Slug *"</span>
                        <input
                            type="text"
                            required=true
                            prop:value=move || form.with(|f| f.slug.clone())
                            on:input=move |ev| form.update(|f| f.slug = event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Description"</span>
                        <textarea
                            rows="3"
                            prop:value=move || form.with(|f| f.description.clone())
                            on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                        ></textarea>
                    </label>
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
                Load::Pending => view! { <Spinner caption="Loading categories..."/> }.into_any(),
                Load::Failed(message) => view! { <p class="page-error">{message}</p> }.into_any(),
                Load::Ready(list) => view! {
                    <table class="admin-table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Slug"</th>
                                <th>"Prompts"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list
                                .into_iter()
                                .map(|row| {
                                    let id = row.category.id;
                                    let edit_values = CategoryForm::from_category(&row.category);
                                    view! {
                                        <tr>
                                            <td>{row.category.name}</td>
                                            <td class="muted">{row.category.slug}</td>
                                            <td>{row.prompt_count}</td>
                                            <td class="admin-table__actions">
                                                <button
                                                    class="button button--ghost"
                                                    on:click=move |_| {
                                                        form.set(edit_values.clone());
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
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                .into_any(),
            }}
        </div>
    }
}

/// Toast text for one kind of write.
struct WriteCopy {
    done: &'static str,
    detail: &'static str,
    failed: &'static str,
}

const CREATED: WriteCopy = WriteCopy {
    done: "Category created!",
    detail: "The category has been successfully added.",
    failed: "Creation failed",
};
const UPDATED: WriteCopy = WriteCopy {
    done: "Category updated!",
    detail: "The category has been successfully updated.",
    failed: "Update failed",
};
const DELETED: WriteCopy = WriteCopy {
    done: "Category deleted!",
    detail: "The category has been successfully removed.",
    failed: "Deletion failed",
};

/// Close the form and reload the list after a successful write.
fn settle(
    result: &Result<(), ServiceError>,
    copy: &WriteCopy,
    editing: RwSignal<Editing>,
    reload: RwSignal<u32>,
) -> Notice {
    match result {
        Ok(()) => {
            editing.try_set(Editing::Closed);
            reload.try_update(|n| *n += 1);
            Notice::info(copy.done, copy.detail)
        }
        Err(e) => Notice::error(copy.failed, e.user_message()),
    }
}
