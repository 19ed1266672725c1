//! Category index with prompt counts; each card opens a filtered explore.

use backend::Backend;
use leptos::prelude::*;

use crate::pages::{Load, Spinner, load_into};
use crate::services::categories::{CategoryWithCount, list_categories_with_counts};
use crate::services::images::resolve_image_url;

#[component]
pub fn CategoriesPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let rows = RwSignal::new(Load::<Vec<CategoryWithCount>>::Pending);

    {
        let backend = backend.clone();
        load_into(rows, "categories page", async move { list_categories_with_counts(&backend).await });
    }

    view! {
        <div class="categories-page">
            <h1>"Categories"</h1>
            {move || match rows.get() {
                Load::Pending => view! { <Spinner caption="Loading categories..."/> }.into_any(),
                Load::Failed(message) => view! { <p class="page-error">{message}</p> }.into_any(),
                Load::Ready(list) if list.is_empty() => view! {
                    <div class="page-state">
                        <p>"No categories yet"</p>
                    </div>
                }
                .into_any(),
                Load::Ready(list) => view! {
                    <div class="category-grid">
                        {list
                            .into_iter()
                            .map(|row| {
                                let cover = resolve_image_url(&backend, row.category.cover_image_url.as_deref());
                                view! {
                                    <a class="category-card" href=format!("/explore?category={}", row.category.id)>
                                        <img src=cover alt=row.category.name.clone() loading="lazy"/>
                                        <h3>{row.category.name}</h3>
                                        {row.category.description.map(|d| view! { <p class="muted">{d}</p> })}
                                        <span class="category-card__count">
                                            {row.prompt_count} {if row.prompt_count == 1 { " prompt" } else { " prompts" }}
                                        </span>
                                    </a>
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
