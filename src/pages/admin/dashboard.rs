//! Admin landing: headline totals, newest prompts and quick actions.

use backend::Backend;
use leptos::prelude::*;

use crate::pages::admin::{StatCard, short_date};
use crate::pages::{Load, Spinner, load_into};
use crate::services::analytics::{DashboardSummary, fetch_dashboard};

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let summary = RwSignal::new(Load::<DashboardSummary>::Pending);

    load_into(summary, "admin dashboard", async move { fetch_dashboard(&backend).await });

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Admin Dashboard"</h1>
                <div class="admin-page__actions">
                    <a class="button" href="/admin/upload">
                        "Upload Prompt"
                    </a>
                    <a class="button button--ghost" href="/admin/categories">
                        "Manage Categories"
                    </a>
                    <a class="button button--ghost" href="/admin/analytics">
                        "View Analytics"
                    </a>
                </div>
            </header>
            {move || match summary.get() {
                Load::Pending => view! { <Spinner/> }.into_any(),
                Load::Failed(message) => view! { <p class="page-error">{message}</p> }.into_any(),
                Load::Ready(summary) => {
                    let overview = summary.overview;
                    view! {
                        <div class="stat-grid">
                            <StatCard label="Total Prompts" value=overview.total_prompts.to_string()/>
                            <StatCard label="Categories" value=overview.total_categories.to_string()/>
                            <StatCard label="Users" value=overview.total_users.to_string()/>
                            <StatCard label="Total Views" value=overview.total_views.to_string()/>
                        </div>
                        <section class="admin-panel">
                            <h2>"Recent Prompts"</h2>
                            {if summary.recent_prompts.is_empty() {
                                view! { <p class="muted">"No prompts yet."</p> }.into_any()
                            } else {
                                view! {
                                    <ul class="admin-list">
                                        {summary
                                            .recent_prompts
                                            .into_iter()
                                            .map(|p| {
                                                view! {
                                                    <li>
                                                        <a href=format!("/prompt/{}", p.id)>{p.title}</a>
                                                        <span class="muted">
                                                            {p.category.map(|c| c.name).unwrap_or_default()}
                                                        </span>
                                                        <span class="muted">{short_date(p.created_at)}</span>
                                                    </li>
                                                }
                                            })
                                            .collect_view()}
                                    </ul>
                                }
                                .into_any()
                            }}
                        </section>
                        <section class="admin-panel">
                            <h2>"Categories"</h2>
                            <ul class="admin-list">
                                {summary
                                    .categories
                                    .into_iter()
                                    .map(|c| view! { <li>{c.name}</li> })
                                    .collect_view()}
                            </ul>
                        </section>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
