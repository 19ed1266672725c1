//! Analytics: totals, rankings, recent activity and a seven-day trend.

use backend::Backend;
use backend::schema::InteractionType;
use leptos::prelude::*;

use crate::pages::admin::{StatCard, short_date};
use crate::pages::{Load, Spinner, load_into};
use crate::services::analytics::{AnalyticsReport, DailyStat, fetch_analytics};

fn interaction_label(kind: InteractionType) -> &'static str {
    match kind {
        InteractionType::View => "viewed",
        InteractionType::Copy => "copied",
        InteractionType::Favorite => "favorited",
    }
}

/// Bar width for `stat` relative to the busiest day, in percent.
fn bar_percent(stat: &DailyStat, busiest: u64) -> u64 {
    if busiest == 0 { 0 } else { stat.total() * 100 / busiest }
}

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let report = RwSignal::new(Load::<AnalyticsReport>::Pending);

    load_into(report, "analytics", async move { fetch_analytics(&backend).await });

    view! {
        <div class="admin-page">
            <header class="admin-page__header">
                <h1>"Analytics"</h1>
            </header>
            {move || match report.get() {
                Load::Pending => view! { <Spinner caption="Loading analytics..."/> }.into_any(),
                Load::Failed(_) => view! {
                    <p class="page-error">"Failed to load analytics data. Please try again."</p>
                }
                .into_any(),
                Load::Ready(report) => {
                    let overview = report.overview;
                    let busiest = report.daily.iter().map(DailyStat::total).max().unwrap_or(0);
                    view! {
                        <div class="stat-grid">
                            <StatCard
                                label="Total Prompts"
                                value=overview.total_prompts.to_string()
                                hint=format!("{} categories", overview.total_categories)
                            />
                            <StatCard
                                label="Total Views"
                                value=overview.total_views.to_string()
                                hint=format!("{} avg per prompt", overview.avg_views_per_prompt())
                            />
                            <StatCard
                                label="Total Copies"
                                value=overview.total_copies.to_string()
                                hint=format!("{} avg per prompt", overview.avg_copies_per_prompt())
                            />
                            <StatCard
                                label="Total Favorites"
                                value=overview.total_favorites.to_string()
                                hint=format!("{} users", overview.total_users)
                            />
                        </div>
                        <section class="admin-panel">
                            <h2>"Top Performing Prompts"</h2>
                            <ol class="admin-list">
                                {report
                                    .top_prompts
                                    .into_iter()
                                    .map(|p| {
                                        view! {
                                            <li>
                                                <a href=format!("/prompt/{}", p.id)>{p.title}</a>
                                                <span class="muted">
                                                    {p.category.map(|c| c.name).unwrap_or_default()}
                                                </span>
                                                <span>
                                                    {p.view_count.unwrap_or(0)} " views · " {p.copy_count.unwrap_or(0)}
                                                    " copies"
                                                </span>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ol>
                        </section>
                        <section class="admin-panel">
                            <h2>"Category Performance"</h2>
                            <ul class="admin-list">
                                {report
                                    .categories
                                    .into_iter()
                                    .map(|c| {
                                        view! {
                                            <li>
                                                <span>{c.category.name}</span>
                                                <span class="muted">{c.prompt_count} " prompts"</span>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        </section>
                        <section class="admin-panel">
                            <h2>"Recent User Activity"</h2>
                            <ul class="admin-list">
                                {report
                                    .recent_activity
                                    .into_iter()
                                    .map(|a| {
                                        let title = a.prompt.map_or_else(|| "a deleted prompt".to_owned(), |p| p.title);
                                        view! {
                                            <li>
                                                <span>"Prompt " {interaction_label(a.interaction_type)} ": " {title}</span>
                                                <span class="muted">{short_date(a.created_at)}</span>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        </section>
                        <section class="admin-panel">
                            <h2>"Daily Activity Trends"</h2>
                            <ul class="daily-chart">
                                {report
                                    .daily
                                    .into_iter()
                                    .map(|day| {
                                        let width = format!("width: {}%", bar_percent(&day, busiest));
                                        view! {
                                            <li class="daily-chart__row">
                                                <span class="daily-chart__date">{day.date.format("%a %b %-d").to_string()}</span>
                                                <span class="daily-chart__bar" style=width></span>
                                                <span class="muted">
                                                    {day.views} " views · " {day.copies} " copies · " {day.favorites}
                                                    " favorites"
                                                </span>
                                            </li>
                                        }
                                    })
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
