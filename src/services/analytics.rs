//! Admin dashboard and analytics reads.
//!
//! DESIGN
//! ======
//! Totals come from exact-count queries (one per table and one per
//! interaction type) run concurrently, so no interaction rows are shipped
//! to the browser just to be counted. Daily stats work the same way, one
//! count per day and type over the last seven days.

#[cfg(test)]
#[path = "analytics_test.rs"]
mod analytics_test;

use backend::clock;
use backend::schema::{self, ActivityRow, Category, InteractionType, RankedPrompt};
use backend::{Backend, Direction, Select};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta};

use crate::error::ServiceError;
use crate::services::categories::{self, CategoryWithCount};

pub const TOP_PROMPTS: usize = 10;
pub const RECENT_ACTIVITY: usize = 20;
pub const DAILY_WINDOW_DAYS: u64 = 7;
pub const DASHBOARD_RECENT: usize = 5;

const RANKED_COLUMNS: &str = "id, title, view_count, copy_count, created_at, categories(name)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overview {
    pub total_prompts: u64,
    pub total_categories: u64,
    pub total_users: u64,
    pub total_views: u64,
    pub total_copies: u64,
    pub total_favorites: u64,
}

impl Overview {
    #[must_use]
    pub fn avg_views_per_prompt(&self) -> u64 {
        rounded_ratio(self.total_views, self.total_prompts)
    }

    #[must_use]
    pub fn avg_copies_per_prompt(&self) -> u64 {
        rounded_ratio(self.total_copies, self.total_prompts)
    }
}

/// `numerator / denominator` rounded half up; zero when nothing to divide by.
fn rounded_ratio(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator * 2 + denominator) / (denominator * 2)
}

/// Interaction totals for one UTC day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub views: u64,
    pub copies: u64,
    pub favorites: u64,
}

impl DailyStat {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.views + self.copies + self.favorites
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsReport {
    pub overview: Overview,
    pub top_prompts: Vec<RankedPrompt>,
    pub categories: Vec<CategoryWithCount>,
    pub recent_activity: Vec<ActivityRow>,
    pub daily: Vec<DailyStat>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub overview: Overview,
    pub recent_prompts: Vec<RankedPrompt>,
    pub categories: Vec<Category>,
}

// =============================================================================
// QUERIES
// =============================================================================

fn interactions_of(kind: InteractionType) -> Select {
    Select::new(schema::USER_INTERACTIONS).eq("interaction_type", kind)
}

/// Exact totals for the overview cards.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn fetch_overview(backend: &Backend) -> Result<Overview, ServiceError> {
    let prompts = Select::new(schema::PROMPTS);
    let categories = Select::new(schema::CATEGORIES);
    let users = Select::new(schema::USER_PROFILES);
    let views = interactions_of(InteractionType::View);
    let copies = interactions_of(InteractionType::Copy);
    let favorites = interactions_of(InteractionType::Favorite);
    let (total_prompts, total_categories, total_users, total_views, total_copies, total_favorites) = futures::try_join!(
        backend.count(&prompts),
        backend.count(&categories),
        backend.count(&users),
        backend.count(&views),
        backend.count(&copies),
        backend.count(&favorites),
    )?;
    Ok(Overview { total_prompts, total_categories, total_users, total_views, total_copies, total_favorites })
}

/// The most viewed prompts.
///
/// # Errors
///
/// Returns the backend error.
pub async fn fetch_top_prompts(backend: &Backend) -> Result<Vec<RankedPrompt>, ServiceError> {
    let select = Select::new(schema::PROMPTS)
        .columns(RANKED_COLUMNS)
        .order("view_count", Direction::Desc)
        .limit(TOP_PROMPTS);
    Ok(backend.fetch(&select).await?)
}

/// Latest interactions with the prompt title.
///
/// # Errors
///
/// Returns the backend error.
pub async fn fetch_recent_activity(backend: &Backend) -> Result<Vec<ActivityRow>, ServiceError> {
    let select = Select::new(schema::USER_INTERACTIONS)
        .columns("id, interaction_type, created_at, prompts(title)")
        .order("created_at", Direction::Desc)
        .limit(RECENT_ACTIVITY);
    Ok(backend.fetch(&select).await?)
}

/// UTC dates of the daily window ending on `now_ms`'s date, oldest first.
#[must_use]
pub fn window_days(now_ms: i64) -> Vec<NaiveDate> {
    let today = DateTime::from_timestamp_millis(now_ms).unwrap_or_default().date_naive();
    let start = today.checked_sub_days(Days::new(DAILY_WINDOW_DAYS - 1)).unwrap_or(today);
    start.iter_days().take_while(|day| *day <= today).collect()
}

fn day_bounds(date: NaiveDate) -> (String, String) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = start + TimeDelta::days(1);
    (clock::iso_utc(start.timestamp_millis()), clock::iso_utc(end.timestamp_millis()))
}

/// Exact interaction totals for one UTC day.
async fn fetch_day(backend: &Backend, date: NaiveDate) -> Result<DailyStat, ServiceError> {
    let (from, until) = day_bounds(date);
    let within = |kind| interactions_of(kind).gte("created_at", &from).lt("created_at", &until);
    let (views, copies, favorites) = (
        within(InteractionType::View),
        within(InteractionType::Copy),
        within(InteractionType::Favorite),
    );
    let (views, copies, favorites) =
        futures::try_join!(backend.count(&views), backend.count(&copies), backend.count(&favorites))?;
    Ok(DailyStat { date, views, copies, favorites })
}

/// Seven days of interaction totals ending today (UTC).
///
/// Each day and type is an exact count, so busy days are never cut short
/// by the backend's per-response row cap.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn fetch_daily_stats(backend: &Backend) -> Result<Vec<DailyStat>, ServiceError> {
    let days = window_days(backend.now_ms());
    futures::future::try_join_all(days.into_iter().map(|date| fetch_day(backend, date))).await
}

/// Everything the analytics page shows.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn fetch_analytics(backend: &Backend) -> Result<AnalyticsReport, ServiceError> {
    let (overview, top_prompts, categories, recent_activity, daily) = futures::try_join!(
        fetch_overview(backend),
        fetch_top_prompts(backend),
        categories::list_categories_with_counts(backend),
        fetch_recent_activity(backend),
        fetch_daily_stats(backend),
    )?;
    log::debug!(
        "analytics: {} prompts, {} recent interactions",
        overview.total_prompts,
        recent_activity.len()
    );
    Ok(AnalyticsReport { overview, top_prompts, categories, recent_activity, daily })
}

/// Overview plus short lists for the admin landing page.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn fetch_dashboard(backend: &Backend) -> Result<DashboardSummary, ServiceError> {
    let recent = Select::new(schema::PROMPTS)
        .columns(RANKED_COLUMNS)
        .order("created_at", Direction::Desc)
        .limit(DASHBOARD_RECENT);
    let categories = Select::new(schema::CATEGORIES).order("name", Direction::Asc).limit(DASHBOARD_RECENT);
    let (overview, recent_prompts, categories) = futures::try_join!(
        fetch_overview(backend),
        async { Ok::<_, ServiceError>(backend.fetch(&recent).await?) },
        async { Ok::<_, ServiceError>(backend.fetch(&categories).await?) },
    )?;
    Ok(DashboardSummary { overview, recent_prompts, categories })
}
