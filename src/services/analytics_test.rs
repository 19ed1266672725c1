use std::sync::Arc;

use backend::Method;
use backend::testing::{self, MockTransport};
use uuid::Uuid;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

fn script_overview(mock: &MockTransport) {
    mock.on(Method::Get, "/rest/v1/prompts", testing::count(12));
    mock.on(Method::Get, "/rest/v1/categories", testing::count(3));
    mock.on(Method::Get, "/rest/v1/user_profiles", testing::count(5));
    mock.on(Method::Get, "interaction_type=eq.view", testing::count(30));
    mock.on(Method::Get, "interaction_type=eq.copy", testing::count(7));
    mock.on(Method::Get, "interaction_type=eq.favorite", testing::count(4));
}

// =============================================================
// Averages
// =============================================================

#[test]
fn averages_round_half_up() {
    let overview = Overview { total_prompts: 4, total_views: 10, total_copies: 5, ..Overview::default() };
    assert_eq!(overview.avg_views_per_prompt(), 3);
    assert_eq!(overview.avg_copies_per_prompt(), 1);
}

#[test]
fn averages_without_prompts_are_zero() {
    let overview = Overview { total_views: 10, ..Overview::default() };
    assert_eq!(overview.avg_views_per_prompt(), 0);
}

// =============================================================
// Daily buckets
// =============================================================

#[test]
fn window_covers_seven_days_oldest_first() {
    let days = window_days(testing::NOW_MS);
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], date(2024, 2, 28));
    assert_eq!(days[1], date(2024, 2, 29));
    assert_eq!(days[6], date(2024, 3, 5));
}

#[test]
fn day_bounds_span_one_utc_day() {
    let (from, until) = day_bounds(date(2024, 2, 29));
    assert_eq!(from, "2024-02-29T00:00:00.000Z");
    assert_eq!(until, "2024-03-01T00:00:00.000Z");
}

// =============================================================
// Queries
// =============================================================

#[tokio::test]
async fn overview_uses_exact_counts() {
    let mock = Arc::new(MockTransport::new());
    script_overview(&mock);
    let backend = testing::backend(mock.clone());

    let overview = fetch_overview(&backend).await.expect("overview");

    assert_eq!(
        overview,
        Overview {
            total_prompts: 12,
            total_categories: 3,
            total_users: 5,
            total_views: 30,
            total_copies: 7,
            total_favorites: 4,
        }
    );
    assert_eq!(overview.avg_views_per_prompt(), 3);
    assert!(mock.requests().iter().all(|r| r.header_value("Prefer") == Some("count=exact")));
}

#[tokio::test]
async fn daily_stats_count_each_day_and_type() {
    let mock = Arc::new(MockTransport::new());
    for day in window_days(testing::NOW_MS) {
        let (views, copies, favorites) = if day == date(2024, 3, 5) { (2500, 40, 3) } else { (1, 0, 0) };
        mock.on(Method::Get, &format!("interaction_type=eq.view&created_at=gte.{day}"), testing::count(views));
        mock.on(Method::Get, &format!("interaction_type=eq.copy&created_at=gte.{day}"), testing::count(copies));
        mock.on(Method::Get, &format!("interaction_type=eq.favorite&created_at=gte.{day}"), testing::count(favorites));
    }
    let backend = testing::backend(mock.clone());

    let days = fetch_daily_stats(&backend).await.expect("daily");

    assert_eq!(days.len(), 7);
    assert_eq!(days[6], DailyStat { date: date(2024, 3, 5), views: 2500, copies: 40, favorites: 3 });
    assert_eq!(days[0].total(), 1);

    let requests = mock.requests();
    assert_eq!(requests.len(), 21);
    assert!(requests.iter().all(|r| r.header_value("Prefer") == Some("count=exact")));
    let today = mock.requests_to("interaction_type=eq.view&created_at=gte.2024-03-05");
    assert_eq!(
        testing::query_param(&today[0], "created_at"),
        ["gte.2024-03-05T00:00:00.000Z", "lt.2024-03-06T00:00:00.000Z"]
    );
}

#[tokio::test]
async fn daily_stats_fail_when_a_count_fails() {
    let mock = Arc::new(MockTransport::new());
    mock.on(Method::Get, "created_at=gte.2024-03-01", testing::status_json(500, &serde_json::json!({ "message": "boom" })));
    for _ in 0..21 {
        mock.push(testing::count(0));
    }
    let backend = testing::backend(mock);

    assert!(fetch_daily_stats(&backend).await.is_err());
}

#[tokio::test]
async fn top_prompts_are_ranked_by_views() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([
        { "id": Uuid::from_u128(1), "title": "Neon", "view_count": 40, "copy_count": 2, "categories": { "name": "Art" } }
    ])));
    let backend = testing::backend(mock.clone());

    let top = fetch_top_prompts(&backend).await.expect("top");

    assert_eq!(top[0].category.as_ref().map(|c| c.name.as_str()), Some("Art"));
    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "order"), ["view_count.desc"]);
    assert_eq!(testing::query_param(&request, "limit"), ["10"]);
}

#[tokio::test]
async fn dashboard_fails_when_any_part_fails() {
    let mock = Arc::new(MockTransport::new());
    script_overview(&mock);
    mock.on(Method::Get, "/rest/v1/prompts", testing::status_json(500, &serde_json::json!({ "message": "boom" })));
    mock.on(Method::Get, "/rest/v1/categories", testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock);

    assert!(fetch_dashboard(&backend).await.is_err());
}
