use std::sync::Arc;

use backend::Method;
use backend::testing::{self, MockTransport};

use super::*;

fn prompt_row(n: u128, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": Uuid::from_u128(n),
        "title": title,
        "prompt_text": format!("{title} text"),
        "media_type": "image",
        "categories": { "id": Uuid::from_u128(100), "name": "Cities", "slug": "cities" }
    })
}

// =============================================================
// Browse lists
// =============================================================

#[tokio::test]
async fn page_query_applies_filters_search_and_range() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());
    let filters = ExploreFilters {
        search: "neon".to_owned(),
        category: Some(Uuid::from_u128(100)),
        media_type: Some(MediaType::Video),
        difficulty: Some(DifficultyLevel::Advanced),
    };

    let cards = fetch_prompt_page(&backend, &filters, 2, 24, None).await.expect("page");

    assert!(cards.is_empty());
    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "select"), ["*,categories(id,name,slug)"]);
    assert_eq!(testing::query_param(&request, "category_id"), [format!("eq.{}", Uuid::from_u128(100))]);
    assert_eq!(testing::query_param(&request, "media_type"), ["eq.video"]);
    assert_eq!(testing::query_param(&request, "difficulty_level"), ["eq.advanced"]);
    assert_eq!(testing::query_param(&request, "or"), ["(title.ilike.*neon*,prompt_text.ilike.*neon*)"]);
    assert_eq!(testing::query_param(&request, "order"), ["created_at.desc"]);
    assert_eq!(testing::query_param(&request, "offset"), ["48"]);
    assert_eq!(testing::query_param(&request, "limit"), ["24"]);
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn signed_in_page_marks_favorites_with_one_lookup() {
    let mock = Arc::new(MockTransport::new());
    mock.on(
        Method::Get,
        "/rest/v1/prompts",
        testing::ok_json(&serde_json::json!([prompt_row(1, "One"), prompt_row(2, "Two")])),
    );
    mock.on(
        Method::Get,
        "/rest/v1/user_interactions",
        testing::ok_json(&serde_json::json!([{ "prompt_id": Uuid::from_u128(2) }])),
    );
    let backend = testing::backend(mock.clone());
    let user = Uuid::from_u128(7);

    let cards = fetch_prompt_page(&backend, &ExploreFilters::default(), 0, 24, Some(user)).await.expect("page");

    let flags: Vec<_> = cards.iter().map(|c| (c.prompt.title.as_str(), c.is_favorited)).collect();
    assert_eq!(flags, [("One", false), ("Two", true)]);
    assert_eq!(cards[0].category.as_ref().map(|c| c.slug.as_str()), Some("cities"));

    let lookup = &mock.requests_to("user_interactions")[0];
    assert_eq!(testing::query_param(lookup, "interaction_type"), ["eq.favorite"]);
    assert_eq!(testing::query_param(lookup, "user_id"), [format!("eq.{user}")]);
    assert_eq!(
        testing::query_param(lookup, "prompt_id"),
        [format!("in.({},{})", Uuid::from_u128(1), Uuid::from_u128(2))]
    );
}

#[tokio::test]
async fn failed_favorite_lookup_keeps_the_page() {
    let mock = Arc::new(MockTransport::new());
    mock.on(Method::Get, "/rest/v1/prompts", testing::ok_json(&serde_json::json!([prompt_row(1, "One")])));
    mock.on(
        Method::Get,
        "/rest/v1/user_interactions",
        testing::status_json(500, &serde_json::json!({ "message": "boom" })),
    );
    let backend = testing::backend(mock);

    let cards = fetch_prompt_range(&backend, &ExploreFilters::default(), 0, 23, Some(Uuid::from_u128(7)))
        .await
        .expect("page");
    assert_eq!(cards.len(), 1);
    assert!(!cards[0].is_favorited);
}

#[test]
fn list_key_separates_filters_and_users() {
    let base = ExploreFilters::default();
    let searched = ExploreFilters { search: " neon ".to_owned(), ..ExploreFilters::default() };
    assert_ne!(list_key(&base, None), list_key(&searched, None));
    assert_ne!(list_key(&base, None), list_key(&base, Some(Uuid::from_u128(1))));
    assert_eq!(list_key(&searched, None)[4], "neon");
    assert_eq!(list_key(&base, None)[0], PROMPTS_KEY);
}

#[tokio::test]
async fn detail_embeds_category_description() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&prompt_row(5, "Five")));
    let backend = testing::backend(mock.clone());

    let prompt = fetch_prompt(&backend, Uuid::from_u128(5)).await.expect("prompt");

    assert_eq!(prompt.prompt.title, "Five");
    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "select"), ["*,categories(id,name,slug,description)"]);
    assert_eq!(request.header_value("Accept"), Some("application/vnd.pgrst.object+json"));
}

#[tokio::test]
async fn missing_prompt_is_no_rows() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::no_rows());
    let backend = testing::backend(mock);

    let err = fetch_prompt(&backend, Uuid::from_u128(5)).await.expect_err("missing");
    assert!(matches!(err, ServiceError::Backend(e) if e.is_no_rows()));
}

// =============================================================
// Admin content
// =============================================================

#[test]
fn time_filter_windows() {
    let now = 10 * 24 * 60 * 60 * 1000;
    assert_eq!(TimeFilter::All.since(now), None);
    assert_eq!(TimeFilter::Day.since(now), Some(now - 86_400_000));
    assert_eq!(TimeFilter::Week.since(now), Some(now - 7 * 86_400_000));
    assert_eq!(TimeFilter::parse("30d"), Some(TimeFilter::Month));
    assert_eq!(TimeFilter::parse("1y"), None);
}

#[tokio::test]
async fn content_page_filters_by_creation_time() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());

    fetch_content_page(&backend, TimeFilter::Day, 1, 24).await.expect("page");

    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "select"), ["id,title,primary_image_url,created_at"]);
    assert_eq!(testing::query_param(&request, "offset"), ["24"]);
    assert_eq!(
        testing::query_param(&request, "created_at"),
        [format!("gte.{}", clock::iso_utc(testing::NOW_MS - 86_400_000))]
    );
}

#[tokio::test]
async fn unfiltered_content_page_has_no_time_bound() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());

    fetch_content_page(&backend, TimeFilter::All, 0, 24).await.expect("page");

    let request = mock.last_request().expect("request");
    assert!(testing::query_param(&request, "created_at").is_empty());
}

// =============================================================
// Writes
// =============================================================

fn valid_draft() -> PromptDraft {
    PromptDraft {
        title: " Neon city ".to_owned(),
        prompt_text: "A neon city".to_owned(),
        image_url: Some("https://cdn.example/neon.png".to_owned()),
        ..PromptDraft::new()
    }
}

#[test]
fn draft_validation_names_first_missing_field() {
    let mut draft = valid_draft();
    assert!(draft.validate().is_ok());

    draft.image_url = Some("  ".to_owned());
    assert_eq!(draft.validate(), Err(ServiceError::Validation("Please upload an image first.".to_owned())));

    draft.title = String::new();
    assert_eq!(draft.validate(), Err(ServiceError::Validation("Title is required.".to_owned())));
}

#[tokio::test]
async fn create_sends_author_and_omits_missing_category() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(201));
    let backend = testing::backend(mock.clone());
    let author = Uuid::from_u128(3);

    create_prompt(&backend, valid_draft(), author).await.expect("create");

    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Post);
    let body = testing::json_body(&request);
    assert_eq!(body["title"], "Neon city");
    assert_eq!(body["created_by"], author.to_string());
    assert_eq!(body["difficulty_level"], "beginner");
    assert_eq!(body["primary_image_url"], "https://cdn.example/neon.png");
    assert!(body.get("category_id").is_none());
}

#[tokio::test]
async fn invalid_draft_makes_no_request() {
    let mock = Arc::new(MockTransport::new());
    let backend = testing::backend(mock.clone());

    let err = create_prompt(&backend, PromptDraft::new(), Uuid::from_u128(3)).await.expect_err("invalid");

    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn delete_filters_by_id() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(204));
    let backend = testing::backend(mock.clone());
    let id = Uuid::from_u128(11);

    delete_prompt(&backend, id).await.expect("delete");

    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Delete);
    assert_eq!(testing::query_param(&request, "id"), [format!("eq.{id}")]);
}

// =============================================================
// Tags
// =============================================================

#[test]
fn parse_tags_trims_and_dedupes() {
    assert_eq!(parse_tags("neon, noir,,neon ,  "), ["neon", "noir"]);
    assert!(parse_tags("").is_empty());
}

#[test]
fn add_tag_rejects_blank_and_repeat() {
    let mut tags = vec!["neon".to_owned()];
    assert!(!add_tag(&mut tags, " neon "));
    assert!(!add_tag(&mut tags, "   "));
    assert!(add_tag(&mut tags, "noir"));
    assert_eq!(tags, ["neon", "noir"]);
}
