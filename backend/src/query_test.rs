use super::*;
use crate::schema::{InteractionType, NewInteraction};

fn config() -> BackendConfig {
    BackendConfig {
        url: "https://abcd.example.co".to_owned(),
        anon_key: "anon".to_owned(),
        image_bucket: "prompt-images".to_owned(),
    }
}

fn pairs(request: &HttpRequest) -> Vec<(String, String)> {
    let url = url::Url::parse(&request.url).expect("absolute url");
    url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect()
}

#[test]
fn quote_value_leaves_plain_values() {
    assert_eq!(quote_value("neon"), "neon");
    assert_eq!(quote_value("*neon*"), "*neon*");
}

#[test]
fn quote_value_wraps_reserved_characters() {
    assert_eq!(quote_value("a,b"), "\"a,b\"");
    assert_eq!(quote_value("say \"hi\""), "\"say \\\"hi\\\"\"");
    assert_eq!(quote_value("back\\slash"), "\"back\\\\slash\"");
}

#[test]
fn content_range_total_reads_exact_count() {
    assert_eq!(content_range_total("0-23/120"), Some(120));
    assert_eq!(content_range_total("*/0"), Some(0));
    assert_eq!(content_range_total("0-23/*"), None);
    assert_eq!(content_range_total("garbage"), None);
}

#[test]
fn select_renders_path_columns_and_filters() {
    let request = Select::new("prompts")
        .columns("*, categories(id, name, slug)")
        .eq("media_type", "image")
        .order("created_at", Direction::Desc)
        .range(24, 47)
        .to_request(&config());

    assert_eq!(request.method, Method::Get);
    assert!(request.url.starts_with("https://abcd.example.co/rest/v1/prompts?"));
    let pairs = pairs(&request);
    assert_eq!(param(&pairs, "select"), vec!["*,categories(id,name,slug)"]);
    assert_eq!(param(&pairs, "media_type"), vec!["eq.image"]);
    assert_eq!(param(&pairs, "order"), vec!["created_at.desc"]);
    assert_eq!(param(&pairs, "offset"), vec!["24"]);
    assert_eq!(param(&pairs, "limit"), vec!["24"]);
    assert!(request.header_value("Accept").is_none());
}

#[test]
fn search_builds_quoted_or_group() {
    let request = Select::new("prompts")
        .or_ilike_any(&["title", "prompt_text"], "  neon city ")
        .to_request(&config());
    let pairs = pairs(&request);
    assert_eq!(
        param(&pairs, "or"),
        vec!["(title.ilike.\"*neon city*\",prompt_text.ilike.\"*neon city*\")"]
    );
}

#[test]
fn blank_search_adds_no_filter() {
    let request = Select::new("prompts").or_ilike_any(&["title"], "   ").to_request(&config());
    assert!(param(&pairs(&request), "or").is_empty());
}

#[test]
fn in_list_quotes_members() {
    let request = Select::new("user_interactions")
        .in_list("prompt_id", ["a", "b,c"])
        .is_null("user_id")
        .to_request(&config());
    let pairs = pairs(&request);
    assert_eq!(param(&pairs, "prompt_id"), vec!["in.(a,\"b,c\")"]);
    assert_eq!(param(&pairs, "user_id"), vec!["is.null"]);
}

#[test]
fn single_requests_object_media_type() {
    let request = Select::new("user_profiles").eq("id", "u1").single().to_request(&config());
    assert_eq!(request.header_value("accept"), Some("application/vnd.pgrst.object+json"));
}

#[test]
fn maybe_single_reads_as_list() {
    let select = Select::new("user_profiles").maybe_single();
    assert_eq!(select.cardinality(), Cardinality::MaybeOne);
    assert!(select.to_request(&config()).header_value("Accept").is_none());
}

#[test]
fn count_only_asks_for_exact_count_without_rows() {
    let request = Select::new("prompts").range(0, 9).count_only().to_request(&config());
    let pairs = pairs(&request);
    assert_eq!(request.header_value("Prefer"), Some("count=exact"));
    assert_eq!(param(&pairs, "limit"), vec!["0"]);
    assert!(param(&pairs, "offset").is_empty());
}

#[test]
fn insert_defaults_to_minimal_return() {
    let row = NewInteraction { user_id: None, prompt_id: uuid::Uuid::nil(), interaction_type: InteractionType::View };
    let request = Insert::new("user_interactions", &row).expect("encode").to_request(&config());
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header_value("Prefer"), Some("return=minimal"));
    let Some(Body::Json(body)) = &request.body else { panic!("expected json body") };
    let value: serde_json::Value = serde_json::from_str(body).expect("json");
    assert_eq!(value["interaction_type"], "view");
    assert!(value.get("user_id").is_none());
}

#[test]
fn upsert_ignoring_duplicates_sets_conflict_target() {
    let row = serde_json::json!({ "user_id": "u", "prompt_id": "p" });
    let request = Insert::new("user_interactions", &row)
        .expect("encode")
        .upsert("user_id, prompt_id, interaction_type", true)
        .returning()
        .to_request(&config());
    assert_eq!(param(&pairs(&request), "on_conflict"), vec!["user_id,prompt_id,interaction_type"]);
    assert_eq!(
        request.header_value("Prefer"),
        Some("return=representation,resolution=ignore-duplicates")
    );
}

#[test]
fn update_and_delete_carry_filters() {
    let update = Update::new("categories", &serde_json::json!({ "name": "New" }))
        .expect("encode")
        .eq("id", "c1")
        .to_request(&config());
    assert_eq!(update.method, Method::Patch);
    assert_eq!(param(&pairs(&update), "id"), vec!["eq.c1"]);

    let delete = Delete::new("user_interactions")
        .eq("user_id", "u1")
        .eq("prompt_id", "p1")
        .eq("interaction_type", "favorite");
    let request = delete.to_request(&config());
    assert_eq!(request.method, Method::Delete);
    assert_eq!(param(&pairs(&request), "interaction_type"), vec!["eq.favorite"]);
}
