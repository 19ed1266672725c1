use std::cell::RefCell;
use std::sync::Arc;

use backend::Method;
use backend::schema::{MediaType, Prompt};
use backend::testing::{self, MockTransport};

use super::*;
use crate::config::PROMPT_CACHE_STALE_MS;
use crate::state::cache::query_key;
use crate::state::toast::ToastVariant;

fn card(n: u128, favorited: bool) -> PromptCard {
    PromptCard {
        prompt: Prompt {
            id: Uuid::from_u128(n),
            title: format!("Prompt {n}"),
            prompt_text: String::new(),
            category_id: None,
            media_type: MediaType::Image,
            difficulty_level: None,
            style_tags: None,
            industry_tags: None,
            primary_image_url: None,
            before_image_url: None,
            after_image_url: None,
            view_count: None,
            copy_count: None,
            popularity_score: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        },
        category: None,
        is_favorited: favorited,
    }
}

fn user() -> Uuid {
    Uuid::from_u128(77)
}

fn seeded_cache() -> PromptCache {
    let mut cache = PromptCache::new(60_000);
    cache.insert(query_key(&["prompts", "all"]), vec![card(1, true), card(2, false)], testing::NOW_MS);
    cache.insert(query_key(&["prompts", "video"]), vec![card(1, true)], testing::NOW_MS);
    cache.insert(favorites_key(user()), vec![card(1, true)], testing::NOW_MS);
    cache
}

fn flags(cache: &PromptCache, parts: &[&str]) -> Vec<bool> {
    cache.get(&query_key(parts)).map(|cards| cards.iter().map(|c| c.is_favorited).collect()).unwrap_or_default()
}

// =============================================================
// Favorites list
// =============================================================

#[tokio::test]
async fn favorites_query_embeds_prompts_and_skips_deleted() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([
        { "prompts": { "id": Uuid::from_u128(1), "title": "One", "prompt_text": "t", "media_type": "text", "categories": null } },
        { "prompts": null }
    ])));
    let backend = testing::backend(mock.clone());

    let cards = fetch_favorite_prompts(&backend, user()).await.expect("favorites");

    assert_eq!(cards.len(), 1);
    assert!(cards[0].is_favorited);
    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "select"), ["prompts(*,categories(id,name,slug))"]);
    assert_eq!(testing::query_param(&request, "interaction_type"), ["eq.favorite"]);
}

// =============================================================
// Optimistic patch
// =============================================================

#[test]
fn unfavorite_flips_lists_and_drops_from_favorites() {
    let mut cache = seeded_cache();
    begin_toggle(&mut cache, Uuid::from_u128(1), true);

    assert_eq!(flags(&cache, &["prompts", "all"]), [false, false]);
    assert_eq!(flags(&cache, &["prompts", "video"]), [false]);
    assert!(cache.get(&favorites_key(user())).is_some_and(Vec::is_empty));
}

#[test]
fn favorite_flips_only_the_target() {
    let mut cache = seeded_cache();
    begin_toggle(&mut cache, Uuid::from_u128(2), false);

    assert_eq!(flags(&cache, &["prompts", "all"]), [true, true]);
    assert_eq!(cache.get(&favorites_key(user())).map(Vec::len), Some(1));
}

#[test]
fn failure_restores_snapshot_and_reports_error() {
    let mut cache = seeded_cache();
    let snapshot = begin_toggle(&mut cache, Uuid::from_u128(1), true);

    let notice = finish_toggle(&mut cache, snapshot, &Err(ServiceError::NotSignedIn));

    assert_eq!(notice.variant, ToastVariant::Destructive);
    assert_eq!(notice.description, "Failed to update favorite status.");
    assert_eq!(flags(&cache, &["prompts", "all"]), [true, false]);
    assert_eq!(flags(&cache, &["prompts", "video"]), [true]);
    assert_eq!(cache.get(&favorites_key(user())).map(Vec::len), Some(1));
}

#[test]
fn success_keeps_patch_and_marks_lists_stale() {
    let mut cache = seeded_cache();
    let snapshot = begin_toggle(&mut cache, Uuid::from_u128(2), false);

    let notice = finish_toggle(&mut cache, snapshot, &Ok(()));

    assert_eq!(notice.title, "Added to favorites");
    assert_eq!(flags(&cache, &["prompts", "all"]), [true, true]);
    assert!(!cache.is_fresh(&query_key(&["prompts", "all"]), testing::NOW_MS));
    assert!(!cache.is_fresh(&favorites_key(user()), testing::NOW_MS));
}

#[test]
fn cached_favorites_are_reused_until_stale_or_toggled() {
    let key = favorites_key(user());
    let mut cache = PromptCache::new(PROMPT_CACHE_STALE_MS);
    assert!(needs_fetch(&cache, &key, testing::NOW_MS));

    cache.insert(key.clone(), vec![card(1, true)], testing::NOW_MS);
    assert!(!needs_fetch(&cache, &key, testing::NOW_MS + 1_000));
    assert!(needs_fetch(&cache, &key, testing::NOW_MS + PROMPT_CACHE_STALE_MS));

    let snapshot = begin_toggle(&mut cache, Uuid::from_u128(1), true);
    finish_toggle(&mut cache, snapshot, &Ok(()));
    assert!(needs_fetch(&cache, &key, testing::NOW_MS + 1_000));
}

// =============================================================
// Full toggle
// =============================================================

#[tokio::test]
async fn toggle_off_deletes_interaction() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(204));
    let backend = testing::backend(mock.clone());
    let cache = RefCell::new(seeded_cache());

    let notice = toggle_favorite(&backend, &cache, user(), Uuid::from_u128(1), true).await;

    assert_eq!(notice.title, "Removed from favorites");
    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Delete);
    assert_eq!(testing::query_param(&request, "user_id"), [format!("eq.{}", user())]);
    assert_eq!(testing::query_param(&request, "prompt_id"), [format!("eq.{}", Uuid::from_u128(1))]);
    assert_eq!(testing::query_param(&request, "interaction_type"), ["eq.favorite"]);
    assert_eq!(flags(&cache.borrow(), &["prompts", "all"]), [false, false]);
}

#[tokio::test]
async fn rejected_insert_rolls_back() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::status_json(409, &serde_json::json!({ "code": "23505", "message": "duplicate key" })));
    let backend = testing::backend(mock.clone());
    let cache = RefCell::new(seeded_cache());

    let notice = toggle_favorite(&backend, &cache, user(), Uuid::from_u128(2), false).await;

    assert_eq!(notice.title, "Error");
    assert_eq!(flags(&cache.borrow(), &["prompts", "all"]), [true, false]);
    let body = testing::json_body(&mock.last_request().expect("request"));
    assert_eq!(body["interaction_type"], "favorite");
    assert_eq!(body["user_id"], user().to_string());
}
