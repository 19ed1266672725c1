use std::sync::Arc;

use backend::Method;
use backend::testing::{self, MockTransport};

use super::*;

fn input() -> FeaturedCollectionInput {
    FeaturedCollectionInput {
        title: " Summer ".to_owned(),
        description: Some("   ".to_owned()),
        image_url: "https://cdn.example/summer.png".to_owned(),
        ..FeaturedCollectionInput::default()
    }
}

fn collection_row(id: Uuid) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Summer",
        "description": null,
        "image_url": "https://cdn.example/summer.png",
        "redirect_category_id": null,
        "display_order": 0,
        "is_active": true,
        "badge_text": "Featured",
        "badge_color": "purple",
        "categories": { "name": "Seasons" }
    })
}

#[test]
fn prepare_requires_title_then_image() {
    let mut bad = input();
    bad.image_url = " ".to_owned();
    assert_eq!(prepare(&bad), Err(ServiceError::Validation("Image URL is required.".to_owned())));
    bad.title = String::new();
    assert_eq!(prepare(&bad), Err(ServiceError::Validation("Title is required.".to_owned())));
}

#[test]
fn prepare_trims_and_nulls_blank_description() {
    let row = prepare(&input()).expect("valid");
    assert_eq!(row.title, "Summer");
    assert_eq!(row.description, None);
    assert_eq!(row.badge_text, "Featured");
    assert_eq!(row.badge_color, "purple");
    assert!(row.is_active);
}

#[tokio::test]
async fn list_orders_by_display_order_with_category_name() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([collection_row(Uuid::from_u128(1))])));
    let backend = testing::backend(mock.clone());

    let rows = list_featured(&backend).await.expect("list");

    assert_eq!(rows[0].redirect_category.as_ref().map(|c| c.name.as_str()), Some("Seasons"));
    let request = mock.last_request().expect("request");
    assert_eq!(testing::query_param(&request, "order"), ["display_order.asc"]);
    assert_eq!(
        testing::query_param(&request, "select"),
        ["*,categories:categories!featured_collections_redirect_category_id_fkey(name)"]
    );
}

#[tokio::test]
async fn active_list_filters_hidden_rows() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());

    list_active_featured(&backend).await.expect("list");

    assert_eq!(testing::query_param(&mock.last_request().expect("request"), "is_active"), ["eq.true"]);
}

#[tokio::test]
async fn create_sends_null_for_empty_optionals() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(201));
    let backend = testing::backend(mock.clone());

    create_featured(&backend, &input()).await.expect("create");

    let body = testing::json_body(&mock.last_request().expect("request"));
    assert_eq!(body[0]["description"], serde_json::Value::Null);
    assert_eq!(body[0]["redirect_category_id"], serde_json::Value::Null);
    assert_eq!(body[0]["display_order"], 0);
}

#[tokio::test]
async fn update_returns_stored_row() {
    let mock = Arc::new(MockTransport::new());
    let id = Uuid::from_u128(4);
    mock.push(testing::ok_json(&serde_json::json!([collection_row(id)])));
    let backend = testing::backend(mock.clone());

    let stored = update_featured(&backend, id, &input()).await.expect("update");

    assert_eq!(stored.id, id);
    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.header_value("Prefer"), Some("return=representation"));
}

#[tokio::test]
async fn update_of_missing_row_is_rejected() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock);

    let err = update_featured(&backend, Uuid::from_u128(4), &input()).await.expect_err("missing");
    assert!(matches!(err, ServiceError::Rejected(_)));
}

#[tokio::test]
async fn set_active_patches_flag_only() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::empty(204));
    let backend = testing::backend(mock.clone());

    set_active(&backend, Uuid::from_u128(4), false).await.expect("toggle");

    let body = testing::json_body(&mock.last_request().expect("request"));
    assert_eq!(body, serde_json::json!({ "is_active": false }));
}
