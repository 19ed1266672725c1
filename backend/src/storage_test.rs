use std::sync::Arc;

use super::*;
use crate::testing::{self, MockTransport};
use crate::transport::Body;

#[tokio::test]
async fn upload_sends_bytes_with_cache_and_upsert_headers() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!({ "Key": "prompt-images/uploads/a.png" })));
    let backend = testing::backend(mock.clone());

    let path = backend
        .storage()
        .upload("prompt-images", "uploads/a.png", vec![1, 2, 3], "image/png", &UploadOptions::default())
        .await
        .expect("upload");

    assert_eq!(path, "uploads/a.png");
    let request = mock.last_request().expect("request");
    assert_eq!(request.url, "https://abcd.example.co/storage/v1/object/prompt-images/uploads/a.png");
    assert_eq!(request.header_value("cache-control"), Some("max-age=3600"));
    assert_eq!(request.header_value("x-upsert"), Some("false"));
    assert_eq!(
        request.body,
        Some(Body::Bytes { content_type: "image/png".to_owned(), data: vec![1, 2, 3] })
    );
}

#[tokio::test]
async fn rejected_upload_is_storage_error() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::status_json(400, &serde_json::json!({ "error": "Duplicate", "message": "The resource already exists" })));
    let backend = testing::backend(mock);

    let err = backend
        .storage()
        .upload("prompt-images", "uploads/a.png", Vec::new(), "image/png", &UploadOptions::default())
        .await
        .expect_err("duplicate");
    assert_eq!(err, BackendError::Storage { status: 400, message: "The resource already exists".to_owned() });
}

#[tokio::test]
async fn list_posts_prefix_and_paging() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([
        { "name": "a.png", "id": "1", "metadata": { "size": 10 } },
        { "name": "b.png" }
    ])));
    let backend = testing::backend(mock.clone());

    let objects = backend.storage().list("prompt-images", "uploads", 100, 0).await.expect("list");

    assert_eq!(objects.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(), vec!["a.png", "b.png"]);
    let request = mock.last_request().expect("request");
    assert!(request.url.ends_with("/storage/v1/object/list/prompt-images"));
    let Some(Body::Json(body)) = request.body else { panic!("json body") };
    let body: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(body["prefix"], "uploads");
    assert_eq!(body["limit"], 100);
    assert_eq!(body["sortBy"]["column"], "name");
}

#[tokio::test]
async fn remove_deletes_prefixes() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());

    backend
        .storage()
        .remove("prompt-images", &["uploads/a.png".to_owned()])
        .await
        .expect("remove");

    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Delete);
    let Some(Body::Json(body)) = request.body else { panic!("json body") };
    assert_eq!(body, r#"{"prefixes":["uploads/a.png"]}"#);
}

#[test]
fn public_url_points_at_public_object() {
    let backend = testing::backend(Arc::new(MockTransport::new()));
    assert_eq!(
        backend.storage().public_url("prompt-images", "/uploads/a.png"),
        "https://abcd.example.co/storage/v1/object/public/prompt-images/uploads/a.png"
    );
}
