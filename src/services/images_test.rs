use std::sync::Arc;

use backend::testing::{self, MockTransport};
use backend::{Body, Method};

use super::*;

#[test]
fn check_rejects_non_images_and_large_files() {
    assert_eq!(check_image("image/png", 1024), Ok(()));
    assert_eq!(check_image("application/pdf", 10).map_err(|n| n.title), Err("Invalid file type".to_owned()));
    assert_eq!(
        check_image("image/jpeg", MAX_IMAGE_BYTES + 1).map_err(|n| n.title),
        Err("File too large".to_owned())
    );
}

#[test]
fn upload_paths_are_unique_and_keep_extension() {
    let a = upload_path("Photo.JPG", testing::NOW_MS);
    let b = upload_path("Photo.JPG", testing::NOW_MS);
    assert_ne!(a, b);
    assert!(a.starts_with(&format!("uploads/{}-", testing::NOW_MS)));
    assert!(a.ends_with(".jpg"));
    assert!(!upload_path("noext", testing::NOW_MS).contains('.'));
}

#[test]
fn resolve_handles_missing_absolute_and_relative() {
    let backend = testing::backend(Arc::new(MockTransport::new()));
    assert_eq!(resolve_image_url(&backend, None), "/placeholder.svg");
    assert_eq!(resolve_image_url(&backend, Some("  ")), "/placeholder.svg");
    assert_eq!(resolve_image_url(&backend, Some("https://cdn.example/a.png")), "https://cdn.example/a.png");
    assert_eq!(
        resolve_image_url(&backend, Some("uploads/a.png")),
        "https://abcd.example.co/storage/v1/object/public/prompt-images/uploads/a.png"
    );
}

#[tokio::test]
async fn upload_returns_public_url_without_overwrite() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!({ "Key": "prompt-images/uploads/x.png" })));
    let backend = testing::backend(mock.clone());

    let uploaded = upload_image(&backend, "x.png", vec![1, 2, 3], "image/png", "prompt-images").await.expect("upload");

    assert!(uploaded.path.starts_with("uploads/"));
    assert!(uploaded.url.ends_with(&uploaded.path));
    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header_value("x-upsert"), Some("false"));
    assert_eq!(request.header_value("cache-control"), Some("max-age=3600"));
    assert!(matches!(request.body, Some(Body::Bytes { .. })));
}

#[tokio::test]
async fn rejected_upload_is_an_error() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::status_json(400, &serde_json::json!({ "statusCode": "409", "error": "Duplicate", "message": "The resource already exists" })));
    let backend = testing::backend(mock);

    assert!(upload_image(&backend, "x.png", vec![1], "image/png", "prompt-images").await.is_err());
}

#[tokio::test]
async fn delete_sends_path_list() {
    let mock = Arc::new(MockTransport::new());
    mock.push(testing::ok_json(&serde_json::json!([])));
    let backend = testing::backend(mock.clone());

    delete_image(&backend, "uploads/x.png", "prompt-images").await.expect("delete");

    let request = mock.last_request().expect("request");
    assert_eq!(request.method, Method::Delete);
    assert_eq!(testing::json_body(&request), serde_json::json!({ "prefixes": ["uploads/x.png"] }));
}
