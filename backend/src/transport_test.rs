use super::*;

#[test]
fn response_header_lookup_ignores_case() {
    let resp = HttpResponse::new(206, "[]").with_header("Content-Range", "0-9/120");
    assert_eq!(resp.header("content-range"), Some("0-9/120"));
    assert_eq!(resp.header("x-missing"), None);
}

#[test]
fn success_covers_2xx_only() {
    assert!(HttpResponse::new(200, "").is_success());
    assert!(HttpResponse::new(204, "").is_success());
    assert!(!HttpResponse::new(301, "").is_success());
    assert!(!HttpResponse::new(406, "").is_success());
}

#[test]
fn set_header_replaces_existing_value() {
    let mut req = HttpRequest::new(Method::Get, "https://x.test").header("Accept", "application/json");
    req.set_header("accept", "application/vnd.pgrst.object+json");
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.header_value("Accept"), Some("application/vnd.pgrst.object+json"));
}

#[test]
fn json_body_serializes_value() {
    let req = HttpRequest::new(Method::Post, "https://x.test")
        .json(&serde_json::json!({ "a": 1 }))
        .expect("json");
    assert_eq!(req.body, Some(Body::Json("{\"a\":1}".to_owned())));
}
