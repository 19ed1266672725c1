use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn parses_required_values_and_defaults_bucket() {
    let config = BackendConfig::from_lookup(lookup_from(&[
        ("BACKEND_URL", "https://abcd1234.example.co/"),
        ("BACKEND_ANON_KEY", "anon"),
    ]))
    .expect("config");
    assert_eq!(config.url, "https://abcd1234.example.co");
    assert_eq!(config.anon_key, "anon");
    assert_eq!(config.image_bucket, DEFAULT_IMAGE_BUCKET);
}

#[test]
fn custom_bucket_overrides_default() {
    let config = BackendConfig::from_lookup(lookup_from(&[
        ("BACKEND_URL", "https://abcd1234.example.co"),
        ("BACKEND_ANON_KEY", "anon"),
        ("BACKEND_IMAGE_BUCKET", "covers"),
    ]))
    .expect("config");
    assert_eq!(config.image_bucket, "covers");
}

#[test]
fn missing_url_is_config_error() {
    let err = BackendConfig::from_lookup(lookup_from(&[("BACKEND_ANON_KEY", "anon")])).expect_err("should fail");
    assert_eq!(err, BackendError::Config("BACKEND_URL not set".to_owned()));
}

#[test]
fn blank_key_is_config_error() {
    let err = BackendConfig::from_lookup(lookup_from(&[
        ("BACKEND_URL", "https://abcd1234.example.co"),
        ("BACKEND_ANON_KEY", "   "),
    ]))
    .expect_err("should fail");
    assert_eq!(err, BackendError::Config("BACKEND_ANON_KEY not set".to_owned()));
}

#[test]
fn relative_url_is_rejected() {
    let err = BackendConfig::from_lookup(lookup_from(&[
        ("BACKEND_URL", "not a url"),
        ("BACKEND_ANON_KEY", "anon"),
    ]))
    .expect_err("should fail");
    assert!(matches!(err, BackendError::Config(msg) if msg.contains("not a valid URL")));
}

#[test]
fn session_storage_key_uses_project_ref() {
    let config = BackendConfig {
        url: "https://abcd1234.example.co".to_owned(),
        anon_key: "anon".to_owned(),
        image_bucket: DEFAULT_IMAGE_BUCKET.to_owned(),
    };
    assert_eq!(config.project_ref(), "abcd1234");
    assert_eq!(config.session_storage_key(), "sb-abcd1234-auth-token");
}

#[test]
fn endpoint_helpers_join_paths() {
    let config = BackendConfig {
        url: "https://abcd1234.example.co".to_owned(),
        anon_key: "anon".to_owned(),
        image_bucket: DEFAULT_IMAGE_BUCKET.to_owned(),
    };
    assert_eq!(config.rest_url("prompts"), "https://abcd1234.example.co/rest/v1/prompts");
    assert_eq!(config.auth_url("/token"), "https://abcd1234.example.co/auth/v1/token");
    assert_eq!(config.storage_url("object/list/x"), "https://abcd1234.example.co/storage/v1/object/list/x");
}
