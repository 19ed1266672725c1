use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const BASE: [(&str, &str); 2] = [("BACKEND_URL", "https://abcd.example.co/"), ("BACKEND_ANON_KEY", "anon")];

#[test]
fn defaults_apply_when_optional_values_absent() {
    let config = AppConfig::from_lookup(lookup(&BASE)).expect("config");
    assert_eq!(config.backend.url, "https://abcd.example.co");
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.log_level, log::Level::Info);
}

#[test]
fn optional_values_override_defaults() {
    let mut pairs = BASE.to_vec();
    pairs.push(("PROMPT_STUDIO_PAGE_SIZE", "12"));
    pairs.push(("PROMPT_STUDIO_LOG_LEVEL", "debug"));
    let config = AppConfig::from_lookup(lookup(&pairs)).expect("config");
    assert_eq!(config.page_size, 12);
    assert_eq!(config.log_level, log::Level::Debug);
}

#[test]
fn invalid_optional_values_fall_back() {
    let mut pairs = BASE.to_vec();
    pairs.push(("PROMPT_STUDIO_PAGE_SIZE", "0"));
    pairs.push(("PROMPT_STUDIO_LOG_LEVEL", "loud"));
    let config = AppConfig::from_lookup(lookup(&pairs)).expect("config");
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
}

#[test]
fn missing_backend_url_is_an_error() {
    let err = AppConfig::from_lookup(lookup(&[("BACKEND_ANON_KEY", "anon")])).expect_err("missing url");
    assert!(matches!(err, ServiceError::Backend(backend::BackendError::Config(_))));
}
